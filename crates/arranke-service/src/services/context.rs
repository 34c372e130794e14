//! Service context - dependency container for services
//!
//! Holds the store capabilities, the auth provider, the aggregate feed and
//! the configuration every service and reaction ledger needs.

use std::sync::Arc;

use arranke_common::{LedgerConfig, StorageConfig};
use arranke_core::traits::{
    AggregateFeed, AuthProvider, ListingRepository, ObjectStore, ProfileRepository,
    StatsRepository, VoteRepository,
};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// Cloning is cheap; every capability is shared behind an `Arc`.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    listing_repo: Arc<dyn ListingRepository>,
    stats_repo: Arc<dyn StatsRepository>,
    vote_repo: Arc<dyn VoteRepository>,
    profile_repo: Arc<dyn ProfileRepository>,

    // Capabilities
    auth: Arc<dyn AuthProvider>,
    feed: Arc<dyn AggregateFeed>,
    objects: Arc<dyn ObjectStore>,

    // Configuration
    storage: StorageConfig,
    ledger: LedgerConfig,
}

impl ServiceContext {
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    pub fn listing_repo(&self) -> &dyn ListingRepository {
        self.listing_repo.as_ref()
    }

    pub fn stats_repo(&self) -> &dyn StatsRepository {
        self.stats_repo.as_ref()
    }

    pub fn vote_repo(&self) -> &dyn VoteRepository {
        self.vote_repo.as_ref()
    }

    pub fn profile_repo(&self) -> &dyn ProfileRepository {
        self.profile_repo.as_ref()
    }

    // === Capabilities ===

    /// Shared handle to the auth provider (for [`crate::SessionContext::connect`])
    pub fn auth(&self) -> Arc<dyn AuthProvider> {
        self.auth.clone()
    }

    pub fn feed(&self) -> &dyn AggregateFeed {
        self.feed.as_ref()
    }

    pub fn objects(&self) -> &dyn ObjectStore {
        self.objects.as_ref()
    }

    // === Configuration ===

    pub fn storage_config(&self) -> &StorageConfig {
        &self.storage
    }

    pub fn ledger_config(&self) -> &LedgerConfig {
        &self.ledger
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("storage", &self.storage)
            .field("ledger", &self.ledger)
            .finish_non_exhaustive()
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    listing_repo: Option<Arc<dyn ListingRepository>>,
    stats_repo: Option<Arc<dyn StatsRepository>>,
    vote_repo: Option<Arc<dyn VoteRepository>>,
    profile_repo: Option<Arc<dyn ProfileRepository>>,
    auth: Option<Arc<dyn AuthProvider>>,
    feed: Option<Arc<dyn AggregateFeed>>,
    objects: Option<Arc<dyn ObjectStore>>,
    storage: Option<StorageConfig>,
    ledger: Option<LedgerConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listing_repo(mut self, repo: Arc<dyn ListingRepository>) -> Self {
        self.listing_repo = Some(repo);
        self
    }

    pub fn stats_repo(mut self, repo: Arc<dyn StatsRepository>) -> Self {
        self.stats_repo = Some(repo);
        self
    }

    pub fn vote_repo(mut self, repo: Arc<dyn VoteRepository>) -> Self {
        self.vote_repo = Some(repo);
        self
    }

    pub fn profile_repo(mut self, repo: Arc<dyn ProfileRepository>) -> Self {
        self.profile_repo = Some(repo);
        self
    }

    pub fn auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn feed(mut self, feed: Arc<dyn AggregateFeed>) -> Self {
        self.feed = Some(feed);
        self
    }

    pub fn objects(mut self, objects: Arc<dyn ObjectStore>) -> Self {
        self.objects = Some(objects);
        self
    }

    pub fn storage_config(mut self, config: StorageConfig) -> Self {
        self.storage = Some(config);
        self
    }

    pub fn ledger_config(mut self, config: LedgerConfig) -> Self {
        self.ledger = Some(config);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            listing_repo: required(self.listing_repo, "listing_repo")?,
            stats_repo: required(self.stats_repo, "stats_repo")?,
            vote_repo: required(self.vote_repo, "vote_repo")?,
            profile_repo: required(self.profile_repo, "profile_repo")?,
            auth: required(self.auth, "auth")?,
            feed: required(self.feed, "feed")?,
            objects: required(self.objects, "objects")?,
            storage: self.storage.unwrap_or_default(),
            ledger: self.ledger.unwrap_or_default(),
        })
    }
}

fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
    value.ok_or_else(|| ServiceError::validation(format!("{name} is required")))
}
