//! Test helpers for integration tests
//!
//! [`Harness`] wires the in-memory store, aggregate hub, token auth and
//! object store into a [`ServiceContext`], the same way the production
//! bootstrap wires PostgreSQL and Redis.

use std::sync::Arc;

use anyhow::Result;
use arranke_cache::AggregateHub;
use arranke_common::{AppConfig, JwtService, LedgerConfig, StorageConfig, TokenAuthProvider};
use arranke_core::{Identity, ListingId, Profile};
use arranke_db::{MemoryObjectStore, MemoryStore};
use arranke_service::{ReactionLedger, ServiceContext, SessionContext};

/// In-memory backend shared by every scenario
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub hub: Arc<AggregateHub>,
    pub auth: Arc<TokenAuthProvider>,
    pub objects: Arc<MemoryObjectStore>,
    pub context: ServiceContext,
}

impl Harness {
    pub fn new() -> Self {
        let hub = Arc::new(AggregateHub::new());
        let store = Arc::new(MemoryStore::new().with_sink(hub.clone()));
        let auth = Arc::new(TokenAuthProvider::new(JwtService::new(
            "integration-test-secret-0123456789",
            900,
        )));
        let objects = Arc::new(MemoryObjectStore::default());

        let context = ServiceContext::builder()
            .listing_repo(store.clone())
            .stats_repo(store.clone())
            .vote_repo(store.clone())
            .profile_repo(store.clone())
            .auth(auth.clone())
            .feed(hub.clone())
            .objects(objects.clone())
            .storage_config(StorageConfig::default())
            .ledger_config(LedgerConfig::default())
            .build()
            .expect("context");

        Self {
            store,
            hub,
            auth,
            objects,
            context,
        }
    }

    /// Sign `identity` in through the token provider
    pub fn sign_in(&self, identity: &Identity) -> Result<()> {
        let token = self.auth.jwt().issue(identity)?;
        self.auth.sign_in(&token)?;
        Ok(())
    }

    pub fn sign_out(&self) {
        self.auth.sign_out();
    }

    /// Session that follows the token provider
    pub async fn live_session(&self) -> Result<Arc<SessionContext>> {
        Ok(Arc::new(SessionContext::connect(self.auth.clone()).await?))
    }

    /// Session pinned to one user, for multi-viewer scenarios
    pub fn session_of(identity: &Identity) -> Arc<SessionContext> {
        Arc::new(SessionContext::fixed(Some(identity.clone())))
    }

    pub async fn ledger(&self, session: Arc<SessionContext>, listing_id: &ListingId) -> ReactionLedger {
        ReactionLedger::initialize(&self.context, session, listing_id.clone(), 0, 0).await
    }

    pub fn seed_admin(&self, identity: &Identity) {
        let mut profile = Profile::new(identity.user_id);
        profile.username = identity.username.clone();
        profile.is_admin = true;
        self.store.seed_profile(profile);
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a test configuration
pub fn test_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    Ok(config)
}

/// Helper to check if the live test environment is available
pub fn check_test_env() -> bool {
    for var in ["DATABASE_URL", "REDIS_URL", "JWT_SECRET"] {
        if std::env::var(var).is_err() {
            eprintln!("Skipping test: {var} not set");
            return false;
        }
    }

    true
}
