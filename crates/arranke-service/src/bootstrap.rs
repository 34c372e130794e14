//! Production wiring
//!
//! Connects PostgreSQL, Redis, token auth, and local file storage into a
//! [`ServiceContext`].

use std::sync::Arc;

use arranke_cache::{
    AggregateHub, AggregateRelay, Publisher, RedisChangeSink, RedisPool, Subscriber,
    SubscriberBuilder,
};
use arranke_common::{AppConfig, AppError, JwtService, TokenAuthProvider};
use arranke_db::{
    create_pool, run_migrations, DatabaseConfig, LocalObjectStore, PgListingRepository,
    PgProfileRepository, PgStatsRepository, PgVoteRepository, StorageConfig,
};
use tracing::info;

use crate::services::ServiceContext;

/// A connected backend
///
/// Holds the Redis subscriber and relay that keep the aggregate hub fed;
/// dropping the backend stops the push feed.
pub struct Backend {
    context: ServiceContext,
    hub: Arc<AggregateHub>,
    auth: Arc<TokenAuthProvider>,
    subscriber: Subscriber,
    relay: AggregateRelay,
}

impl Backend {
    /// Connect every dependency named in `config`
    pub async fn connect(config: &AppConfig) -> Result<Self, AppError> {
        info!("Connecting to PostgreSQL...");
        let pool = create_pool(&DatabaseConfig::from(&config.database))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        run_migrations(&pool, &config.database.migrations_dir)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        info!("PostgreSQL connection established");

        info!("Connecting to Redis...");
        let redis_pool =
            RedisPool::from_config(&config.redis).map_err(|e| AppError::Cache(e.to_string()))?;
        let sink = Arc::new(RedisChangeSink::new(Publisher::new(redis_pool)));

        let hub = Arc::new(AggregateHub::new());
        let subscriber = SubscriberBuilder::new()
            .redis_url(&config.redis.url)
            .build()
            .await
            .map_err(|e| AppError::Cache(e.to_string()))?;
        let relay = AggregateRelay::start(&subscriber, hub.clone())
            .await
            .map_err(|e| AppError::Cache(e.to_string()))?;
        info!("Redis connection established");

        let auth = Arc::new(TokenAuthProvider::new(JwtService::new(
            &config.jwt.secret,
            config.jwt.access_token_expiry,
        )));
        let objects = Arc::new(LocalObjectStore::new(&StorageConfig::from(&config.storage)));

        let context = ServiceContext::builder()
            .listing_repo(Arc::new(PgListingRepository::new(pool.clone())))
            .stats_repo(Arc::new(PgStatsRepository::new(pool.clone()).with_sink(sink)))
            .vote_repo(Arc::new(PgVoteRepository::new(pool.clone())))
            .profile_repo(Arc::new(PgProfileRepository::new(pool)))
            .auth(auth.clone())
            .feed(hub.clone())
            .objects(objects)
            .storage_config(config.storage.clone())
            .ledger_config(config.ledger.clone())
            .build()?;

        Ok(Self {
            context,
            hub,
            auth,
            subscriber,
            relay,
        })
    }

    pub fn context(&self) -> &ServiceContext {
        &self.context
    }

    pub fn hub(&self) -> &Arc<AggregateHub> {
        &self.hub
    }

    /// Token provider; sign users in and out through it
    pub fn auth(&self) -> &Arc<TokenAuthProvider> {
        &self.auth
    }

    /// Stop the push feed and close the Redis subscription
    pub async fn shutdown(self) {
        self.relay.stop();
        if let Err(e) = self.subscriber.shutdown().await {
            tracing::warn!(error = %e, "Subscriber shutdown failed");
        }
        info!("Backend shut down");
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend")
            .field("watched_listings", &self.hub.watched_listings())
            .finish_non_exhaustive()
    }
}
