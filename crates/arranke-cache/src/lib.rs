//! # arranke-cache
//!
//! Push notifications for listing aggregates.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Pub/Sub**: Aggregate changes published on `listing_stats:{id}` channels
//! - **Hub**: In-process observer registry (listing ↦ listeners)
//! - **Relay**: Bridges Redis pub/sub into the hub so every instance sees every change
//!
//! ## Example
//!
//! ```ignore
//! use arranke_cache::{AggregateHub, AggregateRelay, Publisher, RedisChangeSink, RedisPool, SubscriberBuilder};
//!
//! let pool = RedisPool::from_config(&config.redis)?;
//! let sink = Arc::new(RedisChangeSink::new(Publisher::new(pool)));
//!
//! let hub = Arc::new(AggregateHub::new());
//! let subscriber = SubscriberBuilder::new().redis_url(&config.redis.url).build().await?;
//! let relay = AggregateRelay::start(&subscriber, hub.clone()).await?;
//! ```

pub mod hub;
pub mod pool;
pub mod pubsub;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};

// Re-export pubsub types
pub use pubsub::{
    PubSubChannel, PubSubEvent, Publisher, ReceivedMessage, Subscriber, SubscriberBuilder,
    SubscriberError, SubscriberResult, LISTING_STATS_PREFIX,
};

// Re-export hub types
pub use hub::{AggregateHub, AggregateRelay, RedisChangeSink};
