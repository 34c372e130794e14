//! # arranke-db
//!
//! Persistence layer implementing the store capabilities of `arranke-core`.
//!
//! ## Overview
//!
//! - PostgreSQL repositories via SQLx, with the counter procedures and schema
//!   in `migrations/`
//! - Entity ↔ model mappers
//! - `MemoryStore`, an in-process store with the same semantics
//! - Object stores for uploaded images (local filesystem and in-memory)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use arranke_db::pool::{create_pool, run_migrations, DatabaseConfig};
//! use arranke_db::PgStatsRepository;
//!
//! async fn example(config: &arranke_common::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::from(&config.database)).await?;
//!     run_migrations(&pool, &config.database.migrations_dir).await?;
//!     let stats = PgStatsRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod storage;

// Re-export commonly used types
pub use memory::{Gate, MemoryObjectStore, MemoryStore, StoreOp};
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgListingRepository, PgProfileRepository, PgStatsRepository, PgVoteRepository,
};
pub use storage::{LocalObjectStore, StorageConfig};
