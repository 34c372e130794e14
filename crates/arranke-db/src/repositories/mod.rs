//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in arranke-core.

mod error;
mod listing;
mod profile;
mod stats;
mod vote;

pub use error::{map_db_error, map_unique_violation};
pub use listing::PgListingRepository;
pub use profile::PgProfileRepository;
pub use stats::PgStatsRepository;
pub use vote::PgVoteRepository;
