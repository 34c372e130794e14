//! Database models - SQLx-compatible structs for PostgreSQL tables

mod listing;
mod profile;
mod stats;
mod vote;

pub use listing::ListingModel;
pub use profile::ProfileModel;
pub use stats::{AggregateModel, ListingStatsModel};
pub use vote::UserVoteModel;
