//! Capability traits (ports) implemented by the adapter crates

mod auth;
mod feed;
mod repositories;
mod storage;

pub use auth::{AuthProvider, SessionListener};
pub use feed::{AggregateFeed, AggregateListener, ChangeSink};
pub use repositories::{
    ListingRepository, ProfileRepository, RepoResult, StatsRepository, VoteRepository,
};
pub use storage::{ObjectStore, LOGOS_BUCKET, AVATARS_BUCKET};
