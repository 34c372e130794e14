//! # arranke-core
//!
//! Domain layer containing entities, value objects, capability traits, and domain events.
//! This crate has zero dependencies on infrastructure (database, cache, storage).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    resolve_display_name, Aggregate, DisplayNamePreference, Identity, Listing, ListingStats,
    ModerationStatus, Profile, ReactionState, UserVote, VoteRowChange, VoteTransition,
    FALLBACK_DISPLAY_NAME,
};
pub use error::DomainError;
pub use events::{AggregateChanged, DomainEvent, ListenerSet, Subscription};
pub use traits::{
    AggregateFeed, AggregateListener, AuthProvider, ChangeSink, ListingRepository, ObjectStore,
    ProfileRepository, RepoResult, SessionListener, StatsRepository, VoteRepository,
    AVATARS_BUCKET, LOGOS_BUCKET,
};
pub use value_objects::{CounterKind, CounterOp, IdParseError, ListingId, UserId, VoteType};
