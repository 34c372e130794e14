//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation (PostgreSQL or in-memory).

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{Aggregate, Listing, ListingStats, ModerationStatus, Profile, UserVote};
use crate::error::DomainError;
use crate::value_objects::{CounterKind, ListingId, UserId, VoteType};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Listing Repository
// ============================================================================

#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Find listing by ID
    async fn find_by_id(&self, id: &ListingId) -> RepoResult<Option<Listing>>;

    /// Find listing by its unique display name
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Listing>>;

    /// All listings owned by a user, newest first
    async fn find_by_owner(&self, owner_id: UserId) -> RepoResult<Vec<Listing>>;

    /// Listings with the given status, oldest submission first
    async fn list_by_status(&self, status: ModerationStatus) -> RepoResult<Vec<Listing>>;

    /// Approved listings, newest first
    async fn list_approved(&self, limit: i64) -> RepoResult<Vec<Listing>>;

    /// Approved listings whose name, category or description contain `query`
    async fn search(&self, query: &str, limit: i64) -> RepoResult<Vec<Listing>>;

    /// Check if a listing name is already taken
    async fn name_exists(&self, name: &str) -> RepoResult<bool>;

    /// Create a new listing
    async fn create(&self, listing: &Listing) -> RepoResult<()>;

    /// Update an existing listing
    async fn update(&self, listing: &Listing) -> RepoResult<()>;

    /// Delete a listing (stats and votes go with it)
    async fn delete(&self, id: &ListingId) -> RepoResult<()>;

    /// Record a moderation decision
    async fn set_status(
        &self,
        id: &ListingId,
        status: ModerationStatus,
        decided_at: DateTime<Utc>,
    ) -> RepoResult<()>;
}

// ============================================================================
// Stats Repository
// ============================================================================

/// Aggregate counters. Only the atomic procedures change them.
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Full stats row, if one exists
    async fn find(&self, listing_id: &ListingId) -> RepoResult<Option<ListingStats>>;

    /// Like/dislike pair, if the row exists
    async fn read_aggregate(&self, listing_id: &ListingId) -> RepoResult<Option<Aggregate>>;

    /// Insert a stats row
    async fn create(&self, stats: &ListingStats) -> RepoResult<()>;

    /// Run the atomic increment procedure for `kind`
    async fn increment(&self, listing_id: &ListingId, kind: CounterKind) -> RepoResult<()>;

    /// Run the atomic decrement procedure for `kind` (floors at zero)
    async fn decrement(&self, listing_id: &ListingId, kind: CounterKind) -> RepoResult<()>;
}

// ============================================================================
// Vote Repository
// ============================================================================

#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// The user's vote row for a listing
    async fn find(&self, listing_id: &ListingId, user_id: UserId) -> RepoResult<Option<UserVote>>;

    /// Insert a vote row
    async fn insert(&self, vote: &UserVote) -> RepoResult<()>;

    /// Change the type of an existing vote row
    async fn update_type(
        &self,
        listing_id: &ListingId,
        user_id: UserId,
        vote_type: VoteType,
    ) -> RepoResult<()>;

    /// Delete a vote row
    async fn delete(&self, listing_id: &ListingId, user_id: UserId) -> RepoResult<()>;
}

// ============================================================================
// Profile Repository
// ============================================================================

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find profile by user ID
    async fn find(&self, user_id: UserId) -> RepoResult<Option<Profile>>;

    /// Insert or replace a profile
    async fn upsert(&self, profile: &Profile) -> RepoResult<()>;
}
