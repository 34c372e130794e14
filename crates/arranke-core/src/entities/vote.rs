//! User vote entity - one row per (listing, user)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{ListingId, UserId, VoteType};

/// The signed-in user's current reaction to a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserVote {
    pub listing_id: ListingId,
    pub user_id: UserId,
    pub vote_type: VoteType,
    pub created_at: DateTime<Utc>,
}

impl UserVote {
    pub fn new(listing_id: ListingId, user_id: UserId, vote_type: VoteType) -> Self {
        Self {
            listing_id,
            user_id,
            vote_type,
            created_at: Utc::now(),
        }
    }
}
