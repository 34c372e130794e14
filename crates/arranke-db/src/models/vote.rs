//! User vote database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for user_votes table
#[derive(Debug, Clone, FromRow)]
pub struct UserVoteModel {
    pub listing_id: String,
    pub user_id: Uuid,
    pub vote_type: String,
    pub created_at: DateTime<Utc>,
}
