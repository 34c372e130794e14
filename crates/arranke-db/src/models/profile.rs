//! Profile database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for profiles table
#[derive(Debug, Clone, FromRow)]
pub struct ProfileModel {
    pub id: Uuid,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub website: Option<String>,
    pub avatar_url: Option<String>,
    pub is_admin: bool,
    pub updated_at: DateTime<Utc>,
}
