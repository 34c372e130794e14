//! Listing database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for listings table
#[derive(Debug, Clone, FromRow)]
pub struct ListingModel {
    pub id: String,
    pub name: String,
    pub slogan: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub category: Option<String>,
    pub logo_url: Option<String>,
    pub owner_id: Uuid,
    pub owner_name: Option<String>,
    pub display_name_preference: String,
    pub status: String,
    pub submission_date: DateTime<Utc>,
    pub approval_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
