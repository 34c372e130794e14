//! Listing stats database models

use sqlx::FromRow;

/// Database model for listing_stats table
#[derive(Debug, Clone, FromRow)]
pub struct ListingStatsModel {
    pub listing_id: String,
    pub likes_count: i64,
    pub dislikes_count: i64,
    pub visit_count: i64,
    pub clicks_count: i64,
}

/// Like/dislike projection of a stats row
#[derive(Debug, Clone, Copy, FromRow)]
pub struct AggregateModel {
    pub likes_count: i64,
    pub dislikes_count: i64,
}
