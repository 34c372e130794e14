//! Domain events - emitted when listing state changes
//!
//! `AggregateChanged` is the payload of the per-listing push channel that keeps
//! reaction widgets fresh; the others are informational.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Aggregate, ListingStats, ModerationStatus};
use crate::value_objects::{ListingId, UserId};

/// All domain events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    AggregateChanged(AggregateChanged),
    ListingSubmitted(ListingSubmitted),
    ListingModerated(ListingModerated),
}

impl DomainEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::AggregateChanged(_) => "AGGREGATE_CHANGED",
            Self::ListingSubmitted(_) => "LISTING_SUBMITTED",
            Self::ListingModerated(_) => "LISTING_MODERATED",
        }
    }

    pub fn listing_id(&self) -> &ListingId {
        match self {
            Self::AggregateChanged(e) => &e.listing_id,
            Self::ListingSubmitted(e) => &e.listing_id,
            Self::ListingModerated(e) => &e.listing_id,
        }
    }
}

/// New like/dislike counters for a listing's aggregate row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateChanged {
    pub listing_id: ListingId,
    pub likes_count: u64,
    pub dislikes_count: u64,
    pub timestamp: DateTime<Utc>,
}

impl AggregateChanged {
    pub fn new(listing_id: ListingId, aggregate: Aggregate) -> Self {
        Self {
            listing_id,
            likes_count: aggregate.likes,
            dislikes_count: aggregate.dislikes,
            timestamp: Utc::now(),
        }
    }

    #[inline]
    pub fn aggregate(&self) -> Aggregate {
        Aggregate::new(self.likes_count, self.dislikes_count)
    }
}

impl From<&ListingStats> for AggregateChanged {
    fn from(stats: &ListingStats) -> Self {
        Self::new(stats.listing_id.clone(), stats.aggregate())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSubmitted {
    pub listing_id: ListingId,
    pub owner_id: UserId,
    pub timestamp: DateTime<Utc>,
}

impl ListingSubmitted {
    pub fn new(listing_id: ListingId, owner_id: UserId) -> Self {
        Self {
            listing_id,
            owner_id,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingModerated {
    pub listing_id: ListingId,
    pub status: ModerationStatus,
    pub moderator_id: UserId,
    pub timestamp: DateTime<Utc>,
}

impl ListingModerated {
    pub fn new(listing_id: ListingId, status: ModerationStatus, moderator_id: UserId) -> Self {
        Self {
            listing_id,
            status,
            moderator_id,
            timestamp: Utc::now(),
        }
    }
}
