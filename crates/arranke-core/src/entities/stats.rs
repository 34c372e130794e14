//! Aggregate stats row for a listing

use serde::{Deserialize, Serialize};

use crate::value_objects::{CounterKind, ListingId, VoteType};

/// The like/dislike pair pushed to subscribers and re-read after mutations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Aggregate {
    pub likes: u64,
    pub dislikes: u64,
}

impl Aggregate {
    pub const fn new(likes: u64, dislikes: u64) -> Self {
        Self { likes, dislikes }
    }

    /// Counter tracking `vote`
    pub const fn count(self, vote: VoteType) -> u64 {
        match vote {
            VoteType::Like => self.likes,
            VoteType::Dislike => self.dislikes,
        }
    }
}

/// Denormalized counters for one listing (`listing_stats`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingStats {
    pub listing_id: ListingId,
    pub likes_count: u64,
    pub dislikes_count: u64,
    pub visit_count: u64,
    pub clicks_count: u64,
}

impl ListingStats {
    /// A fresh row with every counter at zero
    pub fn zeroed(listing_id: ListingId) -> Self {
        Self {
            listing_id,
            likes_count: 0,
            dislikes_count: 0,
            visit_count: 0,
            clicks_count: 0,
        }
    }

    #[inline]
    pub fn aggregate(&self) -> Aggregate {
        Aggregate::new(self.likes_count, self.dislikes_count)
    }

    pub fn get(&self, kind: CounterKind) -> u64 {
        match kind {
            CounterKind::Likes => self.likes_count,
            CounterKind::Dislikes => self.dislikes_count,
            CounterKind::Visits => self.visit_count,
            CounterKind::Clicks => self.clicks_count,
        }
    }

    pub fn get_mut(&mut self, kind: CounterKind) -> &mut u64 {
        match kind {
            CounterKind::Likes => &mut self.likes_count,
            CounterKind::Dislikes => &mut self.dislikes_count,
            CounterKind::Visits => &mut self.visit_count,
            CounterKind::Clicks => &mut self.clicks_count,
        }
    }
}
