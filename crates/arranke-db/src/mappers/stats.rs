//! Stats entity <-> model mapper

use arranke_core::entities::{Aggregate, ListingStats};
use arranke_core::value_objects::ListingId;

use crate::models::{AggregateModel, ListingStatsModel};

/// Counters are `BIGINT` with a non-negative check; clamp anything else to zero
pub fn count_from_db(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

impl From<ListingStatsModel> for ListingStats {
    fn from(model: ListingStatsModel) -> Self {
        ListingStats {
            listing_id: ListingId::new(model.listing_id),
            likes_count: count_from_db(model.likes_count),
            dislikes_count: count_from_db(model.dislikes_count),
            visit_count: count_from_db(model.visit_count),
            clicks_count: count_from_db(model.clicks_count),
        }
    }
}

impl From<AggregateModel> for Aggregate {
    fn from(model: AggregateModel) -> Self {
        Aggregate::new(
            count_from_db(model.likes_count),
            count_from_db(model.dislikes_count),
        )
    }
}
