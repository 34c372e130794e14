//! Push notifications for aggregate counters

use async_trait::async_trait;

use crate::entities::Aggregate;
use crate::events::{AggregateChanged, Subscription};
use crate::value_objects::ListingId;

/// Callback invoked with each pushed like/dislike pair
pub type AggregateListener = Box<dyn Fn(Aggregate) + Send + Sync>;

/// Subscribe side: row-level change notifications for one listing
pub trait AggregateFeed: Send + Sync {
    fn subscribe(&self, listing_id: &ListingId, listener: AggregateListener) -> Subscription;
}

/// Publish side: stats adapters report every counter change here
#[async_trait]
pub trait ChangeSink: Send + Sync {
    async fn aggregate_changed(&self, change: AggregateChanged);
}
