//! Redis Pub/Sub publisher.

use arranke_core::events::AggregateChanged;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};

use crate::pool::{RedisPool, RedisResult};
use crate::pubsub::PubSubChannel;

/// Event type carried by aggregate change messages
pub const AGGREGATE_CHANGED: &str = "AGGREGATE_CHANGED";

/// Event wrapper for Pub/Sub messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubSubEvent {
    /// Event type name (e.g., "AGGREGATE_CHANGED")
    pub event_type: String,
    /// Event payload
    pub data: serde_json::Value,
}

impl PubSubEvent {
    /// Create a new event
    #[must_use]
    pub fn new(event_type: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
        }
    }

    /// Wrap an aggregate change
    pub fn aggregate_changed(change: &AggregateChanged) -> Result<Self, serde_json::Error> {
        Ok(Self::new(AGGREGATE_CHANGED, serde_json::to_value(change)?))
    }

    /// The aggregate change carried by this event, if it is one
    #[must_use]
    pub fn as_aggregate_changed(&self) -> Option<AggregateChanged> {
        if self.event_type != AGGREGATE_CHANGED {
            return None;
        }
        serde_json::from_value(self.data.clone()).ok()
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Redis Pub/Sub publisher
#[derive(Clone, Debug)]
pub struct Publisher {
    pool: RedisPool,
}

impl Publisher {
    /// Create a new publisher
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Publish an event to a channel
    pub async fn publish(&self, channel: &PubSubChannel, event: &PubSubEvent) -> RedisResult<u32> {
        let mut conn = self.pool.get().await?;
        let channel_name = channel.name();
        let payload = event.to_json()?;

        let receivers: u32 = conn.publish(&channel_name, &payload).await?;

        tracing::debug!(
            channel = %channel_name,
            event_type = %event.event_type,
            receivers = receivers,
            "Published event"
        );

        Ok(receivers)
    }

    /// Publish an aggregate change on its listing's channel
    pub async fn publish_aggregate(&self, change: &AggregateChanged) -> RedisResult<u32> {
        let event = PubSubEvent::aggregate_changed(change)?;
        let channel = PubSubChannel::listing_stats(change.listing_id.clone());
        self.publish(&channel, &event).await
    }
}
