//! Redis transport for aggregate changes
//!
//! `RedisChangeSink` publishes every counter change on the listing's channel;
//! `AggregateRelay` pattern-subscribes to all listing channels and feeds the
//! messages into a local [`AggregateHub`].

use std::sync::Arc;

use arranke_core::events::AggregateChanged;
use arranke_core::traits::ChangeSink;
use async_trait::async_trait;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::AggregateHub;
use crate::pubsub::{PubSubChannel, Publisher, ReceivedMessage, Subscriber, SubscriberResult};

/// Change sink that publishes to Redis
#[derive(Debug, Clone)]
pub struct RedisChangeSink {
    publisher: Publisher,
}

impl RedisChangeSink {
    pub fn new(publisher: Publisher) -> Self {
        Self { publisher }
    }
}

#[async_trait]
impl ChangeSink for RedisChangeSink {
    async fn aggregate_changed(&self, change: AggregateChanged) {
        if let Err(e) = self.publisher.publish_aggregate(&change).await {
            error!(listing_id = %change.listing_id, error = %e, "Failed to publish aggregate change");
        }
    }
}

/// Forwards Redis aggregate messages into a hub until dropped
#[derive(Debug)]
pub struct AggregateRelay {
    task: JoinHandle<()>,
}

impl AggregateRelay {
    /// Subscribe to every listing stats channel and start forwarding
    pub async fn start(subscriber: &Subscriber, hub: Arc<AggregateHub>) -> SubscriberResult<Self> {
        let mut rx = subscriber.receiver();
        subscriber
            .psubscribe(&[PubSubChannel::all_listing_stats_pattern()])
            .await?;

        let task = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(message) => forward(&hub, &message),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Aggregate relay lagged behind");
                    }
                    Err(RecvError::Closed) => {
                        debug!("Aggregate relay source closed");
                        break;
                    }
                }
            }
        });

        info!("Aggregate relay started");
        Ok(Self { task })
    }

    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for AggregateRelay {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn forward(hub: &AggregateHub, message: &ReceivedMessage) {
    let PubSubChannel::ListingStats(listing_id) = &message.channel else {
        return;
    };

    match message.event.as_ref().and_then(|e| e.as_aggregate_changed()) {
        Some(change) if &change.listing_id == listing_id => {
            hub.publish(&change);
        }
        Some(change) => warn!(
            channel = %message.channel,
            payload_listing = %change.listing_id,
            "Aggregate change on mismatched channel"
        ),
        None => warn!(channel = %message.channel, "Unrecognised aggregate payload"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pubsub::PubSubEvent;
    use arranke_core::traits::AggregateFeed;
    use arranke_core::{Aggregate, ListingId};
    use parking_lot::Mutex;

    fn message(channel: &str, change: &AggregateChanged) -> ReceivedMessage {
        let event = PubSubEvent::aggregate_changed(change).unwrap();
        ReceivedMessage {
            channel: PubSubChannel::parse(channel),
            payload: event.to_json().unwrap(),
            event: Some(event),
        }
    }

    #[test]
    fn test_forward_delivers_to_hub() {
        let hub = AggregateHub::new();
        let seen: Arc<Mutex<Vec<Aggregate>>> = Arc::default();
        let sink = seen.clone();
        let _sub = hub.subscribe(
            &ListingId::new("proj-1"),
            Box::new(move |a| sink.lock().push(a)),
        );

        let change = AggregateChanged::new(ListingId::new("proj-1"), Aggregate::new(9, 2));
        forward(&hub, &message("listing_stats:proj-1", &change));

        assert_eq!(*seen.lock(), vec![Aggregate::new(9, 2)]);
    }

    #[test]
    fn test_forward_ignores_mismatch_and_other_channels() {
        let hub = AggregateHub::new();
        let seen: Arc<Mutex<Vec<Aggregate>>> = Arc::default();
        let sink = seen.clone();
        let _sub = hub.subscribe(
            &ListingId::new("proj-1"),
            Box::new(move |a| sink.lock().push(a)),
        );

        let change = AggregateChanged::new(ListingId::new("proj-1"), Aggregate::new(1, 1));
        forward(&hub, &message("listing_stats:proj-2", &change));
        forward(&hub, &message("ops", &change));

        assert!(seen.lock().is_empty());
    }
}
