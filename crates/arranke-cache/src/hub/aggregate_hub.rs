//! In-process observer registry: listing ↦ listeners
//!
//! The hub is both sides of the push capability. Stats adapters (or the Redis
//! relay) publish into it as a [`ChangeSink`]; reaction ledgers subscribe to it
//! as an [`AggregateFeed`]. Delivery is synchronous and in publish order.

use std::sync::{Arc, Weak};

use arranke_core::entities::Aggregate;
use arranke_core::events::{AggregateChanged, ListenerSet, Subscription};
use arranke_core::traits::{AggregateFeed, AggregateListener, ChangeSink};
use arranke_core::value_objects::ListingId;
use async_trait::async_trait;
use dashmap::DashMap;
use tracing::trace;

type Registry = DashMap<ListingId, ListenerSet<Aggregate>>;

#[derive(Debug, Default)]
pub struct AggregateHub {
    listeners: Arc<Registry>,
}

impl AggregateHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a change to every listener of its listing; returns how many ran
    pub fn publish(&self, change: &AggregateChanged) -> usize {
        // Clone the set out so listeners can (un)subscribe from inside a callback.
        let Some(set) = self
            .listeners
            .get(&change.listing_id)
            .map(|entry| entry.value().clone())
        else {
            return 0;
        };

        let delivered = set.emit(&change.aggregate());
        trace!(listing_id = %change.listing_id, delivered, "Aggregate change delivered");
        delivered
    }

    pub fn listener_count(&self, listing_id: &ListingId) -> usize {
        self.listeners
            .get(listing_id)
            .map_or(0, |entry| entry.value().len())
    }

    /// Listings with at least one listener
    pub fn watched_listings(&self) -> usize {
        self.listeners.len()
    }
}

impl AggregateFeed for AggregateHub {
    fn subscribe(&self, listing_id: &ListingId, listener: AggregateListener) -> Subscription {
        let inner = self
            .listeners
            .entry(listing_id.clone())
            .or_default()
            .add(move |aggregate: &Aggregate| listener(*aggregate));

        let registry: Weak<Registry> = Arc::downgrade(&self.listeners);
        let listing_id = listing_id.clone();
        Subscription::new(move || {
            inner.unsubscribe();
            if let Some(registry) = registry.upgrade() {
                registry.remove_if(&listing_id, |_, set| set.is_empty());
            }
        })
    }
}

#[async_trait]
impl ChangeSink for AggregateHub {
    async fn aggregate_changed(&self, change: AggregateChanged) {
        self.publish(&change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn change(id: &str, likes: u64, dislikes: u64) -> AggregateChanged {
        AggregateChanged::new(ListingId::new(id), Aggregate::new(likes, dislikes))
    }

    fn recorder() -> (Arc<Mutex<Vec<Aggregate>>>, AggregateListener) {
        let seen: Arc<Mutex<Vec<Aggregate>>> = Arc::default();
        let sink = seen.clone();
        (seen, Box::new(move |a| sink.lock().push(a)))
    }

    #[test]
    fn test_delivers_only_to_matching_listing() {
        let hub = AggregateHub::new();
        let (seen_a, listener_a) = recorder();
        let (seen_b, listener_b) = recorder();
        let _a = hub.subscribe(&ListingId::new("a"), listener_a);
        let _b = hub.subscribe(&ListingId::new("b"), listener_b);

        assert_eq!(hub.publish(&change("a", 3, 1)), 1);

        assert_eq!(*seen_a.lock(), vec![Aggregate::new(3, 1)]);
        assert!(seen_b.lock().is_empty());
    }

    #[test]
    fn test_unsubscribe_prunes_listing() {
        let hub = AggregateHub::new();
        let (seen, listener) = recorder();
        let sub = hub.subscribe(&ListingId::new("a"), listener);
        assert_eq!(hub.listener_count(&ListingId::new("a")), 1);

        sub.unsubscribe();

        assert_eq!(hub.publish(&change("a", 1, 0)), 0);
        assert!(seen.lock().is_empty());
        assert_eq!(hub.watched_listings(), 0);
    }

    #[test]
    fn test_publish_without_listeners() {
        let hub = AggregateHub::new();
        assert_eq!(hub.publish(&change("nobody", 0, 0)), 0);
    }

    #[tokio::test]
    async fn test_change_sink_publishes() {
        let hub = AggregateHub::new();
        let (seen, listener) = recorder();
        let _sub = hub.subscribe(&ListingId::new("a"), listener);

        hub.aggregate_changed(change("a", 7, 0)).await;

        assert_eq!(*seen.lock(), vec![Aggregate::new(7, 0)]);
    }
}
