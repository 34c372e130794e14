//! Redis Pub/Sub module.

mod channels;
mod publisher;
mod subscriber;

pub use channels::{PubSubChannel, LISTING_STATS_PREFIX};
pub use publisher::{PubSubEvent, Publisher};
pub use subscriber::{
    ReceivedMessage, Subscriber, SubscriberBuilder, SubscriberError, SubscriberResult,
};
