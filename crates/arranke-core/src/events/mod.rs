//! Domain events and listener registration

mod domain_event;
mod subscription;

pub use domain_event::{AggregateChanged, DomainEvent, ListingModerated, ListingSubmitted};
pub use subscription::{ListenerSet, Subscription};
