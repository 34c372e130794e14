//! Aggregate change fan-out

mod aggregate_hub;
mod relay;

pub use aggregate_hub::AggregateHub;
pub use relay::{AggregateRelay, RedisChangeSink};
