//! Entity to model mappers
//!
//! Conversions between domain entities (arranke-core) and database models.
//! Rows carrying text enums convert with `TryFrom` since a bad value is a
//! storage fault, not a panic.

mod listing;
mod profile;
mod stats;
mod vote;

pub use stats::count_from_db;
