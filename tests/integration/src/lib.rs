//! Integration test utilities for arranke
//!
//! Scenarios run against the in-memory store wired to a real aggregate hub;
//! the `live_backend` tests additionally need PostgreSQL and Redis.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
