//! In-process implementations of the store capabilities
//!
//! `MemoryStore` keeps every table behind one lock and mirrors the SQL
//! semantics (unique vote rows, counters floored at zero, cascading deletes).
//! It also records calls and can inject failures or hold an operation open,
//! which the service and integration tests use to exercise partial failures
//! and in-flight behaviour.

mod objects;
mod store;

pub use objects::MemoryObjectStore;
pub use store::{Gate, MemoryStore, StoreOp};
