//! Object storage adapters

mod local;

pub use local::{LocalObjectStore, StorageConfig};
