//! Test fixtures and data generators

use std::sync::atomic::{AtomicU64, Ordering};

use arranke_core::{Identity, UserId};
use arranke_service::dto::NewListingRequest;
use arranke_service::Upload;

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// A fresh identity with a unique username
pub fn identity(prefix: &str) -> Identity {
    let username = format!("{prefix}{}", unique_suffix());
    Identity::new(UserId::generate())
        .with_email(format!("{username}@example.com"))
        .with_username(username)
}

/// Listing submission with a unique name
pub fn listing_request(prefix: &str) -> NewListingRequest {
    NewListingRequest {
        name: format!("{prefix} {}", unique_suffix()),
        slogan: Some("Ship it".to_string()),
        description: Some("A small tool for big teams".to_string()),
        url: Some("https://example.com".to_string()),
        category: Some("Developer Tools".to_string()),
        display_name_preference: None,
    }
}

/// A tiny PNG-typed upload
pub fn png(name: &str) -> Upload {
    Upload::new(format!("{name}.png"), "image/png", vec![0x89, b'P', b'N', b'G'])
}
