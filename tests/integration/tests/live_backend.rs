//! Live backend tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Running Redis instance
//! - Environment variables: DATABASE_URL, REDIS_URL, JWT_SECRET
//!
//! Run with: cargo test -p integration-tests --test live_backend

use std::sync::Arc;
use std::time::Duration;

use arranke_service::{Backend, ListingService, ReactionLedger, SessionContext};
use integration_tests::{check_test_env, identity, listing_request, test_config};

#[tokio::test]
async fn test_like_round_trip() {
    if !check_test_env() {
        return;
    }

    let mut config = test_config().expect("config");
    config.database.migrations_dir =
        concat!(env!("CARGO_MANIFEST_DIR"), "/../../crates/arranke-db/migrations").to_string();
    let backend = Backend::connect(&config).await.expect("Failed to connect");
    let ctx = backend.context();
    let owner = identity("maker");
    let viewer = identity("viewer");

    let listing = ListingService::new(ctx)
        .submit(&owner, listing_request("Live"), None)
        .await
        .expect("submit");

    let ledger = ReactionLedger::initialize(
        ctx,
        Arc::new(SessionContext::fixed(Some(viewer.clone()))),
        listing.id.clone(),
        0,
        0,
    )
    .await;
    assert_eq!(ledger.state().likes, 0);

    assert!(ledger.like().await.is_applied());
    assert_eq!(ledger.state().likes, 1);

    // A second viewer is fed through Redis pub/sub.
    let observer = ReactionLedger::initialize(
        ctx,
        Arc::new(SessionContext::fixed(None)),
        listing.id.clone(),
        0,
        0,
    )
    .await;
    assert_eq!(observer.state().likes, 1);

    assert!(ledger.like().await.is_applied());
    let mut pushed = false;
    for _ in 0..50 {
        if observer.state().likes == 0 {
            pushed = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(pushed, "retraction should reach the observer");

    ListingService::new(ctx)
        .delete(&owner, &listing.id)
        .await
        .expect("cleanup");
    drop(ledger);
    drop(observer);
    backend.shutdown().await;
}
