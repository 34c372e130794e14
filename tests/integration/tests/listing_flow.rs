//! Listing lifecycle: submission, moderation, browsing, reactions, profiles
//!
//! Run with: cargo test -p integration-tests --test listing_flow

use arranke_core::{DisplayNamePreference, DomainError, ModerationStatus, LOGOS_BUCKET};
use arranke_service::dto::{UpdateListingRequest, UpdateProfileRequest};
use arranke_service::services::upload::object_path_from_url;
use arranke_service::{
    ListingService, ModerationService, ProfileService, ReactionLedger, ServiceError,
};
use integration_tests::{identity, listing_request, png, Harness};

#[tokio::test]
async fn test_submission_to_showcase() {
    let harness = Harness::new();
    let ctx = &harness.context;
    let owner = identity("maker");
    let admin = identity("root");
    harness.seed_admin(&admin);

    let listings = ListingService::new(ctx);
    let moderation = ModerationService::new(ctx);

    let listing = listings
        .submit(&owner, listing_request("Rusty Board"), Some(png("logo")))
        .await
        .unwrap();
    assert_eq!(listing.status, ModerationStatus::Pending);
    let logo_path =
        object_path_from_url(LOGOS_BUCKET, listing.logo_url.as_deref().unwrap()).unwrap();
    assert!(harness.objects.contains(LOGOS_BUCKET, &logo_path));

    assert!(listings.showcase(10).await.unwrap().is_empty());
    let err = moderation.pending(&owner).await.unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::AdminRequired)));

    let pending = moderation.pending(&admin).await.unwrap();
    assert_eq!(pending.len(), 1);
    moderation.approve(&admin, &listing.id).await.unwrap();

    let showcase = listings.showcase(10).await.unwrap();
    assert_eq!(showcase.len(), 1);
    assert_eq!(showcase[0].listing.id, listing.id);
    assert_eq!(
        listings.search("developer").await.unwrap().len(),
        1,
        "category matches case-insensitively"
    );
}

#[tokio::test]
async fn test_listing_page_counts_and_reactions() {
    let harness = Harness::new();
    let ctx = &harness.context;
    let owner = identity("maker");
    let viewer = identity("viewer");
    let listings = ListingService::new(ctx);

    let listing = listings
        .submit(&owner, listing_request("Counter"), None)
        .await
        .unwrap();

    let first = listings.open_by_name(&listing.name).await.unwrap();
    assert_eq!(first.stats.visit_count, 0);
    let second = listings.open_by_name(&listing.name).await.unwrap();
    assert_eq!(second.stats.visit_count, 1);

    listings.record_click(&listing.id).await;
    let stats = harness.store.stats_snapshot(&listing.id).unwrap();
    assert_eq!((stats.visit_count, stats.clicks_count), (2, 1));

    let ledger = ReactionLedger::initialize(
        ctx,
        Harness::session_of(&viewer),
        listing.id.clone(),
        second.stats.likes_count,
        second.stats.dislikes_count,
    )
    .await;
    assert!(ledger.like().await.is_applied());

    let third = listings.open_by_name(&listing.name).await.unwrap();
    assert_eq!(third.stats.likes_count, 1);
    assert_eq!(third.stats.visit_count, 2);
}

#[tokio::test]
async fn test_owner_edits_and_deletes() {
    let harness = Harness::new();
    let ctx = &harness.context;
    let owner = identity("maker");
    let stranger = identity("stranger");
    let listings = ListingService::new(ctx);

    let listing = listings
        .submit(&owner, listing_request("Editable"), Some(png("logo")))
        .await
        .unwrap();

    let err = listings
        .update(&stranger, &listing.id, UpdateListingRequest::default(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::NotListingOwner)));

    let updated = listings
        .update(
            &owner,
            &listing.id,
            UpdateListingRequest {
                slogan: Some("Now with more edits".to_string()),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(updated.slogan.as_deref(), Some("Now with more edits"));
    assert_eq!(listings.owned_by(&owner).await.unwrap().len(), 1);

    listings.delete(&owner, &listing.id).await.unwrap();
    assert!(listings.owned_by(&owner).await.unwrap().is_empty());
    assert!(harness.objects.is_empty());
}

#[tokio::test]
async fn test_profile_preference_changes_owner_name() {
    let harness = Harness::new();
    let ctx = &harness.context;
    let owner = identity("maker");
    let admin = identity("root");
    harness.seed_admin(&admin);

    let profiles = ProfileService::new(ctx);
    profiles
        .update(
            &owner,
            UpdateProfileRequest {
                full_name: Some("Mia Maker".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let listings = ListingService::new(ctx);
    let listing = listings
        .submit(&owner, listing_request("Named"), None)
        .await
        .unwrap();
    ModerationService::new(ctx)
        .approve(&admin, &listing.id)
        .await
        .unwrap();

    let view = listings.open_by_name(&listing.name).await.unwrap();
    assert_eq!(view.owner_display_name, "Mia Maker");

    profiles
        .update(
            &owner,
            UpdateProfileRequest {
                display_name_preference: Some(DisplayNamePreference::Username),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let view = listings.open_by_name(&listing.name).await.unwrap();
    assert_eq!(Some(view.owner_display_name), owner.username);
}
