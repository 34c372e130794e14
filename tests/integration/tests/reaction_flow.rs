//! Reaction ledger scenarios over the in-memory backend
//!
//! Run with: cargo test -p integration-tests --test reaction_flow

use arranke_core::{ListingId, VoteType};
use arranke_service::{Rejection, VoteOutcome};
use integration_tests::{identity, Harness};

fn listing(id: &str) -> ListingId {
    ListingId::new(id)
}

#[tokio::test]
async fn test_viewers_see_each_others_votes() {
    let harness = Harness::new();
    let id = listing("shared");
    let ana = identity("ana");
    let bo = identity("bo");

    let ana_view = harness.ledger(Harness::session_of(&ana), &id).await;
    let bo_view = harness.ledger(Harness::session_of(&bo), &id).await;

    assert!(ana_view.like().await.is_applied());
    assert_eq!(bo_view.state().likes, 1);
    assert_eq!(bo_view.state().current_user_vote, None);

    assert!(bo_view.dislike().await.is_applied());
    let seen_by_ana = ana_view.state();
    assert_eq!((seen_by_ana.likes, seen_by_ana.dislikes), (1, 1));
    assert_eq!(seen_by_ana.current_user_vote, Some(VoteType::Like));

    // Ana switches; both ledgers converge on the stored counters.
    assert!(ana_view.dislike().await.is_applied());
    for view in [&ana_view, &bo_view] {
        let state = view.state();
        assert_eq!((state.likes, state.dislikes), (0, 2));
    }
    assert_eq!(harness.store.vote_rows(&id), 2);
}

#[tokio::test]
async fn test_session_changes_follow_the_provider() {
    let harness = Harness::new();
    let id = listing("session");
    let ana = identity("ana");
    let bo = identity("bo");

    let session = harness.live_session().await.unwrap();
    let ledger = harness.ledger(session.clone(), &id).await;

    assert_eq!(
        ledger.like().await,
        VoteOutcome::Rejected(Rejection::Unauthenticated)
    );
    assert!(ledger.login_prompt_visible());
    ledger.dismiss_login_prompt();

    harness.sign_in(&ana).unwrap();
    assert!(session.is_signed_in());
    assert!(ledger.like().await.is_applied());

    // A different user on the same session gets their own vote row.
    harness.sign_in(&bo).unwrap();
    assert_eq!(
        ledger.like().await,
        VoteOutcome::Applied {
            vote: Some(VoteType::Like)
        }
    );
    assert_eq!(ledger.state().likes, 2);
    assert_eq!(harness.store.vote_snapshot(&id, ana.user_id), Some(VoteType::Like));
    assert_eq!(harness.store.vote_snapshot(&id, bo.user_id), Some(VoteType::Like));

    harness.sign_out();
    assert_eq!(
        ledger.dislike().await,
        VoteOutcome::Rejected(Rejection::Unauthenticated)
    );
    assert_eq!(ledger.state().likes, 2);
}

#[tokio::test]
async fn test_returning_voter_sees_previous_vote() {
    let harness = Harness::new();
    let id = listing("returning");
    let ana = identity("ana");

    {
        let first_visit = harness.ledger(Harness::session_of(&ana), &id).await;
        assert!(first_visit.dislike().await.is_applied());
    }

    let second_visit = harness.ledger(Harness::session_of(&ana), &id).await;
    let state = second_visit.state();
    assert_eq!(state.current_user_vote, Some(VoteType::Dislike));
    assert_eq!(state.dislikes, 1);

    assert_eq!(
        second_visit.dislike().await,
        VoteOutcome::Applied { vote: None }
    );
    assert_eq!(harness.store.vote_rows(&id), 0);
    assert_eq!(second_visit.state().dislikes, 0);
}

#[tokio::test]
async fn test_dropped_ledger_leaves_the_hub() {
    let harness = Harness::new();
    let id = listing("dropped");
    let ana = identity("ana");

    let kept = harness.ledger(Harness::session_of(&ana), &id).await;
    let dropped = harness.ledger(Harness::session_of(&ana), &id).await;
    assert_eq!(harness.hub.listener_count(&id), 2);

    drop(dropped);
    assert_eq!(harness.hub.listener_count(&id), 1);

    kept.teardown();
    assert_eq!(harness.hub.listener_count(&id), 0);
    assert_eq!(harness.hub.watched_listings(), 0);
    assert_eq!(
        kept.like().await,
        VoteOutcome::Rejected(Rejection::Released)
    );
}
