//! The ledger itself
//!
//! A press is resolved into a [`VoteTransition`] and executed by one runner:
//! counter procedures in issue order, then the vote row, then one re-read of
//! the aggregate. If the row write fails after counters moved, the stored row
//! is read back into the cache and the aggregate is still re-read. Local
//! counters are never adjusted by arithmetic; they only ever take values read
//! from the store or pushed by the aggregate feed, whichever arrives last.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use arranke_core::{
    Aggregate, CounterOp, ListingId, ReactionState, RepoResult, Subscription, UserId, UserVote,
    VoteRowChange, VoteTransition, VoteType,
};
use parking_lot::Mutex;
use tracing::{debug, error, info, instrument};

use super::outcome::{LedgerStep, Rejection, VoteOutcome};
use super::prompt::LoginPrompt;
use crate::services::ServiceContext;
use crate::session::SessionContext;

/// Like/dislike state for one listing as seen by the current user
///
/// Dropping the ledger tears it down.
pub struct ReactionLedger {
    inner: Arc<Inner>,
}

struct Inner {
    listing_id: ListingId,
    ctx: ServiceContext,
    session: Arc<SessionContext>,
    state: Mutex<LedgerState>,
    busy: AtomicBool,
    subscription: Mutex<Option<Subscription>>,
}

struct LedgerState {
    reaction: ReactionState,
    /// User whose vote row `reaction.current_user_vote` mirrors
    voter: Option<UserId>,
    prompt: LoginPrompt,
    released: bool,
}

/// Clears the busy flag when the press finishes, however it finishes
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ReactionLedger {
    /// Load the listing's reaction state and subscribe to aggregate pushes
    ///
    /// Read failures are logged; the ledger then starts from the seed counts
    /// and, for the vote, re-reads the row on the first press.
    #[instrument(skip(ctx, session, listing_id), fields(listing_id = %listing_id))]
    pub async fn initialize(
        ctx: &ServiceContext,
        session: Arc<SessionContext>,
        listing_id: ListingId,
        initial_likes: u64,
        initial_dislikes: u64,
    ) -> Self {
        let mut reaction =
            ReactionState::seeded(listing_id.clone(), initial_likes, initial_dislikes);

        match ctx.stats_repo().read_aggregate(&listing_id).await {
            Ok(Some(aggregate)) => reaction.apply_aggregate(aggregate),
            Ok(None) => debug!("No aggregate row; keeping seed counts"),
            Err(e) => error!(error = %e, "Failed to read aggregate"),
        }

        let mut voter = None;
        if let Some(user_id) = session.user_id() {
            match ctx.vote_repo().find(&listing_id, user_id).await {
                Ok(vote) => {
                    reaction.current_user_vote = vote.map(|v| v.vote_type);
                    voter = Some(user_id);
                }
                Err(e) => error!(user_id = %user_id, error = %e, "Failed to read vote row"),
            }
        }

        let inner = Arc::new(Inner {
            listing_id: listing_id.clone(),
            ctx: ctx.clone(),
            session,
            state: Mutex::new(LedgerState {
                reaction,
                voter,
                prompt: LoginPrompt::from_config(ctx.ledger_config()),
                released: false,
            }),
            busy: AtomicBool::new(false),
            subscription: Mutex::new(None),
        });

        let weak: Weak<Inner> = Arc::downgrade(&inner);
        let subscription = ctx.feed().subscribe(
            &listing_id,
            Box::new(move |aggregate: Aggregate| {
                if let Some(inner) = weak.upgrade() {
                    inner.write(|s| s.reaction.apply_aggregate(aggregate));
                }
            }),
        );
        *inner.subscription.lock() = Some(subscription);

        debug!("Reaction ledger initialized");
        Self { inner }
    }

    pub async fn like(&self) -> VoteOutcome {
        self.press(VoteType::Like).await
    }

    pub async fn dislike(&self) -> VoteOutcome {
        self.press(VoteType::Dislike).await
    }

    /// Release the aggregate subscription; later pushes and late responses
    /// leave the state untouched
    pub fn teardown(&self) {
        {
            let mut state = self.inner.state.lock();
            if state.released {
                return;
            }
            state.released = true;
        }

        if let Some(subscription) = self.inner.subscription.lock().take() {
            subscription.unsubscribe();
        }
        debug!(listing_id = %self.inner.listing_id, "Reaction ledger torn down");
    }

    pub fn state(&self) -> ReactionState {
        self.inner.state.lock().reaction.clone()
    }

    pub fn listing_id(&self) -> &ListingId {
        &self.inner.listing_id
    }

    pub fn login_prompt_visible(&self) -> bool {
        self.inner.state.lock().prompt.is_visible()
    }

    pub fn dismiss_login_prompt(&self) {
        self.inner.state.lock().prompt.dismiss();
    }

    pub fn is_busy(&self) -> bool {
        self.inner.busy.load(Ordering::Acquire)
    }

    pub fn is_released(&self) -> bool {
        self.inner.state.lock().released
    }

    #[instrument(skip(self), fields(listing_id = %self.inner.listing_id))]
    async fn press(&self, pressed: VoteType) -> VoteOutcome {
        let inner = &self.inner;
        if self.is_released() {
            return VoteOutcome::Rejected(Rejection::Released);
        }

        let Some(_busy) = BusyGuard::acquire(&inner.busy) else {
            debug!("Press ignored while a mutation is in flight");
            return VoteOutcome::Rejected(Rejection::Busy);
        };

        let Some(user_id) = inner.session.user_id() else {
            inner.write(|s| s.prompt.show());
            info!("Reaction requires a signed-in user");
            return VoteOutcome::Rejected(Rejection::Unauthenticated);
        };

        let current = match inner.vote_of(user_id).await {
            Ok(current) => current,
            Err(outcome) => return outcome,
        };

        inner
            .run(user_id, VoteTransition::resolve(current, pressed))
            .await
    }
}

impl Inner {
    /// Apply `f` unless the ledger has been released
    fn write(&self, f: impl FnOnce(&mut LedgerState)) -> bool {
        let mut state = self.state.lock();
        if state.released {
            return false;
        }
        f(&mut state);
        true
    }

    /// Current vote of `user_id`, re-reading the row if the voter changed
    async fn vote_of(&self, user_id: UserId) -> Result<Option<VoteType>, VoteOutcome> {
        let cached = {
            let state = self.state.lock();
            (state.voter == Some(user_id)).then_some(state.reaction.current_user_vote)
        };
        if let Some(vote) = cached {
            return Ok(vote);
        }

        self.load_vote(user_id)
            .await
            .map_err(|_| VoteOutcome::stopped(LedgerStep::ReadVote, false))
    }

    /// Read `user_id`'s vote row into the cache
    ///
    /// On failure the cached voter is cleared so the next press reads again.
    async fn load_vote(&self, user_id: UserId) -> RepoResult<Option<VoteType>> {
        match self.ctx.vote_repo().find(&self.listing_id, user_id).await {
            Ok(row) => {
                let vote = row.map(|v| v.vote_type);
                self.write(|s| {
                    s.reaction.current_user_vote = vote;
                    s.voter = Some(user_id);
                });
                Ok(vote)
            }
            Err(e) => {
                error!(user_id = %user_id, error = %e, "Failed to read vote row");
                self.write(|s| s.voter = None);
                Err(e)
            }
        }
    }

    /// Counter procedures, then the vote row, then the re-read
    async fn run(&self, user_id: UserId, transition: VoteTransition) -> VoteOutcome {
        let stats = self.ctx.stats_repo();
        let votes = self.ctx.vote_repo();
        let listing_id = &self.listing_id;
        let mut mutated = false;

        for (kind, op) in transition.counter_steps() {
            let result = match op {
                CounterOp::Increment => stats.increment(listing_id, kind).await,
                CounterOp::Decrement => stats.decrement(listing_id, kind).await,
            };
            if let Err(e) = result {
                let step = LedgerStep::Counter(kind, op);
                error!(%step, error = %e, "Counter procedure failed");
                return VoteOutcome::stopped(step, mutated);
            }
            mutated = true;
        }

        let row = match transition.row_change() {
            VoteRowChange::Insert(vote) => {
                votes
                    .insert(&UserVote::new(listing_id.clone(), user_id, vote))
                    .await
            }
            VoteRowChange::Update(vote) => votes.update_type(listing_id, user_id, vote).await,
            VoteRowChange::Delete => votes.delete(listing_id, user_id).await,
        };

        let mut failed = None;
        match row {
            Ok(()) => {
                let vote = transition.resulting_vote();
                self.write(|s| {
                    s.reaction.current_user_vote = vote;
                    s.voter = Some(user_id);
                });
            }
            Err(e) => {
                error!(error = %e, "Vote row write failed");
                if !mutated {
                    return VoteOutcome::stopped(LedgerStep::VoteRow, false);
                }
                failed = Some(LedgerStep::VoteRow);
                // Mirror whatever row is actually stored.
                let _ = self.load_vote(user_id).await;
            }
        }

        // Counters moved; read them back even when the row write failed.
        match stats.read_aggregate(listing_id).await {
            Ok(aggregate) => {
                // A missing row reads as zero.
                let aggregate = aggregate.unwrap_or_default();
                self.write(|s| s.reaction.apply_aggregate(aggregate));
            }
            Err(e) => {
                error!(error = %e, "Aggregate re-read failed");
                failed.get_or_insert(LedgerStep::Reread);
            }
        }

        if let Some(step) = failed {
            return VoteOutcome::stopped(step, true);
        }

        let vote = transition.resulting_vote();
        info!(user_id = %user_id, ?transition, "Vote applied");
        VoteOutcome::Applied { vote }
    }
}

impl Drop for ReactionLedger {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for ReactionLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("ReactionLedger")
            .field("state", &state.reaction)
            .field("released", &state.released)
            .field("busy", &self.inner.busy.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
