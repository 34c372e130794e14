//! In-memory relational store

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::Semaphore;
use tracing::{debug, instrument};

use arranke_core::entities::{Aggregate, Listing, ListingStats, ModerationStatus, Profile, UserVote};
use arranke_core::error::DomainError;
use arranke_core::events::AggregateChanged;
use arranke_core::traits::{
    ChangeSink, ListingRepository, ProfileRepository, RepoResult, StatsRepository, VoteRepository,
};
use arranke_core::value_objects::{CounterKind, CounterOp, ListingId, UserId, VoteType};

/// Store operations that can be observed, failed or held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    FindStats,
    ReadAggregate,
    CreateStats,
    Counter(CounterKind, CounterOp),
    FindVote,
    InsertVote,
    UpdateVote,
    DeleteVote,
    ReadListing,
    WriteListing,
    ReadProfile,
    WriteProfile,
}

impl StoreOp {
    /// Counter procedure and vote-row operations
    pub fn is_mutation(self) -> bool {
        matches!(
            self,
            Self::Counter(..) | Self::InsertVote | Self::UpdateVote | Self::DeleteVote
        )
    }
}

#[derive(Default)]
struct Tables {
    listings: HashMap<ListingId, Listing>,
    stats: HashMap<ListingId, ListingStats>,
    votes: HashMap<(ListingId, UserId), UserVote>,
    profiles: HashMap<UserId, Profile>,
}

#[derive(Default)]
struct Faults {
    failing: HashSet<StoreOp>,
    held: HashMap<StoreOp, Arc<Semaphore>>,
    calls: Vec<StoreOp>,
}

/// In-memory implementation of every repository trait
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    faults: Mutex<Faults>,
    sink: Option<Arc<dyn ChangeSink>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report every counter change to `sink`
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn ChangeSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    // ------------------------------------------------------------------
    // Seeding and inspection
    // ------------------------------------------------------------------

    /// Insert or replace a stats row directly
    pub fn seed_stats(&self, stats: ListingStats) {
        self.tables
            .lock()
            .stats
            .insert(stats.listing_id.clone(), stats);
    }

    /// Insert or replace a vote row directly
    pub fn seed_vote(&self, vote: UserVote) {
        self.tables
            .lock()
            .votes
            .insert((vote.listing_id.clone(), vote.user_id), vote);
    }

    /// Insert or replace a profile directly (including `is_admin`)
    pub fn seed_profile(&self, profile: Profile) {
        self.tables.lock().profiles.insert(profile.id, profile);
    }

    /// Insert or replace a listing directly
    pub fn seed_listing(&self, listing: Listing) {
        self.tables
            .lock()
            .listings
            .insert(listing.id.clone(), listing);
    }

    pub fn stats_snapshot(&self, listing_id: &ListingId) -> Option<ListingStats> {
        self.tables.lock().stats.get(listing_id).cloned()
    }

    pub fn vote_snapshot(&self, listing_id: &ListingId, user_id: UserId) -> Option<VoteType> {
        self.tables
            .lock()
            .votes
            .get(&(listing_id.clone(), user_id))
            .map(|v| v.vote_type)
    }

    /// Number of vote rows for a listing
    pub fn vote_rows(&self, listing_id: &ListingId) -> usize {
        self.tables
            .lock()
            .votes
            .keys()
            .filter(|(id, _)| id == listing_id)
            .count()
    }

    // ------------------------------------------------------------------
    // Fault injection
    // ------------------------------------------------------------------

    /// Make every future `op` fail with a database error
    pub fn fail(&self, op: StoreOp) {
        self.faults.lock().failing.insert(op);
    }

    /// Stop failing `op`
    pub fn recover(&self, op: StoreOp) {
        self.faults.lock().failing.remove(&op);
    }

    /// Hold every future `op` until the returned gate is opened
    pub fn hold(&self, op: StoreOp) -> Gate {
        let semaphore = Arc::new(Semaphore::new(0));
        self.faults.lock().held.insert(op, semaphore.clone());
        Gate { semaphore }
    }

    /// Every operation issued so far, in order
    pub fn calls(&self) -> Vec<StoreOp> {
        self.faults.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.faults.lock().calls.clear();
    }

    async fn enter(&self, op: StoreOp) -> RepoResult<()> {
        let gate = {
            let mut faults = self.faults.lock();
            faults.calls.push(op);
            faults.held.get(&op).cloned()
        };

        if let Some(gate) = gate {
            // A closed gate lets everything through.
            let _permit = gate.acquire().await;
        }

        if self.faults.lock().failing.contains(&op) {
            return Err(DomainError::DatabaseError(format!("injected failure: {op:?}")));
        }

        Ok(())
    }

    async fn publish(&self, stats: Option<ListingStats>) {
        if let (Some(sink), Some(stats)) = (&self.sink, stats) {
            sink.aggregate_changed(AggregateChanged::from(&stats)).await;
        }
    }

    fn approved_newest_first(&self) -> Vec<Listing> {
        let mut approved: Vec<Listing> = self
            .tables
            .lock()
            .listings
            .values()
            .filter(|l| l.is_public())
            .cloned()
            .collect();
        approved.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        approved
    }
}

/// Same bounds the SQL repositories apply to `LIMIT`
fn page_size(limit: i64) -> usize {
    usize::try_from(limit.clamp(1, 100)).unwrap_or(100)
}

/// Releases a held operation
#[derive(Debug, Clone)]
pub struct Gate {
    semaphore: Arc<Semaphore>,
}

impl Gate {
    /// Let every waiting and future call through
    pub fn open(&self) {
        self.semaphore.close();
    }
}

// ============================================================================
// Stats
// ============================================================================

#[async_trait]
impl StatsRepository for MemoryStore {
    async fn find(&self, listing_id: &ListingId) -> RepoResult<Option<ListingStats>> {
        self.enter(StoreOp::FindStats).await?;
        Ok(self.tables.lock().stats.get(listing_id).cloned())
    }

    async fn read_aggregate(&self, listing_id: &ListingId) -> RepoResult<Option<Aggregate>> {
        self.enter(StoreOp::ReadAggregate).await?;
        Ok(self
            .tables
            .lock()
            .stats
            .get(listing_id)
            .map(ListingStats::aggregate))
    }

    async fn create(&self, stats: &ListingStats) -> RepoResult<()> {
        self.enter(StoreOp::CreateStats).await?;
        self.tables
            .lock()
            .stats
            .entry(stats.listing_id.clone())
            .or_insert_with(|| stats.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn increment(&self, listing_id: &ListingId, kind: CounterKind) -> RepoResult<()> {
        self.enter(StoreOp::Counter(kind, CounterOp::Increment))
            .await?;

        let updated = {
            let mut tables = self.tables.lock();
            let row = tables
                .stats
                .entry(listing_id.clone())
                .or_insert_with(|| ListingStats::zeroed(listing_id.clone()));
            *row.get_mut(kind) += 1;
            row.clone()
        };

        debug!(value = updated.get(kind), "Counter incremented");
        self.publish(Some(updated)).await;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn decrement(&self, listing_id: &ListingId, kind: CounterKind) -> RepoResult<()> {
        if kind.procedure(CounterOp::Decrement).is_none() {
            return Err(DomainError::ValidationError(format!(
                "counter {kind} has no decrement procedure"
            )));
        }
        self.enter(StoreOp::Counter(kind, CounterOp::Decrement))
            .await?;

        let updated = {
            let mut tables = self.tables.lock();
            tables.stats.get_mut(listing_id).map(|row| {
                let value = row.get_mut(kind);
                *value = value.saturating_sub(1);
                row.clone()
            })
        };

        self.publish(updated).await;
        Ok(())
    }
}

// ============================================================================
// Votes
// ============================================================================

#[async_trait]
impl VoteRepository for MemoryStore {
    async fn find(&self, listing_id: &ListingId, user_id: UserId) -> RepoResult<Option<UserVote>> {
        self.enter(StoreOp::FindVote).await?;
        Ok(self
            .tables
            .lock()
            .votes
            .get(&(listing_id.clone(), user_id))
            .cloned())
    }

    async fn insert(&self, vote: &UserVote) -> RepoResult<()> {
        self.enter(StoreOp::InsertVote).await?;
        let mut tables = self.tables.lock();
        let key = (vote.listing_id.clone(), vote.user_id);
        if tables.votes.contains_key(&key) {
            return Err(DomainError::VoteAlreadyExists);
        }
        tables.votes.insert(key, vote.clone());
        Ok(())
    }

    async fn update_type(
        &self,
        listing_id: &ListingId,
        user_id: UserId,
        vote_type: VoteType,
    ) -> RepoResult<()> {
        self.enter(StoreOp::UpdateVote).await?;
        let mut tables = self.tables.lock();
        let vote = tables
            .votes
            .get_mut(&(listing_id.clone(), user_id))
            .ok_or(DomainError::VoteNotFound)?;
        vote.vote_type = vote_type;
        Ok(())
    }

    async fn delete(&self, listing_id: &ListingId, user_id: UserId) -> RepoResult<()> {
        self.enter(StoreOp::DeleteVote).await?;
        self.tables
            .lock()
            .votes
            .remove(&(listing_id.clone(), user_id));
        Ok(())
    }
}

// ============================================================================
// Listings
// ============================================================================

#[async_trait]
impl ListingRepository for MemoryStore {
    async fn find_by_id(&self, id: &ListingId) -> RepoResult<Option<Listing>> {
        self.enter(StoreOp::ReadListing).await?;
        Ok(self.tables.lock().listings.get(id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Listing>> {
        self.enter(StoreOp::ReadListing).await?;
        Ok(self
            .tables
            .lock()
            .listings
            .values()
            .find(|l| l.name == name)
            .cloned())
    }

    async fn find_by_owner(&self, owner_id: UserId) -> RepoResult<Vec<Listing>> {
        self.enter(StoreOp::ReadListing).await?;
        let mut owned: Vec<Listing> = self
            .tables
            .lock()
            .listings
            .values()
            .filter(|l| l.is_owned_by(owner_id))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn list_by_status(&self, status: ModerationStatus) -> RepoResult<Vec<Listing>> {
        self.enter(StoreOp::ReadListing).await?;
        let mut listings: Vec<Listing> = self
            .tables
            .lock()
            .listings
            .values()
            .filter(|l| l.status == status)
            .cloned()
            .collect();
        listings.sort_by(|a, b| a.submission_date.cmp(&b.submission_date));
        Ok(listings)
    }

    async fn list_approved(&self, limit: i64) -> RepoResult<Vec<Listing>> {
        self.enter(StoreOp::ReadListing).await?;
        Ok(self
            .approved_newest_first()
            .into_iter()
            .take(page_size(limit))
            .collect())
    }

    async fn search(&self, query: &str, limit: i64) -> RepoResult<Vec<Listing>> {
        self.enter(StoreOp::ReadListing).await?;
        Ok(self
            .approved_newest_first()
            .into_iter()
            .filter(|l| l.matches(query))
            .take(page_size(limit))
            .collect())
    }

    async fn name_exists(&self, name: &str) -> RepoResult<bool> {
        self.enter(StoreOp::ReadListing).await?;
        Ok(self.tables.lock().listings.values().any(|l| l.name == name))
    }

    async fn create(&self, listing: &Listing) -> RepoResult<()> {
        self.enter(StoreOp::WriteListing).await?;
        let mut tables = self.tables.lock();
        if tables.listings.values().any(|l| l.name == listing.name) {
            return Err(DomainError::ListingNameTaken(listing.name.clone()));
        }
        tables.listings.insert(listing.id.clone(), listing.clone());
        Ok(())
    }

    async fn update(&self, listing: &Listing) -> RepoResult<()> {
        self.enter(StoreOp::WriteListing).await?;
        let mut tables = self.tables.lock();
        if tables
            .listings
            .values()
            .any(|l| l.name == listing.name && l.id != listing.id)
        {
            return Err(DomainError::ListingNameTaken(listing.name.clone()));
        }
        let existing = tables
            .listings
            .get_mut(&listing.id)
            .ok_or_else(|| DomainError::ListingNotFound(listing.id.clone()))?;
        *existing = Listing {
            status: existing.status,
            approval_date: existing.approval_date,
            owner_id: existing.owner_id,
            owner_name: existing.owner_name.clone(),
            submission_date: existing.submission_date,
            created_at: existing.created_at,
            updated_at: Utc::now(),
            ..listing.clone()
        };
        Ok(())
    }

    async fn delete(&self, id: &ListingId) -> RepoResult<()> {
        self.enter(StoreOp::WriteListing).await?;
        let mut tables = self.tables.lock();
        if tables.listings.remove(id).is_none() {
            return Err(DomainError::ListingNotFound(id.clone()));
        }
        tables.stats.remove(id);
        tables.votes.retain(|(listing_id, _), _| listing_id != id);
        Ok(())
    }

    async fn set_status(
        &self,
        id: &ListingId,
        status: ModerationStatus,
        decided_at: DateTime<Utc>,
    ) -> RepoResult<()> {
        self.enter(StoreOp::WriteListing).await?;
        self.tables
            .lock()
            .listings
            .get_mut(id)
            .ok_or_else(|| DomainError::ListingNotFound(id.clone()))?
            .decide(status, decided_at);
        Ok(())
    }
}

// ============================================================================
// Profiles
// ============================================================================

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn find(&self, user_id: UserId) -> RepoResult<Option<Profile>> {
        self.enter(StoreOp::ReadProfile).await?;
        Ok(self.tables.lock().profiles.get(&user_id).cloned())
    }

    async fn upsert(&self, profile: &Profile) -> RepoResult<()> {
        self.enter(StoreOp::WriteProfile).await?;
        let mut tables = self.tables.lock();
        if let Some(username) = &profile.username {
            let taken = tables
                .profiles
                .values()
                .any(|p| p.id != profile.id && p.username.as_ref() == Some(username));
            if taken {
                return Err(DomainError::ValidationError(
                    "username already taken".to_string(),
                ));
            }
        }
        let is_admin = tables.profiles.get(&profile.id).is_some_and(|p| p.is_admin);
        tables.profiles.insert(
            profile.id,
            Profile {
                is_admin,
                ..profile.clone()
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing_id() -> ListingId {
        ListingId::new("proj-1")
    }

    #[tokio::test]
    async fn test_decrement_floors_at_zero() {
        let store = MemoryStore::new();
        store.seed_stats(ListingStats::zeroed(listing_id()));

        StatsRepository::decrement(&store, &listing_id(), CounterKind::Likes)
            .await
            .unwrap();

        assert_eq!(store.stats_snapshot(&listing_id()).unwrap().likes_count, 0);
    }

    #[tokio::test]
    async fn test_increment_creates_missing_row() {
        let store = MemoryStore::new();
        StatsRepository::increment(&store, &listing_id(), CounterKind::Visits)
            .await
            .unwrap();

        let stats = store.stats_snapshot(&listing_id()).unwrap();
        assert_eq!(stats.visit_count, 1);
        assert_eq!(stats.aggregate(), Aggregate::default());
    }

    #[tokio::test]
    async fn test_visits_have_no_decrement() {
        let store = MemoryStore::new();
        let err = StatsRepository::decrement(&store, &listing_id(), CounterKind::Visits)
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_vote_row_unique() {
        let store = MemoryStore::new();
        let user = UserId::generate();
        let vote = UserVote::new(listing_id(), user, VoteType::Like);

        VoteRepository::insert(&store, &vote).await.unwrap();
        let err = VoteRepository::insert(&store, &vote).await.unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(store.vote_rows(&listing_id()), 1);
    }

    #[tokio::test]
    async fn test_injected_failure_and_recovery() {
        let store = MemoryStore::new();
        store.fail(StoreOp::ReadAggregate);

        assert!(store.read_aggregate(&listing_id()).await.is_err());

        store.recover(StoreOp::ReadAggregate);
        assert_eq!(store.read_aggregate(&listing_id()).await.unwrap(), None);
        assert_eq!(
            store.calls(),
            vec![StoreOp::ReadAggregate, StoreOp::ReadAggregate]
        );
    }

    #[tokio::test]
    async fn test_held_operation_waits_for_gate() {
        let store = Arc::new(MemoryStore::new());
        let gate = store.hold(StoreOp::FindVote);

        let task = {
            let store = store.clone();
            tokio::spawn(async move {
                VoteRepository::find(store.as_ref(), &listing_id(), UserId::generate()).await
            })
        };

        tokio::task::yield_now().await;
        assert!(!task.is_finished());

        gate.open();
        assert!(task.await.unwrap().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_listing_cascades() {
        let store = MemoryStore::new();
        let owner = UserId::generate();
        let listing = Listing::new(listing_id(), owner, "Proj");
        ListingRepository::create(&store, &listing).await.unwrap();
        store.seed_stats(ListingStats::zeroed(listing_id()));
        store.seed_vote(UserVote::new(listing_id(), owner, VoteType::Like));

        ListingRepository::delete(&store, &listing_id()).await.unwrap();

        assert!(store.stats_snapshot(&listing_id()).is_none());
        assert_eq!(store.vote_rows(&listing_id()), 0);
    }

    #[tokio::test]
    async fn test_upsert_keeps_admin_flag() {
        let store = MemoryStore::new();
        let mut admin = Profile::new(UserId::generate());
        admin.is_admin = true;
        store.seed_profile(admin.clone());

        let mut update = admin.clone();
        update.is_admin = false;
        update.full_name = Some("Ana".to_string());
        store.upsert(&update).await.unwrap();

        let stored = ProfileRepository::find(&store, admin.id).await.unwrap().unwrap();
        assert!(stored.is_admin);
        assert_eq!(stored.full_name.as_deref(), Some("Ana"));
    }
}
