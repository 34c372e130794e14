//! Moderation service
//!
//! Admin review of submitted listings.

use arranke_core::{DomainError, Identity, Listing, ListingId, ModerationStatus, Profile};
use chrono::Utc;
use tracing::{info, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Moderation service
pub struct ModerationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ModerationService<'a> {
    /// Create a new ModerationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// The caller's profile, if it carries the admin flag
    ///
    /// # Errors
    /// `AdminRequired` when the profile is missing or not an admin
    #[instrument(skip(self), fields(user_id = %identity.user_id))]
    pub async fn require_admin(&self, identity: &Identity) -> ServiceResult<Profile> {
        match self.ctx.profile_repo().find(identity.user_id).await? {
            Some(profile) if profile.is_admin => Ok(profile),
            _ => Err(DomainError::AdminRequired.into()),
        }
    }

    /// Listings awaiting review, oldest submission first
    #[instrument(skip(self), fields(user_id = %identity.user_id))]
    pub async fn pending(&self, identity: &Identity) -> ServiceResult<Vec<Listing>> {
        self.require_admin(identity).await?;

        let mut listings = self
            .ctx
            .listing_repo()
            .list_by_status(ModerationStatus::Pending)
            .await?;
        listings.sort_by(|a, b| a.submission_date.cmp(&b.submission_date));
        Ok(listings)
    }

    pub async fn approve(&self, identity: &Identity, listing_id: &ListingId) -> ServiceResult<Listing> {
        self.decide(identity, listing_id, ModerationStatus::Approved)
            .await
    }

    pub async fn reject(&self, identity: &Identity, listing_id: &ListingId) -> ServiceResult<Listing> {
        self.decide(identity, listing_id, ModerationStatus::Rejected)
            .await
    }

    #[instrument(skip(self), fields(user_id = %identity.user_id))]
    async fn decide(
        &self,
        identity: &Identity,
        listing_id: &ListingId,
        status: ModerationStatus,
    ) -> ServiceResult<Listing> {
        self.require_admin(identity).await?;

        let mut listing = self
            .ctx
            .listing_repo()
            .find_by_id(listing_id)
            .await?
            .ok_or_else(|| DomainError::ListingNotFound(listing_id.clone()))?;

        let now = Utc::now();
        self.ctx
            .listing_repo()
            .set_status(listing_id, status, now)
            .await?;
        listing.decide(status, now);

        info!(listing_id = %listing_id, %status, "Listing moderated");
        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ServiceError;
    use crate::test_support::TestBackend;

    fn pending_listing(id: &str, submitted_minutes_ago: i64) -> Listing {
        let mut listing = Listing::new(ListingId::new(id), arranke_core::UserId::generate(), id);
        listing.submission_date = Utc::now() - chrono::Duration::minutes(submitted_minutes_ago);
        listing
    }

    #[tokio::test]
    async fn test_require_admin() {
        let backend = TestBackend::new();
        let ctx = backend.context();
        let service = ModerationService::new(&ctx);
        let admin = TestBackend::identity("root");
        let user = TestBackend::identity("ana");
        backend.seed_admin(&admin);
        backend.store.seed_profile(Profile::new(user.user_id));

        assert!(service.require_admin(&admin).await.unwrap().is_admin);
        for who in [&user, &TestBackend::identity("ghost")] {
            let err = service.require_admin(who).await.unwrap_err();
            assert!(matches!(err, ServiceError::Domain(DomainError::AdminRequired)));
        }
    }

    #[tokio::test]
    async fn test_pending_oldest_first() {
        let backend = TestBackend::new();
        let ctx = backend.context();
        let admin = TestBackend::identity("root");
        backend.seed_admin(&admin);
        backend.store.seed_listing(pending_listing("newer", 1));
        backend.store.seed_listing(pending_listing("older", 30));
        let mut decided = pending_listing("decided", 60);
        decided.decide(ModerationStatus::Rejected, Utc::now());
        backend.store.seed_listing(decided);

        let ids: Vec<String> = ModerationService::new(&ctx)
            .pending(&admin)
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.id.into_inner())
            .collect();
        assert_eq!(ids, vec!["older", "newer"]);
    }

    #[tokio::test]
    async fn test_approve_and_reject() {
        let backend = TestBackend::new();
        let ctx = backend.context();
        let service = ModerationService::new(&ctx);
        let admin = TestBackend::identity("root");
        backend.seed_admin(&admin);
        backend.store.seed_listing(pending_listing("a", 5));
        backend.store.seed_listing(pending_listing("b", 5));

        let approved = service.approve(&admin, &ListingId::new("a")).await.unwrap();
        assert_eq!(approved.status, ModerationStatus::Approved);
        assert!(approved.approval_date.is_some());

        let rejected = service.reject(&admin, &ListingId::new("b")).await.unwrap();
        assert_eq!(rejected.status, ModerationStatus::Rejected);
        assert!(service.pending(&admin).await.unwrap().is_empty());

        let missing = service.approve(&admin, &ListingId::new("zzz")).await.unwrap_err();
        assert!(matches!(missing, ServiceError::Domain(DomainError::ListingNotFound(_))));
    }

    #[tokio::test]
    async fn test_non_admin_cannot_decide() {
        let backend = TestBackend::new();
        let ctx = backend.context();
        backend.store.seed_listing(pending_listing("a", 5));

        let err = ModerationService::new(&ctx)
            .approve(&TestBackend::identity("ana"), &ListingId::new("a"))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Domain(DomainError::AdminRequired)));
        assert_eq!(
            backend.store.calls().iter().filter(|op| **op == arranke_db::StoreOp::WriteListing).count(),
            0
        );
    }
}
