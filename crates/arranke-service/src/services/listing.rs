//! Listing service
//!
//! Submission, owner edits, public browsing, and visit/click counting.

use arranke_core::{
    CounterKind, DomainError, Identity, Listing, ListingId, ListingStats, LOGOS_BUCKET,
};
use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::dto::{ListingView, NewListingRequest, UpdateListingRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::upload::{object_path_from_url, store_image, Upload};

/// Page size for showcase and search
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Listing service
pub struct ListingService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ListingService<'a> {
    /// Create a new ListingService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Submit a listing for moderation
    ///
    /// The logo, if any, is uploaded first; the listing starts `pending` with
    /// a zeroed stats row.
    #[instrument(skip(self, request, logo), fields(user_id = %identity.user_id))]
    pub async fn submit(
        &self,
        identity: &Identity,
        request: NewListingRequest,
        logo: Option<Upload>,
    ) -> ServiceResult<Listing> {
        request.validate()?;

        let name = request.name.trim().to_string();
        if self.ctx.listing_repo().name_exists(&name).await? {
            return Err(DomainError::ListingNameTaken(name).into());
        }

        let logo_url = match logo {
            Some(upload) => {
                Some(store_image(self.ctx, LOGOS_BUCKET, identity.user_id, &upload).await?)
            }
            None => None,
        };

        let mut listing = Listing::new(ListingId::generate(), identity.user_id, name);
        listing.slogan = request.slogan;
        listing.description = request.description;
        listing.url = request.url;
        listing.category = request.category;
        listing.logo_url = logo_url;
        listing.owner_name = identity.username.clone();
        listing.display_name_preference = request.display_name_preference.unwrap_or_default();

        self.ctx.listing_repo().create(&listing).await?;
        self.ctx
            .stats_repo()
            .create(&ListingStats::zeroed(listing.id.clone()))
            .await?;

        info!(listing_id = %listing.id, name = %listing.name, "Listing submitted");
        Ok(listing)
    }

    /// Open a listing page by name and count the visit
    ///
    /// A failed visit count is logged, never returned.
    #[instrument(skip(self))]
    pub async fn open_by_name(&self, name: &str) -> ServiceResult<ListingView> {
        let listing = self
            .ctx
            .listing_repo()
            .find_by_name(name)
            .await?
            .ok_or_else(|| ServiceError::not_found("Listing", name))?;

        let view = self.view(listing).await?;

        if let Err(e) = self
            .ctx
            .stats_repo()
            .increment(&view.listing.id, CounterKind::Visits)
            .await
        {
            warn!(listing_id = %view.listing.id, error = %e, "Failed to record visit");
        }

        Ok(view)
    }

    /// Count an outbound click on the listing's URL
    #[instrument(skip(self))]
    pub async fn record_click(&self, listing_id: &ListingId) {
        match self
            .ctx
            .stats_repo()
            .increment(listing_id, CounterKind::Clicks)
            .await
        {
            Ok(()) => debug!("Click recorded"),
            Err(e) => warn!(error = %e, "Failed to record click"),
        }
    }

    /// The caller's listings, newest first
    #[instrument(skip(self), fields(user_id = %identity.user_id))]
    pub async fn owned_by(&self, identity: &Identity) -> ServiceResult<Vec<Listing>> {
        let mut listings = self
            .ctx
            .listing_repo()
            .find_by_owner(identity.user_id)
            .await?;
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listings)
    }

    /// Owner edit; absent request fields are left unchanged
    #[instrument(skip(self, request, logo), fields(user_id = %identity.user_id))]
    pub async fn update(
        &self,
        identity: &Identity,
        listing_id: &ListingId,
        request: UpdateListingRequest,
        logo: Option<Upload>,
    ) -> ServiceResult<Listing> {
        request.validate()?;
        let mut listing = self.owned(identity, listing_id).await?;

        if let Some(name) = request.name {
            let name = name.trim().to_string();
            if name != listing.name && self.ctx.listing_repo().name_exists(&name).await? {
                return Err(DomainError::ListingNameTaken(name).into());
            }
            listing.name = name;
        }
        if let Some(slogan) = request.slogan {
            listing.slogan = Some(slogan);
        }
        if let Some(description) = request.description {
            listing.description = Some(description);
        }
        if let Some(url) = request.url {
            listing.url = Some(url);
        }
        if let Some(category) = request.category {
            listing.category = Some(category);
        }
        if let Some(preference) = request.display_name_preference {
            listing.display_name_preference = preference;
        }
        if let Some(upload) = logo {
            listing.logo_url =
                Some(store_image(self.ctx, LOGOS_BUCKET, identity.user_id, &upload).await?);
        }

        listing.updated_at = Utc::now();
        self.ctx.listing_repo().update(&listing).await?;

        info!(listing_id = %listing.id, "Listing updated");
        Ok(listing)
    }

    /// Owner delete; stats and votes go with the listing
    #[instrument(skip(self), fields(user_id = %identity.user_id))]
    pub async fn delete(&self, identity: &Identity, listing_id: &ListingId) -> ServiceResult<()> {
        let listing = self.owned(identity, listing_id).await?;
        self.ctx.listing_repo().delete(listing_id).await?;

        if let Some(path) = listing
            .logo_url
            .as_deref()
            .and_then(|url| object_path_from_url(LOGOS_BUCKET, url))
        {
            if let Err(e) = self.ctx.objects().remove(LOGOS_BUCKET, &[path]).await {
                warn!(error = %e, "Failed to remove logo of deleted listing");
            }
        }

        info!(listing_id = %listing_id, "Listing deleted");
        Ok(())
    }

    /// Approved listings, newest first
    #[instrument(skip(self))]
    pub async fn showcase(&self, limit: i64) -> ServiceResult<Vec<ListingView>> {
        let listings = self.ctx.listing_repo().list_approved(limit).await?;
        self.views(listings).await
    }

    /// Approved listings whose name, category or description contains `query`
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> ServiceResult<Vec<ListingView>> {
        let listings = self
            .ctx
            .listing_repo()
            .search(query.trim(), DEFAULT_PAGE_SIZE)
            .await?;
        self.views(listings).await
    }

    async fn owned(&self, identity: &Identity, listing_id: &ListingId) -> ServiceResult<Listing> {
        let listing = self
            .ctx
            .listing_repo()
            .find_by_id(listing_id)
            .await?
            .ok_or_else(|| DomainError::ListingNotFound(listing_id.clone()))?;

        if !listing.is_owned_by(identity.user_id) {
            return Err(DomainError::NotListingOwner.into());
        }
        Ok(listing)
    }

    async fn views(&self, listings: Vec<Listing>) -> ServiceResult<Vec<ListingView>> {
        let mut views = Vec::with_capacity(listings.len());
        for listing in listings {
            views.push(self.view(listing).await?);
        }
        Ok(views)
    }

    async fn view(&self, listing: Listing) -> ServiceResult<ListingView> {
        let stats = self.ctx.stats_repo().find(&listing.id).await?;
        let owner = match self.ctx.profile_repo().find(listing.owner_id).await {
            Ok(owner) => owner,
            Err(e) => {
                warn!(owner_id = %listing.owner_id, error = %e, "Failed to load owner profile");
                None
            }
        };
        Ok(ListingView::new(listing, stats, owner.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arranke_core::{ModerationStatus, UserId};
    use arranke_db::StoreOp;

    use crate::test_support::TestBackend;

    fn request(name: &str) -> NewListingRequest {
        NewListingRequest {
            name: name.to_string(),
            category: Some("tools".to_string()),
            description: Some("A tiny compiler".to_string()),
            ..Default::default()
        }
    }

    fn approve(backend: &TestBackend, listing: &Listing) {
        let mut approved = listing.clone();
        approved.decide(ModerationStatus::Approved, Utc::now());
        backend.store.seed_listing(approved);
    }

    #[tokio::test]
    async fn test_submit_creates_pending_listing_with_stats() {
        let backend = TestBackend::new();
        let ctx = backend.context();
        let owner = TestBackend::identity("ana");

        let logo = Upload::new("logo.png", "image/png", vec![1, 2, 3]);
        let listing = ListingService::new(&ctx)
            .submit(&owner, request("  Arranke  "), Some(logo))
            .await
            .unwrap();

        assert_eq!(listing.name, "Arranke");
        assert_eq!(listing.status, ModerationStatus::Pending);
        assert_eq!(listing.owner_name.as_deref(), Some("ana"));
        assert!(listing
            .logo_url
            .as_deref()
            .unwrap()
            .starts_with(&format!("memory://storage/logos/{}/", owner.user_id)));
        assert_eq!(backend.objects.len(), 1);
        assert_eq!(
            backend.store.stats_snapshot(&listing.id),
            Some(ListingStats::zeroed(listing.id.clone()))
        );
    }

    #[tokio::test]
    async fn test_submit_rejects_taken_name_and_bad_logo() {
        let backend = TestBackend::new();
        let ctx = backend.context();
        let owner = TestBackend::identity("ana");
        let service = ListingService::new(&ctx);

        service.submit(&owner, request("Arranke"), None).await.unwrap();
        let taken = service.submit(&owner, request("Arranke"), None).await.unwrap_err();
        assert!(matches!(
            taken,
            ServiceError::Domain(DomainError::ListingNameTaken(_))
        ));

        let pdf = Upload::new("logo.pdf", "application/pdf", vec![1]);
        let bad = service
            .submit(&owner, request("Other"), Some(pdf))
            .await
            .unwrap_err();
        assert!(matches!(
            bad,
            ServiceError::Domain(DomainError::UnsupportedContentType(_))
        ));
        assert!(backend.objects.is_empty());
    }

    #[tokio::test]
    async fn test_open_by_name_counts_visit() {
        let backend = TestBackend::new();
        let ctx = backend.context();
        let owner = TestBackend::identity("ana");
        let service = ListingService::new(&ctx);
        let listing = service.submit(&owner, request("Arranke"), None).await.unwrap();

        let view = service.open_by_name("Arranke").await.unwrap();
        assert_eq!(view.listing.id, listing.id);
        assert_eq!(view.stats.visit_count, 0);

        let stats = backend.store.stats_snapshot(&listing.id).unwrap();
        assert_eq!(stats.visit_count, 1);

        let missing = service.open_by_name("Nope").await.unwrap_err();
        assert!(matches!(missing, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_visit_failure_is_not_returned() {
        let backend = TestBackend::new();
        let ctx = backend.context();
        let service = ListingService::new(&ctx);
        service
            .submit(&TestBackend::identity("ana"), request("Arranke"), None)
            .await
            .unwrap();

        backend.store.fail(StoreOp::Counter(
            CounterKind::Visits,
            arranke_core::CounterOp::Increment,
        ));
        assert!(service.open_by_name("Arranke").await.is_ok());
    }

    #[tokio::test]
    async fn test_record_click() {
        let backend = TestBackend::new();
        let ctx = backend.context();
        let id = ListingId::new("p");

        ListingService::new(&ctx).record_click(&id).await;

        assert_eq!(backend.store.stats_snapshot(&id).unwrap().clicks_count, 1);
    }

    #[tokio::test]
    async fn test_only_owner_may_update_or_delete() {
        let backend = TestBackend::new();
        let ctx = backend.context();
        let owner = TestBackend::identity("ana");
        let stranger = TestBackend::identity("beto");
        let service = ListingService::new(&ctx);
        let listing = service.submit(&owner, request("Arranke"), None).await.unwrap();

        let patch = UpdateListingRequest {
            slogan: Some("Ship it".to_string()),
            ..Default::default()
        };
        let denied = service
            .update(&stranger, &listing.id, patch.clone(), None)
            .await
            .unwrap_err();
        assert!(matches!(denied, ServiceError::Domain(DomainError::NotListingOwner)));

        let updated = service.update(&owner, &listing.id, patch, None).await.unwrap();
        assert_eq!(updated.slogan.as_deref(), Some("Ship it"));
        assert_eq!(updated.name, "Arranke");

        assert!(service.delete(&stranger, &listing.id).await.is_err());
        service.delete(&owner, &listing.id).await.unwrap();
        assert!(backend.store.stats_snapshot(&listing.id).is_none());
        assert!(service.owned_by(&owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_showcase_and_search_only_show_approved() {
        let backend = TestBackend::new();
        let ctx = backend.context();
        let owner = TestBackend::identity("ana");
        let service = ListingService::new(&ctx);

        let compiler = service.submit(&owner, request("Compiler"), None).await.unwrap();
        let mut pending = request("Hidden Compiler");
        pending.category = Some("tools".to_string());
        service.submit(&owner, pending, None).await.unwrap();
        approve(&backend, &compiler);

        let showcase = service.showcase(10).await.unwrap();
        assert_eq!(showcase.len(), 1);
        assert_eq!(showcase[0].listing.id, compiler.id);
        assert_eq!(showcase[0].owner_display_name, "ana");

        let found = service.search("COMPILER").await.unwrap();
        assert_eq!(found.len(), 1);
        assert!(service.search("games").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_owned_by_newest_first() {
        let backend = TestBackend::new();
        let ctx = backend.context();
        let owner = TestBackend::identity("ana");
        let service = ListingService::new(&ctx);

        let first = service.submit(&owner, request("First"), None).await.unwrap();
        let mut second = Listing::new(ListingId::new("second"), owner.user_id, "Second");
        second.created_at = first.created_at + chrono::Duration::seconds(5);
        backend.store.seed_listing(second);
        backend
            .store
            .seed_listing(Listing::new(ListingId::new("other"), UserId::generate(), "Other"));

        let names: Vec<String> = service
            .owned_by(&owner)
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["Second", "First"]);
    }
}
