//! PostgreSQL implementation of ListingRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use arranke_core::entities::{Listing, ModerationStatus};
use arranke_core::error::DomainError;
use arranke_core::traits::{ListingRepository, RepoResult};
use arranke_core::value_objects::{ListingId, UserId};

use crate::models::ListingModel;

use super::error::{listing_not_found, map_db_error, map_unique_violation};

const SELECT_LISTING: &str = r"
    SELECT id, name, slogan, description, url, category, logo_url, owner_id, owner_name,
           display_name_preference, status, submission_date, approval_date,
           created_at, updated_at
    FROM listings";

fn into_listings(models: Vec<ListingModel>) -> RepoResult<Vec<Listing>> {
    models.into_iter().map(Listing::try_from).collect()
}

/// Escape LIKE wildcards in user input
fn like_pattern(query: &str) -> String {
    let escaped = query
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// PostgreSQL implementation of ListingRepository
#[derive(Clone)]
pub struct PgListingRepository {
    pool: PgPool,
}

impl PgListingRepository {
    /// Create a new PgListingRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ListingRepository for PgListingRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &ListingId) -> RepoResult<Option<Listing>> {
        let result = sqlx::query_as::<_, ListingModel>(&format!("{SELECT_LISTING} WHERE id = $1"))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(Listing::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Listing>> {
        let result =
            sqlx::query_as::<_, ListingModel>(&format!("{SELECT_LISTING} WHERE name = $1"))
                .bind(name)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_error)?;

        result.map(Listing::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_owner(&self, owner_id: UserId) -> RepoResult<Vec<Listing>> {
        let results = sqlx::query_as::<_, ListingModel>(&format!(
            "{SELECT_LISTING} WHERE owner_id = $1 ORDER BY created_at DESC"
        ))
        .bind(owner_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_listings(results)
    }

    #[instrument(skip(self))]
    async fn list_by_status(&self, status: ModerationStatus) -> RepoResult<Vec<Listing>> {
        let results = sqlx::query_as::<_, ListingModel>(&format!(
            "{SELECT_LISTING} WHERE status = $1 ORDER BY submission_date ASC"
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_listings(results)
    }

    #[instrument(skip(self))]
    async fn list_approved(&self, limit: i64) -> RepoResult<Vec<Listing>> {
        let limit = limit.clamp(1, 100);

        let results = sqlx::query_as::<_, ListingModel>(&format!(
            "{SELECT_LISTING} WHERE status = 'approved' ORDER BY created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_listings(results)
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: i64) -> RepoResult<Vec<Listing>> {
        let limit = limit.clamp(1, 100);

        let results = sqlx::query_as::<_, ListingModel>(&format!(
            r"{SELECT_LISTING}
            WHERE status = 'approved'
              AND (name ILIKE $1 OR category ILIKE $1 OR description ILIKE $1)
            ORDER BY created_at DESC
            LIMIT $2"
        ))
        .bind(like_pattern(query))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_listings(results)
    }

    #[instrument(skip(self))]
    async fn name_exists(&self, name: &str) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM listings WHERE name = $1)")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self, listing), fields(listing_id = %listing.id))]
    async fn create(&self, listing: &Listing) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO listings (id, name, slogan, description, url, category, logo_url,
                                  owner_id, owner_name, display_name_preference, status,
                                  submission_date, approval_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ",
        )
        .bind(listing.id.as_str())
        .bind(&listing.name)
        .bind(&listing.slogan)
        .bind(&listing.description)
        .bind(&listing.url)
        .bind(&listing.category)
        .bind(&listing.logo_url)
        .bind(listing.owner_id.into_inner())
        .bind(&listing.owner_name)
        .bind(listing.display_name_preference.as_str())
        .bind(listing.status.as_str())
        .bind(listing.submission_date)
        .bind(listing.approval_date)
        .bind(listing.created_at)
        .bind(listing.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::ListingNameTaken(listing.name.clone())))?;

        Ok(())
    }

    #[instrument(skip(self, listing), fields(listing_id = %listing.id))]
    async fn update(&self, listing: &Listing) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE listings
            SET name = $2, slogan = $3, description = $4, url = $5, category = $6,
                logo_url = $7, display_name_preference = $8, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(listing.id.as_str())
        .bind(&listing.name)
        .bind(&listing.slogan)
        .bind(&listing.description)
        .bind(&listing.url)
        .bind(&listing.category)
        .bind(&listing.logo_url)
        .bind(listing.display_name_preference.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::ListingNameTaken(listing.name.clone())))?;

        if result.rows_affected() == 0 {
            return Err(listing_not_found(&listing.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &ListingId) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(listing_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_status(
        &self,
        id: &ListingId,
        status: ModerationStatus,
        decided_at: DateTime<Utc>,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE listings
            SET status = $2, approval_date = $3, updated_at = $3
            WHERE id = $1
            ",
        )
        .bind(id.as_str())
        .bind(status.as_str())
        .bind(decided_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(listing_not_found(id));
        }

        Ok(())
    }
}
