//! PostgreSQL implementation of ProfileRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use arranke_core::entities::Profile;
use arranke_core::error::DomainError;
use arranke_core::traits::{ProfileRepository, RepoResult};
use arranke_core::value_objects::UserId;

use crate::models::ProfileModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of ProfileRepository
#[derive(Clone)]
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    /// Create a new PgProfileRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    #[instrument(skip(self))]
    async fn find(&self, user_id: UserId) -> RepoResult<Option<Profile>> {
        let result = sqlx::query_as::<_, ProfileModel>(
            r"
            SELECT id, username, full_name, website, avatar_url, is_admin, updated_at
            FROM profiles
            WHERE id = $1
            ",
        )
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Profile::from))
    }

    /// `is_admin` is never written from here; admins are granted out of band.
    #[instrument(skip(self, profile), fields(user_id = %profile.id))]
    async fn upsert(&self, profile: &Profile) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO profiles (id, username, full_name, website, avatar_url, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE
            SET username = EXCLUDED.username,
                full_name = EXCLUDED.full_name,
                website = EXCLUDED.website,
                avatar_url = EXCLUDED.avatar_url,
                updated_at = EXCLUDED.updated_at
            ",
        )
        .bind(profile.id.into_inner())
        .bind(&profile.username)
        .bind(&profile.full_name)
        .bind(&profile.website)
        .bind(&profile.avatar_url)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                DomainError::ValidationError("username already taken".to_string())
            })
        })?;

        Ok(())
    }
}
