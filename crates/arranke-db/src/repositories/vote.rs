//! PostgreSQL implementation of VoteRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use arranke_core::entities::UserVote;
use arranke_core::error::DomainError;
use arranke_core::traits::{RepoResult, VoteRepository};
use arranke_core::value_objects::{ListingId, UserId, VoteType};

use crate::models::UserVoteModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of VoteRepository
#[derive(Clone)]
pub struct PgVoteRepository {
    pool: PgPool,
}

impl PgVoteRepository {
    /// Create a new PgVoteRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VoteRepository for PgVoteRepository {
    #[instrument(skip(self))]
    async fn find(&self, listing_id: &ListingId, user_id: UserId) -> RepoResult<Option<UserVote>> {
        let result = sqlx::query_as::<_, UserVoteModel>(
            r"
            SELECT listing_id, user_id, vote_type, created_at
            FROM user_votes
            WHERE listing_id = $1 AND user_id = $2
            ",
        )
        .bind(listing_id.as_str())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(UserVote::try_from).transpose()
    }

    #[instrument(skip(self, vote), fields(listing_id = %vote.listing_id, user_id = %vote.user_id))]
    async fn insert(&self, vote: &UserVote) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO user_votes (listing_id, user_id, vote_type, created_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(vote.listing_id.as_str())
        .bind(vote.user_id.into_inner())
        .bind(vote.vote_type.as_str())
        .bind(vote.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::VoteAlreadyExists))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_type(
        &self,
        listing_id: &ListingId,
        user_id: UserId,
        vote_type: VoteType,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE user_votes SET vote_type = $3 WHERE listing_id = $1 AND user_id = $2",
        )
        .bind(listing_id.as_str())
        .bind(user_id.into_inner())
        .bind(vote_type.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::VoteNotFound);
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, listing_id: &ListingId, user_id: UserId) -> RepoResult<()> {
        sqlx::query("DELETE FROM user_votes WHERE listing_id = $1 AND user_id = $2")
            .bind(listing_id.as_str())
            .bind(user_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgVoteRepository>();
    }
}
