//! PostgreSQL implementation of StatsRepository
//!
//! Counters change only through the `increment_*`/`decrement_*` SQL functions.
//! Each function returns the updated row, which is forwarded to the change sink.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use arranke_core::entities::{Aggregate, ListingStats};
use arranke_core::error::DomainError;
use arranke_core::events::AggregateChanged;
use arranke_core::traits::{ChangeSink, RepoResult, StatsRepository};
use arranke_core::value_objects::{CounterKind, CounterOp, ListingId};

use crate::models::{AggregateModel, ListingStatsModel};

use super::error::map_db_error;

/// PostgreSQL implementation of StatsRepository
#[derive(Clone)]
pub struct PgStatsRepository {
    pool: PgPool,
    sink: Option<Arc<dyn ChangeSink>>,
}

impl PgStatsRepository {
    /// Create a new PgStatsRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool, sink: None }
    }

    /// Report every counter change to `sink`
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn ChangeSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    async fn run_procedure(
        &self,
        listing_id: &ListingId,
        kind: CounterKind,
        op: CounterOp,
    ) -> RepoResult<()> {
        let procedure = kind.procedure(op).ok_or_else(|| {
            DomainError::ValidationError(format!("counter {kind} has no {op} procedure"))
        })?;

        let row = sqlx::query_as::<_, ListingStatsModel>(&format!(
            "SELECT listing_id, likes_count, dislikes_count, visit_count, clicks_count \
             FROM {procedure}($1)"
        ))
        .bind(listing_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        match row {
            Some(row) => {
                let stats = ListingStats::from(row);
                debug!(%listing_id, procedure, value = stats.get(kind), "Counter updated");
                if let Some(sink) = &self.sink {
                    sink.aggregate_changed(AggregateChanged::from(&stats)).await;
                }
            }
            None => debug!(%listing_id, procedure, "No stats row to update"),
        }

        Ok(())
    }
}

#[async_trait]
impl StatsRepository for PgStatsRepository {
    #[instrument(skip(self))]
    async fn find(&self, listing_id: &ListingId) -> RepoResult<Option<ListingStats>> {
        let result = sqlx::query_as::<_, ListingStatsModel>(
            r"
            SELECT listing_id, likes_count, dislikes_count, visit_count, clicks_count
            FROM listing_stats
            WHERE listing_id = $1
            ",
        )
        .bind(listing_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(ListingStats::from))
    }

    #[instrument(skip(self))]
    async fn read_aggregate(&self, listing_id: &ListingId) -> RepoResult<Option<Aggregate>> {
        let result = sqlx::query_as::<_, AggregateModel>(
            "SELECT likes_count, dislikes_count FROM listing_stats WHERE listing_id = $1",
        )
        .bind(listing_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Aggregate::from))
    }

    #[instrument(skip(self, stats), fields(listing_id = %stats.listing_id))]
    async fn create(&self, stats: &ListingStats) -> RepoResult<()> {
        let to_db = |v: u64| i64::try_from(v).unwrap_or(i64::MAX);

        sqlx::query(
            r"
            INSERT INTO listing_stats (listing_id, likes_count, dislikes_count, visit_count, clicks_count)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (listing_id) DO NOTHING
            ",
        )
        .bind(stats.listing_id.as_str())
        .bind(to_db(stats.likes_count))
        .bind(to_db(stats.dislikes_count))
        .bind(to_db(stats.visit_count))
        .bind(to_db(stats.clicks_count))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn increment(&self, listing_id: &ListingId, kind: CounterKind) -> RepoResult<()> {
        self.run_procedure(listing_id, kind, CounterOp::Increment)
            .await
    }

    #[instrument(skip(self))]
    async fn decrement(&self, listing_id: &ListingId, kind: CounterKind) -> RepoResult<()> {
        self.run_procedure(listing_id, kind, CounterOp::Decrement)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgStatsRepository>();
    }
}
