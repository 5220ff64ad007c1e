//! Repository for the `translation_correlations` table.
//!
//! Every state change is a single conditional statement, so concurrent
//! webhook deliveries and polls never overwrite a later state with an
//! earlier one.

use cadview_core::correlation::{STATE_FAILED, STATE_PENDING, STATE_READY};
use cadview_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::correlation::CorrelationRow;

/// Column list for translation_correlations queries.
const COLUMNS: &str =
    "translation_id, state, webhook_id, failure_reason, created_at, updated_at";

/// Provides data access for translation correlation records.
pub struct CorrelationRepo;

impl CorrelationRepo {
    /// Find the record for a translation id.
    pub async fn find(
        pool: &PgPool,
        translation_id: &str,
    ) -> Result<Option<CorrelationRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM translation_correlations
             WHERE translation_id = $1"
        );
        sqlx::query_as::<_, CorrelationRow>(&query)
            .bind(translation_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a pending record unless one already exists.
    ///
    /// Returns `true` if a row was inserted. An existing row (for example a
    /// ready record written by an early webhook) is left untouched.
    pub async fn insert_pending(pool: &PgPool, translation_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO translation_correlations (translation_id, state, created_at, updated_at)
             VALUES ($1, $2, NOW(), NOW())
             ON CONFLICT (translation_id) DO NOTHING",
        )
        .bind(translation_id)
        .bind(STATE_PENDING)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record a completion webhook.
    ///
    /// Inserts a ready record, or promotes a pending one. Returns
    /// `Some(true)` when a row was inserted, `Some(false)` when a pending row
    /// was promoted and `None` when the row was already ready or failed.
    pub async fn mark_ready(
        pool: &PgPool,
        translation_id: &str,
        webhook_id: &str,
    ) -> Result<Option<bool>, sqlx::Error> {
        // `xmax = 0` only holds for a freshly inserted tuple.
        let row: Option<(bool,)> = sqlx::query_as(
            "INSERT INTO translation_correlations
                (translation_id, state, webhook_id, created_at, updated_at)
             VALUES ($1, $2, $3, NOW(), NOW())
             ON CONFLICT (translation_id) DO UPDATE SET
                state = EXCLUDED.state,
                webhook_id = EXCLUDED.webhook_id,
                updated_at = NOW()
             WHERE translation_correlations.state = $4
             RETURNING (xmax = 0)",
        )
        .bind(translation_id)
        .bind(STATE_READY)
        .bind(webhook_id)
        .bind(STATE_PENDING)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|(inserted,)| inserted))
    }

    /// Move a ready record to failed. Returns `true` if the row changed.
    pub async fn mark_failed(
        pool: &PgPool,
        translation_id: &str,
        reason: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE translation_correlations
             SET state = $2, failure_reason = $3, webhook_id = NULL, updated_at = NOW()
             WHERE translation_id = $1 AND state = $4",
        )
        .bind(translation_id)
        .bind(STATE_FAILED)
        .bind(reason)
        .bind(STATE_READY)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every record last touched before `cutoff`. Returns the row count.
    pub async fn delete_older_than(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM translation_correlations WHERE updated_at < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
