//! The correlation-store seam.
//!
//! The pipeline talks to [`CorrelationStore`] only; the binary wires in
//! [`PgCorrelationStore`] and tests wire in [`MemoryCorrelationStore`].

mod memory;
mod postgres;

use async_trait::async_trait;
use cadview_core::correlation::{CorrelationRecord, ReadyTransition};
use cadview_core::error::CoreError;
use cadview_core::types::Timestamp;

pub use memory::MemoryCorrelationStore;
pub use postgres::PgCorrelationStore;

/// Errors from a correlation store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The database query failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be turned back into a record.
    #[error("Corrupt correlation record: {0}")]
    Corrupt(#[from] CoreError),
}

/// Keyed correlation table between translation ids and completion state.
///
/// Every mutating method is an atomic compare-and-set on a single key.
#[async_trait]
pub trait CorrelationStore: Send + Sync {
    /// Look up the record for a translation id.
    async fn find(&self, translation_id: &str) -> Result<Option<CorrelationRecord>, StoreError>;

    /// Create a pending record if none exists. Returns `false` when a record
    /// was already present (it is not modified).
    async fn insert_pending(&self, translation_id: &str) -> Result<bool, StoreError>;

    /// Record a completion webhook: create a ready record, or promote a
    /// pending one. Ready and failed records are left as they are.
    async fn mark_ready(
        &self,
        translation_id: &str,
        webhook_id: &str,
    ) -> Result<ReadyTransition, StoreError>;

    /// Move a ready record to failed. Returns `true` if the record changed.
    async fn mark_failed(&self, translation_id: &str, reason: &str) -> Result<bool, StoreError>;

    /// Remove every record not updated since `cutoff`. Returns the count.
    async fn purge_older_than(&self, cutoff: Timestamp) -> Result<u64, StoreError>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
