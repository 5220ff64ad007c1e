use async_trait::async_trait;
use cadview_core::correlation::{CorrelationRecord, ReadyTransition};
use cadview_core::types::Timestamp;

use super::{CorrelationStore, StoreError};
use crate::repositories::CorrelationRepo;
use crate::DbPool;

/// [`CorrelationStore`] backed by the `translation_correlations` table.
#[derive(Clone)]
pub struct PgCorrelationStore {
    pool: DbPool,
}

impl PgCorrelationStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CorrelationStore for PgCorrelationStore {
    async fn find(&self, translation_id: &str) -> Result<Option<CorrelationRecord>, StoreError> {
        let row = CorrelationRepo::find(&self.pool, translation_id).await?;
        row.map(CorrelationRecord::try_from)
            .transpose()
            .map_err(StoreError::from)
    }

    async fn insert_pending(&self, translation_id: &str) -> Result<bool, StoreError> {
        Ok(CorrelationRepo::insert_pending(&self.pool, translation_id).await?)
    }

    async fn mark_ready(
        &self,
        translation_id: &str,
        webhook_id: &str,
    ) -> Result<ReadyTransition, StoreError> {
        let outcome = CorrelationRepo::mark_ready(&self.pool, translation_id, webhook_id).await?;
        Ok(match outcome {
            Some(true) => ReadyTransition::Created,
            Some(false) => ReadyTransition::Promoted,
            None => ReadyTransition::AlreadyTerminal,
        })
    }

    async fn mark_failed(&self, translation_id: &str, reason: &str) -> Result<bool, StoreError> {
        Ok(CorrelationRepo::mark_failed(&self.pool, translation_id, reason).await?)
    }

    async fn purge_older_than(&self, cutoff: Timestamp) -> Result<u64, StoreError> {
        Ok(CorrelationRepo::delete_older_than(&self.pool, cutoff).await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}
