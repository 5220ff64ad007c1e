use std::collections::HashMap;

use async_trait::async_trait;
use cadview_core::correlation::{CorrelationRecord, CorrelationState, ReadyTransition};
use cadview_core::types::Timestamp;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{CorrelationStore, StoreError};

/// In-process [`CorrelationStore`].
///
/// Transitions run under one mutex, which gives the same per-key
/// compare-and-set behaviour as the SQL implementation.
#[derive(Default)]
pub struct MemoryCorrelationStore {
    records: Mutex<HashMap<String, CorrelationRecord>>,
}

impl MemoryCorrelationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite `updated_at` for a record. Lets retention tests age entries.
    pub async fn set_updated_at(&self, translation_id: &str, at: Timestamp) -> bool {
        match self.records.lock().await.get_mut(translation_id) {
            Some(record) => {
                record.updated_at = at;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl CorrelationStore for MemoryCorrelationStore {
    async fn find(&self, translation_id: &str) -> Result<Option<CorrelationRecord>, StoreError> {
        Ok(self.records.lock().await.get(translation_id).cloned())
    }

    async fn insert_pending(&self, translation_id: &str) -> Result<bool, StoreError> {
        let mut records = self.records.lock().await;
        if records.contains_key(translation_id) {
            return Ok(false);
        }
        let now = Utc::now();
        records.insert(
            translation_id.to_string(),
            CorrelationRecord {
                translation_id: translation_id.to_string(),
                state: CorrelationState::Pending,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(true)
    }

    async fn mark_ready(
        &self,
        translation_id: &str,
        webhook_id: &str,
    ) -> Result<ReadyTransition, StoreError> {
        let mut records = self.records.lock().await;
        let now = Utc::now();
        let ready = CorrelationState::Ready {
            webhook_id: webhook_id.to_string(),
        };

        if let Some(record) = records.get_mut(translation_id) {
            if record.state.is_terminal() {
                return Ok(ReadyTransition::AlreadyTerminal);
            }
            record.state = ready;
            record.updated_at = now;
            return Ok(ReadyTransition::Promoted);
        }

        records.insert(
            translation_id.to_string(),
            CorrelationRecord {
                translation_id: translation_id.to_string(),
                state: ready,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(ReadyTransition::Created)
    }

    async fn mark_failed(&self, translation_id: &str, reason: &str) -> Result<bool, StoreError> {
        let mut records = self.records.lock().await;
        match records.get_mut(translation_id) {
            Some(record) if matches!(record.state, CorrelationState::Ready { .. }) => {
                record.state = CorrelationState::Failed {
                    reason: reason.to_string(),
                };
                record.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn purge_older_than(&self, cutoff: Timestamp) -> Result<u64, StoreError> {
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|_, record| record.updated_at >= cutoff);
        Ok((before - records.len()) as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[tokio::test]
    async fn insert_pending_is_idempotent() {
        let store = MemoryCorrelationStore::new();

        assert!(store.insert_pending("T1").await.unwrap());
        assert!(!store.insert_pending("T1").await.unwrap());

        let record = store.find("T1").await.unwrap().unwrap();
        assert_eq!(record.state, CorrelationState::Pending);
    }

    #[tokio::test]
    async fn mark_ready_promotes_pending() {
        let store = MemoryCorrelationStore::new();
        store.insert_pending("T1").await.unwrap();

        let transition = store.mark_ready("T1", "W9").await.unwrap();
        assert_eq!(transition, ReadyTransition::Promoted);

        let record = store.find("T1").await.unwrap().unwrap();
        assert_matches!(record.state, CorrelationState::Ready { ref webhook_id } if webhook_id == "W9");
    }

    #[tokio::test]
    async fn mark_ready_creates_unknown_record() {
        let store = MemoryCorrelationStore::new();

        let transition = store.mark_ready("T404", "W1").await.unwrap();
        assert_eq!(transition, ReadyTransition::Created);
        assert!(store.find("T404").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn duplicate_ready_keeps_first_webhook() {
        let store = MemoryCorrelationStore::new();
        store.insert_pending("T1").await.unwrap();
        store.mark_ready("T1", "W9").await.unwrap();

        let transition = store.mark_ready("T1", "W10").await.unwrap();
        assert_eq!(transition, ReadyTransition::AlreadyTerminal);

        let record = store.find("T1").await.unwrap().unwrap();
        assert_eq!(
            record.state,
            CorrelationState::Ready {
                webhook_id: "W9".into()
            }
        );
    }

    #[tokio::test]
    async fn late_pending_insert_does_not_regress_ready() {
        let store = MemoryCorrelationStore::new();
        store.mark_ready("T1", "W9").await.unwrap();

        assert!(!store.insert_pending("T1").await.unwrap());
        let record = store.find("T1").await.unwrap().unwrap();
        assert!(record.state.is_terminal());
    }

    #[tokio::test]
    async fn mark_failed_only_applies_to_ready() {
        let store = MemoryCorrelationStore::new();
        store.insert_pending("T1").await.unwrap();
        assert!(!store.mark_failed("T1", "boom").await.unwrap());

        store.mark_ready("T1", "W9").await.unwrap();
        assert!(store.mark_failed("T1", "boom").await.unwrap());
        assert!(!store.mark_failed("T1", "again").await.unwrap());

        let record = store.find("T1").await.unwrap().unwrap();
        assert_eq!(
            record.state,
            CorrelationState::Failed {
                reason: "boom".into()
            }
        );
    }

    #[tokio::test]
    async fn purge_removes_only_stale_records() {
        let store = MemoryCorrelationStore::new();
        store.insert_pending("old").await.unwrap();
        store.insert_pending("new").await.unwrap();
        let stale = Utc::now() - chrono::Duration::hours(48);
        assert!(store.set_updated_at("old", stale).await);

        let purged = store
            .purge_older_than(Utc::now() - chrono::Duration::hours(24))
            .await
            .unwrap();

        assert_eq!(purged, 1);
        assert!(store.find("old").await.unwrap().is_none());
        assert!(store.find("new").await.unwrap().is_some());
    }
}
