//! Translation correlation model.

use cadview_core::correlation::{CorrelationRecord, CorrelationState};
use cadview_core::error::CoreError;
use cadview_core::types::Timestamp;
use sqlx::FromRow;

/// A row from the `translation_correlations` table.
#[derive(Debug, Clone, FromRow)]
pub struct CorrelationRow {
    pub translation_id: String,
    pub state: String,
    pub webhook_id: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<CorrelationRow> for CorrelationRecord {
    type Error = CoreError;

    fn try_from(row: CorrelationRow) -> Result<Self, Self::Error> {
        let state = CorrelationState::from_parts(&row.state, row.webhook_id, row.failure_reason)?;
        Ok(CorrelationRecord {
            translation_id: row.translation_id,
            state,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
