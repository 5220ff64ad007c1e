//! Correlation state for a submitted translation.
//!
//! Each translation id moves through `Pending -> Ready -> (Failed)`. The
//! record is keyed by translation id, so a completion webhook may arrive
//! before or after the submission is recorded without losing information.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Stored state name for a submitted translation awaiting completion.
pub const STATE_PENDING: &str = "pending";

/// Stored state name for a completed translation whose webhook is still registered.
pub const STATE_READY: &str = "ready";

/// Stored state name for a translation the remote service reported as failed.
pub const STATE_FAILED: &str = "failed";

/// All valid stored state names.
pub const VALID_STATES: &[&str] = &[STATE_PENDING, STATE_READY, STATE_FAILED];

/// Lifecycle state of one translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CorrelationState {
    /// Submitted; no completion signal yet.
    Pending,
    /// Completion webhook received. Holds the webhook to unregister once the
    /// artifact has been handed out.
    Ready { webhook_id: String },
    /// Remote job reported failure.
    Failed { reason: String },
}

impl CorrelationState {
    /// Stored name of this state (one of [`VALID_STATES`]).
    pub fn name(&self) -> &'static str {
        match self {
            CorrelationState::Pending => STATE_PENDING,
            CorrelationState::Ready { .. } => STATE_READY,
            CorrelationState::Failed { .. } => STATE_FAILED,
        }
    }

    /// Ready and Failed are terminal for the webhook writer.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, CorrelationState::Pending)
    }

    /// Rebuild a state from its stored columns.
    pub fn from_parts(
        state: &str,
        webhook_id: Option<String>,
        failure_reason: Option<String>,
    ) -> Result<Self, CoreError> {
        match state {
            STATE_PENDING => Ok(CorrelationState::Pending),
            STATE_READY => webhook_id
                .map(|webhook_id| CorrelationState::Ready { webhook_id })
                .ok_or_else(|| {
                    CoreError::Internal("ready correlation record without webhook id".into())
                }),
            STATE_FAILED => Ok(CorrelationState::Failed {
                reason: failure_reason.unwrap_or_default(),
            }),
            other => Err(CoreError::Internal(format!(
                "unknown correlation state '{other}', expected one of: {}",
                VALID_STATES.join(", ")
            ))),
        }
    }
}

/// One row of the correlation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorrelationRecord {
    pub translation_id: String,
    #[serde(flatten)]
    pub state: CorrelationState,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Result of recording a completion webhook for a translation id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyTransition {
    /// No record existed; a Ready record was created.
    Created,
    /// A Pending record was promoted to Ready.
    Promoted,
    /// The record was already Ready or Failed; nothing changed.
    AlreadyTerminal,
}

/// What a poll should do, given the current record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollDecision {
    /// No record: unknown id, or the submission has not been recorded yet.
    NotFound,
    /// Still processing; the client should retry later.
    InProgress,
    /// Completed: check the remote job, fetch the artifact, release the webhook.
    Fetch { webhook_id: String },
    /// A failure was already observed and stored.
    Failed { reason: String },
}

/// Decide how to answer a poll for the given record.
pub fn decide_poll(record: Option<&CorrelationRecord>) -> PollDecision {
    match record.map(|r| &r.state) {
        None => PollDecision::NotFound,
        Some(CorrelationState::Pending) => PollDecision::InProgress,
        Some(CorrelationState::Ready { webhook_id }) => PollDecision::Fetch {
            webhook_id: webhook_id.clone(),
        },
        Some(CorrelationState::Failed { reason }) => PollDecision::Failed {
            reason: reason.clone(),
        },
    }
}
