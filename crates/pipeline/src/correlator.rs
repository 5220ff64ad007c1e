//! Correlation of completion webhooks and client polls.
//!
//! The webhook handler is the only writer that marks a translation ready.
//! Polls read the record and, once it is ready, check the remote job, fetch
//! the artifact and release the webhook. A remote failure observed by a poll
//! is written back so later polls answer without a remote round trip.
//!
//! The fetch and release for a ready record run on their own task. Dropping
//! the poll future (request timeout, client disconnect) detaches that task
//! instead of cancelling it, so the webhook is still released.

use std::sync::Arc;

use cadview_core::correlation::{decide_poll, PollDecision, ReadyTransition};
use cadview_core::error::CoreError;
use cadview_core::webhook::WebhookEvent;
use cadview_db::store::CorrelationStore;
use cadview_onshape::{ForwardedResponse, OnshapeClient};

use crate::error::PipelineError;
use crate::webhooks::WebhookCoordinator;

/// Fallback failure text when the remote job omits `failureReason`.
const UNKNOWN_FAILURE_REASON: &str = "Translation failed";

/// Result of handling an inbound webhook event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Not a translation-complete event.
    Ignored,
    /// A completion was recorded (or was already recorded).
    Recorded(ReadyTransition),
}

/// Answer to a client poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// No record for this id.
    NotFound,
    /// Submitted; completion not yet signalled.
    InProgress,
    /// The translated artifact, as served by the remote service.
    Artifact(ForwardedResponse),
    /// The remote job failed.
    Failed { reason: String },
}

pub struct CompletionCorrelator {
    store: Arc<dyn CorrelationStore>,
    client: Arc<dyn OnshapeClient>,
    webhooks: Arc<WebhookCoordinator>,
}

impl CompletionCorrelator {
    pub fn new(
        store: Arc<dyn CorrelationStore>,
        client: Arc<dyn OnshapeClient>,
        webhooks: Arc<WebhookCoordinator>,
    ) -> Self {
        Self {
            store,
            client,
            webhooks,
        }
    }

    /// Record a freshly submitted translation as pending.
    ///
    /// Returns `false` if a record already existed, e.g. because the
    /// completion webhook beat the submission response.
    pub async fn record_submission(&self, translation_id: &str) -> Result<bool, PipelineError> {
        let inserted = self.store.insert_pending(translation_id).await?;
        if inserted {
            tracing::info!(%translation_id, "Translation recorded as pending");
        } else {
            tracing::info!(
                %translation_id,
                "Translation already recorded, keeping existing state",
            );
        }
        Ok(inserted)
    }

    /// Apply an inbound webhook event.
    ///
    /// Completion events for ids this service never recorded are stored
    /// anyway (logged as a warning); the remote filter scopes deliveries to
    /// our own subscriptions.
    pub async fn handle_event(&self, event: &WebhookEvent) -> Result<EventOutcome, PipelineError> {
        let Some(complete) = event.translation_complete()? else {
            tracing::debug!(event = ?event.event, "Ignoring webhook event");
            return Ok(EventOutcome::Ignored);
        };

        let transition = self
            .store
            .mark_ready(&complete.translation_id, &complete.webhook_id)
            .await?;

        match transition {
            ReadyTransition::Promoted => tracing::info!(
                translation_id = %complete.translation_id,
                webhook_id = %complete.webhook_id,
                "Translation complete",
            ),
            ReadyTransition::Created => tracing::warn!(
                translation_id = %complete.translation_id,
                webhook_id = %complete.webhook_id,
                "Completion received for an unrecorded translation",
            ),
            ReadyTransition::AlreadyTerminal => tracing::debug!(
                translation_id = %complete.translation_id,
                webhook_id = %complete.webhook_id,
                "Duplicate completion event ignored",
            ),
        }

        Ok(EventOutcome::Recorded(transition))
    }

    /// Answer a client poll for `translation_id`.
    ///
    /// For a ready record exactly one webhook unregister is attempted after
    /// the outcome is known, whether the fetch succeeded or not, and even if
    /// the caller stops waiting.
    pub async fn poll(
        &self,
        access_token: &str,
        translation_id: &str,
    ) -> Result<PollOutcome, PipelineError> {
        let record = self.store.find(translation_id).await?;
        tracing::debug!(
            %translation_id,
            state = record.as_ref().map(|r| r.state.name()).unwrap_or("unknown"),
            "Poll",
        );

        match decide_poll(record.as_ref()) {
            PollDecision::NotFound => Ok(PollOutcome::NotFound),
            PollDecision::InProgress => Ok(PollOutcome::InProgress),
            PollDecision::Failed { reason } => Ok(PollOutcome::Failed { reason }),
            PollDecision::Fetch { webhook_id } => {
                let store = Arc::clone(&self.store);
                let client = Arc::clone(&self.client);
                let webhooks = Arc::clone(&self.webhooks);
                let access_token = access_token.to_owned();
                let translation_id = translation_id.to_owned();

                let task = tokio::spawn(async move {
                    let outcome =
                        fetch_result(&*client, &*store, &access_token, &translation_id).await;
                    webhooks.unregister(&access_token, &webhook_id).await;
                    outcome
                });

                task.await.map_err(|e| {
                    PipelineError::Core(CoreError::Internal(format!("Poll task failed: {e}")))
                })?
            }
        }
    }
}

async fn fetch_result(
    client: &dyn OnshapeClient,
    store: &dyn CorrelationStore,
    access_token: &str,
    translation_id: &str,
) -> Result<PollOutcome, PipelineError> {
    let status = client.get_translation(access_token, translation_id).await?;

    if status.is_failed() {
        let reason = status
            .failure_reason
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_FAILURE_REASON.to_string());

        tracing::warn!(%translation_id, %reason, "Translation failed");

        if let Err(e) = store.mark_failed(translation_id, &reason).await {
            tracing::error!(%translation_id, error = %e, "Failed to record translation failure");
        }
        return Ok(PollOutcome::Failed { reason });
    }

    let (Some(document_id), Some(external_data_id)) = (
        status.document_id.as_deref(),
        status.result_external_data_ids.first(),
    ) else {
        return Err(PipelineError::NoResult(translation_id.to_string()));
    };

    let artifact = client
        .get_external_data(access_token, document_id, external_data_id)
        .await?;

    tracing::info!(
        %translation_id,
        status = artifact.status,
        bytes = artifact.body.len(),
        "Translation artifact fetched",
    );

    Ok(PollOutcome::Artifact(artifact))
}
