//! GLTF translation lifecycle.
//!
//! - [`TranslationTrigger`] submits translation jobs.
//! - [`WebhookCoordinator`] registers and releases the completion webhook.
//! - [`CompletionCorrelator`] records completions and answers polls.
//! - [`TranslationPipeline`] ties them together for one client request.

pub mod correlator;
pub mod error;
pub mod trigger;
pub mod users;
pub mod webhooks;

use std::sync::Arc;

use cadview_core::translation::TranslationJob;
use cadview_db::store::CorrelationStore;
use cadview_onshape::{OnshapeClient, TranslationStarted};

pub use correlator::{CompletionCorrelator, EventOutcome, PollOutcome};
pub use error::PipelineError;
pub use trigger::TranslationTrigger;
pub use users::UserDirectory;
pub use webhooks::WebhookCoordinator;

/// Entry point used by the HTTP layer.
pub struct TranslationPipeline {
    trigger: TranslationTrigger,
    webhooks: Arc<WebhookCoordinator>,
    correlator: CompletionCorrelator,
    users: UserDirectory,
}

impl TranslationPipeline {
    /// Wire every component to the same remote client and store.
    ///
    /// * `callback_root` - externally reachable root URL of this service.
    pub fn new(
        client: Arc<dyn OnshapeClient>,
        store: Arc<dyn CorrelationStore>,
        callback_root: &str,
    ) -> Self {
        let webhooks = Arc::new(WebhookCoordinator::new(Arc::clone(&client), callback_root));
        Self {
            trigger: TranslationTrigger::new(Arc::clone(&client)),
            correlator: CompletionCorrelator::new(store, Arc::clone(&client), Arc::clone(&webhooks)),
            users: UserDirectory::new(client),
            webhooks,
        }
    }

    pub fn correlator(&self) -> &CompletionCorrelator {
        &self.correlator
    }

    pub fn users(&self) -> &UserDirectory {
        &self.users
    }

    /// Start translating `job` for the caller.
    ///
    /// The translation request and the webhook registration run
    /// concurrently. The pending record is written before this returns, and
    /// only when the remote answer is JSON carrying an id. A webhook whose
    /// translation never started is released straight away.
    pub async fn start(
        &self,
        access_token: &str,
        job: &TranslationJob,
    ) -> Result<TranslationStarted, PipelineError> {
        job.validate()?;

        let (started, registration) = tokio::join!(
            self.trigger.start(access_token, job),
            self.register_webhook(access_token, &job.document_id),
        );

        let webhook_id = match registration {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(
                    document_id = %job.document_id,
                    error = %e,
                    "Webhook registration failed, completion will not be signalled",
                );
                None
            }
        };

        let started = match started {
            Ok(started) => started,
            Err(e) => {
                tracing::error!(document_id = %job.document_id, error = %e, "Translation request failed");
                self.release(access_token, webhook_id.as_deref()).await;
                return Err(e);
            }
        };

        let Some(translation_id) = started.translation_id() else {
            tracing::warn!(
                content_type = %started.content_type,
                "Translation response carried no id, not tracking it",
            );
            self.release(access_token, webhook_id.as_deref()).await;
            return Ok(started);
        };

        if let Err(e) = self.correlator.record_submission(&translation_id).await {
            self.release(access_token, webhook_id.as_deref()).await;
            return Err(e);
        }

        tracing::info!(
            %translation_id,
            webhook_id = ?webhook_id,
            "Translation started",
        );

        Ok(started)
    }

    async fn register_webhook(
        &self,
        access_token: &str,
        document_id: &str,
    ) -> Result<String, PipelineError> {
        let user_id = self.users.user_id(access_token).await?;
        self.webhooks
            .register(access_token, &user_id, document_id)
            .await
    }

    async fn release(&self, access_token: &str, webhook_id: Option<&str>) {
        if let Some(webhook_id) = webhook_id {
            self.webhooks.unregister(access_token, webhook_id).await;
        }
    }
}
