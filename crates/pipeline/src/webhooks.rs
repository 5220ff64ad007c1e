//! Registration and teardown of the one-shot completion webhook.

use std::sync::Arc;

use cadview_core::webhook::{callback_url, subscription_filter};
use cadview_onshape::{CreateWebhook, OnshapeClient};

use crate::error::PipelineError;

/// Owns the remote webhook subscription for one translation at a time.
pub struct WebhookCoordinator {
    client: Arc<dyn OnshapeClient>,
    callback_url: String,
}

impl WebhookCoordinator {
    /// * `callback_root` - externally reachable root URL of this service; the
    ///   event path is appended.
    pub fn new(client: Arc<dyn OnshapeClient>, callback_root: &str) -> Self {
        Self {
            client,
            callback_url: callback_url(callback_root),
        }
    }

    /// Subscribe to translation completion for `user_id` on `document_id`.
    /// Returns the remote webhook id.
    pub async fn register(
        &self,
        access_token: &str,
        user_id: &str,
        document_id: &str,
    ) -> Result<String, PipelineError> {
        let filter = subscription_filter(user_id, document_id)?;
        let body = CreateWebhook::translation_complete(filter, self.callback_url.clone());

        let webhook_id = self.client.create_webhook(access_token, &body).await?;

        tracing::info!(%webhook_id, %user_id, %document_id, "Webhook registered");
        Ok(webhook_id)
    }

    /// Best-effort removal. Failures are logged and otherwise ignored; an
    /// orphaned subscription expires with the remote service's own lifecycle.
    pub async fn unregister(&self, access_token: &str, webhook_id: &str) {
        match self.client.delete_webhook(access_token, webhook_id).await {
            Ok(()) => {
                tracing::info!(%webhook_id, "Webhook unregistered");
            }
            Err(e) => {
                tracing::warn!(%webhook_id, error = %e, "Failed to unregister webhook");
            }
        }
    }
}
