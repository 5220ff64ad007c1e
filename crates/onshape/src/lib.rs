//! REST client for the remote CAD service.
//!
//! Provides the [`OnshapeClient`] trait used by the translation pipeline,
//! its reqwest-backed implementation [`api::OnshapeApi`], and the typed
//! request/response payloads in [`models`].

pub mod api;
pub mod models;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;

use async_trait::async_trait;

pub use api::{OnshapeApi, OnshapeApiError};
pub use models::{
    CreateWebhook, ForwardedResponse, SessionInfo, TranslationStarted, TranslationStatus,
};

/// Operations the translation pipeline needs from the remote service.
///
/// Every call carries the caller's OAuth access token.
#[async_trait]
pub trait OnshapeClient: Send + Sync {
    /// `POST {path}` with a JSON translation body. `path` is relative to the
    /// API root (see `TranslationJob::endpoint_path`).
    async fn start_translation(
        &self,
        access_token: &str,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<TranslationStarted, OnshapeApiError>;

    /// `GET /translations/{id}`.
    async fn get_translation(
        &self,
        access_token: &str,
        translation_id: &str,
    ) -> Result<TranslationStatus, OnshapeApiError>;

    /// `GET /documents/d/{did}/externaldata/{fid}`. Status and content type
    /// are returned as the remote service sent them.
    async fn get_external_data(
        &self,
        access_token: &str,
        document_id: &str,
        external_data_id: &str,
    ) -> Result<ForwardedResponse, OnshapeApiError>;

    /// `POST /webhooks`, returning the new webhook id.
    async fn create_webhook(
        &self,
        access_token: &str,
        webhook: &CreateWebhook,
    ) -> Result<String, OnshapeApiError>;

    /// `DELETE /webhooks/{id}`.
    async fn delete_webhook(&self, access_token: &str, webhook_id: &str)
        -> Result<(), OnshapeApiError>;

    /// `GET /users/sessioninfo`.
    async fn session_info(&self, access_token: &str) -> Result<SessionInfo, OnshapeApiError>;

    /// `GET {path}` passed straight through, whatever the status.
    async fn forward_get(
        &self,
        access_token: &str,
        path: &str,
    ) -> Result<ForwardedResponse, OnshapeApiError>;
}
