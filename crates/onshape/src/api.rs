//! reqwest-backed implementation of [`OnshapeClient`].
//!
//! Wraps the remote REST endpoints used for GLTF translation (translation
//! trigger and status, external data download, webhook registration,
//! session info) plus a generic passthrough GET.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Response;

use crate::models::{
    CreateWebhook, CreatedWebhook, ForwardedResponse, SessionInfo, TranslationStarted,
    TranslationStatus,
};
use crate::OnshapeClient;

/// Versioned media type accepted by the webhook and session endpoints.
const ACCEPT_V1_JSON: &str = "application/vnd.onshape.v1+json";

/// HTTP client for the remote CAD REST API.
pub struct OnshapeApi {
    client: reqwest::Client,
    api_url: String,
}

/// Errors from the remote REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum OnshapeApiError {
    /// The HTTP request itself failed (network, DNS, TLS, body decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote service returned a non-2xx status code.
    #[error("Remote API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body, surfaced to the caller as-is.
        body: String,
    },
}

impl OnshapeApiError {
    /// Text to show the caller: the remote body for API errors, the
    /// transport message otherwise.
    pub fn remote_message(&self) -> String {
        match self {
            OnshapeApiError::ApiError { body, .. } => body.clone(),
            OnshapeApiError::Request(e) => e.to_string(),
        }
    }
}

impl OnshapeApi {
    /// Create a new API client.
    ///
    /// * `api_url` - API root, e.g. `https://cad.onshape.com/api`. A trailing
    ///   slash is dropped.
    pub fn new(api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            api_url,
        }
    }

    /// Absolute URL for a path relative to the API root.
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    // ---- private helpers ----

    /// Return the response unchanged on 2xx, or an
    /// [`OnshapeApiError::ApiError`] carrying the status and body text.
    async fn ensure_success(response: Response) -> Result<Response, OnshapeApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(OnshapeApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: Response,
    ) -> Result<T, OnshapeApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    fn content_type(response: &Response) -> Option<String> {
        response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    /// Capture status, content type and body bytes without judging the status.
    async fn forward(response: Response) -> Result<ForwardedResponse, OnshapeApiError> {
        let status = response.status().as_u16();
        let content_type = Self::content_type(&response);
        let body = response.bytes().await?.to_vec();
        Ok(ForwardedResponse {
            status,
            content_type,
            body,
        })
    }
}

#[async_trait]
impl OnshapeClient for OnshapeApi {
    async fn start_translation(
        &self,
        access_token: &str,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<TranslationStarted, OnshapeApiError> {
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(access_token)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let content_type = Self::content_type(&response).unwrap_or_default();
        let data = response.text().await?;

        Ok(TranslationStarted { content_type, data })
    }

    async fn get_translation(
        &self,
        access_token: &str,
        translation_id: &str,
    ) -> Result<TranslationStatus, OnshapeApiError> {
        let response = self
            .client
            .get(self.url(&format!("translations/{translation_id}")))
            .bearer_auth(access_token)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn get_external_data(
        &self,
        access_token: &str,
        document_id: &str,
        external_data_id: &str,
    ) -> Result<ForwardedResponse, OnshapeApiError> {
        let response = self
            .client
            .get(self.url(&format!(
                "documents/d/{document_id}/externaldata/{external_data_id}"
            )))
            .bearer_auth(access_token)
            .send()
            .await?;

        Self::forward(response).await
    }

    async fn create_webhook(
        &self,
        access_token: &str,
        webhook: &CreateWebhook,
    ) -> Result<String, OnshapeApiError> {
        let response = self
            .client
            .post(self.url("webhooks"))
            .bearer_auth(access_token)
            .header(ACCEPT, ACCEPT_V1_JSON)
            .json(webhook)
            .send()
            .await?;

        let created: CreatedWebhook = Self::parse_response(response).await?;
        Ok(created.id)
    }

    async fn delete_webhook(
        &self,
        access_token: &str,
        webhook_id: &str,
    ) -> Result<(), OnshapeApiError> {
        let response = self
            .client
            .delete(self.url(&format!("webhooks/{webhook_id}")))
            .bearer_auth(access_token)
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn session_info(&self, access_token: &str) -> Result<SessionInfo, OnshapeApiError> {
        let response = self
            .client
            .get(self.url("users/sessioninfo"))
            .bearer_auth(access_token)
            .header(ACCEPT, ACCEPT_V1_JSON)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn forward_get(
        &self,
        access_token: &str,
        path: &str,
    ) -> Result<ForwardedResponse, OnshapeApiError> {
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(access_token)
            .send()
            .await?;

        Self::forward(response).await
    }
}
