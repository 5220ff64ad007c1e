//! Scripted in-process [`OnshapeClient`] for tests.
//!
//! Every endpoint answers from a configurable slot and every call is logged
//! as `"<METHOD> <path>"`, so tests can assert on exactly which remote calls
//! a flow made.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use cadview_core::translation::REQUEST_STATE_DONE;

use crate::api::OnshapeApiError;
use crate::models::{
    CreateWebhook, ForwardedResponse, SessionInfo, TranslationStarted, TranslationStatus,
};
use crate::OnshapeClient;

/// A scripted answer: a value, or an `(http status, body)` remote error.
pub type Scripted<T> = Result<T, (u16, String)>;

fn answer<T: Clone>(slot: &Mutex<Scripted<T>>) -> Result<T, OnshapeApiError> {
    lock(slot)
        .clone()
        .map_err(|(status, body)| OnshapeApiError::ApiError { status, body })
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct FakeOnshape {
    pub start: Mutex<Scripted<TranslationStarted>>,
    pub translation: Mutex<Scripted<TranslationStatus>>,
    pub artifact: Mutex<Scripted<ForwardedResponse>>,
    pub webhook: Mutex<Scripted<String>>,
    pub delete: Mutex<Scripted<()>>,
    pub session: Mutex<Scripted<String>>,
    pub forward: Mutex<Scripted<ForwardedResponse>>,
    /// Held before answering `get_external_data`, after the call is logged.
    pub artifact_delay: Mutex<Option<Duration>>,
    calls: Mutex<Vec<String>>,
    start_bodies: Mutex<Vec<serde_json::Value>>,
    webhooks: Mutex<Vec<CreateWebhook>>,
}

impl Default for FakeOnshape {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeOnshape {
    /// A remote service where everything succeeds: translation `T1` starts,
    /// webhook `W9` registers, user is `U1` and the artifact is a small GLTF.
    pub fn new() -> Self {
        Self {
            start: Mutex::new(Ok(TranslationStarted {
                content_type: "application/json;charset=UTF-8".into(),
                data: r#"{"id":"T1","requestState":"ACTIVE"}"#.into(),
            })),
            translation: Mutex::new(Ok(TranslationStatus {
                    request_state: REQUEST_STATE_DONE.into(),
                failure_reason: None,
                document_id: Some("D1".into()),
                result_external_data_ids: vec!["X1".into()],
            })),
            artifact: Mutex::new(Ok(ForwardedResponse {
                status: 200,
                content_type: Some("model/gltf+json".into()),
                body: br#"{"asset":{"version":"2.0"}}"#.to_vec(),
            })),
            webhook: Mutex::new(Ok("W9".into())),
            delete: Mutex::new(Ok(())),
            session: Mutex::new(Ok("U1".into())),
            forward: Mutex::new(Ok(ForwardedResponse {
                status: 200,
                content_type: Some("application/json".into()),
                body: b"[]".to_vec(),
            })),
            artifact_delay: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            start_bodies: Mutex::new(Vec::new()),
            webhooks: Mutex::new(Vec::new()),
        }
    }

    /// Replace one scripted slot.
    pub fn set<T>(slot: &Mutex<Scripted<T>>, value: Scripted<T>) {
        *lock(slot) = value;
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    /// Number of calls whose log entry starts with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    /// Ids passed to `delete_webhook`, in order.
    pub fn deleted_webhooks(&self) -> Vec<String> {
        lock(&self.calls)
            .iter()
            .filter_map(|c| c.strip_prefix("DELETE webhooks/"))
            .map(str::to_string)
            .collect()
    }

    pub fn start_bodies(&self) -> Vec<serde_json::Value> {
        lock(&self.start_bodies).clone()
    }

    pub fn registered_webhooks(&self) -> Vec<CreateWebhook> {
        lock(&self.webhooks).clone()
    }

    fn log(&self, call: String) {
        lock(&self.calls).push(call);
    }
}

#[async_trait]
impl OnshapeClient for FakeOnshape {
    async fn start_translation(
        &self,
        _access_token: &str,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<TranslationStarted, OnshapeApiError> {
        self.log(format!("POST {path}"));
        lock(&self.start_bodies).push(body.clone());
        answer(&self.start)
    }

    async fn get_translation(
        &self,
        _access_token: &str,
        translation_id: &str,
    ) -> Result<TranslationStatus, OnshapeApiError> {
        self.log(format!("GET translations/{translation_id}"));
        answer(&self.translation)
    }

    async fn get_external_data(
        &self,
        _access_token: &str,
        document_id: &str,
        external_data_id: &str,
    ) -> Result<ForwardedResponse, OnshapeApiError> {
        self.log(format!(
            "GET documents/d/{document_id}/externaldata/{external_data_id}"
        ));
        let delay = *lock(&self.artifact_delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        answer(&self.artifact)
    }

    async fn create_webhook(
        &self,
        _access_token: &str,
        webhook: &CreateWebhook,
    ) -> Result<String, OnshapeApiError> {
        self.log("POST webhooks".to_string());
        lock(&self.webhooks).push(webhook.clone());
        answer(&self.webhook)
    }

    async fn delete_webhook(
        &self,
        _access_token: &str,
        webhook_id: &str,
    ) -> Result<(), OnshapeApiError> {
        self.log(format!("DELETE webhooks/{webhook_id}"));
        answer(&self.delete)
    }

    async fn session_info(&self, _access_token: &str) -> Result<SessionInfo, OnshapeApiError> {
        self.log("GET users/sessioninfo".to_string());
        answer(&self.session).map(|id| SessionInfo { id })
    }

    async fn forward_get(
        &self,
        _access_token: &str,
        path: &str,
    ) -> Result<ForwardedResponse, OnshapeApiError> {
        self.log(format!("GET {path}"));
        answer(&self.forward)
    }
}
