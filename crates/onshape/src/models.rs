//! Request and response payloads for the remote REST API.

use cadview_core::translation::REQUEST_STATE_FAILED;
use cadview_core::webhook::EVENT_TRANSLATION_COMPLETE;
use serde::{Deserialize, Serialize};

/// Raw answer to a translation trigger: the body is kept verbatim because
/// the remote service may answer 2xx with a non-JSON payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationStarted {
    pub content_type: String,
    pub data: String,
}

#[derive(Deserialize)]
struct IdOnly {
    id: String,
}

impl TranslationStarted {
    pub fn is_json(&self) -> bool {
        self.content_type.contains("json")
    }

    /// Translation id assigned by the remote service, if the body is a JSON
    /// object carrying a non-empty `id`.
    pub fn translation_id(&self) -> Option<String> {
        if !self.is_json() {
            return None;
        }
        serde_json::from_str::<IdOnly>(&self.data)
            .ok()
            .map(|body| body.id)
            .filter(|id| !id.trim().is_empty())
    }
}

/// Body of `GET /translations/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationStatus {
    pub request_state: String,
    #[serde(default)]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub result_external_data_ids: Vec<String>,
}

impl TranslationStatus {
    pub fn is_failed(&self) -> bool {
        self.request_state == REQUEST_STATE_FAILED
    }
}

/// Body of `POST /webhooks`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateWebhook {
    pub events: Vec<String>,
    pub filter: String,
    pub options: WebhookOptions,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookOptions {
    pub collapse_events: bool,
}

impl CreateWebhook {
    /// Subscription for translation completion, with event collapsing off so
    /// that every completion is delivered.
    pub fn translation_complete(filter: String, url: String) -> Self {
        Self {
            events: vec![EVENT_TRANSLATION_COMPLETE.to_string()],
            filter,
            options: WebhookOptions {
                collapse_events: false,
            },
            url,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedWebhook {
    pub id: String,
}

/// Body of `GET /users/sessioninfo` (only the fields used here).
#[derive(Debug, Clone, Deserialize)]
pub struct SessionInfo {
    pub id: String,
}

/// A remote response relayed to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_start_response_exposes_id() {
        let started = TranslationStarted {
            content_type: "application/json;charset=UTF-8".into(),
            data: r#"{"id":"T1","requestState":"ACTIVE"}"#.into(),
        };
        assert!(started.is_json());
        assert_eq!(started.translation_id().as_deref(), Some("T1"));
    }

    #[test]
    fn non_json_start_response_has_no_id() {
        let started = TranslationStarted {
            content_type: "text/html".into(),
            data: r#"{"id":"T1"}"#.into(),
        };
        assert_eq!(started.translation_id(), None);
    }

    #[test]
    fn json_without_id_has_no_id() {
        let started = TranslationStarted {
            content_type: "application/json".into(),
            data: r#"{"message":"accepted"}"#.into(),
        };
        assert_eq!(started.translation_id(), None);
    }

    #[test]
    fn status_parses_remote_shape() {
        let status: TranslationStatus = serde_json::from_value(serde_json::json!({
            "id": "T1",
            "requestState": "FAILED",
            "failureReason": "geometry error",
            "documentId": "D1",
            "resultExternalDataIds": []
        }))
        .unwrap();

        assert!(status.is_failed());
        assert_eq!(status.failure_reason.as_deref(), Some("geometry error"));
    }

    #[test]
    fn status_defaults_missing_result_ids() {
        let status: TranslationStatus =
            serde_json::from_value(serde_json::json!({ "requestState": "DONE" })).unwrap();
        assert!(!status.is_failed());
        assert!(status.result_external_data_ids.is_empty());
    }

    #[test]
    fn create_webhook_serializes_camel_case_options() {
        let body = CreateWebhook::translation_complete(
            "{$UserId} = 'U' && {$DocumentId} = 'D'".into(),
            "https://viewer.example.com/api/event".into(),
        );
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["events"][0], "onshape.model.translation.complete");
        assert_eq!(json["options"]["collapseEvents"], false);
        assert_eq!(json["url"], "https://viewer.example.com/api/event");
    }
}
