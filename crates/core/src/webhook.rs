//! Remote webhook event names, subscription filters and inbound payloads.

use serde::Deserialize;

use crate::error::CoreError;

/// Event fired by the remote service when a translation finishes (either way).
pub const EVENT_TRANSLATION_COMPLETE: &str = "onshape.model.translation.complete";

/// Path on this service that receives webhook callbacks.
pub const EVENT_CALLBACK_PATH: &str = "/api/event";

/// Build the subscription filter scoping events to one user and document.
///
/// Ids are embedded inside single quotes, so an id containing a quote is
/// rejected rather than escaped.
pub fn subscription_filter(user_id: &str, document_id: &str) -> Result<String, CoreError> {
    for (field, value) in [("userId", user_id), ("documentId", document_id)] {
        if value.trim().is_empty() {
            return Err(CoreError::Validation(format!("{field} must not be empty")));
        }
        if value.contains('\'') {
            return Err(CoreError::Validation(format!(
                "{field} must not contain a single quote"
            )));
        }
    }

    Ok(format!(
        "{{$UserId}} = '{user_id}' && {{$DocumentId}} = '{document_id}'"
    ))
}

/// Callback URL registered with the remote service.
pub fn callback_url(callback_root: &str) -> String {
    format!(
        "{}{EVENT_CALLBACK_PATH}",
        callback_root.trim_end_matches('/')
    )
}

/// Body of an inbound webhook callback.
///
/// Every field is optional: the remote service also posts registration pings
/// and other event kinds that carry none of the translation fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub translation_id: Option<String>,
    #[serde(default)]
    pub webhook_id: Option<String>,
}

/// A validated translation-complete notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationComplete {
    pub translation_id: String,
    pub webhook_id: String,
}

impl WebhookEvent {
    pub fn is_translation_complete(&self) -> bool {
        self.event.as_deref() == Some(EVENT_TRANSLATION_COMPLETE)
    }

    /// Extract the completion fields. `Ok(None)` for events of any other kind.
    pub fn translation_complete(&self) -> Result<Option<TranslationComplete>, CoreError> {
        if !self.is_translation_complete() {
            return Ok(None);
        }

        let translation_id = non_empty(self.translation_id.as_deref(), "translationId")?;
        let webhook_id = non_empty(self.webhook_id.as_deref(), "webhookId")?;

        Ok(Some(TranslationComplete {
            translation_id: translation_id.to_string(),
            webhook_id: webhook_id.to_string(),
        }))
    }
}

fn non_empty<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, CoreError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(CoreError::Validation(format!(
            "completion event is missing {field}"
        ))),
    }
}
