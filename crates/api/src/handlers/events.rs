//! Inbound webhook callbacks from the remote service.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use cadview_core::webhook::WebhookEvent;

use crate::state::AppState;

/// POST /api/event
///
/// Always answers 200. Malformed bodies and store failures are logged.
pub async fn receive_event(State(state): State<AppState>, body: Bytes) -> StatusCode {
    let event: WebhookEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(error = %e, bytes = body.len(), "Unparseable webhook body");
            return StatusCode::OK;
        }
    };

    if let Err(e) = state.pipeline.correlator().handle_event(&event).await {
        tracing::error!(
            event = ?event.event,
            translation_id = ?event.translation_id,
            error = %e,
            "Failed to handle webhook event",
        );
    }

    StatusCode::OK
}
