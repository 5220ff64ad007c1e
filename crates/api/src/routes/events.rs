use axum::routing::post;
use axum::Router;

use crate::handlers::events;
use crate::state::AppState;

/// Webhook callback route. The path must match the URL registered with the
/// remote service (see `cadview_core::webhook::EVENT_CALLBACK_PATH`).
///
/// ```text
/// POST /event  -> receive_event
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/event", post(events::receive_event))
}
