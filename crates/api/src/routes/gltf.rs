//! Route definitions for GLTF translation.

use axum::routing::get;
use axum::Router;

use crate::handlers::gltf;
use crate::state::AppState;

/// ```text
/// GET /gltf                    -> start_translation
/// GET /gltf/{translation_id}   -> poll_translation
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/gltf", get(gltf::start_translation))
        .route("/gltf/{translation_id}", get(gltf::poll_translation))
}
