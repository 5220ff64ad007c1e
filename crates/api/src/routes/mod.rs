pub mod documents;
pub mod events;
pub mod gltf;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /event                      webhook callback (POST, no auth)
///
/// /gltf                       start translation (GET)
/// /gltf/{translation_id}      poll translation (GET)
///
/// /elements                   element listing passthrough (GET)
/// /parts                      part listing passthrough (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(events::router())
        .merge(gltf::router())
        .merge(documents::router())
}
