use axum::routing::get;
use axum::Router;

use crate::handlers::documents;
use crate::state::AppState;

/// ```text
/// GET /elements  -> list_elements
/// GET /parts     -> list_parts
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/elements", get(documents::list_elements))
        .route("/parts", get(documents::list_parts))
}
