//! Passthrough listings of a document workspace's elements and parts.

use axum::extract::State;
use axum::response::Response;
use cadview_core::documents::WorkspaceRef;

use crate::error::AppResult;
use crate::middleware::auth::AccessToken;
use crate::middleware::query::QueryParams;
use crate::response::forwarded;
use crate::state::AppState;

/// GET /api/elements?documentId&workspaceId
pub async fn list_elements(
    token: AccessToken,
    State(state): State<AppState>,
    QueryParams(workspace): QueryParams<WorkspaceRef>,
) -> AppResult<Response> {
    workspace.validate()?;
    let remote = state
        .onshape
        .forward_get(token.as_str(), &workspace.elements_path())
        .await?;
    Ok(forwarded(remote))
}

/// GET /api/parts?documentId&workspaceId
pub async fn list_parts(
    token: AccessToken,
    State(state): State<AppState>,
    QueryParams(workspace): QueryParams<WorkspaceRef>,
) -> AppResult<Response> {
    workspace.validate()?;
    let remote = state
        .onshape
        .forward_get(token.as_str(), &workspace.parts_path())
        .await?;
    Ok(forwarded(remote))
}
