//! Response helpers shared by handlers.

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cadview_onshape::ForwardedResponse;

/// Content type used when the remote service did not send one.
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Relay a remote response: same status, content type and body bytes.
pub fn forwarded(remote: ForwardedResponse) -> Response {
    let status = StatusCode::from_u16(remote.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = remote
        .content_type
        .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());

    (status, [(CONTENT_TYPE, content_type)], Body::from(remote.body)).into_response()
}
