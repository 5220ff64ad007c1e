#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use cadview_api::config::ServerConfig;
use cadview_api::router::build_app_router;
use cadview_api::state::AppState;
use cadview_db::store::MemoryCorrelationStore;
use cadview_onshape::testing::FakeOnshape;

pub const TOKEN: &str = "token-abc";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        api_url: "https://cad.example.com/api".to_string(),
        webhook_callback_root_url: "https://bridge.example.com".to_string(),
        correlation_retention_hours: 24,
    }
}

/// The full application router plus handles on its test doubles.
pub struct TestApp {
    pub app: Router,
    pub remote: Arc<FakeOnshape>,
    pub store: Arc<MemoryCorrelationStore>,
}

/// Build the application router exactly as `main.rs` does, backed by a
/// scripted remote service and an in-memory correlation store.
pub fn build_test_app() -> TestApp {
    build_test_app_with(FakeOnshape::new())
}

pub fn build_test_app_with(remote: FakeOnshape) -> TestApp {
    let remote = Arc::new(remote);
    let store = Arc::new(MemoryCorrelationStore::new());
    let state = AppState::new(test_config(), remote.clone(), store.clone());

    TestApp {
        app: build_app_router(state),
        remote,
        store,
    }
}

/// Authenticated GET.
pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("Authorization", format!("Bearer {TOKEN}"))
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// GET without an `Authorization` header.
pub async fn get_anonymous(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// POST a raw body, as the remote service delivers webhook callbacks.
pub async fn post_raw(app: &Router, uri: &str, body: impl Into<Body>) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(body.into())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    post_raw(app, uri, body.to_string()).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

pub fn content_type(response: &Response<Body>) -> &str {
    response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// Webhook body announcing that `translation_id` finished.
pub fn completion_event(translation_id: &str, webhook_id: &str) -> serde_json::Value {
    serde_json::json!({
        "event": "onshape.model.translation.complete",
        "translationId": translation_id,
        "webhookId": webhook_id,
    })
}
