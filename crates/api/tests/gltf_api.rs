//! Integration tests for GLTF translation start and polling.

mod common;

use axum::http::StatusCode;
use cadview_db::store::CorrelationStore;
use cadview_onshape::testing::FakeOnshape;
use cadview_onshape::{ForwardedResponse, TranslationStarted, TranslationStatus};
use common::{
    body_bytes, body_json, build_test_app, completion_event, content_type, get, get_anonymous,
    post_json,
};

const START_URI: &str = "/api/gltf?documentId=D1&workspaceId=W1&gltfElementId=E42";

// ---------------------------------------------------------------------------
// Test: start then poll before completion -> 202
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submitted_translation_polls_in_progress() {
    let t = build_test_app();

    let response = get(&t.app, START_URI).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("application/json"));
    let json = body_json(response).await;
    assert_eq!(json["id"], "T1");

    let response = get(&t.app, "/api/gltf/T1").await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = body_json(response).await;
    assert_eq!(json["translationId"], "T1");
    assert_eq!(json["state"], "pending");
}

// ---------------------------------------------------------------------------
// Test: webhook then poll -> artifact bytes, webhook released
// ---------------------------------------------------------------------------

#[tokio::test]
async fn completed_translation_returns_artifact() {
    let t = build_test_app();
    get(&t.app, START_URI).await;

    let response = post_json(&t.app, "/api/event", completion_event("T1", "W9")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&t.app, "/api/gltf/T1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "model/gltf+json");
    assert_eq!(body_bytes(response).await, br#"{"asset":{"version":"2.0"}}"#.to_vec());

    assert_eq!(t.remote.count("GET translations/T1"), 1);
    assert_eq!(t.remote.deleted_webhooks(), vec!["W9".to_string()]);
}

#[tokio::test]
async fn artifact_status_is_relayed() {
    let t = build_test_app();
    t.store.mark_ready("T1", "W9").await.unwrap();
    FakeOnshape::set(
        &t.remote.artifact,
        Ok(ForwardedResponse {
            status: 404,
            content_type: Some("text/plain".into()),
            body: b"gone".to_vec(),
        }),
    );

    let response = get(&t.app, "/api/gltf/T1").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(content_type(&response), "text/plain");
    assert_eq!(body_bytes(response).await, b"gone".to_vec());
}

// ---------------------------------------------------------------------------
// Test: failed translation -> 500 with the failure reason
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_translation_returns_reason() {
    let t = build_test_app();
    get(&t.app, START_URI).await;
    post_json(&t.app, "/api/event", completion_event("T1", "W9")).await;
    FakeOnshape::set(
        &t.remote.translation,
        Ok(TranslationStatus {
            request_state: "FAILED".into(),
            failure_reason: Some("geometry error".into()),
            ..TranslationStatus::default()
        }),
    );

    let response = get(&t.app, "/api/gltf/T1").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "geometry error");
    assert_eq!(json["code"], "TRANSLATION_FAILED");
    assert_eq!(t.remote.deleted_webhooks(), vec!["W9".to_string()]);

    // The failure is remembered; no further remote calls.
    let calls_before = t.remote.calls().len();
    let response = get(&t.app, "/api/gltf/T1").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(t.remote.calls().len(), calls_before);
}

#[tokio::test]
async fn remote_error_during_poll_returns_remote_body() {
    let t = build_test_app();
    t.store.mark_ready("T1", "W9").await.unwrap();
    FakeOnshape::set(&t.remote.translation, Err((503, "try later".into())));

    let response = get(&t.app, "/api/gltf/T1").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "try later");
    assert_eq!(json["code"], "REMOTE_ERROR");
    assert_eq!(t.remote.deleted_webhooks().len(), 1);
}

// ---------------------------------------------------------------------------
// Test: unknown id -> 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_translation_returns_404() {
    let t = build_test_app();

    let response = get(&t.app, "/api/gltf/T999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert!(t.remote.calls().is_empty());
}

// ---------------------------------------------------------------------------
// Test: start request validation and failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn start_without_token_returns_401() {
    let t = build_test_app();

    let response = get_anonymous(&t.app, START_URI).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert!(t.remote.calls().is_empty());
}

#[tokio::test]
async fn start_without_element_returns_400() {
    let t = build_test_app();

    let response = get(&t.app, "/api/gltf?documentId=D1&workspaceId=W1").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(t.remote.calls().is_empty());
}

#[tokio::test]
async fn start_with_non_positive_tolerance_returns_400() {
    let t = build_test_app();

    let response = get(&t.app, &format!("{START_URI}&distanceTolerance=0")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_numeric_tolerance_returns_json_400() {
    let t = build_test_app();

    let response = get(&t.app, &format!("{START_URI}&distanceTolerance=abc")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(content_type(&response).starts_with("application/json"));
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(!json["error"].as_str().unwrap().is_empty());
    assert!(t.remote.calls().is_empty());
}

#[tokio::test]
async fn remote_start_error_returns_500_with_remote_body() {
    let t = build_test_app();
    FakeOnshape::set(&t.remote.start, Err((400, "Invalid element".into())));

    let response = get(&t.app, START_URI).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid element");
    assert_eq!(json["code"], "REMOTE_ERROR");
    assert!(t.store.find("T1").await.unwrap().is_none());
    assert_eq!(t.remote.deleted_webhooks(), vec!["W9".to_string()]);
}

#[tokio::test]
async fn non_json_start_response_is_relayed_untracked() {
    let t = build_test_app();
    FakeOnshape::set(
        &t.remote.start,
        Ok(TranslationStarted {
            content_type: "text/plain".into(),
            data: "accepted".into(),
        }),
    );

    let response = get(&t.app, START_URI).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "text/plain");
    assert_eq!(body_bytes(response).await, b"accepted".to_vec());
    assert!(t.store.find("T1").await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Test: request body sent to the remote service
// ---------------------------------------------------------------------------

#[tokio::test]
async fn part_query_targets_part_studio_with_overrides() {
    let t = build_test_app();

    let response = get(
        &t.app,
        "/api/gltf?documentId=D1&workspaceId=W1&gltfElementId=E42&partId=JHD\
         &resolution=fine&maximumChordLength=2.5",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(t.remote.count("POST partstudios/d/D1/w/W1/e/E42/translations"), 1);
    let body = &t.remote.start_bodies()[0];
    assert_eq!(body["partIds"], "JHD");
    assert_eq!(body["resolution"], "fine");
    assert_eq!(body["maximumChordLength"], 2.5);
    assert_eq!(body["linkDocumentWorkspaceId"], "W1");
}

#[tokio::test]
async fn empty_part_id_translates_whole_element() {
    let t = build_test_app();

    get(&t.app, &format!("{START_URI}&partId=")).await;

    assert_eq!(t.remote.count("POST assemblies/d/D1/w/W1/e/E42/translations"), 1);
    assert_eq!(t.remote.start_bodies()[0]["elementId"], "E42");
}
