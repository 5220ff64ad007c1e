//! Handlers for GLTF translation start and polling.

use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cadview_core::correlation::STATE_PENDING;
use cadview_core::error::CoreError;
use cadview_core::translation::{TranslationJob, TranslationParams};
use cadview_pipeline::PollOutcome;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AccessToken;
use crate::middleware::query::QueryParams;
use crate::response::forwarded;
use crate::state::AppState;

/// Content type assumed for a start response that did not declare one.
const DEFAULT_START_CONTENT_TYPE: &str = "application/json";

/// Query string of `GET /api/gltf`.
///
/// Tessellation parameters are optional here; omitted ones take the stock
/// values from [`TranslationParams::default`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GltfQuery {
    #[serde(default)]
    pub document_id: String,
    #[serde(default)]
    pub workspace_id: String,
    #[serde(default)]
    pub gltf_element_id: String,
    pub part_id: Option<String>,
    pub resolution: Option<String>,
    pub distance_tolerance: Option<f64>,
    pub angular_tolerance: Option<f64>,
    pub maximum_chord_length: Option<f64>,
}

impl GltfQuery {
    fn into_job(self) -> TranslationJob {
        let stock = TranslationParams::default();
        TranslationJob {
            document_id: self.document_id,
            workspace_id: self.workspace_id,
            element_id: self.gltf_element_id,
            // `partId=` means "whole element".
            part_id: self.part_id.filter(|p| !p.is_empty()),
            params: TranslationParams {
                resolution: self.resolution.unwrap_or(stock.resolution),
                distance_tolerance: self.distance_tolerance.unwrap_or(stock.distance_tolerance),
                angular_tolerance: self.angular_tolerance.unwrap_or(stock.angular_tolerance),
                maximum_chord_length: self
                    .maximum_chord_length
                    .unwrap_or(stock.maximum_chord_length),
            },
        }
    }
}

/// Body of a 202 poll answer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationProgress {
    pub translation_id: String,
    pub state: &'static str,
}

/// GET /api/gltf
///
/// Start translating an element (or one part of it) to GLTF. Returns the
/// remote service's start response as-is; its `id` is what clients poll.
pub async fn start_translation(
    token: AccessToken,
    State(state): State<AppState>,
    QueryParams(query): QueryParams<GltfQuery>,
) -> AppResult<Response> {
    let job = query.into_job();
    let started = state.pipeline.start(token.as_str(), &job).await?;

    let content_type = if started.content_type.is_empty() {
        DEFAULT_START_CONTENT_TYPE.to_string()
    } else {
        started.content_type
    };

    Ok((StatusCode::OK, [(CONTENT_TYPE, content_type)], started.data).into_response())
}

/// GET /api/gltf/{translation_id}
///
/// 202 while the translation runs, the GLTF artifact once it is done,
/// 404 for an id this service never saw, 500 if the translation failed.
pub async fn poll_translation(
    token: AccessToken,
    State(state): State<AppState>,
    Path(translation_id): Path<String>,
) -> AppResult<Response> {
    let outcome = state
        .pipeline
        .correlator()
        .poll(token.as_str(), &translation_id)
        .await?;

    match outcome {
        PollOutcome::NotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Translation",
            id: translation_id,
        })),
        PollOutcome::InProgress => Ok((
            StatusCode::ACCEPTED,
            Json(TranslationProgress {
                translation_id,
                state: STATE_PENDING,
            }),
        )
            .into_response()),
        PollOutcome::Artifact(artifact) => Ok(forwarded(artifact)),
        PollOutcome::Failed { reason } => Err(AppError::TranslationFailed(reason)),
    }
}
