use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cadview_core::error::CoreError;
use cadview_db::store::StoreError;
use cadview_onshape::OnshapeApiError;
use cadview_pipeline::PipelineError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds the remote, store and
/// translation-failure variants. Implements [`IntoResponse`] to produce consistent
/// JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `cadview_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The remote CAD service failed or rejected a call.
    #[error(transparent)]
    Remote(#[from] OnshapeApiError),

    /// The correlation store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The remote translation job failed; carries the reason shown to clients.
    #[error("Translation failed: {0}")]
    TranslationFailed(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Core(e) => AppError::Core(e),
            PipelineError::Remote(e) => AppError::Remote(e),
            PipelineError::Store(e) => AppError::Store(e),
            e @ PipelineError::NoResult(_) => AppError::TranslationFailed(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Remote service ---
            AppError::Remote(err) => {
                tracing::error!(error = %err, "Remote API call failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "REMOTE_ERROR",
                    err.remote_message(),
                )
            }
            AppError::TranslationFailed(reason) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "TRANSLATION_FAILED",
                reason.clone(),
            ),

            // --- Store ---
            AppError::Store(err) => {
                tracing::error!(error = %err, "Correlation store error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
