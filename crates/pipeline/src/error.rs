use cadview_core::error::CoreError;
use cadview_db::store::StoreError;
use cadview_onshape::OnshapeApiError;

/// Errors raised while starting, tracking or completing a translation.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Invalid input or a domain rule violation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The remote service failed or rejected the call.
    #[error(transparent)]
    Remote(#[from] OnshapeApiError),

    /// The correlation store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The remote job finished without anything to download.
    #[error("Translation {0} produced no result")]
    NoResult(String),
}
