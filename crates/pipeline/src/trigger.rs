//! Submission of GLTF translation jobs to the remote service.

use std::sync::Arc;

use cadview_core::translation::{request_body, TranslationJob};
use cadview_onshape::{OnshapeClient, TranslationStarted};

use crate::error::PipelineError;

/// Builds translation request bodies and submits them. No retries: a
/// failed submission is returned to the caller as-is.
pub struct TranslationTrigger {
    client: Arc<dyn OnshapeClient>,
}

impl TranslationTrigger {
    pub fn new(client: Arc<dyn OnshapeClient>) -> Self {
        Self { client }
    }

    /// POST `job` to the element or part translation endpoint. The job must
    /// already have passed [`TranslationJob::validate`].
    pub async fn start(
        &self,
        access_token: &str,
        job: &TranslationJob,
    ) -> Result<TranslationStarted, PipelineError> {
        let path = job.endpoint_path();
        let body = request_body(job);

        tracing::debug!(
            document_id = %job.document_id,
            element_id = %job.element_id,
            part_id = ?job.part_id,
            target = ?job.target_kind(),
            "Submitting translation",
        );

        let started = self
            .client
            .start_translation(access_token, &path, &body)
            .await?;

        Ok(started)
    }
}
