//! GLTF translation job model and request-body construction.
//!
//! A [`TranslationJob`] describes one element or part to be translated. The
//! remote request body is the fixed [`baseline_body`] with the job-specific
//! fields merged on top by [`request_body`].

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::CoreError;

/// Export format requested from the remote translation engine.
pub const FORMAT_GLTF: &str = "GLTF";

/// Default tessellation resolution.
pub const DEFAULT_RESOLUTION: &str = "medium";

/// Default distance tolerance (meters).
pub const DEFAULT_DISTANCE_TOLERANCE: f64 = 0.00012;

/// Default angular tolerance (radians).
pub const DEFAULT_ANGULAR_TOLERANCE: f64 = 0.1090830782496456;

/// Default maximum chord length.
pub const DEFAULT_MAXIMUM_CHORD_LENGTH: f64 = 10.0;

/// Remote `requestState` for a translation that finished successfully.
pub const REQUEST_STATE_DONE: &str = "DONE";

/// Remote `requestState` for a translation that failed.
pub const REQUEST_STATE_FAILED: &str = "FAILED";

/// Which remote sub-resource a translation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// A whole element, translated through the assembly endpoint.
    Element,
    /// A single part, translated through the part-studio endpoint.
    Part,
}

impl TargetKind {
    /// REST collection name used in the translation URL.
    pub fn resource(self) -> &'static str {
        match self {
            TargetKind::Element => "assemblies",
            TargetKind::Part => "partstudios",
        }
    }
}

/// Tessellation parameters. All fields are required; callers that want the
/// stock values use [`TranslationParams::default`] explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationParams {
    pub resolution: String,
    pub distance_tolerance: f64,
    pub angular_tolerance: f64,
    pub maximum_chord_length: f64,
}

impl Default for TranslationParams {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION.to_string(),
            distance_tolerance: DEFAULT_DISTANCE_TOLERANCE,
            angular_tolerance: DEFAULT_ANGULAR_TOLERANCE,
            maximum_chord_length: DEFAULT_MAXIMUM_CHORD_LENGTH,
        }
    }
}

/// An immutable translation request for one element or part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationJob {
    pub document_id: String,
    pub workspace_id: String,
    pub element_id: String,
    pub part_id: Option<String>,
    #[serde(flatten)]
    pub params: TranslationParams,
}

impl TranslationJob {
    /// Element translations have no part id; part translations do.
    pub fn target_kind(&self) -> TargetKind {
        match self.part_id {
            Some(_) => TargetKind::Part,
            None => TargetKind::Element,
        }
    }

    /// Path (relative to the API root) of the translation endpoint.
    pub fn endpoint_path(&self) -> String {
        format!(
            "{}/d/{}/w/{}/e/{}/translations",
            self.target_kind().resource(),
            self.document_id,
            self.workspace_id,
            self.element_id
        )
    }

    /// Check ids and tessellation parameters before anything goes remote.
    pub fn validate(&self) -> Result<(), CoreError> {
        require_id("documentId", &self.document_id)?;
        require_id("workspaceId", &self.workspace_id)?;
        require_id("elementId", &self.element_id)?;
        if let Some(part_id) = &self.part_id {
            require_id("partId", part_id)?;
        }

        if self.params.resolution.trim().is_empty() {
            return Err(CoreError::Validation("resolution must not be empty".into()));
        }
        require_positive("distanceTolerance", self.params.distance_tolerance)?;
        require_positive("angularTolerance", self.params.angular_tolerance)?;
        require_positive("maximumChordLength", self.params.maximum_chord_length)?;
        Ok(())
    }
}

pub(crate) fn require_id(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    if value.contains('/') {
        return Err(CoreError::Validation(format!(
            "{field} must not contain '/'"
        )));
    }
    Ok(())
}

fn require_positive(field: &str, value: f64) -> Result<(), CoreError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CoreError::Validation(format!(
            "{field} must be a positive number, got {value}"
        )));
    }
    Ok(())
}

/// The fixed part of every translation request body.
pub fn baseline_body() -> Map<String, Value> {
    let body = json!({
        "includeExportIds": false,
        "formatName": FORMAT_GLTF,
        "flattenAssemblies": false,
        "yAxisIsUp": false,
        "triggerAutoDownload": false,
        "storeInDocument": false,
        "connectionId": "",
        "versionString": "",
        "grouping": true,
        "destinationName": "",
        "configuration": "default",
        "cloudStorageAccountId": null,
        "emailLink": false,
        "emailTo": null,
        "emailSubject": null,
        "emailMessage": null,
        "sendCopyToMe": null,
        "passwordRequired": null,
        "password": null,
        "validForDays": null,
        "fromUserId": null,
    });

    match body {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Build the full request body for `job`: the baseline with the job's
/// workspace, target and tessellation fields written over it.
pub fn request_body(job: &TranslationJob) -> Value {
    let mut body = baseline_body();

    body.insert(
        "linkDocumentWorkspaceId".into(),
        Value::String(job.workspace_id.clone()),
    );
    match &job.part_id {
        Some(part_id) => {
            body.insert("partIds".into(), Value::String(part_id.clone()));
        }
        None => {
            body.insert("elementId".into(), Value::String(job.element_id.clone()));
        }
    }
    body.insert(
        "resolution".into(),
        Value::String(job.params.resolution.clone()),
    );
    body.insert(
        "distanceTolerance".into(),
        json!(job.params.distance_tolerance),
    );
    body.insert("angularTolerance".into(), json!(job.params.angular_tolerance));
    body.insert(
        "maximumChordLength".into(),
        json!(job.params.maximum_chord_length),
    );

    Value::Object(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element_job() -> TranslationJob {
        TranslationJob {
            document_id: "D1".into(),
            workspace_id: "W1".into(),
            element_id: "E42".into(),
            part_id: None,
            params: TranslationParams::default(),
        }
    }

    #[test]
    fn element_job_targets_assemblies() {
        let job = element_job();
        assert_eq!(job.target_kind(), TargetKind::Element);
        assert_eq!(job.endpoint_path(), "assemblies/d/D1/w/W1/e/E42/translations");
    }

    #[test]
    fn part_job_targets_partstudios() {
        let job = TranslationJob {
            part_id: Some("JHD".into()),
            ..element_job()
        };
        assert_eq!(job.target_kind(), TargetKind::Part);
        assert_eq!(
            job.endpoint_path(),
            "partstudios/d/D1/w/W1/e/E42/translations"
        );
    }

    #[test]
    fn element_body_merges_overrides_onto_baseline() {
        let body = request_body(&element_job());

        assert_eq!(body["formatName"], "GLTF");
        assert_eq!(body["grouping"], true);
        assert_eq!(body["configuration"], "default");
        assert_eq!(body["linkDocumentWorkspaceId"], "W1");
        assert_eq!(body["elementId"], "E42");
        assert_eq!(body["resolution"], "medium");
        assert_eq!(body["distanceTolerance"], 0.00012);
        assert_eq!(body["maximumChordLength"], 10.0);
        assert!(body.get("partIds").is_none());
    }

    #[test]
    fn part_body_uses_part_ids_instead_of_element_id() {
        let job = TranslationJob {
            part_id: Some("JHD".into()),
            ..element_job()
        };
        let body = request_body(&job);

        assert_eq!(body["partIds"], "JHD");
        assert!(body.get("elementId").is_none());
    }

    #[test]
    fn overrides_win_over_baseline_keys() {
        let mut job = element_job();
        job.params.resolution = "fine".into();
        let body = request_body(&job);
        assert_eq!(body["resolution"], "fine");
        assert_eq!(body.as_object().map(|m| m.len()), Some(baseline_body().len() + 6));
    }

    #[test]
    fn valid_job_passes_validation() {
        assert!(element_job().validate().is_ok());
    }

    #[test]
    fn empty_document_id_is_rejected() {
        let job = TranslationJob {
            document_id: "  ".into(),
            ..element_job()
        };
        let err = job.validate().unwrap_err();
        assert!(err.to_string().contains("documentId"));
    }

    #[test]
    fn slash_in_element_id_is_rejected() {
        let job = TranslationJob {
            element_id: "E/../x".into(),
            ..element_job()
        };
        assert!(job.validate().is_err());
    }

    #[test]
    fn non_positive_tolerance_is_rejected() {
        let mut job = element_job();
        job.params.angular_tolerance = 0.0;
        assert!(job.validate().is_err());

        job.params.angular_tolerance = f64::NAN;
        assert!(job.validate().is_err());
    }

    #[test]
    fn job_deserializes_from_camel_case_with_flattened_params() {
        let job: TranslationJob = serde_json::from_value(json!({
            "documentId": "D1",
            "workspaceId": "W1",
            "elementId": "E42",
            "partId": null,
            "resolution": "coarse",
            "distanceTolerance": 0.001,
            "angularTolerance": 0.2,
            "maximumChordLength": 5.0
        }))
        .unwrap();

        assert_eq!(job.params.resolution, "coarse");
        assert_eq!(job.target_kind(), TargetKind::Element);
    }
}
