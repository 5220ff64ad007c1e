//! Document workspace listings relayed from the remote service.

use serde::Deserialize;

use crate::error::CoreError;
use crate::translation::require_id;

/// A document workspace, the scope of element and part listings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceRef {
    #[serde(default)]
    pub document_id: String,
    #[serde(default)]
    pub workspace_id: String,
}

impl WorkspaceRef {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_id("documentId", &self.document_id)?;
        require_id("workspaceId", &self.workspace_id)
    }

    /// `documents/d/{did}/w/{wid}/elements`, relative to the API root.
    pub fn elements_path(&self) -> String {
        format!(
            "documents/d/{}/w/{}/elements",
            self.document_id, self.workspace_id
        )
    }

    /// `parts/d/{did}/w/{wid}`, relative to the API root.
    pub fn parts_path(&self) -> String {
        format!("parts/d/{}/w/{}", self.document_id, self.workspace_id)
    }
}
