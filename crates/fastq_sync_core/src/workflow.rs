//! Upstream ingestion workflow runs.
//!
//! A fastq whose library is still referenced by an ingestion run may receive
//! new data, so a wait on that fastq is still expected to resolve.

use serde::{Deserialize, Serialize};

use crate::model::Library;

/// Workflows that produce fastqs, in query order.
pub const INGESTION_WORKFLOW_NAMES: [&str; 2] = ["bclconvert", "bssh-to-aws-s3"];

/// Run statuses treated as "may still produce or update fastqs", in query order.
pub const ACTIVE_WORKFLOW_STATUSES: [&str; 4] = ["DRAFT", "READY", "RUNNING", "SUCCEEDED"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRunRef {
    pub orcabus_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRunDetail {
    #[serde(default)]
    pub libraries: Vec<Library>,
}

impl WorkflowRunDetail {
    pub fn references_library(&self, library_id: &str) -> bool {
        self.libraries
            .iter()
            .any(|library| library.library_id == library_id)
    }
}
