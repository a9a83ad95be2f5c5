use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SyncError;
use crate::model::FastqRecord;
use crate::remediation::DispatchOutcome;
use crate::requirements::RequirementSet;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FastqRequirementsRequest {
    #[serde(default)]
    pub fastq_id: Option<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub is_unarchiving_allowed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FastqRequirementsResponse {
    pub fastq_obj: FastqRecord,
    pub satisfied_requirements: RequirementSet,
    pub unsatisfied_requirements: RequirementSet,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FastqListRequirementsRequest {
    #[serde(default)]
    pub fastq_id_list: Vec<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub is_unarchiving_allowed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HasAllRequirementsResponse {
    pub has_all_requirements: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MissingRequirementsResponse {
    pub has_all_requirements: bool,
    pub fastq_ids_with_missing_requirements: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct LaunchRequirementJobRequest {
    #[serde(default)]
    pub fastq_id: Option<String>,
    #[serde(default)]
    pub requirement_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLaunchRequest {
    pub fastq_id: String,
    pub requirement_type: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LaunchRequirementJobResponse {
    pub outcome: DispatchOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RunningJobsRequest {
    #[serde(default)]
    pub fastq_id_list: Option<Vec<String>>,
    #[serde(default = "default_check_ingestion_workflows")]
    pub check_ingestion_workflows: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RunningJobsResponse {
    pub jobs_running: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FastqSetIdListRequest {
    #[serde(default)]
    pub fastq_set_id_list: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FastqIdListResponse {
    pub fastq_id_list: Vec<String>,
}

pub fn default_check_ingestion_workflows() -> bool {
    true
}

pub fn decode_request<T: DeserializeOwned>(event: Value) -> Result<T, SyncError> {
    if !event.is_object() {
        return Err(SyncError::MalformedRequest(
            "request payload must be a JSON object".to_string(),
        ));
    }
    serde_json::from_value(event).map_err(|error| SyncError::MalformedRequest(error.to_string()))
}

/// A present, non-blank identifier, trimmed.
pub fn required_id(value: Option<String>, field: &'static str) -> Result<String, SyncError> {
    let value = value.map(|value| value.trim().to_string()).unwrap_or_default();
    if value.is_empty() {
        return Err(SyncError::MissingInput(field));
    }
    Ok(value)
}

pub fn normalize_launch_request(
    payload: LaunchRequirementJobRequest,
) -> Result<NormalizedLaunchRequest, SyncError> {
    Ok(NormalizedLaunchRequest {
        fastq_id: required_id(payload.fastq_id, "fastqId")?,
        requirement_type: required_id(payload.requirement_type, "requirementType")?,
    })
}
