use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("{0} is required")]
    MissingInput(&'static str),
    #[error("fastq {fastq_id} is archived but unarchiving is not allowed for this sync request")]
    UnarchivingNotPermitted { fastq_id: String },
    #[error("unknown requirement: {0}")]
    UnknownRequirement(String),
    #[error("unknown job type: {0}")]
    UnknownJobType(String),
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: String },
    #[error("upstream request failed: {0}")]
    Upstream(String),
    #[error("misconfiguration: {0}")]
    Configuration(String),
    #[error("malformed request: {0}")]
    MalformedRequest(String),
    #[error("failed to serialize response: {0}")]
    Serialization(String),
}

impl SyncError {
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingInput(_) => "missing_input",
            Self::UnarchivingNotPermitted { .. } => "unarchiving_not_permitted",
            Self::UnknownRequirement(_) => "unknown_requirement",
            Self::UnknownJobType(_) => "unknown_job_type",
            Self::NotFound { .. } => "not_found",
            Self::Upstream(_) => "upstream_error",
            Self::Configuration(_) => "misconfiguration",
            Self::MalformedRequest(_) => "malformed_request",
            Self::Serialization(_) => "serialization_error",
        }
    }
}
