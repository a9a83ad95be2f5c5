use serde::Serialize;

use crate::error::SyncError;
use crate::jobs::JobType;
use crate::requirements::Requirement;

/// Background work that can fulfil an unsatisfied requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemediationAction {
    /// Restore the read set from an archive tier.
    Unarchive,
    /// Run a fastq service job; needs an active read set to compute on.
    RunJob(JobType),
}

impl RemediationAction {
    pub fn for_requirement(requirement: Requirement) -> Self {
        match requirement {
            Requirement::ActiveReadSet => Self::Unarchive,
            Requirement::Qc => Self::RunJob(JobType::Qc),
            Requirement::Fingerprint => Self::RunJob(JobType::Ntsm),
            Requirement::FileCompressionInformation => Self::RunJob(JobType::FileCompression),
            Requirement::ReadCountInformation => Self::RunJob(JobType::ReadCount),
        }
    }

    pub fn from_requirement_name(name: &str) -> Result<Self, SyncError> {
        name.parse::<Requirement>()
            .map(Self::for_requirement)
            .map_err(|_| SyncError::UnknownJobType(name.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DispatchOutcome {
    CreatedUnarchivingJob,
    CreatedJob,
    SkippedJobInFlight,
    SkippedNoActiveReadSet,
}

impl DispatchOutcome {
    pub fn created(self) -> bool {
        matches!(self, Self::CreatedUnarchivingJob | Self::CreatedJob)
    }
}
