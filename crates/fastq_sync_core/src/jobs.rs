use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// Job kind requested from the unarchiving service for every restore.
pub const UNARCHIVING_JOB_KIND: &str = "S3_UNARCHIVING";

/// Background jobs the fastq service runs against a single fastq.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobType {
    Qc,
    Ntsm,
    FileCompression,
    ReadCount,
}

impl JobType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Qc => "QC",
            Self::Ntsm => "NTSM",
            Self::FileCompression => "FILE_COMPRESSION",
            Self::ReadCount => "READ_COUNT",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = SyncError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "QC" => Ok(Self::Qc),
            "NTSM" => Ok(Self::Ntsm),
            "FILE_COMPRESSION" => Ok(Self::FileCompression),
            "READ_COUNT" => Ok(Self::ReadCount),
            other => Err(SyncError::UnknownJobType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    #[serde(other)]
    Other,
}

impl JobStatus {
    pub fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Running)
    }
}

/// A fastq service job. `job_type` stays a raw string so listings containing
/// job kinds this service never launches still parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(default)]
    pub id: String,
    pub job_type: String,
    pub status: JobStatus,
}

impl Job {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn is_active_of(&self, job_type: JobType) -> bool {
        self.job_type == job_type.as_str() && self.is_active()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnarchivingJobStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Aborted,
    #[serde(other)]
    Other,
}

impl UnarchivingJobStatus {
    /// Statuses that mean a restore is still in flight, in query order.
    pub const ACTIVE: [UnarchivingJobStatus; 2] = [Self::Pending, Self::Running];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Aborted => "ABORTED",
            Self::Other => "OTHER",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnarchivingJob {
    #[serde(default)]
    pub id: String,
    pub status: UnarchivingJobStatus,
}

pub fn any_job_active(jobs: &[Job]) -> bool {
    jobs.iter().any(Job::is_active)
}

pub fn has_active_job_of(jobs: &[Job], job_type: JobType) -> bool {
    jobs.iter().any(|job| job.is_active_of(job_type))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn job(job_type: &str, status: &str) -> Job {
        serde_json::from_value(json!({"id": "job.1", "jobType": job_type, "status": status}))
            .expect("job parses")
    }

    #[test]
    fn active_check_matches_kind_and_status() {
        let jobs = vec![job("QC", "SUCCEEDED"), job("NTSM", "PENDING")];
        assert!(!has_active_job_of(&jobs, JobType::Qc));
        assert!(has_active_job_of(&jobs, JobType::Ntsm));
        assert!(any_job_active(&jobs));
    }

    #[test]
    fn unrecognised_job_listing_entries_still_parse() {
        let jobs = vec![job("MULTIQC", "RUNNING"), job("QC", "CANCELLED")];
        assert_eq!(jobs[1].status, JobStatus::Other);
        assert!(!has_active_job_of(&jobs, JobType::Qc));
        assert!(any_job_active(&jobs));
    }

    #[test]
    fn job_type_parses_wire_names() {
        assert_eq!("FILE_COMPRESSION".parse::<JobType>(), Ok(JobType::FileCompression));
        assert_eq!(
            "GZIP".parse::<JobType>(),
            Err(SyncError::UnknownJobType("GZIP".to_string()))
        );
        assert_eq!(
            serde_json::to_value(JobType::ReadCount).expect("serializes"),
            json!("READ_COUNT")
        );
    }
}
