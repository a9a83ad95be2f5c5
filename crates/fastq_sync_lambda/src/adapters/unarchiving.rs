use fastq_sync_core::error::SyncError;
use fastq_sync_core::jobs::{UnarchivingJob, UnarchivingJobStatus};

pub trait UnarchivingApi {
    fn list_jobs(
        &self,
        fastq_id: &str,
        status: UnarchivingJobStatus,
    ) -> Result<Vec<UnarchivingJob>, SyncError>;

    fn create_job(&self, fastq_ids: &[String], job_kind: &str)
        -> Result<UnarchivingJob, SyncError>;
}
