use fastq_sync_core::error::SyncError;
use fastq_sync_core::jobs::{Job, JobType};
use fastq_sync_core::model::{FastqRecord, FastqSet};

pub trait FastqApi {
    fn fetch_fastq(&self, fastq_id: &str, include_s3_details: bool)
        -> Result<FastqRecord, SyncError>;

    fn fetch_fastq_set(&self, fastq_set_id: &str) -> Result<FastqSet, SyncError>;

    fn list_fastq_jobs(&self, fastq_id: &str) -> Result<Vec<Job>, SyncError>;

    fn create_fastq_job(&self, fastq_id: &str, job_type: JobType) -> Result<Job, SyncError>;
}
