#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use fastq_sync_core::error::SyncError;
use fastq_sync_core::jobs::{Job, JobStatus, JobType, UnarchivingJob, UnarchivingJobStatus};
use fastq_sync_core::model::{FastqRecord, FastqSet, Field};
use fastq_sync_core::readiness::ReadinessChecker;
use fastq_sync_core::requirements::EvaluationMode;
use fastq_sync_core::workflow::{WorkflowRunDetail, WorkflowRunRef};
use fastq_sync_lambda::adapters::fastq::FastqApi;
use fastq_sync_lambda::adapters::unarchiving::UnarchivingApi;
use fastq_sync_lambda::adapters::workflow::WorkflowApi;
use fastq_sync_lambda::runtime::HandlerContext;
use serde_json::{json, Value};

pub const PREFIX: &str = "s3://pipeline-cache/byob/";

pub fn checker() -> ReadinessChecker {
    ReadinessChecker::new(PREFIX, EvaluationMode::Compatible)
}

pub fn strict_checker() -> ReadinessChecker {
    ReadinessChecker::new(PREFIX, EvaluationMode::Strict)
}

pub fn read_file(storage_class: &str, name: &str) -> Value {
    json!({
        "storageClass": storage_class,
        "s3Uri": format!("{PREFIX}{name}"),
        "gzipCompressionSizeInBytes": 1024,
        "rawMd5sum": "d41d8cd98f00b204e9800998ecf8427e"
    })
}

/// A fastq whose read set lives in `storage_class` and which has QC but no
/// fingerprint.
pub fn fastq(id: &str, library_id: &str, storage_class: &str) -> FastqRecord {
    serde_json::from_value(json!({
        "id": id,
        "library": {"libraryId": library_id},
        "readSet": {
            "compressionFormat": "ORA",
            "r1": read_file(storage_class, &format!("{id}_R1.fastq.ora")),
            "r2": read_file(storage_class, &format!("{id}_R2.fastq.ora"))
        },
        "qc": {"insertSizeEstimate": 310},
        "ntsm": null
    }))
    .expect("fixture record parses")
}

pub fn with_fingerprint(mut record: FastqRecord) -> FastqRecord {
    record.ntsm = Field::Present(json!({"s3Uri": format!("{PREFIX}{}.ntsm", record.id)}));
    record
}

pub fn without_read_set(mut record: FastqRecord) -> FastqRecord {
    record.read_set = Field::Null;
    record
}

pub fn job(id: &str, job_type: &str, status: JobStatus) -> Job {
    Job {
        id: id.to_string(),
        job_type: job_type.to_string(),
        status,
    }
}

/// In-memory fastq, unarchiving and workflow services that record every call.
#[derive(Default)]
pub struct FakeServices {
    records: HashMap<String, FastqRecord>,
    sets: HashMap<String, FastqSet>,
    fastq_jobs: Mutex<HashMap<String, Vec<Job>>>,
    unarchiving_jobs: Mutex<HashMap<(String, &'static str), Vec<UnarchivingJob>>>,
    workflow_runs: HashMap<(String, String), Vec<WorkflowRunRef>>,
    workflow_details: HashMap<String, WorkflowRunDetail>,
    calls: Mutex<Vec<String>>,
    created_fastq_jobs: Mutex<Vec<(String, JobType)>>,
    created_unarchiving_jobs: Mutex<Vec<(Vec<String>, String)>>,
}

impl FakeServices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, record: FastqRecord) -> Self {
        self.records.insert(record.id.clone(), record);
        self
    }

    pub fn with_set(mut self, fastq_set_id: &str, fastq_ids: &[&str]) -> Self {
        let set: FastqSet = serde_json::from_value(json!({
            "id": fastq_set_id,
            "fastqSet": fastq_ids
                .iter()
                .map(|id| json!({"id": id}))
                .collect::<Vec<_>>()
        }))
        .expect("fixture set parses");
        self.sets.insert(fastq_set_id.to_string(), set);
        self
    }

    pub fn with_fastq_job(self, fastq_id: &str, job: Job) -> Self {
        self.fastq_jobs
            .lock()
            .expect("poisoned mutex")
            .entry(fastq_id.to_string())
            .or_default()
            .push(job);
        self
    }

    pub fn with_unarchiving_job(self, fastq_id: &str, status: UnarchivingJobStatus) -> Self {
        self.unarchiving_jobs
            .lock()
            .expect("poisoned mutex")
            .entry((fastq_id.to_string(), status.as_str()))
            .or_default()
            .push(UnarchivingJob {
                id: format!("unarchiving.{fastq_id}"),
                status,
            });
        self
    }

    pub fn with_workflow_run(
        mut self,
        workflow_name: &str,
        status: &str,
        run_id: &str,
        library_ids: &[&str],
    ) -> Self {
        self.workflow_runs
            .entry((workflow_name.to_string(), status.to_string()))
            .or_default()
            .push(WorkflowRunRef {
                orcabus_id: run_id.to_string(),
            });
        let detail: WorkflowRunDetail = serde_json::from_value(json!({
            "libraries": library_ids
                .iter()
                .map(|id| json!({"libraryId": id}))
                .collect::<Vec<_>>()
        }))
        .expect("fixture run parses");
        self.workflow_details.insert(run_id.to_string(), detail);
        self
    }

    pub fn context<'a>(&'a self, checker: &'a ReadinessChecker) -> HandlerContext<'a> {
        HandlerContext {
            checker,
            fastq: self,
            unarchiving: self,
            workflow: self,
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("poisoned mutex").clone()
    }

    pub fn calls_starting_with(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    pub fn created_fastq_jobs(&self) -> Vec<(String, JobType)> {
        self.created_fastq_jobs.lock().expect("poisoned mutex").clone()
    }

    pub fn created_unarchiving_jobs(&self) -> Vec<(Vec<String>, String)> {
        self.created_unarchiving_jobs
            .lock()
            .expect("poisoned mutex")
            .clone()
    }

    fn record_call(&self, call: String) {
        self.calls.lock().expect("poisoned mutex").push(call);
    }
}

impl FastqApi for FakeServices {
    fn fetch_fastq(
        &self,
        fastq_id: &str,
        include_s3_details: bool,
    ) -> Result<FastqRecord, SyncError> {
        self.record_call(format!("fetch_fastq:{fastq_id}:{include_s3_details}"));
        self.records
            .get(fastq_id)
            .cloned()
            .ok_or_else(|| SyncError::not_found("fastq", fastq_id))
    }

    fn fetch_fastq_set(&self, fastq_set_id: &str) -> Result<FastqSet, SyncError> {
        self.record_call(format!("fetch_fastq_set:{fastq_set_id}"));
        self.sets
            .get(fastq_set_id)
            .cloned()
            .ok_or_else(|| SyncError::not_found("fastq set", fastq_set_id))
    }

    fn list_fastq_jobs(&self, fastq_id: &str) -> Result<Vec<Job>, SyncError> {
        self.record_call(format!("list_fastq_jobs:{fastq_id}"));
        Ok(self
            .fastq_jobs
            .lock()
            .expect("poisoned mutex")
            .get(fastq_id)
            .cloned()
            .unwrap_or_default())
    }

    fn create_fastq_job(&self, fastq_id: &str, job_type: JobType) -> Result<Job, SyncError> {
        self.record_call(format!("create_fastq_job:{fastq_id}:{job_type}"));
        let mut created = self.created_fastq_jobs.lock().expect("poisoned mutex");
        created.push((fastq_id.to_string(), job_type));
        let job = job(
            &format!("job.{}", created.len()),
            job_type.as_str(),
            JobStatus::Pending,
        );
        self.fastq_jobs
            .lock()
            .expect("poisoned mutex")
            .entry(fastq_id.to_string())
            .or_default()
            .push(job.clone());
        Ok(job)
    }
}

impl UnarchivingApi for FakeServices {
    fn list_jobs(
        &self,
        fastq_id: &str,
        status: UnarchivingJobStatus,
    ) -> Result<Vec<UnarchivingJob>, SyncError> {
        self.record_call(format!("list_unarchiving_jobs:{fastq_id}:{}", status.as_str()));
        Ok(self
            .unarchiving_jobs
            .lock()
            .expect("poisoned mutex")
            .get(&(fastq_id.to_string(), status.as_str()))
            .cloned()
            .unwrap_or_default())
    }

    fn create_job(
        &self,
        fastq_ids: &[String],
        job_kind: &str,
    ) -> Result<UnarchivingJob, SyncError> {
        self.record_call(format!("create_unarchiving_job:{}", fastq_ids.join(",")));
        self.created_unarchiving_jobs
            .lock()
            .expect("poisoned mutex")
            .push((fastq_ids.to_vec(), job_kind.to_string()));
        let job = UnarchivingJob {
            id: format!("unarchiving.{}", fastq_ids.join(",")),
            status: UnarchivingJobStatus::Pending,
        };
        let mut listings = self.unarchiving_jobs.lock().expect("poisoned mutex");
        for fastq_id in fastq_ids {
            listings
                .entry((fastq_id.clone(), UnarchivingJobStatus::Pending.as_str()))
                .or_default()
                .push(job.clone());
        }
        Ok(job)
    }
}

impl WorkflowApi for FakeServices {
    fn list_workflow_runs(
        &self,
        workflow_name: &str,
        status: &str,
    ) -> Result<Vec<WorkflowRunRef>, SyncError> {
        self.record_call(format!("list_workflow_runs:{workflow_name}:{status}"));
        Ok(self
            .workflow_runs
            .get(&(workflow_name.to_string(), status.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    fn fetch_workflow_run(&self, workflow_run_id: &str) -> Result<WorkflowRunDetail, SyncError> {
        self.record_call(format!("fetch_workflow_run:{workflow_run_id}"));
        self.workflow_details
            .get(workflow_run_id)
            .cloned()
            .ok_or_else(|| SyncError::not_found("workflow run", workflow_run_id))
    }
}
