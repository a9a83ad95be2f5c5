use fastq_sync_core::contract::{
    decode_request, normalize_launch_request, LaunchRequirementJobRequest,
    LaunchRequirementJobResponse,
};
use fastq_sync_core::error::SyncError;
use fastq_sync_core::jobs::{has_active_job_of, UNARCHIVING_JOB_KIND};
use fastq_sync_core::model::FastqRecord;
use fastq_sync_core::readiness::ReadinessChecker;
use fastq_sync_core::remediation::{DispatchOutcome, RemediationAction};
use serde_json::Value;
use tracing::info;

use super::running_jobs::unarchiving_job_in_flight;
use crate::adapters::fastq::FastqApi;
use crate::adapters::unarchiving::UnarchivingApi;

const COMPONENT: &str = "launch_requirement_job";

/// Start the job that fulfils one requirement of one fastq, unless an
/// equivalent job is already pending or running.
pub fn handle_launch_requirement_job_event(
    event: Value,
    checker: &ReadinessChecker,
    fastq_api: &dyn FastqApi,
    unarchiving_api: &dyn UnarchivingApi,
) -> Result<LaunchRequirementJobResponse, SyncError> {
    let payload: LaunchRequirementJobRequest = decode_request(event)?;
    let request = normalize_launch_request(payload)?;
    let action = RemediationAction::from_requirement_name(&request.requirement_type)?;

    let record = fastq_api.fetch_fastq(&request.fastq_id, true)?;
    dispatch_remediation(&record, action, checker, fastq_api, unarchiving_api)
}

pub fn dispatch_remediation(
    record: &FastqRecord,
    action: RemediationAction,
    checker: &ReadinessChecker,
    fastq_api: &dyn FastqApi,
    unarchiving_api: &dyn UnarchivingApi,
) -> Result<LaunchRequirementJobResponse, SyncError> {
    let response = match action {
        RemediationAction::Unarchive => {
            if unarchiving_job_in_flight(&record.id, unarchiving_api)? {
                skipped(DispatchOutcome::SkippedJobInFlight)
            } else {
                let job = unarchiving_api
                    .create_job(std::slice::from_ref(&record.id), UNARCHIVING_JOB_KIND)?;
                LaunchRequirementJobResponse {
                    outcome: DispatchOutcome::CreatedUnarchivingJob,
                    job_id: Some(job.id),
                }
            }
        }
        RemediationAction::RunJob(job_type) => {
            let jobs = fastq_api.list_fastq_jobs(&record.id)?;
            if has_active_job_of(&jobs, job_type) {
                skipped(DispatchOutcome::SkippedJobInFlight)
            } else if !checker.has_active_read_set(record) {
                skipped(DispatchOutcome::SkippedNoActiveReadSet)
            } else {
                let job = fastq_api.create_fastq_job(&record.id, job_type)?;
                LaunchRequirementJobResponse {
                    outcome: DispatchOutcome::CreatedJob,
                    job_id: Some(job.id),
                }
            }
        }
    };

    let job_kind = match action {
        RemediationAction::Unarchive => UNARCHIVING_JOB_KIND,
        RemediationAction::RunJob(job_type) => job_type.as_str(),
    };
    let log_event = if response.outcome.created() {
        "job_created"
    } else {
        "job_skipped"
    };
    info!(
        component = COMPONENT,
        event = log_event,
        fastq_id = %record.id,
        job_kind,
        outcome = ?response.outcome,
        job_id = ?response.job_id
    );

    Ok(response)
}

fn skipped(outcome: DispatchOutcome) -> LaunchRequirementJobResponse {
    LaunchRequirementJobResponse {
        outcome,
        job_id: None,
    }
}
