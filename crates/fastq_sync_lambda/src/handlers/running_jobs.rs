//! Running-job probe used to decide whether a pending wait on a fastq list can
//! still be released by work already in flight.

use fastq_sync_core::contract::{decode_request, RunningJobsRequest, RunningJobsResponse};
use fastq_sync_core::error::SyncError;
use fastq_sync_core::jobs::{any_job_active, UnarchivingJobStatus};
use fastq_sync_core::workflow::{ACTIVE_WORKFLOW_STATUSES, INGESTION_WORKFLOW_NAMES};
use serde_json::Value;
use tracing::info;

use crate::adapters::fastq::FastqApi;
use crate::adapters::unarchiving::UnarchivingApi;
use crate::adapters::workflow::WorkflowApi;

const COMPONENT: &str = "check_running_jobs_for_fastq_id_list";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeScope {
    /// Fastq service jobs and unarchiving jobs only.
    JobsOnly,
    /// Also treat a library referenced by an ingestion workflow run as busy.
    WithIngestionWorkflows,
}

pub fn handle_running_jobs_event(
    event: Value,
    fastq_api: &dyn FastqApi,
    unarchiving_api: &dyn UnarchivingApi,
    workflow_api: &dyn WorkflowApi,
) -> Result<RunningJobsResponse, SyncError> {
    let request: RunningJobsRequest = decode_request(event)?;
    let fastq_id_list = request
        .fastq_id_list
        .ok_or(SyncError::MissingInput("fastqIdList"))?;
    let scope = if request.check_ingestion_workflows {
        ProbeScope::WithIngestionWorkflows
    } else {
        ProbeScope::JobsOnly
    };

    let jobs_running = any_jobs_running(
        &fastq_id_list,
        scope,
        fastq_api,
        unarchiving_api,
        workflow_api,
    )?;
    Ok(RunningJobsResponse { jobs_running })
}

/// Scan the fastqs in order and stop at the first sign of in-flight work.
pub fn any_jobs_running(
    fastq_ids: &[String],
    scope: ProbeScope,
    fastq_api: &dyn FastqApi,
    unarchiving_api: &dyn UnarchivingApi,
    workflow_api: &dyn WorkflowApi,
) -> Result<bool, SyncError> {
    for fastq_id in fastq_ids {
        if any_job_active(&fastq_api.list_fastq_jobs(fastq_id)?) {
            log_running(fastq_id, "fastq_job");
            return Ok(true);
        }

        if unarchiving_job_in_flight(fastq_id, unarchiving_api)? {
            log_running(fastq_id, "unarchiving_job");
            return Ok(true);
        }

        if scope == ProbeScope::JobsOnly {
            continue;
        }

        let library_id = fastq_api.fetch_fastq(fastq_id, false)?.library.library_id;
        if library_in_ingestion_workflow(&library_id, workflow_api)? {
            log_running(fastq_id, "ingestion_workflow");
            return Ok(true);
        }
    }

    Ok(false)
}

pub fn unarchiving_job_in_flight(
    fastq_id: &str,
    unarchiving_api: &dyn UnarchivingApi,
) -> Result<bool, SyncError> {
    for status in UnarchivingJobStatus::ACTIVE {
        if !unarchiving_api.list_jobs(fastq_id, status)?.is_empty() {
            return Ok(true);
        }
    }
    Ok(false)
}

fn library_in_ingestion_workflow(
    library_id: &str,
    workflow_api: &dyn WorkflowApi,
) -> Result<bool, SyncError> {
    for status in ACTIVE_WORKFLOW_STATUSES {
        for workflow_name in INGESTION_WORKFLOW_NAMES {
            for run in workflow_api.list_workflow_runs(workflow_name, status)? {
                if workflow_api
                    .fetch_workflow_run(&run.orcabus_id)?
                    .references_library(library_id)
                {
                    return Ok(true);
                }
            }
        }
    }
    Ok(false)
}

fn log_running(fastq_id: &str, reason: &'static str) {
    info!(
        component = COMPONENT,
        event = "jobs_running_detected",
        fastq_id = %fastq_id,
        reason
    );
}
