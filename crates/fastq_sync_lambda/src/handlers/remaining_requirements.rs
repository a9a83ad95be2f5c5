use fastq_sync_core::contract::{
    decode_request, required_id, FastqRequirementsRequest, FastqRequirementsResponse,
};
use fastq_sync_core::error::SyncError;
use fastq_sync_core::readiness::ReadinessChecker;
use serde_json::Value;
use tracing::info;

use super::parse_request_requirements;
use crate::adapters::fastq::FastqApi;

const COMPONENT: &str = "get_fastq_and_remaining_requirements";

pub fn handle_remaining_requirements_event(
    event: Value,
    checker: &ReadinessChecker,
    fastq_api: &dyn FastqApi,
) -> Result<FastqRequirementsResponse, SyncError> {
    let request: FastqRequirementsRequest = decode_request(event)?;
    let fastq_id = required_id(request.fastq_id, "fastqId")?;
    let requirements =
        parse_request_requirements(&request.requirements, checker.mode(), COMPONENT)?;

    let record = fastq_api.fetch_fastq(&fastq_id, true)?;
    let split = checker.evaluate(&record, &requirements, request.is_unarchiving_allowed)?;

    info!(
        component = COMPONENT,
        event = "requirements_evaluated",
        fastq_id = %fastq_id,
        satisfied = ?split.satisfied,
        unsatisfied = ?split.unsatisfied
    );

    Ok(FastqRequirementsResponse {
        fastq_obj: record,
        satisfied_requirements: split.satisfied,
        unsatisfied_requirements: split.unsatisfied,
    })
}
