use fastq_sync_core::contract::{
    decode_request, FastqListRequirementsRequest, HasAllRequirementsResponse,
    MissingRequirementsResponse,
};
use fastq_sync_core::error::SyncError;
use fastq_sync_core::model::FastqRecord;
use fastq_sync_core::readiness::ReadinessChecker;
use fastq_sync_core::requirements::RequirementSet;
use serde_json::Value;
use tracing::info;

use super::parse_request_requirements;
use crate::adapters::fastq::FastqApi;

const COMPONENT: &str = "check_fastq_id_list_against_requirements";

struct ListEvaluation {
    request: FastqListRequirementsRequest,
    requirements: RequirementSet,
    records: Vec<FastqRecord>,
}

fn load_list_evaluation(
    event: Value,
    checker: &ReadinessChecker,
    fastq_api: &dyn FastqApi,
) -> Result<ListEvaluation, SyncError> {
    let request: FastqListRequirementsRequest = decode_request(event)?;
    let requirements =
        parse_request_requirements(&request.requirements, checker.mode(), COMPONENT)?;
    let records = request
        .fastq_id_list
        .iter()
        .map(|fastq_id| fastq_api.fetch_fastq(fastq_id, true))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ListEvaluation {
        request,
        requirements,
        records,
    })
}

/// True only when every listed fastq satisfies every requirement.
pub fn handle_check_fastq_id_list_event(
    event: Value,
    checker: &ReadinessChecker,
    fastq_api: &dyn FastqApi,
) -> Result<HasAllRequirementsResponse, SyncError> {
    let evaluation = load_list_evaluation(event, checker, fastq_api)?;
    let split = checker.evaluate_all(
        &evaluation.records,
        &evaluation.requirements,
        evaluation.request.is_unarchiving_allowed,
    )?;

    info!(
        component = COMPONENT,
        event = "requirements_evaluated",
        fastq_count = evaluation.records.len(),
        unsatisfied = ?split.unsatisfied
    );

    Ok(HasAllRequirementsResponse {
        has_all_requirements: split.is_fully_satisfied(),
    })
}

/// Like [`handle_check_fastq_id_list_event`], also naming the fastqs that fall
/// short when the list as a whole does.
pub fn handle_missing_requirements_event(
    event: Value,
    checker: &ReadinessChecker,
    fastq_api: &dyn FastqApi,
) -> Result<MissingRequirementsResponse, SyncError> {
    let evaluation = load_list_evaluation(event, checker, fastq_api)?;
    let is_unarchiving_allowed = evaluation.request.is_unarchiving_allowed;
    let split = checker.evaluate_all(
        &evaluation.records,
        &evaluation.requirements,
        is_unarchiving_allowed,
    )?;

    if split.is_fully_satisfied() {
        return Ok(MissingRequirementsResponse {
            has_all_requirements: true,
            fastq_ids_with_missing_requirements: Vec::new(),
        });
    }

    let missing = checker.records_missing_requirements(
        &evaluation.records,
        &evaluation.requirements,
        is_unarchiving_allowed,
    )?;

    info!(
        component = COMPONENT,
        event = "requirements_missing",
        unsatisfied = ?split.unsatisfied,
        fastq_ids = ?missing
    );

    Ok(MissingRequirementsResponse {
        has_all_requirements: false,
        fastq_ids_with_missing_requirements: missing,
    })
}
