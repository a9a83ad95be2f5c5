//! Routes a Lambda event to the handler this deployment serves.
//!
//! Every function ships the same binary; `FASTQ_SYNC_HANDLER` picks the entry
//! point.

use std::fmt;
use std::str::FromStr;

use fastq_sync_core::error::SyncError;
use fastq_sync_core::readiness::ReadinessChecker;
use serde::Serialize;
use serde_json::Value;

use crate::adapters::fastq::FastqApi;
use crate::adapters::unarchiving::UnarchivingApi;
use crate::adapters::workflow::WorkflowApi;
use crate::handlers::fastq_sets::handle_fastq_set_id_list_event;
use crate::handlers::launch_job::handle_launch_requirement_job_event;
use crate::handlers::remaining_requirements::handle_remaining_requirements_event;
use crate::handlers::requirements_check::{
    handle_check_fastq_id_list_event, handle_missing_requirements_event,
};
use crate::handlers::running_jobs::handle_running_jobs_event;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    GetFastqAndRemainingRequirements,
    CheckFastqIdListAgainstRequirements,
    FindFastqIdsWithMissingRequirements,
    LaunchRequirementJob,
    CheckRunningJobsForFastqIdList,
    GetFastqIdListFromFastqSetIdList,
}

impl HandlerKind {
    pub const ALL: [HandlerKind; 6] = [
        Self::GetFastqAndRemainingRequirements,
        Self::CheckFastqIdListAgainstRequirements,
        Self::FindFastqIdsWithMissingRequirements,
        Self::LaunchRequirementJob,
        Self::CheckRunningJobsForFastqIdList,
        Self::GetFastqIdListFromFastqSetIdList,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::GetFastqAndRemainingRequirements => "getFastqAndRemainingRequirements",
            Self::CheckFastqIdListAgainstRequirements => "checkFastqIdListAgainstRequirements",
            Self::FindFastqIdsWithMissingRequirements => "findFastqIdsWithMissingRequirements",
            Self::LaunchRequirementJob => "launchRequirementJob",
            Self::CheckRunningJobsForFastqIdList => "checkRunningJobsForFastqIdList",
            Self::GetFastqIdListFromFastqSetIdList => "getFastqIdListFromFastqSetIdList",
        }
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HandlerKind {
    type Err = SyncError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| SyncError::Configuration(format!("unknown handler '{value}'")))
    }
}

pub struct HandlerContext<'a> {
    pub checker: &'a ReadinessChecker,
    pub fastq: &'a dyn FastqApi,
    pub unarchiving: &'a dyn UnarchivingApi,
    pub workflow: &'a dyn WorkflowApi,
}

pub fn dispatch_event(
    kind: HandlerKind,
    event: Value,
    context: &HandlerContext<'_>,
) -> Result<Value, SyncError> {
    match kind {
        HandlerKind::GetFastqAndRemainingRequirements => to_value(
            handle_remaining_requirements_event(event, context.checker, context.fastq)?,
        ),
        HandlerKind::CheckFastqIdListAgainstRequirements => to_value(
            handle_check_fastq_id_list_event(event, context.checker, context.fastq)?,
        ),
        HandlerKind::FindFastqIdsWithMissingRequirements => to_value(
            handle_missing_requirements_event(event, context.checker, context.fastq)?,
        ),
        HandlerKind::LaunchRequirementJob => to_value(handle_launch_requirement_job_event(
            event,
            context.checker,
            context.fastq,
            context.unarchiving,
        )?),
        HandlerKind::CheckRunningJobsForFastqIdList => to_value(handle_running_jobs_event(
            event,
            context.fastq,
            context.unarchiving,
            context.workflow,
        )?),
        HandlerKind::GetFastqIdListFromFastqSetIdList => {
            to_value(handle_fastq_set_id_list_event(event, context.fastq)?)
        }
    }
}

fn to_value(response: impl Serialize) -> Result<Value, SyncError> {
    serde_json::to_value(response).map_err(|error| SyncError::Serialization(error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_names_round_trip() {
        for kind in HandlerKind::ALL {
            assert_eq!(kind.as_str().parse::<HandlerKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_handler_is_misconfiguration() {
        let error = "syncEverything"
            .parse::<HandlerKind>()
            .expect_err("unknown handler");
        assert_eq!(
            error,
            SyncError::Configuration("unknown handler 'syncEverything'".to_string())
        );
    }
}
