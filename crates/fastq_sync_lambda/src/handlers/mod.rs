use fastq_sync_core::error::SyncError;
use fastq_sync_core::requirements::{parse_requirements, EvaluationMode, RequirementSet};
use tracing::warn;

pub mod fastq_sets;
pub mod launch_job;
pub mod remaining_requirements;
pub mod requirements_check;
pub mod running_jobs;

/// Parse request requirement names, logging any that compatible mode drops.
pub(crate) fn parse_request_requirements(
    names: &[String],
    mode: EvaluationMode,
    component: &'static str,
) -> Result<RequirementSet, SyncError> {
    let parsed = parse_requirements(names, mode)?;
    if !parsed.ignored.is_empty() {
        warn!(
            component,
            event = "unknown_requirements_ignored",
            ignored = ?parsed.ignored
        );
    }
    Ok(parsed.requirements)
}
