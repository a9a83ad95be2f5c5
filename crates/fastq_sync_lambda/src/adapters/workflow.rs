use fastq_sync_core::error::SyncError;
use fastq_sync_core::workflow::{WorkflowRunDetail, WorkflowRunRef};

pub trait WorkflowApi {
    fn list_workflow_runs(
        &self,
        workflow_name: &str,
        status: &str,
    ) -> Result<Vec<WorkflowRunRef>, SyncError>;

    fn fetch_workflow_run(&self, workflow_run_id: &str) -> Result<WorkflowRunDetail, SyncError>;
}
