use fastq_sync_core::contract::{decode_request, FastqIdListResponse, FastqSetIdListRequest};
use fastq_sync_core::error::SyncError;
use fastq_sync_core::model::flatten_fastq_set_ids;
use serde_json::Value;
use tracing::debug;

use crate::adapters::fastq::FastqApi;

pub fn handle_fastq_set_id_list_event(
    event: Value,
    fastq_api: &dyn FastqApi,
) -> Result<FastqIdListResponse, SyncError> {
    let request: FastqSetIdListRequest = decode_request(event)?;
    let sets = request
        .fastq_set_id_list
        .iter()
        .map(|fastq_set_id| fastq_api.fetch_fastq_set(fastq_set_id))
        .collect::<Result<Vec<_>, _>>()?;

    let fastq_id_list = flatten_fastq_set_ids(&sets);
    debug!(
        component = "get_fastq_id_list_from_fastq_set_id_list",
        event = "fastq_sets_flattened",
        fastq_set_count = sets.len(),
        fastq_count = fastq_id_list.len()
    );

    Ok(FastqIdListResponse { fastq_id_list })
}
