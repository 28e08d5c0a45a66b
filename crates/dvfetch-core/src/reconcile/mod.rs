//! Reconciliation: compares what a pass was meant to fetch against what is on
//! disk, reassembles every partitioned file that is complete, and returns the
//! manifest of exactly the work still outstanding.
//!
//! Integrity failures never escape as errors. Each one becomes an entry of
//! the returned manifest:
//!
//! - whole files that fail size or checksum are retried whole;
//! - partitioned files keep only their missing partitions queued;
//! - partitioned files that reassemble but still fail get their full
//!   partition set queued again.

mod assemble;
mod scan;

pub use assemble::reassemble;
pub use scan::{missing_partitions, present_partitions, PresentPartition};

use crate::integrity;
use crate::manifest::build_partitions_for_file;
use crate::model::{DownloadRecord, Manifest};
use crate::planner::PartitionSize;

/// One concurrent-mode pass. `partition_size` regenerates a file's full
/// partition set when its reassembled content fails verification.
pub fn reconcile(manifest: &Manifest, partition_size: PartitionSize) -> Manifest {
    let (partitioned, whole): (Vec<&DownloadRecord>, Vec<&DownloadRecord>) = manifest
        .files_reference_data
        .iter()
        .partition(|r| r.is_partitioned());

    let failed_whole_files = integrity::partition_failures(whole.iter().copied());

    let mut retry = Manifest {
        files_reference_data: failed_whole_files.clone(),
        whole_files_to_download: failed_whole_files,
        partitions_to_download: Vec::new(),
    };

    let mut ready: Vec<(&DownloadRecord, Vec<PresentPartition>)> = Vec::new();
    for record in partitioned {
        let present = present_partitions(record);
        if present.is_empty() && integrity::verify(record) {
            // reassembled on an earlier pass
            continue;
        }
        let missing = missing_partitions(manifest, record, &present);
        if missing.is_empty() {
            ready.push((record, present));
        } else {
            tracing::debug!(file = %record.file_name, missing = missing.len(), "partitions missing");
            retry.files_reference_data.push(record.clone());
            retry.partitions_to_download.extend(missing);
        }
    }

    for (record, present) in ready {
        let assembled = match reassemble(record, &present) {
            Ok(_) => integrity::verify(record),
            Err(e) => {
                tracing::warn!(file = %record.file_name, "reassembly failed: {:#}", e);
                false
            }
        };
        if !assembled {
            tracing::debug!(file = %record.file_name, "reassembled file failed verification");
            retry.files_reference_data.push(record.clone());
            retry
                .partitions_to_download
                .extend(build_partitions_for_file(record, partition_size));
        }
    }

    tracing::info!(
        checked = manifest.files_reference_data.len(),
        failed = retry.files_reference_data.len(),
        whole = retry.whole_files_to_download.len(),
        partitions = retry.partitions_to_download.len(),
        "reconciled"
    );
    retry
}

/// Synchronous-mode pass: the records that still fail verification.
pub fn reconcile_sync(records: &[DownloadRecord]) -> Vec<DownloadRecord> {
    let failed = integrity::partition_failures(records);
    tracing::info!(checked = records.len(), failed = failed.len(), "reconciled");
    failed
}
