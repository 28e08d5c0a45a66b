//! Download manifest construction.
//!
//! Turns discovered files into download records (local path + partitioning),
//! expands partitioned files into partition records, and journals every file
//! into the per-day JSON manifest at the `day` level of the data tree.

mod journal;

pub use journal::{day_manifest_path, record_files, update_day_manifest, ManifestEntry};

use anyhow::Result;
use std::path::Path;

use crate::model::{DiscoveredFile, DownloadRecord, Manifest, PartitionRecord, Partitioning};
use crate::planner::{self, PartitionSize};
use crate::url_model;

/// Enriches a discovered file with its destination path and partitioning.
/// `partition_size` of `None` means synchronous mode.
pub fn build_download_record(
    file: &DiscoveredFile,
    data_root: &Path,
    partition_size: Option<PartitionSize>,
) -> Result<DownloadRecord> {
    let file_path = url_model::destination_path(data_root, &file.download_url, &file.file_name)?;
    let partitioning = match partition_size {
        None => Partitioning::NotApplicable,
        Some(p) if planner::is_partitioned(file.size, p) => Partitioning::Partitioned,
        Some(_) => Partitioning::Whole,
    };
    Ok(DownloadRecord {
        file_name: file.file_name.clone(),
        download_url: file.download_url.clone(),
        file_path,
        source_id: file.source_id,
        reference_date: file.reference_date,
        size: file.size,
        md5sum: file.md5sum.clone(),
        partitioning,
    })
}

/// One partition record per planned range, indexed from 1.
pub fn build_partitions_for_file(
    record: &DownloadRecord,
    partition_size: PartitionSize,
) -> Vec<PartitionRecord> {
    planner::plan_ranges(record.size, partition_size)
        .iter()
        .zip(1u32..)
        .map(|(range, index)| PartitionRecord {
            parent_file_name: record.file_name.clone(),
            download_url: url_model::partition_url(&record.download_url, range),
            file_path: url_model::partition_path(&record.file_path, index),
            partition_index: index,
        })
        .collect()
}

/// Builds the concurrent-mode manifest without touching the filesystem.
pub fn plan_manifest(
    files: &[DiscoveredFile],
    data_root: &Path,
    partition_size: PartitionSize,
) -> Result<Manifest> {
    let records = files
        .iter()
        .map(|f| build_download_record(f, data_root, Some(partition_size)))
        .collect::<Result<Vec<_>>>()?;

    let whole_files_to_download = records.iter().filter(|r| r.is_whole()).cloned().collect();
    let partitions_to_download = records
        .iter()
        .filter(|r| r.is_partitioned())
        .flat_map(|r| build_partitions_for_file(r, partition_size))
        .collect();

    Ok(Manifest {
        files_reference_data: records,
        whole_files_to_download,
        partitions_to_download,
    })
}

/// Concurrent-mode manifest, journaled into the per-day JSON manifests.
pub fn build_manifest(
    files: &[DiscoveredFile],
    data_root: &Path,
    partition_size: PartitionSize,
) -> Result<Manifest> {
    let manifest = plan_manifest(files, data_root, partition_size)?;
    record_files(&manifest.files_reference_data)?;
    tracing::info!(
        files = manifest.files_reference_data.len(),
        whole = manifest.whole_files_to_download.len(),
        partitions = manifest.partitions_to_download.len(),
        "built download manifest"
    );
    Ok(manifest)
}

/// Synchronous-mode records (no partitioning), journaled like [`build_manifest`].
pub fn build_sync_records(files: &[DiscoveredFile], data_root: &Path) -> Result<Vec<DownloadRecord>> {
    let records = files
        .iter()
        .map(|f| build_download_record(f, data_root, None))
        .collect::<Result<Vec<_>>>()?;
    record_files(&records)?;
    Ok(records)
}
