//! What partitions of a file are on disk, and which expected ones are not.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::model::{DownloadRecord, Manifest, PartitionRecord};
use crate::url_model;

/// A partition file found next to its parent's destination path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentPartition {
    pub index: u32,
    pub path: PathBuf,
}

/// Partition files of `record` present on disk, ascending by index.
/// Only `<stem>_<n>.txt` names count; an unreadable directory holds none.
pub fn present_partitions(record: &DownloadRecord) -> Vec<PresentPartition> {
    let dir = match record.file_path.parent() {
        Some(d) => d,
        None => return Vec::new(),
    };
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), "no partitions listed: {}", e);
            return Vec::new();
        }
    };
    let stem = url_model::partition_stem(&record.file_name);
    let mut found: Vec<PresentPartition> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| {
            let name = entry.file_name();
            let index = url_model::parse_partition_index(stem, &name.to_string_lossy())?;
            Some(PresentPartition {
                index,
                path: entry.path(),
            })
        })
        .collect();
    found.sort_by_key(|p| p.index);
    found
}

/// Expected partitions of `record` in `manifest` whose path is not among `present`,
/// ascending by index.
pub fn missing_partitions(
    manifest: &Manifest,
    record: &DownloadRecord,
    present: &[PresentPartition],
) -> Vec<PartitionRecord> {
    let on_disk: HashSet<&Path> = present.iter().map(|p| p.path.as_path()).collect();
    let mut missing: Vec<PartitionRecord> = manifest
        .partitions_of(&record.file_name)
        .filter(|p| !on_disk.contains(p.file_path.as_path()))
        .cloned()
        .collect();
    missing.sort_by_key(|p| p.partition_index);
    missing
}
