//! The three-list download manifest.

use super::{DownloadRecord, PartitionRecord, WorkItem};

/// A unit of download work plus the reference data to check it against.
///
/// Never mutated in place by reconciliation: each pass produces a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    /// Source of truth for size and checksum of every file in this unit.
    pub files_reference_data: Vec<DownloadRecord>,
    /// Reference records downloaded in one request.
    pub whole_files_to_download: Vec<DownloadRecord>,
    /// Partitions of reference records that are downloaded in slices.
    pub partitions_to_download: Vec<PartitionRecord>,
}

impl Manifest {
    /// Nothing left to check or fetch.
    pub fn is_empty(&self) -> bool {
        self.files_reference_data.is_empty()
    }

    /// Expected partitions of one parent file, in manifest order.
    pub fn partitions_of<'a>(
        &'a self,
        file_name: &'a str,
    ) -> impl Iterator<Item = &'a PartitionRecord> + 'a {
        self.partitions_to_download
            .iter()
            .filter(move |p| p.parent_file_name == file_name)
    }

    /// Whole files first, then partitions; this is the queue handed to workers.
    pub fn work_items(&self) -> Vec<WorkItem> {
        self.whole_files_to_download
            .iter()
            .cloned()
            .map(WorkItem::Whole)
            .chain(self.partitions_to_download.iter().cloned().map(WorkItem::Partition))
            .collect()
    }

    /// File names of the reference records, for operator-facing reports.
    pub fn file_names(&self) -> Vec<String> {
        self.files_reference_data
            .iter()
            .map(|r| r.file_name.clone())
            .collect()
    }
}
