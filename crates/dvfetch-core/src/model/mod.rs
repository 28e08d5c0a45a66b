//! Records that flow between discovery, download and reconciliation.
//!
//! Every type here derives `PartialEq`, `Eq` and `Hash` over all of its fields:
//! two records are the same record iff every field matches. Reconciliation
//! relies on that for membership and set difference.

mod manifest;

pub use manifest::Manifest;

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// A file found on the remote listing, before any local enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiscoveredFile {
    pub file_name: String,
    pub download_url: String,
    pub source_id: u32,
    /// Logical day the data in the file belongs to.
    pub reference_date: NaiveDate,
    pub size: u64,
    pub md5sum: String,
}

/// How a file takes part in a concurrent download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Partitioning {
    /// Synchronous mode: no threshold applies.
    #[default]
    NotApplicable,
    /// Below the multi-part threshold; downloaded in one request.
    Whole,
    /// At or above the threshold; downloaded as partitions and reassembled.
    Partitioned,
}

/// A discovered file plus where it lands locally and how it is downloaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DownloadRecord {
    pub file_name: String,
    pub download_url: String,
    pub file_path: PathBuf,
    pub source_id: u32,
    pub reference_date: NaiveDate,
    pub size: u64,
    pub md5sum: String,
    pub partitioning: Partitioning,
}

impl DownloadRecord {
    pub fn is_partitioned(&self) -> bool {
        self.partitioning == Partitioning::Partitioned
    }

    pub fn is_whole(&self) -> bool {
        self.partitioning == Partitioning::Whole
    }
}

/// One byte-range slice of a partitioned file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartitionRecord {
    /// `file_name` of the owning [`DownloadRecord`].
    pub parent_file_name: String,
    /// Parent URL plus `?start=<s>&end=<e>`.
    pub download_url: String,
    /// `<parent stem>_<index>.txt`, next to the parent's final path.
    pub file_path: PathBuf,
    /// 1-based; the sole authority for reassembly order.
    pub partition_index: u32,
}

/// Anything the transport can fetch into a local path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WorkItem {
    Whole(DownloadRecord),
    Partition(PartitionRecord),
}

impl WorkItem {
    pub fn url(&self) -> &str {
        match self {
            WorkItem::Whole(r) => &r.download_url,
            WorkItem::Partition(p) => &p.download_url,
        }
    }

    pub fn dest(&self) -> &Path {
        match self {
            WorkItem::Whole(r) => &r.file_path,
            WorkItem::Partition(p) => &p.file_path,
        }
    }

    /// Name used in log lines and progress events.
    pub fn label(&self) -> String {
        match self {
            WorkItem::Whole(r) => r.file_name.clone(),
            WorkItem::Partition(p) => format!("{} [part {}]", p.parent_file_name, p.partition_index),
        }
    }
}

impl From<DownloadRecord> for WorkItem {
    fn from(r: DownloadRecord) -> Self {
        WorkItem::Whole(r)
    }
}

impl From<PartitionRecord> for WorkItem {
    fn from(p: PartitionRecord) -> Self {
        WorkItem::Partition(p)
    }
}
