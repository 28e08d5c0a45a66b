//! Partition URLs and on-disk partition names.

use crate::planner::ByteRange;
use std::path::{Path, PathBuf};

/// Partitions are plain-text intermediates whatever the parent's extension.
pub const PARTITION_EXTENSION: &str = "txt";

/// Parent URL (one trailing `/` dropped) with the range as query string.
pub fn partition_url(base_url: &str, range: &ByteRange) -> String {
    let base = base_url.strip_suffix('/').unwrap_or(base_url);
    format!("{}?{}", base, range.query_string())
}

/// File name up to its first `.`: `WATCHLIST_367_20200716.txt.bz2` → `WATCHLIST_367_20200716`.
pub fn partition_stem(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or(file_name)
}

/// `<stem>_<index>.txt` in the same directory as the whole file.
pub fn partition_path(whole_file_path: &Path, partition_index: u32) -> PathBuf {
    let name = whole_file_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file = format!(
        "{}_{}.{}",
        partition_stem(&name),
        partition_index,
        PARTITION_EXTENSION
    );
    match whole_file_path.parent() {
        Some(dir) => dir.join(file),
        None => PathBuf::from(file),
    }
}

/// Index of a partition file named `<stem>_<n>.txt`, or `None` if the name
/// belongs to another file or is not a partition.
pub fn parse_partition_index(stem: &str, file_name: &str) -> Option<u32> {
    let base = file_name.strip_suffix(PARTITION_EXTENSION)?.strip_suffix('.')?;
    let (prefix, index) = base.rsplit_once('_')?;
    if prefix != stem {
        return None;
    }
    index.parse().ok()
}
