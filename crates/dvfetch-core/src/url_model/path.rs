//! Whole-file destination paths.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Leading path segments that carry no layout information
/// (the empty segment before the first `/`, the API version, and `data`).
pub const SKIPPED_SEGMENTS: usize = 3;

/// Segments kept as the local layout: year/month/day/source/category.
pub const LAYOUT_SEGMENTS: usize = 5;

/// Destination of a whole file:
/// `<data_root>/<YYYY>/<MM>/<DD>/<source>/<category>/<file_name>`.
///
/// Pure in its inputs, so a restarted process finds the same paths again.
pub fn destination_path(data_root: &Path, download_url: &str, file_name: &str) -> Result<PathBuf> {
    let parsed =
        url::Url::parse(download_url).with_context(|| format!("invalid download URL: {}", download_url))?;
    let mut dir = data_root.to_path_buf();
    for segment in parsed.path().split('/').skip(SKIPPED_SEGMENTS).take(LAYOUT_SEGMENTS) {
        dir.push(segment);
    }
    Ok(dir.join(file_name))
}

/// The `day` level of the tree for a whole-file path (three levels up from the file).
pub fn day_directory(file_path: &Path) -> Option<&Path> {
    file_path.parent()?.parent()?.parent()
}
