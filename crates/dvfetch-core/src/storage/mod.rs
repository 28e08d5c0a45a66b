//! Disk I/O and file lifecycle.
//!
//! Every file this crate produces (transfers, reassembled files, day
//! manifests) is written to a `.part` sibling first and renamed into place
//! once complete, so a present final path always holds a finished write.

mod writer;

pub use writer::{StorageWriter, WRITE_BUF_SIZE};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `a.txt` → `a.txt.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Creates the parent directory of `path` and its ancestors. An existing
/// directory, including one created concurrently by another worker, is fine.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display())),
        _ => Ok(()),
    }
}

/// Replaces `path` with `data` in one rename.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let mut writer = StorageWriter::create(path)?;
    let written = match writer.write_all(data) {
        Ok(()) => writer.finalize(),
        Err(e) => {
            drop(writer);
            Err(e)
        }
    };
    written.map(|_| ()).map_err(|e| {
        discard_temp(path);
        e
    })
}

/// Removes a leftover temp file for `final_path`, if any.
pub fn discard_temp(final_path: &Path) {
    let tp = temp_path(final_path);
    if let Err(e) = std::fs::remove_file(&tp) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::debug!(path = %tp.display(), "could not remove temp file: {}", e);
        }
    }
}
