//! Sequential writer for temp files that become final files on rename.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::{ensure_parent_dir, temp_path};

/// 5 MiB write buffer, the same size reassembly reads partitions with.
pub const WRITE_BUF_SIZE: usize = 5 * 1024 * 1024;

/// Streams bytes into `<final>.part`. Dropping without [`finalize`](Self::finalize)
/// leaves the final path untouched.
pub struct StorageWriter {
    out: BufWriter<File>,
    temp_path: PathBuf,
    final_path: PathBuf,
    written: u64,
}

impl StorageWriter {
    /// Creates (or truncates) the temp file for `final_path`, creating parent
    /// directories as needed.
    pub fn create(final_path: &Path) -> Result<Self> {
        ensure_parent_dir(final_path)?;
        let tp = temp_path(final_path);
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tp)
            .with_context(|| format!("failed to create temp file: {}", tp.display()))?;
        Ok(StorageWriter {
            out: BufWriter::with_capacity(WRITE_BUF_SIZE, file),
            temp_path: tp,
            final_path: final_path.to_path_buf(),
            written: 0,
        })
    }

    pub fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.out
            .write_all(data)
            .with_context(|| format!("write failed: {}", self.temp_path.display()))?;
        self.written += data.len() as u64;
        Ok(())
    }

    /// Flushes, syncs and renames the temp file onto the final path.
    /// Returns the number of bytes written.
    pub fn finalize(self) -> Result<u64> {
        let StorageWriter {
            out,
            temp_path,
            final_path,
            written,
        } = self;
        let file = out
            .into_inner()
            .map_err(|e| e.into_error())
            .with_context(|| format!("flush failed: {}", temp_path.display()))?;
        file.sync_all().context("storage sync failed")?;
        drop(file);
        std::fs::rename(&temp_path, &final_path).with_context(|| {
            format!(
                "failed to rename {} to {}",
                temp_path.display(),
                final_path.display()
            )
        })?;
        Ok(written)
    }
}
