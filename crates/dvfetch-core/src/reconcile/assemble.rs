//! Reassembly of partition files into the parent file.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use super::scan::PresentPartition;
use crate::model::DownloadRecord;
use crate::storage::{self, StorageWriter, WRITE_BUF_SIZE};

/// Concatenates `partitions` in the given order into `record.file_path`, then
/// deletes them. With no partitions this does nothing and returns the
/// (possibly nonexistent) destination path.
///
/// On error the destination and the partitions are left as they were. A
/// partition that cannot be removed afterwards is only logged.
pub fn reassemble(record: &DownloadRecord, partitions: &[PresentPartition]) -> Result<PathBuf> {
    if partitions.is_empty() {
        return Ok(record.file_path.clone());
    }
    let mut out = StorageWriter::create(&record.file_path)?;
    let finalized = match copy_partitions(&mut out, partitions) {
        Ok(()) => out.finalize(),
        Err(e) => {
            drop(out);
            Err(e)
        }
    };
    let written = finalized.map_err(|e| {
        storage::discard_temp(&record.file_path);
        e
    })?;
    for part in partitions {
        if let Err(e) = std::fs::remove_file(&part.path) {
            tracing::warn!(partition = %part.path.display(), "could not remove partition: {}", e);
        }
    }
    tracing::debug!(
        file = %record.file_name,
        partitions = partitions.len(),
        bytes = written,
        "reassembled"
    );
    Ok(record.file_path.clone())
}

fn copy_partitions(out: &mut StorageWriter, partitions: &[PresentPartition]) -> Result<()> {
    let mut buf = vec![0u8; WRITE_BUF_SIZE];
    for part in partitions {
        let mut f = File::open(&part.path)
            .with_context(|| format!("open partition {}", part.path.display()))?;
        loop {
            let n = f
                .read(&mut buf)
                .with_context(|| format!("read partition {}", part.path.display()))?;
            if n == 0 {
                break;
            }
            out.write_all(&buf[..n])?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::record;
    use crate::model::Partitioning;

    #[test]
    fn concatenates_in_order_and_removes_partitions() {
        let dir = tempfile::tempdir().unwrap();
        let r = record("A_1_20200722.txt.bz2", dir.path(), 9, Partitioning::Partitioned);
        let parts: Vec<PresentPartition> = ["abc", "def", "ghi"]
            .iter()
            .zip(1u32..)
            .map(|(body, index)| {
                let path = dir.path().join(format!("A_1_20200722_{}.txt", index));
                std::fs::write(&path, body).unwrap();
                PresentPartition { index, path }
            })
            .collect();

        let out = reassemble(&r, &parts).unwrap();
        assert_eq!(out, r.file_path);
        assert_eq!(std::fs::read(&out).unwrap(), b"abcdefghi");
        let left: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(left.len(), 1);
    }

    #[test]
    fn nothing_to_reassemble_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let r = record("A_1_20200722.txt.bz2", dir.path(), 9, Partitioning::Partitioned);
        assert_eq!(reassemble(&r, &[]).unwrap(), r.file_path);
        assert!(!r.file_path.exists());
    }

    #[test]
    fn vanished_partition_is_an_error_and_keeps_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let r = record("A_1_20200722.txt.bz2", dir.path(), 9, Partitioning::Partitioned);
        let first = dir.path().join("A_1_20200722_1.txt");
        std::fs::write(&first, b"abc").unwrap();
        let parts = vec![
            PresentPartition { index: 1, path: first.clone() },
            PresentPartition { index: 2, path: dir.path().join("A_1_20200722_2.txt") },
        ];
        assert!(reassemble(&r, &parts).is_err());
        assert!(first.exists());
        assert!(!r.file_path.exists());
        assert!(!storage::temp_path(&r.file_path).exists());
    }

    #[test]
    fn partition_that_cannot_be_removed_does_not_fail_reassembly() {
        let dir = tempfile::tempdir().unwrap();
        let r = record("A_1_20200722.txt.bz2", dir.path(), 6, Partitioning::Partitioned);
        let first = dir.path().join("A_1_20200722_1.txt");
        std::fs::write(&first, b"abc").unwrap();
        // listed twice: the second removal finds nothing to delete
        let parts = vec![
            PresentPartition { index: 1, path: first.clone() },
            PresentPartition { index: 2, path: first.clone() },
        ];
        assert_eq!(reassemble(&r, &parts).unwrap(), r.file_path);
        assert_eq!(std::fs::read(&r.file_path).unwrap(), b"abcabc");
        assert!(!first.exists());
    }
}
