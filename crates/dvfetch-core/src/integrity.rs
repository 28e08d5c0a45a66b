//! Size and checksum verification of downloaded files.

use crate::checksum;
use crate::model::DownloadRecord;

/// True iff the file at `record.file_path` has the expected size and MD5.
/// A missing or unreadable file fails.
pub fn verify(record: &DownloadRecord) -> bool {
    let size = match std::fs::metadata(&record.file_path) {
        Ok(m) => m.len(),
        Err(_) => {
            tracing::debug!(file = %record.file_name, "integrity: file not present");
            return false;
        }
    };
    if size != record.size {
        tracing::debug!(
            file = %record.file_name,
            expected = record.size,
            actual = size,
            "integrity: size mismatch"
        );
        return false;
    }
    match checksum::md5_path(&record.file_path) {
        Ok(digest) if digest.eq_ignore_ascii_case(&record.md5sum) => true,
        Ok(digest) => {
            tracing::debug!(file = %record.file_name, expected = %record.md5sum, actual = %digest, "integrity: checksum mismatch");
            false
        }
        Err(e) => {
            tracing::warn!(file = %record.file_name, "integrity: could not hash: {:#}", e);
            false
        }
    }
}

/// The records that fail [`verify`], in input order.
pub fn partition_failures<'a, I>(records: I) -> Vec<DownloadRecord>
where
    I: IntoIterator<Item = &'a DownloadRecord>,
{
    records.into_iter().filter(|r| !verify(r)).cloned().collect()
}
