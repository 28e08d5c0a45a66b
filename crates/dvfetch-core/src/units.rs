//! Byte-size conversions and human-readable totals.

use crate::model::DiscoveredFile;

const MIB: f64 = 1024.0 * 1024.0;

/// IEC multiples, smallest first.
const UNITS: [(&str, u64); 4] = [
    ("KiB", 1 << 10),
    ("MiB", 1 << 20),
    ("GiB", 1 << 30),
    ("TiB", 1 << 40),
];

/// Converts a size in MiB to bytes, rounded to the nearest byte.
pub fn mib_to_bytes(mib: f64) -> u64 {
    (mib * MIB).round().max(0.0) as u64
}

/// Formats a byte count with the largest IEC unit it reaches, one decimal.
/// Below 1 KiB the raw count is printed with a `B` suffix and no space.
pub fn human_readable_size(byte_size: u64) -> String {
    match UNITS.iter().rev().find(|(_, m)| byte_size >= *m) {
        Some((suffix, divisor)) => format!("{:.1} {}", byte_size as f64 / *divisor as f64, suffix),
        None => format!("{}B", byte_size),
    }
}

/// Sum of all discovered file sizes, human readable.
pub fn total_download_size(files: &[DiscoveredFile]) -> String {
    human_readable_size(files.iter().map(|f| f.size).sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn mib_conversion() {
        assert_eq!(mib_to_bytes(5.0), 5_242_880);
        assert_eq!(mib_to_bytes(0.5), 524_288);
        assert_eq!(mib_to_bytes(0.0), 0);
    }

    #[test]
    fn human_readable_sizes() {
        assert_eq!(human_readable_size(0), "0B");
        assert_eq!(human_readable_size(1023), "1023B");
        assert_eq!(human_readable_size(1024), "1.0 KiB");
        assert_eq!(human_readable_size(2_097_404), "2.0 MiB");
        assert_eq!(human_readable_size(61_663_360), "58.8 MiB");
        assert_eq!(human_readable_size(3 * (1 << 30)), "3.0 GiB");
        assert_eq!(human_readable_size(1 << 40), "1.0 TiB");
    }

    #[test]
    fn total_size_of_discovered_files() {
        let file = |size| DiscoveredFile {
            file_name: "X_1_20200101.txt.bz2".into(),
            download_url: "https://x/y".into(),
            source_id: 1,
            reference_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            size,
            md5sum: String::new(),
        };
        assert_eq!(total_download_size(&[]), "0B");
        assert_eq!(total_download_size(&[file(1024), file(1024)]), "2.0 KiB");
    }
}
