//! Byte range type and range planning.

use super::PartitionSize;

/// Range sent to the remote range query: `start` and `end` as integer offsets.
///
/// The first range starts at 0; every later range starts one past the
/// previous range's `end`. The server reads both bounds inclusively, so the
/// ranges tile the file without gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Query string appended to the file's download URL.
    pub fn query_string(&self) -> String {
        format!("start={}&end={}", self.start, self.end)
    }
}

/// Plans partition ranges for a file of `file_size` bytes.
///
/// Upper bounds sit at every multiple of the partition size that fits in the
/// file, plus `file_size` itself when there is a remainder. Returns an empty
/// vec if either size is 0.
pub fn plan_ranges(file_size: u64, partition_size: PartitionSize) -> Vec<ByteRange> {
    let part = partition_size.bytes();
    if file_size == 0 || part == 0 {
        return Vec::new();
    }

    let full = file_size / part;
    let mut uppers: Vec<u64> = (1..=full).map(|i| part * i).collect();
    if file_size % part != 0 {
        uppers.push(file_size);
    }

    let mut out = Vec::with_capacity(uppers.len());
    let mut start = 0u64;
    for end in uppers {
        out.push(ByteRange { start, end });
        start = end.saturating_add(1);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIVE_MIB: u64 = 5 * 1024 * 1024;

    fn five_mib() -> PartitionSize {
        PartitionSize::from_mib(5.0)
    }

    #[test]
    fn file_with_remainder_gets_trailing_range() {
        let ranges = plan_ranges(61_663_360, five_mib());
        assert_eq!(ranges.len(), 12);
        assert_eq!(ranges[0], ByteRange { start: 0, end: FIVE_MIB });
        assert_eq!(ranges[1], ByteRange { start: FIVE_MIB + 1, end: 2 * FIVE_MIB });
        assert_eq!(
            ranges[11],
            ByteRange {
                start: 57_671_681,
                end: 61_663_360
            }
        );
    }

    #[test]
    fn exact_multiple_has_no_remainder_range() {
        let ranges = plan_ranges(57_671_680, five_mib());
        assert_eq!(ranges.len(), 11);
        assert_eq!(ranges[10].end, 57_671_680);
        assert_eq!(ranges[10].start, 10 * FIVE_MIB + 1);
    }

    #[test]
    fn ranges_tile_the_file() {
        for &(size, part) in &[(1u64, 1u64), (10, 3), (100, 7), (99, 33), (1000, 1000), (5, 10)] {
            let ranges = plan_ranges(size, PartitionSize::from_bytes(part));
            assert!(!ranges.is_empty());
            assert_eq!(ranges[0].start, 0);
            assert_eq!(ranges.last().unwrap().end, size);
            for w in ranges.windows(2) {
                assert_eq!(w[1].start, w[0].end + 1);
            }
            for r in &ranges[..ranges.len() - 1] {
                assert!(r.end - r.start <= part);
            }
        }
    }

    #[test]
    fn empty_inputs() {
        assert!(plan_ranges(0, five_mib()).is_empty());
        assert!(plan_ranges(100, PartitionSize::from_bytes(0)).is_empty());
    }

    #[test]
    fn query_string_format() {
        let r = ByteRange { start: 5_242_881, end: 10_485_760 };
        assert_eq!(r.query_string(), "start=5242881&end=10485760");
    }
}
