//! Partition planning.
//!
//! Decides whether a file is large enough to be split, and computes the
//! byte ranges sent to the remote range query for each partition.

mod range;
mod size;

pub use range::{plan_ranges, ByteRange};
pub use size::PartitionSize;

/// Smallest file size that is split into partitions: two full partitions plus a
/// trailing one of at least 80% of a partition.
pub fn threshold(partition_size: PartitionSize) -> u64 {
    let p = partition_size.bytes();
    (p.saturating_mul(2) as f64 + 0.8 * p as f64).round() as u64
}

/// Whether a file of `file_size` bytes is downloaded as partitions.
pub fn is_partitioned(file_size: u64, partition_size: PartitionSize) -> bool {
    file_size >= threshold(partition_size)
}
