use crate::units::mib_to_bytes;

/// Target size of one partition, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartitionSize(u64);

impl PartitionSize {
    pub const DEFAULT_MIB: f64 = 5.0;

    /// From a size in MiB, rounded to the nearest byte.
    pub fn from_mib(mib: f64) -> Self {
        Self(mib_to_bytes(mib))
    }

    pub fn from_bytes(bytes: u64) -> Self {
        Self(bytes)
    }

    pub fn bytes(self) -> u64 {
        self.0
    }
}

impl Default for PartitionSize {
    fn default() -> Self {
        Self::from_mib(Self::DEFAULT_MIB)
    }
}
