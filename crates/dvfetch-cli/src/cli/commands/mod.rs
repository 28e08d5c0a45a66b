//! CLI command handlers, one per file.

mod checksum;
mod get;

pub use checksum::run_checksum;
pub(crate) use get::GetPlan;
pub use get::run_get;
