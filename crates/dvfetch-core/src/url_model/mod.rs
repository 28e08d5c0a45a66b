//! URL modeling and local path derivation.
//!
//! Maps remote download URLs onto the local data tree and names the
//! intermediate partition files.

mod partition;
mod path;

pub use partition::{
    parse_partition_index, partition_path, partition_stem, partition_url, PARTITION_EXTENSION,
};
pub use path::{day_directory, destination_path, LAYOUT_SEGMENTS, SKIPPED_SEGMENTS};
