//! `dvfetch checksum` – digest of a local file.

use anyhow::Result;
use dvfetch_core::checksum::{self, HashAlgorithm};
use std::path::Path;

/// Compute and print the digest of the given file, `sha256sum`-style.
pub async fn run_checksum(path: &Path, algorithm: HashAlgorithm) -> Result<()> {
    let digest = checksum::file_digest(path, algorithm)?;
    println!("{}  {}", digest, path.display());
    Ok(())
}
