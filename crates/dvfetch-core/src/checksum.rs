//! File checksums computed on demand, after a transfer has finished.
//!
//! MD5 is what the listing publishes for every file; SHA-256 is offered by the
//! CLI for ad-hoc checks.

use anyhow::{Context, Result};
use md5::Md5;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// 128 blocks of 64 bytes (the block size of both supported digests).
const BUF_SIZE: usize = 64 * 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    #[default]
    Md5,
    Sha256,
}

impl HashAlgorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha256 => "sha256",
        }
    }
}

impl std::str::FromStr for HashAlgorithm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(HashAlgorithm::Md5),
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            other => anyhow::bail!("unsupported hash algorithm: {}", other),
        }
    }
}

/// Lowercase hex digest of a file. Reads in fixed chunks so memory stays bounded.
pub fn file_digest(path: &Path, algorithm: HashAlgorithm) -> Result<String> {
    match algorithm {
        HashAlgorithm::Md5 => digest_path::<Md5>(path),
        HashAlgorithm::Sha256 => digest_path::<Sha256>(path),
    }
}

pub fn md5_path(path: &Path) -> Result<String> {
    digest_path::<Md5>(path)
}

fn digest_path<D: Digest>(path: &Path) -> Result<String> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = D::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
