use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::planner::PartitionSize;

/// Per-request transport behaviour (optional `[transport]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Retries per request after the first attempt.
    pub total_retries: u32,
    /// Backoff factor in seconds; the n-th consecutive retry waits `factor * 2^(n-1)`.
    pub backoff_factor: f64,
    /// HTTP statuses that are retried instead of failing the request.
    pub status_forcelist: Vec<u32>,
    pub connect_timeout_secs: u64,
    /// Abort a transfer slower than `low_speed_limit_bytes`/s for `low_speed_time_secs`.
    pub low_speed_limit_bytes: u32,
    pub low_speed_time_secs: u64,
    /// Hard cap on one request, including the body.
    pub timeout_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            total_retries: 5,
            backoff_factor: 0.1,
            status_forcelist: vec![401, 500, 502, 503, 504],
            connect_timeout_secs: 30,
            low_speed_limit_bytes: 1024,
            low_speed_time_secs: 60,
            timeout_secs: 3600,
        }
    }
}

/// How a download pass schedules its work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadMode {
    /// Pool of worker threads; large files are split into partitions.
    #[default]
    Concurrent,
    /// One file at a time on the calling thread; never partitioned.
    Synchronous,
}

/// Global configuration loaded from `~/.config/dvfetch/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DvfetchConfig {
    /// Partition length in MiB; files of about 2.8 partitions or more are split.
    pub partition_size_mib: f64,
    /// Download passes before giving up on the files that still fail.
    pub max_download_attempts: u32,
    /// Worker threads for concurrent passes (None = min(32, cpus + 4)).
    #[serde(default)]
    pub max_workers: Option<usize>,
    #[serde(default)]
    pub download_mode: DownloadMode,
    /// Optional transport settings; if missing, built-in defaults are used.
    #[serde(default)]
    pub transport: Option<TransportConfig>,
}

impl Default for DvfetchConfig {
    fn default() -> Self {
        Self {
            partition_size_mib: PartitionSize::DEFAULT_MIB,
            max_download_attempts: 5,
            max_workers: None,
            download_mode: DownloadMode::Concurrent,
            transport: None,
        }
    }
}

impl DvfetchConfig {
    pub fn partition_size(&self) -> PartitionSize {
        PartitionSize::from_mib(self.partition_size_mib)
    }

    pub fn transport(&self) -> TransportConfig {
        self.transport.clone().unwrap_or_default()
    }

    /// Worker count for concurrent passes.
    pub fn pool_size(&self) -> usize {
        self.max_workers
            .filter(|&n| n > 0)
            .unwrap_or_else(default_pool_size)
    }
}

/// min(32, available cores + 4).
pub fn default_pool_size() -> usize {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    (cpus + 4).min(32)
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("dvfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<DvfetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = DvfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: DvfetchConfig =
        toml::from_str(&data).with_context(|| format!("invalid config: {}", path.display()))?;
    Ok(cfg)
}
