//! Retry driver: download pass, reconcile, repeat on what is left.
//!
//! Each attempt is a full pass over the outstanding work. The loop ends when
//! reconciliation finds nothing outstanding, or after `max_attempts` passes.

use anyhow::{Context, Result};

use crate::config;
use crate::downloader::{run_concurrent_pass, run_serial_pass, ProgressSender};
use crate::model::{DownloadRecord, Manifest, WorkItem};
use crate::planner::PartitionSize;
use crate::reconcile::{reconcile, reconcile_sync};
use crate::transport::SessionFactory;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverOutcome {
    /// Every file is present and verified.
    Completed { attempts: u32 },
    /// Attempts ran out; `failed` names the files still not verified.
    Exhausted { attempts: u32, failed: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverOptions {
    pub max_attempts: u32,
    /// Worker threads for concurrent passes.
    pub workers: usize,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            workers: config::default_pool_size(),
        }
    }
}

/// Synchronous mode: one session, one file at a time.
pub fn run_serial<F: SessionFactory>(
    factory: &F,
    records: Vec<DownloadRecord>,
    opts: &DriverOptions,
    progress: Option<&ProgressSender>,
) -> Result<DriverOutcome> {
    if records.is_empty() {
        return Ok(DriverOutcome::Completed { attempts: 0 });
    }
    let mut session = factory.create().context("open download session")?;
    let max_attempts = opts.max_attempts.max(1);
    let mut pending = records;
    let mut attempt = 1u32;
    loop {
        tracing::info!(attempt, files = pending.len(), "synchronous download pass");
        let items: Vec<WorkItem> = pending.iter().cloned().map(WorkItem::Whole).collect();
        run_serial_pass(&mut session, &items, progress);

        let failed = reconcile_sync(&pending);
        if failed.is_empty() {
            return Ok(DriverOutcome::Completed { attempts: attempt });
        }
        if attempt >= max_attempts {
            return Ok(exhausted(attempt, failed.iter().map(|r| r.file_name.clone()).collect()));
        }
        pending = failed;
        attempt += 1;
    }
}

/// Concurrent mode: worker pool per pass, reconciliation between passes.
pub fn run_concurrent<F: SessionFactory>(
    factory: &F,
    manifest: Manifest,
    partition_size: PartitionSize,
    opts: &DriverOptions,
    progress: Option<&ProgressSender>,
) -> DriverOutcome {
    if manifest.is_empty() {
        return DriverOutcome::Completed { attempts: 0 };
    }
    let max_attempts = opts.max_attempts.max(1);
    let mut current = manifest;
    let mut attempt = 1u32;
    loop {
        tracing::info!(
            attempt,
            files = current.files_reference_data.len(),
            whole = current.whole_files_to_download.len(),
            partitions = current.partitions_to_download.len(),
            "concurrent download pass"
        );
        run_concurrent_pass(factory, current.work_items(), opts.workers, progress);

        let retry = reconcile(&current, partition_size);
        if retry.is_empty() {
            return DriverOutcome::Completed { attempts: attempt };
        }
        if attempt >= max_attempts {
            return exhausted(attempt, retry.file_names());
        }
        current = retry;
        attempt += 1;
    }
}

fn exhausted(attempts: u32, failed: Vec<String>) -> DriverOutcome {
    for name in &failed {
        tracing::warn!(file = %name, attempts, "giving up");
    }
    DriverOutcome::Exhausted { attempts, failed }
}
