//! `dvfetch get` – crawl, build the manifest, download until verified.

use anyhow::{Context, Result};
use dvfetch_core::config::{DownloadMode, DvfetchConfig};
use dvfetch_core::credentials::Credentials;
use dvfetch_core::crawler;
use dvfetch_core::downloader::TransferEvent;
use dvfetch_core::driver::{self, DriverOptions, DriverOutcome};
use dvfetch_core::manifest;
use dvfetch_core::planner::PartitionSize;
use dvfetch_core::transport::{CurlSessionFactory, SessionFactory};
use dvfetch_core::units;

use crate::cli::GetArgs;

const PROGRESS_CAPACITY: usize = 1024;

/// Settings of one `get` run: config file values with CLI overrides applied.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GetPlan {
    pub mode: DownloadMode,
    pub partition_size: PartitionSize,
    pub driver: DriverOptions,
}

impl GetPlan {
    pub(crate) fn resolve(args: &GetArgs, cfg: &DvfetchConfig) -> Result<Self> {
        let mode = if args.synchronous {
            DownloadMode::Synchronous
        } else if args.concurrent {
            DownloadMode::Concurrent
        } else {
            cfg.download_mode
        };
        let partition_size = match args.partition_size {
            Some(mib) if !(mib.is_finite() && mib > 0.0) => {
                anyhow::bail!("partition size must be a positive number of MiB, got {}", mib)
            }
            Some(mib) => PartitionSize::from_mib(mib),
            None => cfg.partition_size(),
        };
        if partition_size.bytes() == 0 {
            anyhow::bail!("partition size rounds to zero bytes");
        }
        let driver = DriverOptions {
            max_attempts: args.max_download_attempts.unwrap_or(cfg.max_download_attempts),
            workers: args
                .num_workers
                .filter(|&n| n > 0)
                .unwrap_or_else(|| cfg.pool_size()),
        };
        Ok(Self {
            mode,
            partition_size,
            driver,
        })
    }
}

pub async fn run_get(args: GetArgs, cfg: &DvfetchConfig) -> Result<()> {
    let credentials = Credentials::new(args.username.clone(), args.password.clone()).validate()?;
    if !args.root_directory.is_dir() {
        anyhow::bail!("root directory does not exist: {}", args.root_directory.display());
    }
    let plan = GetPlan::resolve(&args, cfg)?;
    let factory = CurlSessionFactory::new(credentials, cfg.transport());

    println!("Searching for files to download ...");
    let files = {
        let factory = factory.clone();
        let endpoint = args.endpoint.clone();
        let source = args.source;
        tokio::task::spawn_blocking(move || {
            let mut session = factory.create()?;
            crawler::crawl(&mut session, &endpoint, source)
        })
        .await
        .context("crawler task failed")??
    };
    println!("Discovered {} file(s) to download.", files.len());
    println!("Total download size: {}", units::total_download_size(&files));
    if files.is_empty() {
        return Ok(());
    }

    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel::<TransferEvent>(PROGRESS_CAPACITY);
    let printer = tokio::spawn(async move {
        let mut done = 0usize;
        while let Some(event) = progress_rx.recv().await {
            match event {
                TransferEvent::Finished { label, bytes } => {
                    done += 1;
                    println!("  [{}] {} ({})", done, label, units::human_readable_size(bytes));
                }
                TransferEvent::Failed { label, error } => println!("  failed: {}: {}", label, error),
            }
        }
    });

    println!("Initialising download ...");
    let root = args.root_directory.clone();
    let outcome = tokio::task::spawn_blocking(move || -> Result<DriverOutcome> {
        match plan.mode {
            DownloadMode::Synchronous => {
                let records = manifest::build_sync_records(&files, &root)?;
                driver::run_serial(&factory, records, &plan.driver, Some(&progress_tx))
            }
            DownloadMode::Concurrent => {
                let m = manifest::build_manifest(&files, &root, plan.partition_size)?;
                Ok(driver::run_concurrent(
                    &factory,
                    m,
                    plan.partition_size,
                    &plan.driver,
                    Some(&progress_tx),
                ))
            }
        }
    })
    .await
    .context("download task failed")??;
    if let Err(e) = printer.await {
        tracing::warn!("progress printer task failed: {}", e);
    }

    match outcome {
        DriverOutcome::Completed { attempts } => {
            println!("All files downloaded and verified ({} attempt(s)).", attempts);
        }
        DriverOutcome::Exhausted { attempts, failed } => {
            println!(
                "Giving up after {} attempt(s); {} file(s) could not be verified:",
                attempts,
                failed.len()
            );
            for name in failed {
                println!("  {}", name);
            }
        }
    }
    Ok(())
}
