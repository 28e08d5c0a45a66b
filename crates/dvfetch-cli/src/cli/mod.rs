//! CLI for dvfetch.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use dvfetch_core::checksum::HashAlgorithm;
use dvfetch_core::config;
use std::path::PathBuf;

use commands::{run_checksum, run_get};

/// Top-level CLI for dvfetch.
#[derive(Debug, Parser)]
#[command(name = "dvfetch")]
#[command(about = "dvfetch: discover, download and verify files from the DataVault API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Discover every file below an endpoint, download it and verify it.
    Get(GetArgs),

    /// Compute the checksum of a local file.
    Checksum {
        /// Path to the file.
        path: PathBuf,
        /// md5 (as published by the listing) or sha256.
        #[arg(long, default_value = "md5", value_name = "ALGORITHM")]
        algorithm: HashAlgorithm,
    },
}

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Listing API URL to start discovery from.
    pub endpoint: String,

    /// Existing directory the data tree is written under.
    pub root_directory: PathBuf,

    #[arg(short, long, env = "ICE_API_USERNAME")]
    pub username: Option<String>,

    #[arg(short, long, env = "ICE_API_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Download files concurrently, splitting large ones into partitions (default).
    #[arg(long, conflicts_with = "synchronous")]
    pub concurrent: bool,

    /// Download one file at a time, never partitioned.
    #[arg(long)]
    pub synchronous: bool,

    /// Only download files of this source id.
    #[arg(short, long, value_name = "ID")]
    pub source: Option<u32>,

    /// Partition size in MiB for concurrent downloads.
    #[arg(long, value_name = "MIB")]
    pub partition_size: Option<f64>,

    /// Worker threads for concurrent downloads (default min(32, cpus + 4)).
    #[arg(long, value_name = "N")]
    pub num_workers: Option<usize>,

    /// Download passes before giving up on files that still fail verification.
    #[arg(long, value_name = "N")]
    pub max_download_attempts: Option<u32>,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Get(args) => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                run_get(args, &cfg).await?
            }
            CliCommand::Checksum { path, algorithm } => run_checksum(&path, algorithm).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
