use super::app_config::LogLevel;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "oxicord-cache",
    version,
    about = "Inspect and maintain the oxicord image cache",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH", global = true)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Image cache directory.
    #[arg(long, value_name = "PATH", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Disk budget in bytes.
    #[arg(long, value_name = "BYTES", global = true)]
    pub max_cache_size: Option<u64>,

    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Cache maintenance operations.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the disk cache size and budget.
    Size,
    /// Purge the cache if it is over budget.
    Check,
    /// Delete every cached image.
    Purge,
    /// Load an image through the cache.
    Fetch {
        /// Image URL.
        url: String,

        /// Cache identifier. Defaults to a hash of the URL.
        #[arg(long)]
        id: Option<String>,

        /// Clip the image to a circle.
        #[arg(long)]
        circle: bool,

        /// Save a PNG copy of the result.
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}
