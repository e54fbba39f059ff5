//! Command-line interface definitions for photoscan.
//!
//! Global options (verbosity, colour, error format, config file) apply to
//! both subcommands.
//!
//! # Example
//!
//! ```bash
//! # Hash every photo and video under ~/Pictures into a snapshot file
//! photoscan scan ~/Pictures
//!
//! # Walk duplicates across two trees, moving chosen copies to the trash
//! photoscan dedup ~/Pictures /mnt/backup/Pictures --delete
//!
//! # List duplicates as JSON without prompting
//! photoscan dedup ~/Pictures --json
//!
//! # Verbose mode for debugging
//! photoscan -v scan ~/Pictures
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Duplicate photo and video finder.
///
/// photoscan hashes media files into per-directory snapshot files, then walks
/// the duplicates found across one or more snapshots and lets you pick which
/// copies to remove.
#[derive(Debug, Parser)]
#[command(name = "photoscan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Configuration file (default: platform config dir/config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Hash a directory tree and write its snapshot file
    #[command(alias = "s")]
    Scan(ScanArgs),
    /// Find and resolve duplicates across one or more directories
    #[command(alias = "d")]
    Dedup(DedupArgs),
}

/// Options shared by both subcommands.
#[derive(Debug, Args, Clone, Default)]
pub struct SnapshotArgs {
    /// Directory holding snapshot files
    #[arg(long, value_name = "DIR")]
    pub snapshot_dir: Option<PathBuf>,

    /// Number of hashing threads (0 = one per CPU)
    #[arg(long, value_name = "N")]
    pub io_threads: Option<usize>,
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory to scan
    #[arg(value_name = "DIR")]
    pub path: PathBuf,

    #[command(flatten)]
    pub snapshot: SnapshotArgs,
}

/// Arguments for the dedup subcommand.
#[derive(Debug, Args)]
pub struct DedupArgs {
    /// Directories whose snapshots are searched for duplicates
    #[arg(value_name = "DIR", required = true, num_args = 1..)]
    pub paths: Vec<PathBuf>,

    /// Actually remove chosen files (otherwise they are only reported)
    #[arg(long)]
    pub delete: bool,

    /// Delete permanently instead of moving to the trash
    ///
    /// Warning: Files cannot be recovered after permanent deletion.
    #[arg(long, requires = "delete")]
    pub permanent: bool,

    /// Scan again even if a snapshot file exists
    #[arg(long)]
    pub rescan: bool,

    /// Print paths instead of drawing thumbnails
    #[arg(long)]
    pub no_preview: bool,

    /// Print duplicate groups as JSON and exit without prompting
    #[arg(long, conflicts_with_all = ["delete", "permanent"])]
    pub json: bool,

    #[command(flatten)]
    pub snapshot: SnapshotArgs,
}
