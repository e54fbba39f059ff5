//! photoscan - duplicate photo and video finder
//!
//! Hashes the media files of a directory tree into a JSON snapshot, merges
//! one or more snapshots into duplicate groups by content digest, and walks
//! each group interactively so redundant copies can be removed.
//!
//! - [`scanner`]: parallel MD5 hashing of allowlisted media files
//! - [`snapshot`]: the serialisable directory tree and its files on disk
//! - [`duplicates`]: digest index and duplicate groups
//! - [`resolve`]: the keep/delete loop over each group
//! - [`actions`]: trash/permanent deletion and terminal previews

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod resolve;
pub mod scanner;
pub mod signal;
pub mod snapshot;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::actions::{DeleteMethod, PlainPreviewer, TerminalPreviewer};
use crate::cli::{Cli, Commands, DedupArgs, ScanArgs, SnapshotArgs};
use crate::config::Config;
use crate::duplicates::HashIndex;
use crate::error::ExitCode;
use crate::output::JsonOutput;
use crate::progress::{Progress, ProgressCallback};
use crate::resolve::prompt::SelectChooser;
use crate::resolve::{DeletePolicy, Previewer, ResolveConfig, Resolver};
use crate::scanner::Scanner;
use crate::signal::ShutdownHandler;
use crate::snapshot::{snapshot_path, DirEntry};

/// Run the parsed command line and return the process exit code.
///
/// # Errors
///
/// Returns an error for bad input, unreadable files, snapshot I/O failures
/// and a failing selection prompt. Per-file problems during resolution are
/// reported, not returned.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet, cli.no_color);
    if cli.no_color {
        yansi::disable();
    }

    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    let shutdown = signal::install_handler()?;

    match cli.command {
        Commands::Scan(args) => {
            apply_overrides(&mut config, &args.snapshot);
            run_scan(&args, &config, &shutdown, cli.quiet)
        }
        Commands::Dedup(args) => {
            apply_overrides(&mut config, &args.snapshot);
            if args.no_preview {
                config.preview = false;
            }
            if args.permanent {
                config.permanent = true;
            }
            run_dedup(&args, &config, &shutdown, cli.quiet)
        }
    }
}

fn apply_overrides(config: &mut Config, args: &SnapshotArgs) {
    if let Some(ref dir) = args.snapshot_dir {
        config.snapshot_dir.clone_from(dir);
    }
    if let Some(n) = args.io_threads {
        config.io_threads = n;
    }
}

fn absolute_root(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("resolving {}", path.display()))
}

fn scan_and_save(
    root: &Path,
    config: &Config,
    shutdown: &ShutdownHandler,
    quiet: bool,
) -> Result<(DirEntry, PathBuf)> {
    let progress: Arc<dyn ProgressCallback> = Arc::new(Progress::new(quiet));
    let scanner = Scanner::new(config.scan_config())
        .with_shutdown_flag(shutdown.get_flag())
        .with_progress_callback(progress);

    let snapshot = scanner
        .scan(root)
        .with_context(|| format!("scanning {}", root.display()))?;

    fs::create_dir_all(&config.snapshot_dir).with_context(|| {
        format!(
            "creating snapshot directory {}",
            config.snapshot_dir.display()
        )
    })?;
    let path = snapshot_path(&config.snapshot_dir, root);
    snapshot.save(&path)?;

    Ok((snapshot, path))
}

/// Load the snapshot of `root`, scanning and saving it when missing or when
/// `rescan` is set.
///
/// # Errors
///
/// Scan failures and unreadable or corrupt snapshot files.
pub fn load_or_scan(
    root: &Path,
    config: &Config,
    rescan: bool,
    shutdown: &ShutdownHandler,
    quiet: bool,
) -> Result<DirEntry> {
    let path = snapshot_path(&config.snapshot_dir, root);

    if !rescan {
        match DirEntry::load(&path) {
            Ok(snapshot) => {
                log::info!("Loaded snapshot {}", path.display());
                return Ok(snapshot);
            }
            Err(snapshot::SnapshotError::Io { ref source, .. })
                if source.kind() == io::ErrorKind::NotFound =>
            {
                log::info!("No snapshot for {}, scanning", root.display());
            }
            Err(e) => return Err(e).context("loading snapshot"),
        }
    }

    let (snapshot, path) = scan_and_save(root, config, shutdown, quiet)?;
    log::info!("Wrote snapshot {}", path.display());
    Ok(snapshot)
}

fn run_scan(
    args: &ScanArgs,
    config: &Config,
    shutdown: &ShutdownHandler,
    quiet: bool,
) -> Result<ExitCode> {
    let root = absolute_root(&args.path)?;
    let (snapshot, path) = scan_and_save(&root, config, shutdown, quiet)?;

    log::info!(
        "{} media files in {} directories",
        snapshot.file_count(),
        snapshot.dir_count()
    );
    println!("{}", path.display());

    Ok(ExitCode::Success)
}

fn run_dedup(
    args: &DedupArgs,
    config: &Config,
    shutdown: &ShutdownHandler,
    quiet: bool,
) -> Result<ExitCode> {
    let mut index = HashIndex::new();
    for dir in &args.paths {
        let root = absolute_root(dir)?;
        let snapshot = load_or_scan(&root, config, args.rescan, shutdown, quiet)?;
        index.add_snapshot(&snapshot);
    }

    let stats = index.stats();
    let groups = index.into_duplicate_groups();

    if args.json {
        let output = JsonOutput::new(&groups, args.paths.len(), &stats, ExitCode::Success);
        output.write_to(&mut io::stdout().lock(), true)?;
        return Ok(ExitCode::Success);
    }

    if groups.is_empty() {
        log::info!("No duplicates among {} files", stats.files_indexed);
        return Ok(ExitCode::Success);
    }

    log::info!(
        "{} duplicate groups, {} redundant copies",
        stats.duplicate_groups,
        stats.redundant_files
    );

    let policy = if args.delete {
        DeletePolicy::Delete(DeleteMethod::from_permanent(config.permanent))
    } else {
        DeletePolicy::ReportOnly
    };

    let summary = if config.preview {
        resolve_groups(TerminalPreviewer::new(config.preview_size), policy, &groups, shutdown)?
    } else {
        resolve_groups(PlainPreviewer, policy, &groups, shutdown)?
    };

    if !quiet {
        for path in &summary.would_delete {
            println!("would delete: {}", path.display());
        }
        println!("{}", summary.summary());
    }

    if summary.cancelled {
        Ok(ExitCode::Interrupted)
    } else {
        Ok(ExitCode::Success)
    }
}

fn resolve_groups<P: Previewer>(
    previewer: P,
    policy: DeletePolicy,
    groups: &[duplicates::DuplicateGroup],
    shutdown: &ShutdownHandler,
) -> Result<resolve::ResolveSummary> {
    let mut resolver = Resolver::new(ResolveConfig::new(policy), previewer, SelectChooser::new())
        .with_shutdown_flag(shutdown.get_flag());
    Ok(resolver.resolve_all(groups)?)
}
