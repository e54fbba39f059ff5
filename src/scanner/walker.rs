//! Recursive tree scanner.
//!
//! # Overview
//!
//! [`Scanner`] walks one directory level at a time. For each level it lists
//! the entries, skips hidden names (leading `.`), hashes every qualifying
//! media file in parallel on a rayon pool, then recurses into subdirectories
//! one after another. Files and subdirectories are sorted by name before the
//! level's [`DirEntry`] is returned, so the snapshot never depends on which
//! hash finished first.
//!
//! # Errors
//!
//! The first failure at any level (unreadable directory, file that cannot be
//! hashed, shutdown request) aborts that level and every ancestor. Hashing
//! tasks already running for sibling files are joined before the error is
//! returned and their results are dropped.
//!
//! # Example
//!
//! ```no_run
//! use photoscan::scanner::{ScanConfig, Scanner};
//! use std::path::Path;
//!
//! let config = ScanConfig { io_threads: 4, ..Default::default() };
//! let tree = Scanner::new(config).scan(Path::new("/mnt/camera")).unwrap();
//! for file in tree.files_depth_first() {
//!     println!("{} {}", file.hash, file.name.display());
//! }
//! ```

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use super::hasher::{FileDigest, Hasher};
use super::{ScanConfig, ScanError};
use crate::progress::ProgressCallback;
use crate::snapshot::{DirEntry, FileEntry};

/// Recursive media tree scanner.
pub struct Scanner {
    config: ScanConfig,
    digest: Arc<dyn FileDigest>,
    shutdown_flag: Option<Arc<AtomicBool>>,
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for Scanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("config", &self.config)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish_non_exhaustive()
    }
}

impl Scanner {
    /// Create a scanner that hashes with [`Hasher`].
    #[must_use]
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            digest: Arc::new(Hasher::new()),
            shutdown_flag: None,
            progress_callback: None,
        }
    }

    /// Replace the digest implementation.
    #[must_use]
    pub fn with_digest(mut self, digest: Arc<dyn FileDigest>) -> Self {
        self.digest = digest;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Scanner configuration.
    #[must_use]
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Scan `root` and build its snapshot.
    ///
    /// Entry names are `root` joined with the relative path, so an absolute
    /// `root` yields absolute names throughout.
    ///
    /// # Errors
    ///
    /// - [`ScanError::NotFound`] / [`ScanError::NotADirectory`] for a bad root
    /// - [`ScanError::Hash`] if any qualifying file cannot be read
    /// - [`ScanError::Interrupted`] if the shutdown flag is raised
    pub fn scan(&self, root: &Path) -> Result<DirEntry, ScanError> {
        let metadata = fs::metadata(root).map_err(|e| ScanError::from_io(root, e))?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.io_threads)
            .thread_name(|i| format!("photoscan-hash-{i}"))
            .build()
            .map_err(|e| ScanError::ThreadPool(e.to_string()))?;

        log::info!(
            "Scanning {} with {} hashing threads",
            root.display(),
            pool.current_num_threads()
        );

        if let Some(ref callback) = self.progress_callback {
            callback.on_scan_start(root);
        }

        let result = self.scan_dir(&pool, root);

        if let Some(ref callback) = self.progress_callback {
            let files = result.as_ref().map_or(0, DirEntry::file_count);
            callback.on_scan_end(files);
        }

        match &result {
            Ok(tree) => log::info!(
                "Scanned {}: {} files in {} directories",
                root.display(),
                tree.file_count(),
                tree.dir_count() + 1
            ),
            Err(e) => log::debug!("Scan of {} failed: {}", root.display(), e),
        }

        result
    }

    /// Scan a single directory level and recurse.
    fn scan_dir(&self, pool: &rayon::ThreadPool, dir: &Path) -> Result<DirEntry, ScanError> {
        if self.is_shutdown_requested() {
            return Err(ScanError::Interrupted);
        }

        if let Some(ref callback) = self.progress_callback {
            callback.on_directory(dir);
        }

        let (pending, subdirs) = self.list_dir(dir)?;
        log::debug!(
            "{}: {} media files, {} subdirectories",
            dir.display(),
            pending.len(),
            subdirs.len()
        );

        let files = self.hash_files(pool, pending)?;

        let mut dirs = Vec::with_capacity(subdirs.len());
        for subdir in subdirs {
            let child = self.scan_dir(pool, &subdir)?;
            if child.is_empty() {
                log::trace!("Dropping empty directory: {}", subdir.display());
            } else {
                dirs.push(child);
            }
        }

        Ok(DirEntry::from_parts(dir, files, dirs))
    }

    /// Split a directory's entries into media files and subdirectories.
    ///
    /// Hidden entries, symlinks, special files and non-media files are
    /// skipped.
    fn list_dir(&self, dir: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>), ScanError> {
        let read_dir = fs::read_dir(dir).map_err(|e| ScanError::from_io(dir, e))?;

        let mut files = Vec::new();
        let mut subdirs = Vec::new();

        for entry in read_dir {
            let entry = entry.map_err(|e| ScanError::from_io(dir, e))?;
            let name = entry.file_name();
            let path = dir.join(&name);

            if is_hidden(&name) {
                log::trace!("Skipping hidden entry: {}", path.display());
                continue;
            }

            // file_type() does not follow symlinks
            let file_type = entry
                .file_type()
                .map_err(|e| ScanError::from_io(&path, e))?;

            if file_type.is_dir() {
                subdirs.push(path);
            } else if file_type.is_file() && self.config.media.matches(&path) {
                if name.to_str().is_none() {
                    log::warn!(
                        "File name is not valid UTF-8, snapshot will store it lossily: {}",
                        path.display()
                    );
                }
                files.push(path);
            } else {
                log::trace!("Skipping: {}", path.display());
            }
        }

        Ok((files, subdirs))
    }

    /// Hash one directory's files in parallel.
    ///
    /// `collect` into `Result` stops handing out work at the first error and
    /// waits for tasks already running, so no handle outlives this call.
    fn hash_files(
        &self,
        pool: &rayon::ThreadPool,
        paths: Vec<PathBuf>,
    ) -> Result<Vec<FileEntry>, ScanError> {
        if paths.is_empty() {
            return Ok(Vec::new());
        }

        pool.install(|| {
            paths
                .into_par_iter()
                .map(|path| {
                    if self.is_shutdown_requested() {
                        return Err(ScanError::Interrupted);
                    }

                    let hash = self.digest.digest_file(&path).inspect_err(|e| {
                        log::warn!("Failed to hash {}: {}", path.display(), e);
                    })?;

                    if let Some(ref callback) = self.progress_callback {
                        callback.on_file_hashed(&path);
                    }

                    Ok(FileEntry::new(path, hash))
                })
                .collect::<Result<Vec<_>, ScanError>>()
        })
    }
}

/// Names starting with `.` are hidden.
fn is_hidden(name: &OsStr) -> bool {
    name.as_encoded_bytes().starts_with(b".")
}
