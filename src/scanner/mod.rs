//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Recursive, per-directory traversal of a media tree
//! - Filtering by the media-file allowlist
//! - Parallel MD5 hashing of every qualifying file in a directory
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and snapshot assembly
//! - [`hasher`]: MD5 file hashing (streaming)
//! - [`media`]: Extension allowlist
//!
//! # Example
//!
//! ```no_run
//! use photoscan::scanner::{ScanConfig, Scanner};
//! use std::path::Path;
//!
//! let scanner = Scanner::new(ScanConfig::default());
//! let tree = scanner.scan(Path::new("/home/me/Pictures")).unwrap();
//! println!("{} media files", tree.file_count());
//! ```

pub mod hasher;
pub mod media;
pub mod walker;

use std::io;
use std::path::{Path, PathBuf};

use crate::snapshot::DirEntry;

// Re-export main types
pub use hasher::{FileDigest, Hasher};
pub use media::{MediaFilter, MEDIA_EXTENSIONS};
pub use walker::Scanner;

/// Configuration for a tree scan.
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Number of hashing threads. `0` uses one thread per CPU.
    pub io_threads: usize,
    /// Extensions that qualify a file for hashing.
    pub media: MediaFilter,
}

impl ScanConfig {
    /// Create a configuration.
    ///
    /// # Arguments
    ///
    /// * `io_threads` - Hashing thread count (`0` = automatic)
    /// * `media` - Extension allowlist
    #[must_use]
    pub fn new(io_threads: usize, media: MediaFilter) -> Self {
        Self { io_threads, media }
    }
}

/// Scan `root` with the default configuration.
///
/// # Errors
///
/// See [`Scanner::scan`].
pub fn scan(root: &Path) -> Result<DirEntry, ScanError> {
    Scanner::new(ScanConfig::default()).scan(root)
}

/// Errors that can occur during directory scanning.
///
/// Any of these aborts the directory being scanned and all of its ancestors.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while listing a directory.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A file could not be hashed.
    #[error(transparent)]
    Hash(#[from] HashError),

    /// The hashing thread pool could not be created.
    #[error("Failed to start hashing threads: {0}")]
    ThreadPool(String),

    /// Shutdown was requested while scanning.
    #[error("Scan interrupted")]
    Interrupted,
}

impl ScanError {
    /// Classify an I/O error raised while accessing `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl HashError {
    /// Classify an I/O error raised while reading `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Path of the file that failed.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) | Self::Io { path: p, .. } => p,
        }
    }
}
