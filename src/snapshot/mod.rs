//! Serializable tree snapshots.
//!
//! - [`model`]: the [`DirEntry`] / [`FileEntry`] tree
//! - [`io`]: snapshot naming and JSON persistence

pub mod io;
pub mod model;

use std::path::PathBuf;

pub use io::{snapshot_file_name, snapshot_path, SNAPSHOT_SUFFIX};
pub use model::{DirEntry, FileEntry};

/// Errors reading or writing snapshot files.
#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    /// The snapshot file could not be read or written.
    #[error("I/O error for snapshot {path}: {source}")]
    Io {
        /// Snapshot file path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The snapshot file is not valid JSON of the expected shape.
    #[error("Failed to parse snapshot {path}: {source}")]
    Parse {
        /// Snapshot file path
        path: PathBuf,
        /// The underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// The tree could not be serialized (e.g. a non UTF-8 path).
    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A file entry carries something that is not a content digest.
    #[error("Snapshot {snapshot} has an invalid digest for {file}")]
    InvalidDigest {
        /// Snapshot file path
        snapshot: PathBuf,
        /// Offending file entry
        file: PathBuf,
    },
}
