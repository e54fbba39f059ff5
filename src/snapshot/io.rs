//! Snapshot files on disk.
//!
//! Each scanned root gets one JSON document whose file name is derived from
//! the root's absolute path alone: the leading separator is dropped, the
//! remaining separators become `_` and `.json` is appended.
//!
//! ```no_run
//! use photoscan::snapshot::snapshot_file_name;
//! use std::path::Path;
//!
//! assert_eq!(snapshot_file_name(Path::new("/home/me/Pictures")), "home_me_Pictures.json");
//! ```

use std::fs;
use std::path::{is_separator, Path, PathBuf};

use super::model::DirEntry;
use super::SnapshotError;
use crate::scanner::hasher::is_valid_digest;

/// Suffix appended to every snapshot file name.
pub const SNAPSHOT_SUFFIX: &str = ".json";

/// Snapshot file name for an absolute root path.
///
/// Pure function of the path. The filesystem root maps to `_.json`.
#[must_use]
pub fn snapshot_file_name(root: &Path) -> String {
    let raw = root.to_string_lossy();
    let trimmed = raw.trim_start_matches(is_separator);
    let stem: String = trimmed
        .chars()
        .map(|c| if is_separator(c) { '_' } else { c })
        .collect();

    if stem.is_empty() {
        format!("_{SNAPSHOT_SUFFIX}")
    } else {
        format!("{stem}{SNAPSHOT_SUFFIX}")
    }
}

/// Location of the snapshot for `root` inside `snapshot_dir`.
#[must_use]
pub fn snapshot_path(snapshot_dir: &Path, root: &Path) -> PathBuf {
    snapshot_dir.join(snapshot_file_name(root))
}

impl DirEntry {
    /// Serialize to indented JSON terminated by a newline.
    ///
    /// # Errors
    ///
    /// Fails if a path is not valid UTF-8.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        let mut json = serde_json::to_string_pretty(self).map_err(SnapshotError::Serialize)?;
        json.push('\n');
        Ok(json)
    }

    /// Parse a snapshot document and check its digests.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Parse`] for malformed JSON and
    /// [`SnapshotError::InvalidDigest`] for a file whose hash is not a digest.
    pub fn from_json(json: &str, source: &Path) -> Result<Self, SnapshotError> {
        let tree: DirEntry = serde_json::from_str(json).map_err(|e| SnapshotError::Parse {
            path: source.to_path_buf(),
            source: e,
        })?;

        if let Some(bad) = tree.files_depth_first().find(|f| !is_valid_digest(&f.hash)) {
            return Err(SnapshotError::InvalidDigest {
                snapshot: source.to_path_buf(),
                file: bad.name.clone(),
            });
        }

        if !tree.is_sorted() {
            log::warn!(
                "Snapshot {} is not sorted by name; duplicate order may differ",
                source.display()
            );
        }

        Ok(tree)
    }

    /// Write the snapshot to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|e| SnapshotError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        log::debug!(
            "Saved snapshot of {} ({} files) to {}",
            self.name.display(),
            self.file_count(),
            path.display()
        );
        Ok(())
    }

    /// Load a snapshot from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Io`] if the file cannot be read, or any error
    /// from [`DirEntry::from_json`].
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let content = fs::read_to_string(path).map_err(|e| SnapshotError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let tree = Self::from_json(&content, path)?;
        log::debug!(
            "Loaded snapshot of {} ({} files) from {}",
            tree.name.display(),
            tree.file_count(),
            path.display()
        );
        Ok(tree)
    }
}
