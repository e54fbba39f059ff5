//! JSON listing of duplicate groups for `dedup --json`.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "duplicates": [
//!     {
//!       "hash": "9e107d9d372bb6826bd81d3542a419d6",
//!       "size": 1024,
//!       "files": ["/photos/a.jpg", "/backup/a.jpg"]
//!     }
//!   ],
//!   "summary": {
//!     "snapshots": 2,
//!     "total_files": 100,
//!     "duplicate_groups": 5,
//!     "duplicate_files": 10,
//!     "reclaimable_space": 51200,
//!     "exit_code": 0,
//!     "exit_code_name": "PS000"
//!   }
//! }
//! ```
//!
//! `size` is read from the first path still on disk and is `null` when none is.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::duplicates::{DuplicateGroup, IndexStats};
use crate::error::ExitCode;

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// MD5 digest as 32 lowercase hex characters
    pub hash: String,
    /// File size in bytes, if any copy still exists
    pub size: Option<u64>,
    /// Paths in index order
    pub files: Vec<String>,
}

impl JsonDuplicateGroup {
    /// Convert a [`DuplicateGroup`].
    #[must_use]
    pub fn from_duplicate_group(group: &DuplicateGroup) -> Self {
        Self {
            hash: group.hash.clone(),
            size: group
                .paths
                .iter()
                .find_map(|p| fs::metadata(p).ok().map(|m| m.len())),
            files: group.paths.iter().map(|p| path_string(p)).collect(),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Number of snapshots indexed
    pub snapshots: usize,
    /// Files across all snapshots
    pub total_files: usize,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Copies beyond the first in every group
    pub duplicate_files: usize,
    /// Bytes freed by keeping one copy per group (sizes known at output time)
    pub reclaimable_space: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "PS000")
    pub exit_code_name: String,
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Duplicate groups
    pub duplicates: Vec<JsonDuplicateGroup>,
    /// Summary statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Build the output from the indexer's results.
    ///
    /// # Example
    ///
    /// ```
    /// use photoscan::duplicates::{DuplicateGroup, IndexStats};
    /// use photoscan::error::ExitCode;
    /// use photoscan::output::json::JsonOutput;
    /// use std::path::PathBuf;
    ///
    /// let groups = vec![DuplicateGroup::new(
    ///     "9e107d9d372bb6826bd81d3542a419d6",
    ///     vec![PathBuf::from("/a.jpg"), PathBuf::from("/b.jpg")],
    /// )];
    ///
    /// let output = JsonOutput::new(&groups, 1, &IndexStats::default(), ExitCode::Success);
    /// assert_eq!(output.duplicates.len(), 1);
    /// assert_eq!(output.summary.duplicate_files, 1);
    /// ```
    #[must_use]
    pub fn new(
        groups: &[DuplicateGroup],
        snapshots: usize,
        stats: &IndexStats,
        exit_code: ExitCode,
    ) -> Self {
        let duplicates: Vec<_> = groups
            .iter()
            .map(JsonDuplicateGroup::from_duplicate_group)
            .collect();

        let reclaimable_space = groups
            .iter()
            .zip(&duplicates)
            .map(|(g, j)| j.size.unwrap_or(0) * g.redundant_count() as u64)
            .sum();

        Self {
            summary: JsonSummary {
                snapshots,
                total_files: stats.files_indexed,
                duplicate_groups: groups.len(),
                duplicate_files: groups.iter().map(DuplicateGroup::redundant_count).sum(),
                reclaimable_space,
                exit_code: exit_code.as_i32(),
                exit_code_name: exit_code.code_prefix().to_string(),
            },
            duplicates,
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
