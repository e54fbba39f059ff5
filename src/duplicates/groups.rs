//! Duplicate groups.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Paths that share one content digest.
///
/// Only groups with two or more paths leave the indexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// Shared content digest
    pub hash: String,
    /// Paths in first-seen order
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(hash: impl Into<String>, paths: Vec<PathBuf>) -> Self {
        Self {
            hash: hash.into(),
            paths,
        }
    }

    /// Number of paths in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Check if this group holds actual duplicates (2+ paths).
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.paths.len() > 1
    }

    /// Number of redundant copies (all but one).
    #[must_use]
    pub fn redundant_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }

    /// Whether `path` belongs to this group.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| p == path)
    }
}
