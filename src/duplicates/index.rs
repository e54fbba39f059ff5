//! Digest index across snapshots.
//!
//! # Overview
//!
//! [`HashIndex`] walks snapshots depth first (a directory's own files, then
//! its subdirectories, each in stored order) and appends every file path to
//! the bucket for its digest. Snapshots are visited in the order they are
//! added, so bucket contents and bucket order both follow first sighting.
//!
//! A path that is already in its bucket is not added again. This happens
//! when the same tree (or a tree and one of its subtrees) is indexed twice,
//! and would otherwise present one file as a duplicate of itself.
//!
//! # Example
//!
//! ```
//! use photoscan::duplicates::index_snapshots;
//! use photoscan::snapshot::{DirEntry, FileEntry};
//!
//! let tree = DirEntry::from_parts(
//!     "/p",
//!     vec![
//!         FileEntry::new("/p/a.jpg", "h1"),
//!         FileEntry::new("/p/b.jpg", "h2"),
//!         FileEntry::new("/p/c.jpg", "h1"),
//!     ],
//!     vec![],
//! );
//!
//! let groups = index_snapshots(&[tree]);
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].hash, "h1");
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use super::groups::DuplicateGroup;
use crate::snapshot::DirEntry;

/// Digest → paths mapping in first-seen order.
#[derive(Debug, Default, Clone)]
pub struct HashIndex {
    positions: HashMap<String, usize>,
    buckets: Vec<DuplicateGroup>,
    files_indexed: usize,
    repeated_paths: usize,
}

/// Counters describing an index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// File entries visited
    pub files_indexed: usize,
    /// Distinct digests
    pub unique_hashes: usize,
    /// Digests shared by 2+ paths
    pub duplicate_groups: usize,
    /// Paths beyond the first in every duplicate group
    pub redundant_files: usize,
    /// Entries skipped because their path was already indexed
    pub repeated_paths: usize,
}

impl HashIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every file of `snapshot` to the index.
    pub fn add_snapshot(&mut self, snapshot: &DirEntry) {
        log::debug!("Indexing snapshot of {}", snapshot.name.display());
        for file in snapshot.files_depth_first() {
            self.insert(&file.hash, file.name.clone());
        }
    }

    /// Add one path under `hash`.
    pub fn insert(&mut self, hash: &str, path: PathBuf) {
        self.files_indexed += 1;

        match self.positions.get(hash) {
            Some(&pos) => {
                let bucket = &mut self.buckets[pos];
                if bucket.contains(&path) {
                    log::debug!("Ignoring repeated path {}", path.display());
                    self.repeated_paths += 1;
                } else {
                    bucket.paths.push(path);
                }
            }
            None => {
                self.positions.insert(hash.to_string(), self.buckets.len());
                self.buckets.push(DuplicateGroup::new(hash, vec![path]));
            }
        }
    }

    /// Paths recorded for `hash`, including single-path buckets.
    #[must_use]
    pub fn get(&self, hash: &str) -> Option<&[PathBuf]> {
        self.positions
            .get(hash)
            .map(|&pos| self.buckets[pos].paths.as_slice())
    }

    /// Number of distinct digests seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// True when nothing was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Summary counters.
    #[must_use]
    pub fn stats(&self) -> IndexStats {
        let (groups, redundant) = self
            .buckets
            .iter()
            .filter(|g| g.has_duplicates())
            .fold((0, 0), |(n, r), g| (n + 1, r + g.redundant_count()));

        IndexStats {
            files_indexed: self.files_indexed,
            unique_hashes: self.buckets.len(),
            duplicate_groups: groups,
            redundant_files: redundant,
            repeated_paths: self.repeated_paths,
        }
    }

    /// Consume the index, keeping only groups with two or more paths.
    #[must_use]
    pub fn into_duplicate_groups(self) -> Vec<DuplicateGroup> {
        self.buckets
            .into_iter()
            .filter(DuplicateGroup::has_duplicates)
            .collect()
    }
}

/// Index `snapshots` in the order given and return the duplicate groups.
#[must_use]
pub fn index_snapshots(snapshots: &[DirEntry]) -> Vec<DuplicateGroup> {
    let mut index = HashIndex::new();
    for snapshot in snapshots {
        index.add_snapshot(snapshot);
    }

    let stats = index.stats();
    log::info!(
        "Indexed {} files: {} duplicate groups, {} redundant copies",
        stats.files_indexed,
        stats.duplicate_groups,
        stats.redundant_files
    );

    index.into_duplicate_groups()
}
