//! Tree snapshot data structures.
//!
//! A snapshot mirrors the scanned directory tree: every [`DirEntry`] holds its
//! qualifying files and its non-empty subdirectories, each list sorted by
//! name. Snapshots are immutable once a scan returns.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::{Path, PathBuf};

/// One scanned file and its content digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileEntry {
    /// Path of the file, rooted at the scanned directory's path
    #[serde(serialize_with = "lossy_path")]
    pub name: PathBuf,
    /// Hex content digest
    pub hash: String,
}

impl FileEntry {
    /// Create a new file entry.
    #[must_use]
    pub fn new(name: impl Into<PathBuf>, hash: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hash: hash.into(),
        }
    }
}

/// One directory node of a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DirEntry {
    /// Path of the directory
    #[serde(serialize_with = "lossy_path")]
    pub name: PathBuf,
    /// Non-empty subdirectories, sorted by name
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "nullable_vec"
    )]
    pub dirs: Vec<DirEntry>,
    /// Qualifying files, sorted by name
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "nullable_vec"
    )]
    pub files: Vec<FileEntry>,
}

impl DirEntry {
    /// Create an empty directory node.
    #[must_use]
    pub fn new(name: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dirs: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Build a node from unordered parts, sorting both lists by name.
    ///
    /// Files and directories are sorted independently. The result does not
    /// depend on the order the parts were produced in.
    #[must_use]
    pub fn from_parts(
        name: impl Into<PathBuf>,
        mut files: Vec<FileEntry>,
        mut dirs: Vec<DirEntry>,
    ) -> Self {
        files.sort_by(|a, b| a.name.cmp(&b.name));
        dirs.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            name: name.into(),
            dirs,
            files,
        }
    }

    /// Directory path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.name
    }

    /// True when the node has no files and no subdirectories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.dirs.is_empty()
    }

    /// Number of files in this node and all descendants.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len() + self.dirs.iter().map(DirEntry::file_count).sum::<usize>()
    }

    /// Number of directories below this node (excluding itself).
    #[must_use]
    pub fn dir_count(&self) -> usize {
        self.dirs.len() + self.dirs.iter().map(DirEntry::dir_count).sum::<usize>()
    }

    /// Depth-first iterator over every file: a node's own files first, then
    /// each subdirectory in stored order.
    pub fn files_depth_first(&self) -> Box<dyn Iterator<Item = &FileEntry> + '_> {
        Box::new(
            self.files
                .iter()
                .chain(self.dirs.iter().flat_map(DirEntry::files_depth_first)),
        )
    }

    /// Whether every level of the tree is sorted by name without duplicates.
    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.files.windows(2).all(|w| w[0].name < w[1].name)
            && self.dirs.windows(2).all(|w| w[0].name < w[1].name)
            && self.dirs.iter().all(DirEntry::is_sorted)
    }
}

/// Treat `null` the same as a missing or empty list.
fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Names that are not valid UTF-8 are written with replacement characters.
fn lossy_path<S>(path: &Path, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&path.to_string_lossy())
}
