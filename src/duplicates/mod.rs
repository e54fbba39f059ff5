//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Merging one or more snapshots into a digest index
//! - Extracting duplicate groups (digests shared by 2+ paths)

pub mod groups;
pub mod index;

pub use groups::DuplicateGroup;
pub use index::{index_snapshots, HashIndex, IndexStats};
