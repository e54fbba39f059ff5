//! Output formatters for duplicate groups.
//!
//! # Example
//!
//! ```no_run
//! use photoscan::duplicates::HashIndex;
//! use photoscan::error::ExitCode;
//! use photoscan::output::json::JsonOutput;
//! use photoscan::snapshot::DirEntry;
//! use std::path::Path;
//!
//! let snapshot = DirEntry::load(Path::new("home_me_Pictures.json")).unwrap();
//! let mut index = HashIndex::new();
//! index.add_snapshot(&snapshot);
//! let stats = index.stats();
//! let groups = index.into_duplicate_groups();
//!
//! let output = JsonOutput::new(&groups, 1, &stats, ExitCode::Success);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod json;

pub use json::JsonOutput;
