//! File actions module.
//!
//! This module provides functionality for:
//! - Moving resolved duplicates to the trash, or deleting them outright
//! - Previewing media files in the terminal
//!
//! ```no_run
//! use photoscan::actions::delete::{delete_file, DeleteMethod};
//! use std::path::Path;
//!
//! let result = delete_file(Path::new("/photos/copy.jpg"), DeleteMethod::Trash);
//! ```

pub mod delete;
pub mod preview;

pub use delete::{
    delete_file, delete_to_trash, permanent_delete, DeleteError, DeleteMethod, DeleteResult,
};
pub use preview::{
    render_preview, PlainPreviewer, PreviewContent, PreviewError, PreviewKind, TerminalPreviewer,
    DEFAULT_PREVIEW_WIDTH,
};
