//! Media-file allowlist.
//!
//! Only files whose extension is on this list are hashed. Matching is
//! case-insensitive and looks at the final extension only, so
//! `holiday.backup.JPG` qualifies and `clip.mp4.part` does not.

use std::path::Path;

/// Raster, raw and video extensions treated as media by default.
pub const MEDIA_EXTENSIONS: &[&str] = &[
    // raster
    "jpg", "jpeg", "png", "heif", "heic", "webp", "bmp", "tif", "tiff", "gif",
    // camera raw
    "dng", "arw", "enc",
    // video
    "webm", "mkv", "mp4", "mov", "mpg", "mpeg", "avi", "3gp",
];

/// Set of extensions the scanner accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFilter {
    extensions: Vec<String>,
}

impl Default for MediaFilter {
    fn default() -> Self {
        Self {
            extensions: MEDIA_EXTENSIONS.iter().map(|e| (*e).to_string()).collect(),
        }
    }
}

impl MediaFilter {
    /// Default allowlist plus `extra` extensions (leading dots are ignored).
    #[must_use]
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filter = Self::default();
        for ext in extra {
            let ext = normalize_extension(ext.as_ref());
            if !ext.is_empty() && !filter.extensions.contains(&ext) {
                filter.extensions.push(ext);
            }
        }
        filter
    }

    /// Accepted extensions, lowercase, without dots.
    #[must_use]
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Whether `path` has an accepted extension.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(normalize_extension)
            .is_some_and(|ext| self.extensions.iter().any(|e| *e == ext))
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}
