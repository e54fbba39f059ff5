//! Terminal previews of media files.
//!
//! Raster formats the `image` crate can decode are downscaled to a thumbnail
//! and drawn with half-block characters, two pixel rows per terminal line,
//! using 24-bit foreground/background colours. Everything else on the media
//! allowlist (RAW, HEIC, video) gets a one-line summary instead.
//!
//! Thumbnails are built in memory for each call; nothing is written to disk.
//!
//! # Example
//!
//! ```no_run
//! use photoscan::actions::preview::{render_preview, PreviewKind};
//! use std::path::Path;
//!
//! let preview = render_preview(Path::new("/photos/a.jpg"), 48).unwrap();
//! if preview.kind == PreviewKind::Thumbnail {
//!     for line in &preview.lines {
//!         println!("{line}");
//!     }
//! }
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use bytesize::ByteSize;
use image::{DynamicImage, RgbImage};
use thiserror::Error;
use yansi::Paint;

use crate::resolve::Previewer;

/// Extensions decoded into a thumbnail.
const THUMBNAIL_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "tif", "tiff", "webp"];

/// Default thumbnail width in terminal cells.
pub const DEFAULT_PREVIEW_WIDTH: u32 = 48;

const UPPER_HALF_BLOCK: &str = "\u{2580}";

/// Errors that can occur during file preview.
#[derive(Debug, Error)]
pub enum PreviewError {
    /// File was not found.
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The image could not be decoded.
    #[error("cannot decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Writing the preview to the terminal failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl PreviewError {
    fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io(err),
        }
    }
}

/// What kind of preview was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    /// Half-block thumbnail of a decoded image.
    Thumbnail,
    /// Text summary for media that isn't decoded.
    Summary,
}

/// A rendered preview, ready to print.
#[derive(Debug, Clone)]
pub struct PreviewContent {
    /// Thumbnail or summary.
    pub kind: PreviewKind,
    /// Terminal lines, header first.
    pub lines: Vec<String>,
    /// File size in bytes.
    pub file_size: u64,
    /// Source image dimensions, for thumbnails.
    pub dimensions: Option<(u32, u32)>,
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/// Whether `path` gets a thumbnail rather than a summary.
#[must_use]
pub fn is_thumbnail_format(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| THUMBNAIL_EXTENSIONS.contains(&ext.as_str()))
}

/// Render a preview of `path` at most `width` cells wide.
///
/// # Errors
///
/// `NotFound`/`PermissionDenied` if the file can't be inspected, `Decode`
/// if a thumbnail format fails to decode.
pub fn render_preview(path: &Path, width: u32) -> Result<PreviewContent, PreviewError> {
    let metadata = fs::metadata(path).map_err(|e| PreviewError::from_io(path, e))?;
    let file_size = metadata.len();
    let header = format!("{} ({})", path.display(), ByteSize(file_size));

    if !is_thumbnail_format(path) {
        let ext = extension_of(path).unwrap_or_else(|| "?".to_string());
        return Ok(PreviewContent {
            kind: PreviewKind::Summary,
            lines: vec![format!("{header} [{ext}, no preview]")],
            file_size,
            dimensions: None,
        });
    }

    let image = image::open(path).map_err(|source| PreviewError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let dimensions = (image.width(), image.height());

    let thumb = thumbnail_rgb(&image, width);

    let mut lines = Vec::with_capacity(thumb.height() as usize / 2 + 2);
    lines.push(format!("{header} {}x{}", dimensions.0, dimensions.1));
    lines.extend(half_block_lines(&thumb));

    Ok(PreviewContent {
        kind: PreviewKind::Thumbnail,
        lines,
        file_size,
        dimensions: Some(dimensions),
    })
}

/// Downscale to fit a `width` x `width` box, keeping the aspect ratio.
///
/// Terminal cells are about twice as tall as wide and two pixel rows share a
/// cell, so a square pixel box comes out roughly square on screen.
fn thumbnail_rgb(image: &DynamicImage, width: u32) -> RgbImage {
    let width = width.max(1);
    image.thumbnail(width, width).to_rgb8()
}

/// Draw `img` with one `▀` per pixel column and pixel-row pair.
fn half_block_lines(img: &RgbImage) -> Vec<String> {
    let (w, h) = img.dimensions();
    let mut lines = Vec::with_capacity(h.div_ceil(2) as usize);

    for y in (0..h).step_by(2) {
        let mut line = String::new();
        for x in 0..w {
            let [r, g, b] = img.get_pixel(x, y).0;
            let cell = if y + 1 < h {
                let [br, bg, bb] = img.get_pixel(x, y + 1).0;
                UPPER_HALF_BLOCK.rgb(r, g, b).on_rgb(br, bg, bb).to_string()
            } else {
                UPPER_HALF_BLOCK.rgb(r, g, b).to_string()
            };
            line.push_str(&cell);
        }
        lines.push(line);
    }

    lines
}

/// Previewer that prints to stdout.
#[derive(Debug, Clone, Copy)]
pub struct TerminalPreviewer {
    width: u32,
}

impl TerminalPreviewer {
    /// Create a previewer drawing thumbnails `width` cells wide.
    #[must_use]
    pub fn new(width: u32) -> Self {
        Self { width }
    }
}

impl Default for TerminalPreviewer {
    fn default() -> Self {
        Self::new(DEFAULT_PREVIEW_WIDTH)
    }
}

impl Previewer for TerminalPreviewer {
    fn render(&self, path: &Path) -> Result<(), PreviewError> {
        let preview = render_preview(path, self.width)?;
        let mut out = io::stdout().lock();
        for line in &preview.lines {
            writeln!(out, "{line}")?;
        }
        out.flush()?;
        Ok(())
    }
}

/// Previewer that only prints the path, for `--no-preview`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainPreviewer;

impl Previewer for PlainPreviewer {
    fn render(&self, path: &Path) -> Result<(), PreviewError> {
        let metadata = fs::metadata(path).map_err(|e| PreviewError::from_io(path, e))?;
        println!("{} ({})", path.display(), ByteSize(metadata.len()));
        Ok(())
    }
}
