//! Progress reporting utilities using indicatif.
//!
//! The scanner reports through the [`ProgressCallback`] trait; [`Progress`]
//! renders those events as a spinner with a running file count.

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Scan progress events.
///
/// Called from hashing worker threads, hence `Send + Sync`.
pub trait ProgressCallback: Send + Sync {
    /// A scan of `root` is starting.
    fn on_scan_start(&self, root: &Path);

    /// A directory level is about to be listed.
    fn on_directory(&self, _dir: &Path) {}

    /// One file finished hashing.
    fn on_file_hashed(&self, path: &Path);

    /// The scan finished; `files` is the number of files in the snapshot
    /// (0 on failure).
    fn on_scan_end(&self, files: usize);
}

/// Spinner-based progress reporter.
pub struct Progress {
    bar: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, nothing is drawn.
    ///
    /// # Examples
    ///
    /// ```
    /// use photoscan::progress::Progress;
    ///
    /// let progress = Progress::new(true);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            quiet,
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {pos} files {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(ref pb) = *guard {
                f(pb);
            }
        }
    }
}

impl ProgressCallback for Progress {
    fn on_scan_start(&self, root: &Path) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::style());
        pb.set_message(truncate_path(&root.to_string_lossy(), 40));
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(pb);
        }
    }

    fn on_directory(&self, dir: &Path) {
        self.with_bar(|pb| pb.set_message(truncate_path(&dir.to_string_lossy(), 40)));
    }

    fn on_file_hashed(&self, _path: &Path) {
        self.with_bar(|pb| pb.inc(1));
    }

    fn on_scan_end(&self, files: usize) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_with_message(format!("done, {files} media files"));
            }
        }
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let count = file_name.chars().count();
    if count + 4 > max_len {
        let keep = max_len.saturating_sub(3);
        let tail: String = file_name.chars().skip(count.saturating_sub(keep)).collect();
        return format!("...{tail}");
    }

    format!(".../{file_name}")
}
