//! Application configuration.
//!
//! Settings are layered with `figment`, later layers winning:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. TOML file: `--config <path>`, else `config.toml` in the platform
//!    config directory (skipped if absent)
//! 3. `PHOTOSCAN_*` environment variables (`PHOTOSCAN_IO_THREADS=8`)
//! 4. Command-line flags, applied by the caller
//!
//! ```toml
//! snapshot_dir = "/var/lib/photoscan"
//! io_threads = 8
//! extra_extensions = ["cr2", "nef"]
//! preview = true
//! preview_size = 64
//! permanent = false
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actions::preview::DEFAULT_PREVIEW_WIDTH;
use crate::scanner::{MediaFilter, ScanConfig};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "PHOTOSCAN_";

/// Errors loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    /// A layer held a malformed or mistyped value.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory where snapshot files are written and looked up.
    pub snapshot_dir: PathBuf,
    /// Hashing threads; 0 = one per CPU.
    pub io_threads: usize,
    /// Extensions added to the built-in media allowlist.
    pub extra_extensions: Vec<String>,
    /// Draw thumbnails during `dedup`.
    pub preview: bool,
    /// Thumbnail width in terminal cells.
    pub preview_size: u32,
    /// Bypass the trash when deleting.
    pub permanent: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot_dir: PathBuf::from("."),
            io_threads: 0,
            extra_extensions: Vec::new(),
            preview: true,
            preview_size: DEFAULT_PREVIEW_WIDTH,
            permanent: false,
        }
    }
}

impl Config {
    /// Platform config file path (`…/photoscan/config.toml`).
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "photoscan", "photoscan")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Defaults merged with the TOML file at `path`.
    #[must_use]
    pub fn file_figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default())).merge(Toml::file(path))
    }

    /// Full provider stack: defaults, TOML file, environment.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let figment = match path {
            Some(p) => Self::file_figment(p),
            None => Figment::from(Serialized::defaults(Self::default())),
        };
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load the layered configuration.
    ///
    /// `explicit` is the `--config` value; when given it must exist.
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing explicit file, `Invalid` for bad values.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(p) if !p.is_file() => return Err(ConfigError::NotFound(p.to_path_buf())),
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path(),
        };

        if let Some(ref p) = path {
            log::debug!("Reading config from {}", p.display());
        }

        let config: Self = Self::figment(path.as_deref())
            .extract()
            .map_err(Box::new)?;
        Ok(config)
    }

    /// Media allowlist including `extra_extensions`.
    #[must_use]
    pub fn media_filter(&self) -> MediaFilter {
        MediaFilter::with_extra(&self.extra_extensions)
    }

    /// Scanner settings derived from this config.
    #[must_use]
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig::new(self.io_threads, self.media_filter())
    }
}
