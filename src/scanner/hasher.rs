//! Streaming MD5 content digests.
//!
//! # Overview
//!
//! [`Hasher`] reads a file in fixed-size chunks and folds them into an MD5
//! state, so memory use does not depend on file size. The digest is rendered
//! as 32 lowercase hex characters and is only used for equality checks.
//!
//! The scanner talks to the hasher through the [`FileDigest`] trait, which
//! lets tests substitute slow or failing implementations.
//!
//! # Example
//!
//! ```no_run
//! use photoscan::scanner::{FileDigest, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let digest = hasher.digest_file(Path::new("IMG_0001.jpg")).unwrap();
//! assert_eq!(digest.len(), 32);
//! ```

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use md5::{Digest, Md5};

use super::HashError;

/// Default read chunk size (64 KiB).
pub const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Length of a rendered digest in hex characters.
pub const DIGEST_HEX_LEN: usize = 32;

/// Computes the content fingerprint of a single file.
pub trait FileDigest: Send + Sync {
    /// Digest the full contents of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or fully read. No
    /// partial digest is ever produced.
    fn digest_file(&self, path: &Path) -> Result<String, HashError>;
}

/// Streaming MD5 hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    buffer_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default 64 KiB read buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer_size: READ_BUFFER_SIZE,
        }
    }

    /// Create a hasher with a custom read buffer size (minimum 1 byte).
    #[must_use]
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
        }
    }

    /// Read buffer size in bytes.
    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Digest everything `reader` yields until EOF.
    ///
    /// # Errors
    ///
    /// Propagates any read error other than `Interrupted`, which is retried.
    pub fn digest_reader<R: Read>(&self, mut reader: R) -> io::Result<String> {
        let mut state = Md5::new();
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => state.update(&buffer[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(format!("{:x}", state.finalize()))
    }

    /// Digest an in-memory byte slice.
    #[must_use]
    pub fn digest_bytes(bytes: &[u8]) -> String {
        format!("{:x}", Md5::digest(bytes))
    }
}

impl FileDigest for Hasher {
    fn digest_file(&self, path: &Path) -> Result<String, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        let digest = self
            .digest_reader(file)
            .map_err(|e| HashError::from_io(path, e))?;

        log::trace!("Hashed {} -> {}", path.display(), digest);
        Ok(digest)
    }
}

/// Check that a string looks like a rendered digest.
#[must_use]
pub fn is_valid_digest(s: &str) -> bool {
    s.len() == DIGEST_HEX_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
