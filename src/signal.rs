//! Ctrl+C handling.
//!
//! A single [`ShutdownHandler`] wraps an `Arc<AtomicBool>` that the scanner
//! checks before every directory and file and the resolver checks between
//! duplicate groups. The process exits with [`EXIT_CODE_INTERRUPTED`] once
//! the current unit of work has stopped.
//!
//! ```rust,no_run
//! use photoscan::signal::install_handler;
//!
//! let handler = install_handler().expect("signal handler");
//! let flag = handler.get_flag();
//! // hand `flag` to Scanner::with_shutdown_flag / Resolver::with_shutdown_flag
//! if handler.is_shutdown_requested() {
//!     return;
//! }
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Exit code for SIGINT (128 + 2).
pub const EXIT_CODE_INTERRUPTED: i32 = 130;

/// Shared shutdown flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// Create a handler with no shutdown requested.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether Ctrl+C was pressed or [`request_shutdown`](Self::request_shutdown) called.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Raise the flag by hand.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Clone of the flag for worker code.
    #[must_use]
    pub fn get_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Lower the flag again.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Error type for signal handler installation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(String),
}

static GLOBAL_HANDLER: OnceLock<Result<ShutdownHandler, SignalError>> = OnceLock::new();

/// Install the process-wide Ctrl+C hook and return its handler.
///
/// The hook is installed at most once per process. Later calls (for example
/// from several `run_app` invocations in one test binary) get the same
/// handler back after it has been reset.
///
/// # Errors
///
/// Returns [`SignalError::InstallFailed`] if the hook could not be installed,
/// for example because other code in the process already owns it. Every
/// later call reports the same failure.
pub fn install_handler() -> Result<ShutdownHandler, SignalError> {
    let installed = GLOBAL_HANDLER.get_or_init(|| {
        let handler = ShutdownHandler::new();
        let flag = handler.get_flag();

        ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);
            let _ = writeln!(std::io::stderr(), "\nInterrupted. Stopping...");
            let _ = std::io::stderr().flush();
            log::info!("Shutdown signal received");
        })
        .map_err(|e| SignalError::InstallFailed(e.to_string()))?;

        log::debug!("Ctrl+C handler installed");
        Ok(handler)
    });

    let handler = installed.as_ref().map_err(Clone::clone)?;
    handler.reset();
    Ok(handler.clone())
}
