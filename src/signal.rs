//! Signal handling infrastructure for graceful shutdown.
//!
//! This module provides a thread-safe stop flag set on SIGINT (Ctrl+C) or
//! SIGTERM (service stop). The scheduler checks it between ticks and while
//! waiting for the next deadline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{ProcmonError, Result};

/// Granularity at which [`SignalHandler::wait_until`] re-checks the flag.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Shared, cooperative stop signal.
///
/// `SignalHandler` is cheap to clone; all clones observe the same flag.
///
/// # Example
///
/// ```ignore
/// let handler = SignalHandler::new()?;
///
/// loop {
///     if handler.wait_until(next_deadline) {
///         // Stop requested: finish up and exit
///         break;
///     }
///     // Do the work for this tick
/// }
/// ```
#[derive(Clone, Debug, Default)]
pub struct SignalHandler {
    shutdown_flag: Arc<AtomicBool>,
}

impl SignalHandler {
    /// Creates a `SignalHandler` and registers it for SIGINT and SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler cannot be registered (for example when
    /// one was already registered in this process).
    pub fn new() -> Result<Self> {
        let handler = Self::detached();
        let flag_clone = Arc::clone(&handler.shutdown_flag);

        ctrlc::set_handler(move || {
            flag_clone.store(true, Ordering::SeqCst);
        })
        .map_err(|e| ProcmonError::SignalHandler(e.to_string()))?;

        Ok(handler)
    }

    /// Creates a handler that is not wired to OS signals; stop it with
    /// [`SignalHandler::request_shutdown`].
    pub fn detached() -> Self {
        Self::default()
    }

    /// Checks if a shutdown has been requested (non-blocking).
    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag.load(Ordering::SeqCst)
    }

    pub fn request_shutdown(&self) {
        self.shutdown_flag.store(true, Ordering::SeqCst);
    }

    /// Sleeps until `deadline` or until shutdown is requested, whichever
    /// comes first. Returns `true` if shutdown was requested.
    pub fn wait_until(&self, deadline: Instant) -> bool {
        loop {
            if self.is_shutdown_requested() {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            thread::sleep((deadline - now).min(POLL_INTERVAL));
        }
    }
}
