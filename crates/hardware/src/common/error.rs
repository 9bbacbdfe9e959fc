//! Fatal error conditions for the simulator.
//!
//! Per the error-handling policy, only argument-count misuse and the cycle watchdog are
//! user-visible failures; everything else (unreadable input, uncreatable output, unparsable
//! lines) is logged with `tracing::warn!` at the call site and absorbed rather than surfaced
//! here.

use thiserror::Error;

/// Fatal errors the simulator can report; all other conditions are absorbed.
#[derive(Debug, Error)]
pub enum SimError {
    /// Raised when the command line supplies neither zero nor exactly 27 positional paths.
    #[error("usage error: expected 0 or 27 arguments, got {got}")]
    UsageError {
        /// Number of positional arguments actually supplied.
        got: usize,
    },

    /// Raised when the simulation loop exceeds the cycle watchdog without terminating.
    #[error("simulation did not terminate within {cycles} cycles")]
    WatchdogExceeded {
        /// The watchdog bound that was exceeded.
        cycles: u64,
    },
}
