//! Error types for the Arena binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during start-up, the trigger loop, and the final summary.

/// Top-level error for the Arena binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: arena_core::config::ConfigError,
    },

    /// The arena could not start or failed while running.
    #[error("arena error: {source}")]
    Arena {
        /// The underlying arena error.
        #[from]
        source: arena_core::error::ArenaError,
    },

    /// A positional argument was not a positive integer.
    #[error("invalid argument {value:?}: {reason}")]
    Args {
        /// The argument as given.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Registering an OS signal handler failed.
    #[error("signal handler error: {source}")]
    Signal {
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Writing the JSON summary failed.
    #[error("summary error: {message}")]
    Summary {
        /// Description of the failure.
        message: String,
    },
}
