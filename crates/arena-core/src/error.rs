//! Error types for the arena-core crate.
//!
//! Capacity exhaustion and self-elimination are modelled outcomes and never
//! show up here. What does show up is either a caller mistake (a routing key
//! that names no station, admitting after shutdown) or a fault the arena
//! cannot recover from (a worker panicked, the event log could not be
//! opened).

use arena_types::StationId;

use crate::config::ConfigError;

/// Errors produced by the arena coordination engine.
#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    /// The admission trigger named a station that does not exist.
    #[error("admission declined: station {route} is not in 1..={station_count}")]
    InvalidRoute {
        /// The routing key carried by the trigger.
        route: StationId,
        /// Number of configured stations.
        station_count: u32,
    },

    /// The arena is shutting down (or already has) and accepts no more work.
    #[error("arena is closed")]
    Closed,

    /// The configuration could not be used to start the arena.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// The event log sink could not be created.
    #[error("event log error: {source}")]
    EventLog {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// A participant or station worker panicked.
    #[error("worker panicked: {worker}")]
    WorkerPanicked {
        /// Which kind of worker failed.
        worker: String,
    },
}

impl ArenaError {
    /// Whether the error must terminate the process.
    ///
    /// Declined admissions are reported back to the trigger; everything
    /// else means the arena can no longer be trusted.
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::InvalidRoute { .. } | Self::Closed)
    }
}
