//! Configuration loading and typed config structures for the Arena.
//!
//! The canonical configuration lives in `arena-config.yaml` next to the
//! binary's working directory. Every field has a default, so an empty or
//! missing file yields a runnable arena (10 participants, 2 stations, one
//! second per tick).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is not usable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level arena configuration.
///
/// Mirrors the structure of `arena-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ArenaConfig {
    /// Capacity, stations, and timing.
    #[serde(default)]
    pub arena: ArenaSettings,

    /// Event log sink settings.
    #[serde(default)]
    pub event_log: EventLogConfig,

    /// Diagnostic logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Optional process-end summary output.
    #[serde(default)]
    pub summary: SummaryConfig,
}

impl ArenaConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `ARENA_EVENT_LOG` overrides `event_log.path`
    /// - `ARENA_SEED` overrides `arena.seed`
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string and apply env overrides.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Override file values with environment variables when set.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("ARENA_EVENT_LOG") {
            self.event_log.path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("ARENA_SEED") {
            let seed = val.parse::<u64>().map_err(|e| ConfigError::Invalid {
                reason: format!("ARENA_SEED is not an integer: {e}"),
            })?;
            self.arena.seed = Some(seed);
        }
        Ok(())
    }

    /// Reject values the arena cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.arena.validate()
    }
}

/// Capacity, station, and timing settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArenaSettings {
    /// Maximum number of live participants.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Number of stations (judges) serving participants.
    #[serde(default = "default_station_count")]
    pub station_count: u32,

    /// Real-time milliseconds per tick.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Random seed; `None` seeds from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl ArenaSettings {
    /// The configured tick as a [`Duration`].
    pub const fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Capacity, station count, and tick must all be positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::Invalid {
                reason: "capacity must be at least 1".to_owned(),
            });
        }
        if self.station_count == 0 {
            return Err(ConfigError::Invalid {
                reason: "station_count must be at least 1".to_owned(),
            });
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "tick_ms must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            station_count: default_station_count(),
            tick_ms: default_tick_ms(),
            seed: None,
        }
    }
}

/// Event log sink configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventLogConfig {
    /// File the event log is written to (truncated at startup).
    #[serde(default = "default_event_log_path")]
    pub path: PathBuf,

    /// Whether every event line is also printed to stdout.
    #[serde(default = "default_true")]
    pub echo_stdout: bool,
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self {
            path: default_event_log_path(),
            echo_stdout: true,
        }
    }
}

/// Diagnostic logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Process-end summary configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SummaryConfig {
    /// If set, the final report is written here as JSON.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

const fn default_capacity() -> usize {
    10
}

const fn default_station_count() -> u32 {
    2
}

const fn default_tick_ms() -> u64 {
    1000
}

fn default_event_log_path() -> PathBuf {
    PathBuf::from("arena-events.log")
}

fn default_log_level() -> String {
    String::from("info")
}

const fn default_true() -> bool {
    true
}
