//! Arena binary: runs one competition from start-up to final report.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `arena-config.yaml` and apply env and
//!    positional-argument overrides
//! 2. Initialize structured logging (tracing)
//! 3. Create (truncating) the event log
//! 4. Seed the random source and open the arena's stations
//! 5. Listen for signals and stdin commands until shutdown is requested
//! 6. Run the shutdown protocol, print the report, write the JSON summary

mod args;
mod error;
mod summary;
mod triggers;

use std::path::Path;
use std::sync::Arc;

use arena_core::arena::Arena;
use arena_core::config::ArenaConfig;
use arena_core::error::ArenaError;
use arena_core::event_log::{Actor, EventLog};
use arena_core::random::SeededRandom;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::args::ArgOverrides;
use crate::error::EngineError;
use crate::triggers::Trigger;

/// Queue depth between the trigger listeners and the main loop.
const TRIGGER_BUFFER: usize = 64;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if start-up fails or the arena reports a fatal fault.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let mut config = load_config()?;
    let overrides = ArgOverrides::parse(std::env::args().skip(1))?;
    if let Some(capacity) = overrides.capacity {
        config.arena.capacity = capacity;
    }
    if let Some(station_count) = overrides.station_count {
        config.arena.station_count = station_count;
    }
    config.validate().map_err(EngineError::from)?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(
        capacity = config.arena.capacity,
        station_count = config.arena.station_count,
        tick_ms = config.arena.tick_ms,
        seed = ?config.arena.seed,
        event_log = %config.event_log.path.display(),
        "arena-engine starting"
    );

    // 3. Create the event log.
    let log = EventLog::create(&config.event_log.path, config.event_log.echo_stdout)
        .map_err(ArenaError::from)
        .map_err(EngineError::from)?;
    let log = Arc::new(log);
    let pid = std::process::id();
    log.record(
        &Actor::Referee,
        &format!("The competition begins (process {pid})."),
    );
    println!("Process id: {pid}");

    // 4. Open the arena.
    let random = Arc::new(SeededRandom::new(config.arena.seed));
    let arena = Arena::start(&config.arena, Arc::clone(&log), random).map_err(EngineError::from)?;

    // 5. Trigger loop.
    let (tx, mut rx) = mpsc::channel(TRIGGER_BUFFER);
    triggers::spawn_signal_listener(tx.clone()).map_err(|source| EngineError::Signal { source })?;
    triggers::spawn_stdin_listener(tx);
    info!(pid, "Waiting for triggers (SIGUSR1/SIGUSR2 or `admit <station>` on stdin)");

    while let Some(trigger) = rx.recv().await {
        match trigger {
            Trigger::Admit(route) => match arena.admit(route).await {
                Ok(Some(id)) => info!(participant = %id, station = %route, "Admitted"),
                Ok(None) => info!(station = %route, "Arena full, admission declined"),
                Err(e) if !e.is_fatal() => warn!(error = %e, "Admission declined"),
                Err(e) => {
                    error!(error = %e, "Fatal arena error");
                    return Err(EngineError::from(e).into());
                }
            },
            Trigger::Shutdown => break,
        }
    }

    // 6. Shut down and report.
    let report = arena.shutdown().await.map_err(EngineError::from)?;
    summary::log_report(&report);
    if let Some(path) = &config.summary.path {
        summary::write_json(path, &report)?;
    }

    info!("arena-engine shutdown complete");
    Ok(())
}

/// Load the configuration from `arena-config.yaml`.
///
/// Looks for the file relative to the current working directory; a missing
/// file means defaults (still subject to env overrides).
fn load_config() -> Result<ArenaConfig, EngineError> {
    let config_path = Path::new("arena-config.yaml");
    if config_path.exists() {
        Ok(ArenaConfig::from_file(config_path)?)
    } else {
        let mut config = ArenaConfig::default();
        config.apply_env_overrides()?;
        Ok(config)
    }
}
