//! External admission and shutdown triggers.
//!
//! Both sources feed one channel of [`Trigger`]s consumed by the main loop:
//!
//! - **OS signals** (Unix): `SIGUSR1` admits to station 1, `SIGUSR2` to
//!   station 2. `SIGINT`, `SIGTERM` and `SIGQUIT` end the competition.
//! - **stdin**: `admit <station>` admits to any station, `quit` ends the
//!   competition. This is how arenas with more than two stations are fed.

use arena_types::StationId;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Something the outside world asked the arena to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Admit one participant routed to a station.
    Admit(StationId),
    /// Run the shutdown protocol.
    Shutdown,
}

/// A stdin line that is not a valid command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The line was blank.
    #[error("empty command")]
    Empty,

    /// The first word is not a known command.
    #[error("unknown command {0:?} (expected `admit <station>` or `quit`)")]
    Unknown(String),

    /// `admit` without a usable station number.
    #[error("admit needs a station number, got {0:?}")]
    BadStation(String),
}

/// Parse one stdin command line.
pub fn parse_command(line: &str) -> Result<Trigger, CommandError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Err(CommandError::Empty);
    };
    match command.to_ascii_lowercase().as_str() {
        "admit" | "a" => {
            let raw = words.next().unwrap_or_default();
            match raw.parse::<u32>() {
                Ok(n) => Ok(Trigger::Admit(StationId(n))),
                Err(e) => {
                    debug!(error = %e, raw, "unparsable station");
                    Err(CommandError::BadStation(raw.to_owned()))
                }
            }
        }
        "quit" | "exit" | "q" => Ok(Trigger::Shutdown),
        other => Err(CommandError::Unknown(other.to_owned())),
    }
}

/// Forward OS signals as triggers until shutdown is requested.
///
/// Returns `Err` if a signal handler cannot be registered.
#[cfg(unix)]
pub fn spawn_signal_listener(tx: mpsc::Sender<Trigger>) -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut usr1 = signal(SignalKind::user_defined1())?;
    let mut usr2 = signal(SignalKind::user_defined2())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::spawn(async move {
        loop {
            let trigger = tokio::select! {
                _ = usr1.recv() => Trigger::Admit(StationId(1)),
                _ = usr2.recv() => Trigger::Admit(StationId(2)),
                _ = sigint.recv() => Trigger::Shutdown,
                _ = sigterm.recv() => Trigger::Shutdown,
                _ = sigquit.recv() => Trigger::Shutdown,
            };
            debug!(?trigger, "signal received");
            if tx.send(trigger).await.is_err() || trigger == Trigger::Shutdown {
                break;
            }
        }
    });
    Ok(())
}

/// Forward Ctrl-C as a shutdown trigger.
#[cfg(not(unix))]
pub fn spawn_signal_listener(tx: mpsc::Sender<Trigger>) -> std::io::Result<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(Trigger::Shutdown).await;
        }
    });
    Ok(())
}

/// Forward stdin commands as triggers until stdin closes or `quit` is read.
pub fn spawn_stdin_listener(tx: mpsc::Sender<Trigger>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match parse_command(&line) {
                        Ok(trigger) => {
                            if tx.send(trigger).await.is_err() || trigger == Trigger::Shutdown {
                                break;
                            }
                        }
                        Err(e) => warn!(error = %e, "ignoring stdin command"),
                    }
                }
                Ok(None) => {
                    debug!("stdin closed, only signals remain");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "failed to read stdin");
                    break;
                }
            }
        }
    });
}
