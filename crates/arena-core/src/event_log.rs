//! Append-only, timestamped event log.
//!
//! Every observable event in the arena becomes one line of the form
//! `[<dd/mm/yy HH:MM:SS>] <actor>: <message>`. Writers serialize on a
//! single lock, so lines never interleave, but their relative order across
//! workers is only as deterministic as the scheduler.
//!
//! This is the domain record of the competition and is separate from the
//! `tracing` diagnostics; each line is mirrored there at debug level.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use arena_types::{ParticipantId, StationId};
use chrono::Local;
use tracing::{debug, error};

/// Timestamp format, whole-second granularity.
const TIMESTAMP_FORMAT: &str = "%d/%m/%y %H:%M:%S";

/// Who an event line is attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    /// Program lifecycle (start-up, admissions).
    Referee,
    /// A participant, by id.
    Participant(ParticipantId),
    /// A station's judge, by station id.
    Judge(StationId),
    /// A fixed summary label (end of program, totals, podium places).
    Label(String),
}

impl core::fmt::Display for Actor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Referee => write!(f, "Referee"),
            Self::Participant(id) => write!(f, "Participant {id}"),
            Self::Judge(id) => write!(f, "Judge {id}"),
            Self::Label(label) => write!(f, "{label}"),
        }
    }
}

enum Sink {
    File(BufWriter<File>),
    Memory(Vec<String>),
}

/// The shared event log.
pub struct EventLog {
    sink: Mutex<Sink>,
    echo_stdout: bool,
}

impl core::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventLog")
            .field("echo_stdout", &self.echo_stdout)
            .finish_non_exhaustive()
    }
}

impl EventLog {
    /// Create (truncating) the log file at `path`.
    pub fn create(path: &Path, echo_stdout: bool) -> std::io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            sink: Mutex::new(Sink::File(BufWriter::new(file))),
            echo_stdout,
        })
    }

    /// Log that keeps its lines in memory; see [`lines`](Self::lines).
    pub const fn in_memory() -> Self {
        Self {
            sink: Mutex::new(Sink::Memory(Vec::new())),
            echo_stdout: false,
        }
    }

    /// Append one event line.
    ///
    /// Write failures are reported through `tracing` and otherwise ignored;
    /// the competition does not stop because its record cannot be written.
    /// The optional stdout echo happens after the lock is released.
    pub fn record(&self, actor: &Actor, message: &str) {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let line = format_line(&timestamp, actor, message);
        debug!(actor = %actor, "{message}");

        self.append(line);
        if self.echo_stdout {
            println!("{actor}: {message}");
        }
    }

    fn append(&self, line: String) {
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        match &mut *sink {
            Sink::File(writer) => {
                let written = writeln!(writer, "{line}").and_then(|()| writer.flush());
                if let Err(e) = written {
                    error!(error = %e, "failed to append to event log");
                }
            }
            Sink::Memory(lines) => lines.push(line),
        }
    }

    /// Lines recorded so far (in-memory logs only; file logs return nothing).
    pub fn lines(&self) -> Vec<String> {
        let sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        match &*sink {
            Sink::Memory(lines) => lines.clone(),
            Sink::File(_) => Vec::new(),
        }
    }

    /// Whether any recorded line contains `needle` (in-memory logs only).
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.contains(needle))
    }
}

/// Render one log line.
pub fn format_line(timestamp: &str, actor: &Actor, message: &str) -> String {
    format!("[{timestamp}] {actor}: {message}")
}
