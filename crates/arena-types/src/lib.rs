//! Shared type definitions for the Arena competition simulator.
//!
//! Every crate in the workspace speaks in these types: the coordination
//! engine in `arena-core` mutates them, and the `arena-engine` binary
//! prints and serializes them in the final summary.
//!
//! # Modules
//!
//! - [`ids`] -- Strongly-typed participant and station identifiers
//! - [`enums`] -- Participant phases and lift outcomes
//! - [`structs`] -- Participant snapshots, podium entries, and the final report

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{BEHAVIOR_ROLL, LiftOutcome, Phase};
pub use ids::{ParticipantId, StationId};
pub use structs::{ArenaReport, Participant, ParticipantStatus, PODIUM_SIZE, RankEntry, StationTotal};
