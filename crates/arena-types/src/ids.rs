//! Type-safe identifier wrappers.
//!
//! Participant ids are handed out by the roster from a monotonic counter
//! starting at 1, so `0` is never a live participant; it only appears in the
//! unfilled podium slots. Station ids are 1-based to match the routing keys
//! carried by admission triggers.

use serde::{Deserialize, Serialize};

/// Unique, monotonically assigned identifier of a participant.
///
/// Ordering follows arrival order: a lower id has been waiting longer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct ParticipantId(pub u64);

impl ParticipantId {
    /// The placeholder id used by empty podium slots.
    pub const NONE: Self = Self(0);

    /// Return the inner counter value.
    pub const fn into_inner(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a station (judge), in `1..=station_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StationId(pub u32);

impl StationId {
    /// Return the inner 1-based value.
    pub const fn into_inner(self) -> u32 {
        self.0
    }

    /// Whether this id names one of `station_count` stations.
    pub const fn is_within(self, station_count: u32) -> bool {
        self.0 >= 1 && self.0 <= station_count
    }

    /// Iterate over all station ids for a given station count.
    pub fn all(station_count: u32) -> impl Iterator<Item = Self> {
        (1..=station_count).map(Self)
    }
}

impl core::fmt::Display for StationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}
