//! Core value structs shared across the workspace.

use serde::{Deserialize, Serialize};

use crate::enums::Phase;
use crate::ids::{ParticipantId, StationId};

/// Number of places on the podium.
pub const PODIUM_SIZE: usize = 3;

/// The mutable part of a participant, published by its roster entry.
///
/// `score == 0` is ambiguous on its own (not yet scored, or a faulted lift);
/// `phase` disambiguates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParticipantStatus {
    /// Current lifecycle phase.
    pub phase: Phase,
    /// Lift score, meaningful once `phase` is scored.
    pub score: u32,
    /// Whether the judge sent the participant to the fountain.
    pub needs_drink: bool,
}

/// Point-in-time snapshot of a participant record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Unique id.
    pub id: ParticipantId,
    /// Station the admission trigger routed the participant to.
    pub station: StationId,
    /// Lifecycle state at the time of the snapshot.
    pub status: ParticipantStatus,
}

/// One place on the podium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RankEntry {
    /// Who scored it ([`ParticipantId::NONE`] for an unfilled place).
    pub participant: ParticipantId,
    /// The score.
    pub score: u32,
}

/// How many participants a station served over the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationTotal {
    /// The station.
    pub station: StationId,
    /// Participants scored by it, including faulted lifts.
    pub served: u64,
}

/// Summary emitted once when the arena shuts down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaReport {
    /// Total admissions over the run (the last id handed out).
    pub admitted: u64,
    /// Per-station service counts, ordered by station id.
    pub station_totals: Vec<StationTotal>,
    /// Final podium, best first.
    pub podium: [RankEntry; PODIUM_SIZE],
    /// Participant left waiting at the fountain, if any.
    pub unserved: Option<ParticipantId>,
}

impl ArenaReport {
    /// Served count for one station, or `None` if it does not exist.
    pub fn served_by(&self, station: StationId) -> Option<u64> {
        self.station_totals
            .iter()
            .find(|t| t.station == station)
            .map(|t| t.served)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn fresh_status_is_waiting_without_score() {
        let status = ParticipantStatus::default();
        assert_eq!(status.phase, Phase::Waiting);
        assert_eq!(status.score, 0);
        assert!(!status.needs_drink);
    }

    #[test]
    fn report_serializes_podium_as_array() {
        let report = ArenaReport {
            admitted: 4,
            station_totals: vec![
                StationTotal { station: StationId(1), served: 3 },
                StationTotal { station: StationId(2), served: 1 },
            ],
            podium: [
                RankEntry { participant: ParticipantId(2), score: 250 },
                RankEntry { participant: ParticipantId(1), score: 90 },
                RankEntry::default(),
            ],
            unserved: Some(ParticipantId(4)),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["podium"].as_array().map(Vec::len), Some(PODIUM_SIZE));
        assert_eq!(json["unserved"], 4);
        assert_eq!(report.served_by(StationId(2)), Some(1));
        assert_eq!(report.served_by(StationId(3)), None);
    }
}
