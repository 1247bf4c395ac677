//! Enumeration types for the Arena simulator.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Participant lifecycle
// ---------------------------------------------------------------------------

/// Where a participant is in its lifecycle.
///
/// ```text
/// Waiting ─┬─► Eliminated
///          └─► Selected ─► WarmedUp ─► Scored ─┬─► (done)
///                                              └─► FountainQueued ─► FountainServed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Admitted and queued for its station.
    #[default]
    Waiting,
    /// Claimed by a station; warming up.
    Selected,
    /// Warmup finished; the station may now time and score the lift.
    WarmedUp,
    /// The station has finished scoring (the score may legitimately be 0).
    Scored,
    /// Parked at the fountain waiting for a partner to press the button.
    FountainQueued,
    /// Woken at the fountain and served.
    FountainServed,
    /// Dropped out while waiting (failed health check).
    Eliminated,
}

impl Phase {
    /// Whether the station has finished with the participant.
    pub const fn is_scored(self) -> bool {
        matches!(
            self,
            Self::Scored | Self::FountainQueued | Self::FountainServed
        )
    }
}

// ---------------------------------------------------------------------------
// Lift outcomes
// ---------------------------------------------------------------------------

/// Inclusive range of the behaviour roll a station draws for each lift.
pub const BEHAVIOR_ROLL: (u32, u32) = (1, 10);

/// The judged result of one lift.
///
/// Drawn from a uniform roll in [`BEHAVIOR_ROLL`]: 1-8 is a valid lift
/// (80%), 9 a procedural fault (10%), 10 a strength fault (10%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiftOutcome {
    /// A valid lift, scored uniformly in [60, 300].
    Valid,
    /// Disqualified on procedure (attire); scores 0.
    ProceduralFault,
    /// Failed for lack of strength; scores 0.
    StrengthFault,
}

impl LiftOutcome {
    /// Map a behaviour roll onto an outcome.
    pub const fn from_roll(roll: u32) -> Self {
        match roll {
            0..=8 => Self::Valid,
            9 => Self::ProceduralFault,
            _ => Self::StrengthFault,
        }
    }

    /// Inclusive range, in ticks, of how long the lift takes.
    pub const fn duration_ticks(self) -> (u32, u32) {
        match self {
            Self::Valid => (2, 6),
            Self::ProceduralFault => (1, 4),
            Self::StrengthFault => (6, 10),
        }
    }

    /// Inclusive score range, or `None` when the outcome always scores 0.
    pub const fn score_range(self) -> Option<(u32, u32)> {
        match self {
            Self::Valid => Some((60, 300)),
            Self::ProceduralFault | Self::StrengthFault => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roll_weights_split_eighty_ten_ten() {
        let valid = (1..=10)
            .filter(|r| LiftOutcome::from_roll(*r) == LiftOutcome::Valid)
            .count();
        assert_eq!(valid, 8);
        assert_eq!(LiftOutcome::from_roll(9), LiftOutcome::ProceduralFault);
        assert_eq!(LiftOutcome::from_roll(10), LiftOutcome::StrengthFault);
    }

    #[test]
    fn faults_never_score() {
        assert!(LiftOutcome::ProceduralFault.score_range().is_none());
        assert!(LiftOutcome::StrengthFault.score_range().is_none());
        assert_eq!(LiftOutcome::Valid.score_range(), Some((60, 300)));
    }

    #[test]
    fn strength_faults_take_longest() {
        assert_eq!(LiftOutcome::StrengthFault.duration_ticks(), (6, 10));
        assert_eq!(LiftOutcome::ProceduralFault.duration_ticks(), (1, 4));
    }

    #[test]
    fn scored_phases() {
        assert!(!Phase::WarmedUp.is_scored());
        assert!(Phase::Scored.is_scored());
        assert!(Phase::FountainQueued.is_scored());
        assert!(Phase::FountainServed.is_scored());
        assert!(!Phase::Eliminated.is_scored());
    }
}
