//! Top-3 ranking board (the podium).
//!
//! Insertion is one bounded insertion-sort step: scan places best-first and
//! put the new entry in the first place whose score is **less than or equal
//! to** the new score, pushing everything below it down one place and
//! dropping the last.
//!
//! # Tie-break policy
//!
//! Because equal scores qualify, a participant who matches an existing score
//! takes that place and pushes the earlier scorer down. Ties favour the most
//! recent scorer. A consequence is that a zero score still enters the board
//! while any place holds its initial `(0, 0)` entry.

use arena_types::{PODIUM_SIZE, ParticipantId, RankEntry};

/// Fixed-size, descending score board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankingBoard {
    entries: [RankEntry; PODIUM_SIZE],
}

impl RankingBoard {
    /// An empty board: every place is `(0, 0)`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a score. Returns the 0-based place it took, if any.
    pub fn record(&mut self, participant: ParticipantId, score: u32) -> Option<usize> {
        let place = self.entries.iter().position(|e| score >= e.score)?;
        let tail = self.entries.get_mut(place..)?;
        tail.rotate_right(1);
        let slot = tail.first_mut()?;
        *slot = RankEntry { participant, score };
        Some(place)
    }

    /// Current places, best first.
    pub const fn entries(&self) -> &[RankEntry; PODIUM_SIZE] {
        &self.entries
    }
}
