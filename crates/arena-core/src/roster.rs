//! Bounded participant table and admission control.
//!
//! The roster owns every live participant record. All of its operations
//! (admission, station claims, elimination, release) run under the single
//! roster lock held by the arena, which makes them atomic with respect to
//! each other: a participant can never be both claimed by a station and
//! eliminated by its own health check.
//!
//! Each record publishes its [`ParticipantStatus`] through a `watch`
//! channel. The participant worker and the station serving it wait on that
//! channel instead of polling the table.

use std::sync::Arc;

use arena_types::{Participant, ParticipantId, ParticipantStatus, Phase, StationId};
use tokio::sync::watch;

use crate::error::ArenaError;

/// Shared, observable status of one participant.
pub type StatusCell = Arc<watch::Sender<ParticipantStatus>>;

/// A live record.
#[derive(Debug)]
struct Entry {
    id: ParticipantId,
    station: StationId,
    status: StatusCell,
}

/// Result of a successful admission.
#[derive(Debug, Clone)]
pub struct Admission {
    /// The freshly assigned id.
    pub id: ParticipantId,
    /// Table slot the participant occupies.
    pub slot: usize,
    /// Station it was routed to.
    pub station: StationId,
    /// Its status channel.
    pub status: StatusCell,
}

/// A participant claimed by a station.
#[derive(Debug, Clone)]
pub struct Claim {
    /// The claimed participant.
    pub id: ParticipantId,
    /// The station it was routed to at admission.
    pub home: StationId,
    /// `true` when the claiming station is helping another station's queue.
    pub assisted: bool,
    /// Its status channel.
    pub status: StatusCell,
}

/// Fixed-capacity participant table.
#[derive(Debug)]
pub struct Roster {
    slots: Vec<Option<Entry>>,
    last_id: u64,
    station_count: u32,
}

impl Roster {
    /// Create an empty roster.
    pub fn new(capacity: usize, station_count: u32) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            last_id: 0,
            station_count,
        }
    }

    /// Admit a participant routed to `route`.
    ///
    /// Takes the lowest free slot index and the next id. Returns `Ok(None)`
    /// without touching the table when every slot is occupied.
    pub fn admit(&mut self, route: StationId) -> Result<Option<Admission>, ArenaError> {
        if !route.is_within(self.station_count) {
            return Err(ArenaError::InvalidRoute {
                route,
                station_count: self.station_count,
            });
        }

        let Some((slot, cell)) = self
            .slots
            .iter_mut()
            .enumerate()
            .find(|(_, cell)| cell.is_none())
        else {
            return Ok(None);
        };

        self.last_id = self.last_id.saturating_add(1);
        let id = ParticipantId(self.last_id);
        let (tx, _rx) = watch::channel(ParticipantStatus::default());
        let status = Arc::new(tx);

        *cell = Some(Entry {
            id,
            station: route,
            status: Arc::clone(&status),
        });

        Ok(Some(Admission {
            id,
            slot,
            station: route,
            status,
        }))
    }

    /// Claim the next participant for `station` and mark it selected.
    ///
    /// The longest-waiting (lowest id) participant routed to `station` wins.
    /// If there is none, the station assists: it takes the lowest-id waiting
    /// participant of any station.
    pub fn claim_for(&mut self, station: StationId) -> Option<Claim> {
        let waiting = || {
            self.slots
                .iter()
                .flatten()
                .filter(|e| e.status.borrow().phase == Phase::Waiting)
        };

        let own = waiting()
            .filter(|e| e.station == station)
            .min_by_key(|e| e.id);
        let assisted = own.is_none();
        let entry = own.or_else(|| waiting().min_by_key(|e| e.id))?;

        entry.status.send_modify(|s| s.phase = Phase::Selected);
        Some(Claim {
            id: entry.id,
            home: entry.station,
            assisted,
            status: Arc::clone(&entry.status),
        })
    }

    /// Remove a participant that failed its health check.
    ///
    /// Only succeeds while the participant is still waiting; once a station
    /// has claimed it the elimination is void and `false` is returned.
    pub fn eliminate_if_waiting(&mut self, id: ParticipantId) -> bool {
        let Some(cell) = self.cell_of(id) else {
            return false;
        };
        let still_waiting = cell
            .as_ref()
            .is_some_and(|e| e.status.borrow().phase == Phase::Waiting);
        if !still_waiting {
            return false;
        }
        if let Some(entry) = cell.take() {
            entry.status.send_modify(|s| s.phase = Phase::Eliminated);
        }
        true
    }

    /// Free the slot of a participant that is done competing.
    pub fn release(&mut self, id: ParticipantId) -> bool {
        self.cell_of(id).and_then(Option::take).is_some()
    }

    /// Number of occupied slots.
    pub fn live_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Maximum number of live participants.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Total admissions so far (equals the last id handed out).
    pub const fn admitted(&self) -> u64 {
        self.last_id
    }

    /// Snapshot of every live participant, by slot order.
    pub fn snapshot(&self) -> Vec<Participant> {
        self.slots
            .iter()
            .flatten()
            .map(|e| Participant {
                id: e.id,
                station: e.station,
                status: *e.status.borrow(),
            })
            .collect()
    }

    fn cell_of(&mut self, id: ParticipantId) -> Option<&mut Option<Entry>> {
        self.slots
            .iter_mut()
            .find(|cell| cell.as_ref().is_some_and(|e| e.id == id))
    }
}
