//! The arena: owns the shared state and every worker.
//!
//! [`Arena::start`] opens the stations. [`Arena::admit`] registers a
//! participant and spawns its worker. [`Arena::shutdown`] runs the closing
//! protocol exactly once:
//!
//! 1. Refuse further admissions and log the end of the program.
//! 2. Cancel every participant worker and every station at once, then join
//!    the participants. No lift is scored after the end has been logged.
//! 3. Drain the fountain, reporting whoever was left waiting.
//! 4. Join every station.
//! 5. Log per-station totals and the podium, and return the report.
//!
//! Finished participant workers are reaped on each admission, so the task
//! set only ever holds the live ones.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use arena_types::{
    ArenaReport, PODIUM_SIZE, Participant, ParticipantId, RankEntry, StationId, StationTotal,
};
use tokio::sync::Mutex;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::ArenaSettings;
use crate::error::ArenaError;
use crate::event_log::{Actor, EventLog};
use crate::fountain::Fountain;
use crate::participant::ParticipantWorker;
use crate::random::RandomSource;
use crate::ranking::RankingBoard;
use crate::roster::Roster;
use crate::station::{StationStats, StationWorker};

/// Podium place labels, best first.
const PLACE_LABELS: [&str; PODIUM_SIZE] = ["FIRST POSITION", "SECOND POSITION", "THIRD POSITION"];

/// State shared by every worker. Each structure has its own lock.
pub(crate) struct Shared {
    pub(crate) roster: Mutex<Roster>,
    pub(crate) ranking: Mutex<RankingBoard>,
    pub(crate) fountain: Fountain,
    pub(crate) log: Arc<EventLog>,
    pub(crate) random: Arc<dyn RandomSource>,
    pub(crate) tick: Duration,
}

impl Shared {
    /// `n` ticks of real time.
    pub(crate) const fn ticks(&self, n: u32) -> Duration {
        self.tick.saturating_mul(n)
    }
}

/// A running competition.
pub struct Arena {
    shared: Arc<Shared>,
    stations: Vec<Arc<Mutex<StationStats>>>,
    participant_tasks: Mutex<JoinSet<()>>,
    station_tasks: Mutex<JoinSet<()>>,
    participant_token: CancellationToken,
    station_token: CancellationToken,
    closed: AtomicBool,
    participant_panicked: AtomicBool,
}

impl core::fmt::Debug for Arena {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Arena")
            .field("stations", &self.stations.len())
            .field("tick", &self.shared.tick)
            .field("closed", &self.closed.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

impl Arena {
    /// Validate `settings` and open every station.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(
        settings: &ArenaSettings,
        log: Arc<EventLog>,
        random: Arc<dyn RandomSource>,
    ) -> Result<Self, ArenaError> {
        settings.validate()?;

        let shared = Arc::new(Shared {
            roster: Mutex::new(Roster::new(settings.capacity, settings.station_count)),
            ranking: Mutex::new(RankingBoard::new()),
            fountain: Fountain::new(),
            log,
            random,
            tick: settings.tick(),
        });

        let station_token = CancellationToken::new();
        let mut station_tasks = JoinSet::new();
        let mut stations = Vec::new();
        for id in StationId::all(settings.station_count) {
            let stats = Arc::new(Mutex::new(StationStats::new(id)));
            let worker = StationWorker::new(id, Arc::clone(&shared), Arc::clone(&stats));
            station_tasks.spawn(worker.run(station_token.clone()));
            stations.push(stats);
        }

        info!(
            capacity = settings.capacity,
            station_count = settings.station_count,
            tick_ms = settings.tick_ms,
            "Arena started"
        );

        Ok(Self {
            shared,
            stations,
            participant_tasks: Mutex::new(JoinSet::new()),
            station_tasks: Mutex::new(station_tasks),
            participant_token: CancellationToken::new(),
            station_token,
            closed: AtomicBool::new(false),
            participant_panicked: AtomicBool::new(false),
        })
    }

    /// Admit one participant routed to `route`.
    ///
    /// Returns the new id, or `Ok(None)` when the arena is full. A route
    /// outside `1..=station_count` is declined with
    /// [`ArenaError::InvalidRoute`]; admitting after shutdown began is
    /// declined with [`ArenaError::Closed`].
    pub async fn admit(&self, route: StationId) -> Result<Option<ParticipantId>, ArenaError> {
        let mut tasks = self.participant_tasks.lock().await;
        if self.is_closed() {
            return Err(ArenaError::Closed);
        }

        let log = &self.shared.log;
        log.record(
            &Actor::Referee,
            &format!("Registration request for station {route}."),
        );

        let admission = {
            let mut roster = self.shared.roster.lock().await;
            match roster.admit(route) {
                Ok(Some(admission)) => admission,
                Ok(None) => {
                    log.record(
                        &Actor::Referee,
                        &format!(
                            "The arena is full ({} participants), registration declined.",
                            roster.capacity()
                        ),
                    );
                    return Ok(None);
                }
                Err(e) => {
                    warn!(error = %e, "admission declined");
                    return Err(e);
                }
            }
        };

        log.record(
            &Actor::Referee,
            &format!(
                "Participant {} registered, heading to station {route}.",
                admission.id
            ),
        );
        info!(participant = %admission.id, slot = admission.slot, station = %route, "Participant admitted");

        while let Some(joined) = tasks.try_join_next() {
            if let Some(e) = joined.err().filter(JoinError::is_panic) {
                error!(worker = "participant", error = %e, "worker panicked");
                self.participant_panicked.store(true, Ordering::Release);
            }
        }

        let worker = ParticipantWorker::new(&admission, Arc::clone(&self.shared));
        tasks.spawn(worker.run(self.participant_token.clone()));
        Ok(Some(admission.id))
    }

    /// Run the closing protocol and return the final report.
    ///
    /// Only the first call does anything; later calls get
    /// [`ArenaError::Closed`]. If any worker panicked the report is still
    /// logged, but [`ArenaError::WorkerPanicked`] is returned.
    pub async fn shutdown(&self) -> Result<ArenaReport, ArenaError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(ArenaError::Closed);
        }
        let log = &self.shared.log;
        info!("Arena shutting down");
        log.record(
            &Actor::Label(String::from("END OF PROGRAM")),
            "This ordeal is over.",
        );

        self.participant_token.cancel();
        self.station_token.cancel();
        let participant_panic = join_all(&self.participant_tasks, "participant")
            .await
            .or_else(|| {
                self.participant_panicked
                    .load(Ordering::Acquire)
                    .then(|| "participant".to_owned())
            });

        let unserved = self.shared.fountain.drain().await;
        if let Some(p) = unserved {
            log.record(
                &Actor::Participant(p.id),
                "I am leaving without a drink, so give me water, and make it ice cold.",
            );
        }

        let station_panic = join_all(&self.station_tasks, "station").await;

        let station_totals = self.station_totals().await;
        for total in &station_totals {
            log.record(
                &Actor::Label(format!("Total participants station {}", total.station)),
                &total.served.to_string(),
            );
        }

        let podium = self.podium().await;
        for (label, entry) in PLACE_LABELS.iter().zip(podium.iter()) {
            log.record(
                &Actor::Label((*label).to_owned()),
                &format!("Participant {} with {} points.", entry.participant, entry.score),
            );
        }

        let admitted = self.shared.roster.lock().await.admitted();
        info!(admitted, unserved = ?unserved.map(|p| p.id), "Arena closed");

        if let Some(worker) = participant_panic.or(station_panic) {
            return Err(ArenaError::WorkerPanicked { worker });
        }

        Ok(ArenaReport {
            admitted,
            station_totals,
            podium,
            unserved: unserved.map(|p| p.id),
        })
    }

    /// Whether shutdown has begun.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Number of participants currently holding a roster slot.
    pub async fn live_participants(&self) -> usize {
        self.shared.roster.lock().await.live_count()
    }

    /// Snapshot of every participant holding a roster slot.
    pub async fn participants(&self) -> Vec<Participant> {
        self.shared.roster.lock().await.snapshot()
    }

    /// The participant parked at the fountain, if any.
    pub async fn fountain_occupant(&self) -> Option<ParticipantId> {
        self.shared.fountain.occupant_id().await
    }

    /// Current podium, best first.
    pub async fn podium(&self) -> [RankEntry; PODIUM_SIZE] {
        *self.shared.ranking.lock().await.entries()
    }

    /// Current counters of one station.
    pub async fn station_stats(&self, id: StationId) -> Option<StationStats> {
        let index = usize::try_from(id.into_inner().checked_sub(1)?).ok()?;
        let stats = self.stations.get(index)?;
        Some(*stats.lock().await)
    }

    async fn station_totals(&self) -> Vec<StationTotal> {
        let mut totals = Vec::with_capacity(self.stations.len());
        for stats in &self.stations {
            totals.push(stats.lock().await.total());
        }
        totals
    }
}

/// Join every task in `set`. Returns `kind` if any of them panicked.
async fn join_all(set: &Mutex<JoinSet<()>>, kind: &str) -> Option<String> {
    let mut set = set.lock().await;
    let mut panicked = None;
    while let Some(joined) = set.join_next().await {
        if let Some(e) = joined.err().filter(JoinError::is_panic) {
            error!(worker = kind, error = %e, "worker panicked");
            panicked = Some(kind.to_owned());
        }
    }
    panicked
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use arena_types::Phase;

    use super::*;
    use crate::random::ScriptedRandom;

    fn settings(capacity: usize, station_count: u32) -> ArenaSettings {
        ArenaSettings {
            capacity,
            station_count,
            tick_ms: 1000,
            seed: None,
        }
    }

    fn arena(capacity: usize, station_count: u32, random: ScriptedRandom) -> (Arena, Arc<EventLog>) {
        let log = Arc::new(EventLog::in_memory());
        let arena = Arena::start(
            &settings(capacity, station_count),
            Arc::clone(&log),
            Arc::new(random),
        )
        .unwrap();
        (arena, log)
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_settings_are_rejected() {
        let log = Arc::new(EventLog::in_memory());
        let result = Arena::start(&settings(0, 2), log, Arc::new(ScriptedRandom::new()));
        assert!(matches!(result, Err(ArenaError::Config { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_route_is_declined() {
        let (arena, _log) = arena(3, 2, ScriptedRandom::new());
        let result = arena.admit(StationId(3)).await;
        assert!(matches!(result, Err(ArenaError::InvalidRoute { .. })));
        assert_eq!(arena.live_participants().await, 0);
        arena.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn admissions_stop_at_capacity() {
        let (arena, log) = arena(2, 1, ScriptedRandom::new());
        assert_eq!(arena.admit(StationId(1)).await.unwrap(), Some(ParticipantId(1)));
        assert_eq!(arena.admit(StationId(1)).await.unwrap(), Some(ParticipantId(2)));
        assert_eq!(arena.admit(StationId(1)).await.unwrap(), None);
        assert!(log.contains("The arena is full (2 participants)"));
        arena.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn second_shutdown_is_refused() {
        let (arena, _log) = arena(1, 1, ScriptedRandom::new());
        arena.shutdown().await.unwrap();
        assert!(matches!(arena.shutdown().await, Err(ArenaError::Closed)));
        assert!(matches!(arena.admit(StationId(1)).await, Err(ArenaError::Closed)));
    }

    #[tokio::test(start_paused = true)]
    async fn claimed_participant_warms_up_before_scoring() {
        // Behaviour 1 (valid), duration 2, score 200.
        let random = ScriptedRandom::new()
            .script(1, 10, [1])
            .script(2, 6, [2])
            .script(60, 300, [200]);
        let (arena, _log) = arena(1, 1, random);
        arena.admit(StationId(1)).await.unwrap();

        tokio::time::sleep(Duration::from_millis(2500)).await;
        let phase = arena.participants().await.first().map(|p| p.status.phase);
        assert_eq!(phase, Some(Phase::Selected));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(arena.podium().await.first().unwrap().score, 200);
        assert_eq!(arena.live_participants().await, 0);

        let report = arena.shutdown().await.unwrap();
        assert_eq!(report.served_by(StationId(1)), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn report_lists_every_station_in_order() {
        let (arena, log) = arena(4, 3, ScriptedRandom::new());
        let report = arena.shutdown().await.unwrap();
        let stations: Vec<u32> = report
            .station_totals
            .iter()
            .map(|t| t.station.into_inner())
            .collect();
        assert_eq!(stations, vec![1, 2, 3]);
        assert!(log.contains("Total participants station 3: 0"));
        assert!(log.contains("FIRST POSITION: Participant 0 with 0 points."));
        assert_eq!(report.unserved, None);
    }

    #[tokio::test(start_paused = true)]
    async fn finished_workers_do_not_pile_up_across_admissions() {
        // Every health draw eliminates, so each worker ends within a tick.
        let random = ScriptedRandom::new().script(1, 100, [10; 100]);
        let (arena, log) = arena(1, 1, random);

        for _ in 0..100 {
            tokio::time::sleep(Duration::from_millis(100)).await;
            assert!(arena.admit(StationId(1)).await.unwrap().is_some());
            tokio::time::sleep(Duration::from_millis(1500)).await;
            assert!(arena.participant_tasks.lock().await.len() <= 2);
        }

        assert_eq!(arena.live_participants().await, 0);
        assert!(log.contains("Participant 100: I am dehydrated"));
        let report = arena.shutdown().await.unwrap();
        assert_eq!(report.admitted, 100);
    }
}
