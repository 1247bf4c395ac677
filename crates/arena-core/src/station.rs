//! Station workers (the judges).
//!
//! A station loops until cancelled: claim a participant from the roster,
//! wait for its warmup, time and score the lift, update the ranking board,
//! decide whether the participant needs a drink, then count the service and
//! rest after every fourth one.

use std::sync::Arc;

use arena_types::{BEHAVIOR_ROLL, LiftOutcome, Phase, StationId, StationTotal};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::arena::Shared;
use crate::event_log::Actor;
use crate::roster::Claim;

/// Services between rests.
pub const REST_EVERY: u32 = 4;

/// Length of a rest, in ticks.
pub const REST_TICKS: u32 = 10;

/// Pause after claiming another station's participant, in ticks.
pub const ASSIST_PAUSE_TICKS: u32 = 1;

/// Pause when there was nobody to claim, in ticks.
pub const IDLE_PAUSE_TICKS: u32 = 2;

/// Range of the thirst draw; the lowest value means a drink is needed.
pub const THIRST_ROLL: (u32, u32) = (1, 10);

/// Per-station service counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationStats {
    id: StationId,
    rest_counter: u32,
    total_served: u64,
}

impl StationStats {
    /// Fresh counters for a station.
    pub const fn new(id: StationId) -> Self {
        Self {
            id,
            rest_counter: 0,
            total_served: 0,
        }
    }

    /// Count one served participant. Returns `true` when a rest is due.
    pub const fn record_served(&mut self) -> bool {
        self.total_served = self.total_served.saturating_add(1);
        self.rest_counter = self.rest_counter.saturating_add(1);
        self.rest_counter >= REST_EVERY
    }

    /// Reset the rest counter after a rest.
    pub const fn finish_rest(&mut self) {
        self.rest_counter = 0;
    }

    /// Services since the last rest.
    pub const fn rest_counter(&self) -> u32 {
        self.rest_counter
    }

    /// Services since the arena opened. Never decreases.
    pub const fn total_served(&self) -> u64 {
        self.total_served
    }

    /// Report form.
    pub const fn total(&self) -> StationTotal {
        StationTotal {
            station: self.id,
            served: self.total_served,
        }
    }
}

/// A running station.
pub(crate) struct StationWorker {
    id: StationId,
    shared: Arc<Shared>,
    stats: Arc<Mutex<StationStats>>,
}

impl StationWorker {
    pub(crate) const fn new(
        id: StationId,
        shared: Arc<Shared>,
        stats: Arc<Mutex<StationStats>>,
    ) -> Self {
        Self { id, shared, stats }
    }

    /// Serve participants until `token` is cancelled.
    ///
    /// Cancellation is checked before each iteration and also interrupts the
    /// iteration in flight.
    pub(crate) async fn run(self, token: CancellationToken) {
        debug!(station = %self.id, "station opened");
        while !token.is_cancelled() {
            if token.run_until_cancelled(self.step()).await.is_none() {
                break;
            }
        }
        debug!(station = %self.id, "station closed");
    }

    async fn step(&self) {
        let claim = self.shared.roster.lock().await.claim_for(self.id);
        let Some(claim) = claim else {
            sleep(self.shared.ticks(IDLE_PAUSE_TICKS)).await;
            return;
        };

        if claim.assisted {
            debug!(station = %self.id, participant = %claim.id, home = %claim.home, "assisting");
            sleep(self.shared.ticks(ASSIST_PAUSE_TICKS)).await;
        }
        self.serve(claim).await;
    }

    async fn serve(&self, claim: Claim) {
        let shared = &self.shared;
        let judge = Actor::Judge(self.id);

        let mut rx = claim.status.subscribe();
        if rx.wait_for(|s| s.phase == Phase::WarmedUp).await.is_err() {
            return;
        }
        drop(rx);

        let (lo, hi) = BEHAVIOR_ROLL;
        let outcome = LiftOutcome::from_roll(shared.random.uniform(lo, hi));
        let (min_ticks, max_ticks) = outcome.duration_ticks();
        let duration = shared.random.uniform(min_ticks, max_ticks);
        sleep(shared.ticks(duration)).await;

        let score = outcome
            .score_range()
            .map_or(0, |(min, max)| shared.random.uniform(min, max));
        let message = match outcome {
            LiftOutcome::Valid => {
                format!("Participant {} made an amazing lift: {score} points.", claim.id)
            }
            LiftOutcome::ProceduralFault => {
                format!("Participant {} is not wearing trousers: a ZERO!", claim.id)
            }
            LiftOutcome::StrengthFault => {
                format!("Participant {} is a weakling: a ZERO!", claim.id)
            }
        };
        shared.log.record(&judge, &message);

        let place = shared.ranking.lock().await.record(claim.id, score);
        if let Some(place) = place {
            debug!(participant = %claim.id, score, place, "podium updated");
        }

        let (lo, hi) = THIRST_ROLL;
        let needs_drink = shared.random.uniform(lo, hi) == lo;
        if needs_drink {
            shared.log.record(
                &judge,
                &format!("Participant {}, you need to go drink at the fountain.", claim.id),
            );
        }

        claim.status.send_modify(|s| {
            s.score = score;
            s.needs_drink = needs_drink;
            s.phase = Phase::Scored;
        });

        let rest_due = self.stats.lock().await.record_served();
        if rest_due {
            shared.log.record(&judge, "This is so boring, I am going to rest.");
            info!(station = %self.id, "station resting");
            sleep(shared.ticks(REST_TICKS)).await;
            self.stats.lock().await.finish_rest();
            shared.log.record(&judge, "Done resting.");
        }
    }
}
