//! Participant workers.
//!
//! One task per admitted participant. It waits to be claimed while passing
//! a health check every tick, warms up once claimed, waits for its score,
//! frees its roster slot, and visits the fountain if the judge told it to.
//! The whole run is wrapped in the participant cancellation token so a
//! shutdown stops it wherever it is blocked.

use std::sync::Arc;

use arena_types::{Participant, ParticipantId, Phase, StationId};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::arena::Shared;
use crate::event_log::Actor;
use crate::roster::{Admission, StatusCell};

/// Range of the per-tick health draw.
pub const HEALTH_ROLL: (u32, u32) = (1, 100);

/// Health draws at or below this value eliminate a waiting participant.
pub const ELIMINATION_THRESHOLD: u32 = 15;

/// Warmup length, in ticks.
pub const WARMUP_TICKS: u32 = 4;

/// A running participant.
pub(crate) struct ParticipantWorker {
    id: ParticipantId,
    station: StationId,
    status: StatusCell,
    shared: Arc<Shared>,
}

impl ParticipantWorker {
    pub(crate) fn new(admission: &Admission, shared: Arc<Shared>) -> Self {
        Self {
            id: admission.id,
            station: admission.station,
            status: Arc::clone(&admission.status),
            shared,
        }
    }

    /// Compete until done or until `token` is cancelled.
    pub(crate) async fn run(self, token: CancellationToken) {
        let id = self.id;
        if token.run_until_cancelled(self.compete()).await.is_none() {
            debug!(participant = %id, "participant cancelled");
        }
    }

    async fn compete(self) {
        let shared = Arc::clone(&self.shared);
        let actor = Actor::Participant(self.id);
        let mut rx = self.status.subscribe();

        loop {
            if rx.borrow().phase != Phase::Waiting {
                break;
            }
            let (lo, hi) = HEALTH_ROLL;
            if shared.random.uniform(lo, hi) <= ELIMINATION_THRESHOLD
                && shared.roster.lock().await.eliminate_if_waiting(self.id)
            {
                shared.log.record(
                    &actor,
                    "I am dehydrated from all the stress and cannot make my lift.",
                );
                return;
            }
            tokio::select! {
                () = sleep(shared.tick) => {}
                changed = rx.wait_for(|s| s.phase != Phase::Waiting) => {
                    if changed.is_err() {
                        return;
                    }
                }
            }
        }

        shared.log.record(
            &actor,
            &format!("I entered station {}, you are about to find out!", self.station),
        );
        shared
            .log
            .record(&actor, "Warming up my feet a little before the lift.");
        sleep(shared.ticks(WARMUP_TICKS)).await;
        self.status.send_modify(|s| s.phase = Phase::WarmedUp);

        let Ok(status) = rx.wait_for(|s| s.phase.is_scored()).await.map(|s| *s) else {
            return;
        };
        shared
            .log
            .record(&actor, "I finished my lift and my feet hurt.");
        shared.roster.lock().await.release(self.id);

        if !status.needs_drink {
            return;
        }

        self.status.send_modify(|s| s.phase = Phase::FountainQueued);
        let snapshot = Participant {
            id: self.id,
            station: self.station,
            status: *self.status.borrow(),
        };
        let ticket = shared.fountain.enter(snapshot, &shared.log).await;
        if ticket.served().await {
            self.status.send_modify(|s| s.phase = Phase::FountainServed);
            shared.log.record(
                &actor,
                "I already drank, but the water is as warm as at my gym.",
            );
        }
    }
}
