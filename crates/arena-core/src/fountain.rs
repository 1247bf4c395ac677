//! The fountain: a single-slot, two-party rendezvous.
//!
//! The first thirsty participant cannot work the fountain alone. It parks its
//! snapshot in the slot and waits. The next thirsty participant presses the
//! button for it (waking exactly that waiter) and then parks itself in the
//! slot, waiting in turn for whoever comes after. Service therefore
//! alternates one participant at a time, and the slot never holds more than
//! one snapshot.
//!
//! The wait is unbounded. The only way out other than being served is
//! [`Fountain::drain`] during shutdown, which reports the parked participant
//! as unserved.

use arena_types::{Participant, ParticipantId};
use tokio::sync::{Mutex, oneshot};
use tracing::debug;

use crate::event_log::{Actor, EventLog};

/// A parked participant and the channel that wakes it.
#[derive(Debug)]
struct Waiter {
    participant: Participant,
    wake: oneshot::Sender<()>,
}

#[derive(Debug, Default)]
struct FountainState {
    /// Set by the first arrival and never cleared, even by a drain.
    used: bool,
    waiting: Option<Waiter>,
}

/// Handle a parked participant waits on.
#[derive(Debug)]
pub struct Ticket {
    rx: oneshot::Receiver<()>,
}

impl Ticket {
    /// Wait until another participant presses the button.
    ///
    /// Resolves to `false` if the fountain was drained instead.
    pub async fn served(self) -> bool {
        self.rx.await.is_ok()
    }
}

/// The shared rendezvous slot.
#[derive(Debug, Default)]
pub struct Fountain {
    state: Mutex<FountainState>,
}

impl Fountain {
    /// An empty fountain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arrive at the fountain.
    ///
    /// If someone is already parked, this participant wakes them first. In
    /// both cases it then parks itself and gets a [`Ticket`] to wait on.
    pub async fn enter(&self, participant: Participant, log: &EventLog) -> Ticket {
        let actor = Actor::Participant(participant.id);
        let mut state = self.state.lock().await;

        if state.used {
            log.record(
                &actor,
                "Going to the fountain, but no luck: it is not my turn to drink, only to press the button.",
            );
            if let Some(previous) = state.waiting.take() {
                debug!(served = %previous.participant.id, by = %participant.id, "fountain hand-off");
                // A dropped receiver means the waiter was cancelled; nobody
                // is left to serve.
                let _ = previous.wake.send(());
            }
        }
        state.used = true;

        log.record(
            &actor,
            "Going to the fountain, but what a pity: I am too weak to press the button.",
        );
        let (wake, rx) = oneshot::channel();
        state.waiting = Some(Waiter { participant, wake });
        Ticket { rx }
    }

    /// Take the parked participant, if any, without serving it.
    ///
    /// Its [`Ticket`] resolves to `false`.
    pub async fn drain(&self) -> Option<Participant> {
        let mut state = self.state.lock().await;
        state.waiting.take().map(|w| w.participant)
    }

    /// The participant currently parked, if any.
    pub async fn occupant(&self) -> Option<Participant> {
        let state = self.state.lock().await;
        state.waiting.as_ref().map(|w| w.participant)
    }

    /// Id of the parked participant, if any.
    pub async fn occupant_id(&self) -> Option<ParticipantId> {
        self.occupant().await.map(|p| p.id)
    }
}
