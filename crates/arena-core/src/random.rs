//! Injected source of uniform random integers.
//!
//! Every stochastic decision in the arena (health checks, lift behaviour,
//! lift duration, score, thirst) goes through [`RandomSource`], so the
//! coordination logic never owns an RNG. Production uses [`SeededRandom`];
//! tests script exact outcomes with [`ScriptedRandom`].

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform integers, shared by all workers.
pub trait RandomSource: Send + Sync {
    /// Draw a uniform integer in `[min, max]` (inclusive).
    ///
    /// Returns `min` if the range is empty or degenerate.
    fn uniform(&self, min: u32, max: u32) -> u32;
}

/// [`StdRng`]-backed source, seeded explicitly or from OS entropy.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    /// Deterministic source for a given seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Non-deterministic source seeded from the operating system.
    pub fn from_os() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Seeded from `seed` when given, otherwise from the operating system.
    pub fn new(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_os, Self::from_seed)
    }
}

impl RandomSource for SeededRandom {
    fn uniform(&self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.random_range(min..=max)
    }
}

/// Scripted source: replays queued values per `(min, max)` range.
///
/// Once a range's queue is exhausted (or was never scripted) the source
/// answers `max`. With the arena's thresholds that means: never eliminated,
/// strength fault, no thirst, longest duration.
#[derive(Debug, Default)]
pub struct ScriptedRandom {
    scripts: Mutex<BTreeMap<(u32, u32), VecDeque<u32>>>,
}

impl ScriptedRandom {
    /// Create an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue values to be returned, in order, for draws over `[min, max]`.
    #[must_use]
    pub fn script(self, min: u32, max: u32, values: impl IntoIterator<Item = u32>) -> Self {
        {
            let mut scripts = self.scripts.lock().unwrap_or_else(PoisonError::into_inner);
            scripts.entry((min, max)).or_default().extend(values);
        }
        self
    }
}

impl RandomSource for ScriptedRandom {
    fn uniform(&self, min: u32, max: u32) -> u32 {
        let mut scripts = self.scripts.lock().unwrap_or_else(PoisonError::into_inner);
        scripts
            .get_mut(&(min, max))
            .and_then(VecDeque::pop_front)
            .map_or(max, |v| v.clamp(min, max))
    }
}
