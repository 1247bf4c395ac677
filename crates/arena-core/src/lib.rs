//! Coordination engine for the Arena competition simulator.
//!
//! A bounded roster admits participants and routes them to stations. Each
//! station claims its longest-waiting participant (or helps another
//! station's queue), scores the lift, and feeds a top-3 board. Thirsty
//! participants pair up at a single-slot fountain.
//!
//! # Modules
//!
//! - [`arena`] -- [`Arena`]: worker lifecycle, admission, and the shutdown
//!   protocol.
//! - [`config`] -- Configuration loading from `arena-config.yaml`.
//! - [`error`] -- [`ArenaError`].
//! - [`event_log`] -- The timestamped, line-per-event competition record.
//! - [`fountain`] -- The two-party rendezvous slot.
//! - [`participant`] -- Per-participant worker and its thresholds.
//! - [`random`] -- [`RandomSource`] trait, seeded and scripted sources.
//! - [`ranking`] -- The top-3 podium.
//! - [`roster`] -- Fixed-capacity participant table.
//! - [`station`] -- Station workers and their service counters.
//!
//! [`Arena`]: arena::Arena
//! [`ArenaError`]: error::ArenaError
//! [`RandomSource`]: random::RandomSource

pub mod arena;
pub mod config;
pub mod error;
pub mod event_log;
pub mod fountain;
pub mod participant;
pub mod random;
pub mod ranking;
pub mod roster;
pub mod station;
