//! End-to-end competition scenarios.
//!
//! Every test runs on a paused Tokio clock with a one-second tick, so the
//! warmup, lift, and rest sleeps advance virtually. Outcomes are scripted
//! through [`ScriptedRandom`]. Behaviour and thirst draws share the `(1, 10)`
//! range, so their scripts interleave: behaviour, thirst, behaviour, ...

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use arena_core::arena::Arena;
use arena_core::config::ArenaSettings;
use arena_core::event_log::EventLog;
use arena_core::random::ScriptedRandom;
use arena_types::{ParticipantId, StationId};

fn open(capacity: usize, station_count: u32, random: ScriptedRandom) -> (Arena, Arc<EventLog>) {
    let settings = ArenaSettings {
        capacity,
        station_count,
        tick_ms: 1000,
        seed: None,
    };
    let log = Arc::new(EventLog::in_memory());
    let arena = Arena::start(&settings, Arc::clone(&log), Arc::new(random)).unwrap();
    (arena, log)
}

/// Let the stations run their first (empty) scan so they sit in their idle
/// pause before anyone is admitted.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}

async fn advance(seconds: u64) {
    tokio::time::sleep(Duration::from_secs(seconds)).await;
}

#[tokio::test(start_paused = true)]
async fn full_single_slot_arena_declines_until_the_slot_frees() {
    let (arena, log) = open(1, 1, ScriptedRandom::new());
    settle().await;

    let first = arena.admit(StationId(1)).await.unwrap().unwrap();
    assert_eq!(arena.admit(StationId(1)).await.unwrap(), None);
    assert!(log.contains("The arena is full (1 participants)"));

    // Unscripted draws: strength fault lasting 10 ticks, no drink.
    advance(25).await;
    assert_eq!(arena.live_participants().await, 0);

    let second = arena.admit(StationId(1)).await.unwrap().unwrap();
    assert!(second > first);

    let report = arena.shutdown().await.unwrap();
    assert_eq!(report.admitted, 2);
    assert_eq!(report.served_by(StationId(1)), Some(1));
}

#[tokio::test(start_paused = true)]
async fn waiting_participant_can_be_eliminated() {
    let random = ScriptedRandom::new().script(1, 100, [10]);
    let (arena, log) = open(2, 1, random);
    settle().await;

    arena.admit(StationId(1)).await.unwrap();
    advance(1).await;

    assert_eq!(arena.live_participants().await, 0);
    assert!(log.contains("Participant 1: I am dehydrated"));

    advance(10).await;
    let report = arena.shutdown().await.unwrap();
    assert_eq!(report.served_by(StationId(1)), Some(0));
    assert!(report.podium.iter().all(|e| e.score == 0));
}

#[tokio::test(start_paused = true)]
async fn second_thirsty_participant_serves_the_first() {
    let random = ScriptedRandom::new()
        .script(1, 10, [1, 1, 1, 1])
        .script(2, 6, [2, 2])
        .script(60, 300, [100, 200]);
    let (arena, log) = open(2, 1, random);
    settle().await;

    arena.admit(StationId(1)).await.unwrap();
    arena.admit(StationId(1)).await.unwrap();

    advance(10).await;
    assert_eq!(arena.fountain_occupant().await, Some(ParticipantId(1)));
    assert!(log.contains("Participant 1: Going to the fountain, but what a pity"));

    advance(20).await;
    assert!(log.contains("Participant 2: Going to the fountain, but no luck"));
    assert!(log.contains("Participant 1: I already drank"));
    assert_eq!(arena.fountain_occupant().await, Some(ParticipantId(2)));

    let report = arena.shutdown().await.unwrap();
    assert_eq!(report.unserved, Some(ParticipantId(2)));
    assert!(log.contains("Participant 2: I am leaving without a drink"));
    assert!(!log.contains("Participant 2: I already drank"));

    let podium: Vec<(u64, u32)> = report
        .podium
        .iter()
        .map(|e| (e.participant.into_inner(), e.score))
        .collect();
    assert_eq!(podium, vec![(2, 200), (1, 100), (0, 0)]);
}

#[tokio::test(start_paused = true)]
async fn shutdown_reports_a_parked_participant_without_deadlock() {
    let random = ScriptedRandom::new()
        .script(1, 10, [1, 1])
        .script(2, 6, [2])
        .script(60, 300, [150]);
    let (arena, log) = open(3, 2, random);
    settle().await;

    arena.admit(StationId(2)).await.unwrap();
    advance(15).await;
    assert_eq!(arena.fountain_occupant().await, Some(ParticipantId(1)));

    let report = tokio::time::timeout(Duration::from_secs(5), arena.shutdown())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(report.unserved, Some(ParticipantId(1)));

    let lines = log.lines();
    let end = lines.iter().position(|l| l.contains("END OF PROGRAM")).unwrap();
    let complaint = lines
        .iter()
        .position(|l| l.contains("leaving without a drink"))
        .unwrap();
    let first_place = lines.iter().position(|l| l.contains("FIRST POSITION")).unwrap();
    assert!(end < complaint);
    assert!(complaint < first_place);
}

#[tokio::test(start_paused = true)]
async fn zero_scores_stay_off_a_full_podium() {
    // Three valid lifts, then a procedural fault and a strength fault.
    let random = ScriptedRandom::new()
        .script(1, 10, [1, 10, 1, 10, 1, 10, 9, 10, 10, 10])
        .script(2, 6, [2, 2, 2])
        .script(1, 4, [1])
        .script(6, 10, [6])
        .script(60, 300, [70, 80, 90]);
    let (arena, log) = open(5, 1, random);
    settle().await;

    for _ in 0..5 {
        arena.admit(StationId(1)).await.unwrap();
    }
    advance(80).await;

    assert!(log.contains("Participant 4 is not wearing trousers: a ZERO!"));
    assert!(log.contains("Participant 5 is a weakling: a ZERO!"));
    assert!(log.contains("This is so boring, I am going to rest."));
    assert!(log.contains("Done resting."));

    let report = arena.shutdown().await.unwrap();
    assert_eq!(report.served_by(StationId(1)), Some(5));
    let ids: Vec<u64> = report
        .podium
        .iter()
        .map(|e| e.participant.into_inner())
        .collect();
    assert_eq!(ids, vec![3, 2, 1]);
}

#[tokio::test(start_paused = true)]
async fn idle_station_helps_a_busy_one() {
    let (arena, _log) = open(3, 2, ScriptedRandom::new());
    settle().await;

    for _ in 0..3 {
        arena.admit(StationId(1)).await.unwrap();
    }
    advance(60).await;

    let report = arena.shutdown().await.unwrap();
    let first = report.served_by(StationId(1)).unwrap();
    let second = report.served_by(StationId(2)).unwrap();
    assert_eq!(first + second, 3);
    assert!(second >= 1, "station 2 never assisted");
}

#[tokio::test(start_paused = true)]
async fn shutdown_during_warmup_stops_everyone() {
    let (arena, _log) = open(2, 1, ScriptedRandom::new());
    settle().await;

    arena.admit(StationId(1)).await.unwrap();
    advance(3).await;

    let report = arena.shutdown().await.unwrap();
    assert_eq!(report.served_by(StationId(1)), Some(0));
    assert_eq!(report.unserved, None);
    assert!(matches!(
        arena.admit(StationId(1)).await,
        Err(arena_core::error::ArenaError::Closed)
    ));
}

#[tokio::test(start_paused = true)]
async fn station_rests_after_its_fourth_service() {
    // Four valid lifts of two ticks each, nobody thirsty.
    let random = ScriptedRandom::new()
        .script(1, 10, [1, 10, 1, 10, 1, 10, 1, 10])
        .script(2, 6, [2, 2, 2, 2])
        .script(60, 300, [100, 120, 140, 160]);
    let (arena, log) = open(5, 1, random);
    settle().await;

    for _ in 0..4 {
        arena.admit(StationId(1)).await.unwrap();
    }

    // Services end at t=8, 14, 20 and 26; the rest runs until t=36.
    advance(21).await;
    let stats = arena.station_stats(StationId(1)).await.unwrap();
    assert_eq!(stats.rest_counter(), 3);
    assert_eq!(stats.total_served(), 3);
    assert!(!log.contains("This is so boring"));

    advance(9).await;
    let stats = arena.station_stats(StationId(1)).await.unwrap();
    assert_eq!(stats.rest_counter(), 4);
    assert!(log.contains("Judge 1: This is so boring, I am going to rest."));
    assert!(!log.contains("Done resting."));

    advance(10).await;
    let stats = arena.station_stats(StationId(1)).await.unwrap();
    assert_eq!(stats.rest_counter(), 0);
    assert_eq!(stats.total_served(), 4);
    assert!(log.contains("Judge 1: Done resting."));
    assert!(arena.station_stats(StationId(2)).await.is_none());

    let report = arena.shutdown().await.unwrap();
    assert_eq!(report.served_by(StationId(1)), Some(4));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_admissions_never_exceed_capacity() {
    let settings = ArenaSettings {
        capacity: 5,
        station_count: 2,
        tick_ms: 60_000,
        seed: None,
    };
    let log = Arc::new(EventLog::in_memory());
    let arena = Arc::new(Arena::start(&settings, log, Arc::new(ScriptedRandom::new())).unwrap());

    let mut requests = tokio::task::JoinSet::new();
    for route in [1, 2].into_iter().cycle().take(20) {
        let arena = Arc::clone(&arena);
        requests.spawn(async move { arena.admit(StationId(route)).await });
    }
    let mut admitted = Vec::new();
    while let Some(joined) = requests.join_next().await {
        if let Some(id) = joined.unwrap().unwrap() {
            admitted.push(id);
        }
    }

    admitted.sort();
    admitted.dedup();
    assert_eq!(admitted.len(), 5);
    assert!(arena.live_participants().await <= 5);

    let report = arena.shutdown().await.unwrap();
    assert_eq!(report.admitted, 5);
}

#[tokio::test(start_paused = true)]
async fn shutdown_mid_lift_scores_nothing_after_the_end() {
    // Unscripted draws: strength fault lasting 10 ticks, from t=6 to t=16.
    let (arena, log) = open(1, 1, ScriptedRandom::new());
    settle().await;

    arena.admit(StationId(1)).await.unwrap();
    advance(10).await;
    assert!(!log.contains("weakling"));

    let report = arena.shutdown().await.unwrap();
    assert_eq!(report.served_by(StationId(1)), Some(0));
    assert!(report.podium.iter().all(|e| e.participant == ParticipantId::NONE));
    assert!(!log.contains("weakling"));
    assert_eq!(
        arena.station_stats(StationId(1)).await.unwrap().total_served(),
        0
    );

    let lines = log.lines();
    let end = lines.iter().position(|l| l.contains("END OF PROGRAM")).unwrap();
    assert!(lines.iter().skip(end).all(|l| !l.contains("Judge 1")));
}
