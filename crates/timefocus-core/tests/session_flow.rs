//! End-to-end session flows through `TimerService`.
//!
//! These drive the service the way a front-end would: a manual clock, a real
//! store, and ticks or skips standing in for elapsed time.

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use timefocus_core::notify::RecordingNotifier;
use timefocus_core::storage::{keys, read_json};
use timefocus_core::{
    Clock, Event, Ledger, ManualClock, MemoryStore, Mode, SessionHistory, Settings, SqliteStore,
    TimerService, TimerState,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn local_noon(day: NaiveDate) -> DateTime<Utc> {
    Local
        .from_local_datetime(&day.and_hms_opt(12, 0, 0).unwrap())
        .single()
        .unwrap()
        .with_timezone(&Utc)
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

fn memory_service(settings: Settings, clock: &ManualClock) -> TimerService {
    let mut ledger = Ledger::new(Box::new(MemoryStore::new()), clock.now());
    ledger.save_settings(&settings);
    TimerService::new(ledger, Box::new(RecordingNotifier::new()), Box::new(clock.clone()))
}

/// Tick the service until the current countdown completes.
fn run_out(service: &mut TimerService, clock: &ManualClock) {
    if !service.is_running() {
        service.toggle();
    }
    while !service.snapshot().session_completed {
        clock.advance(Duration::seconds(1));
        service.tick();
    }
}

/// Arm whatever the last completion scheduled.
fn arm_next(service: &mut TimerService) -> Mode {
    let arm = service.pending_arm().expect("a completion schedules an arm");
    assert!(service.fire_pending_arm(arm.id));
    service.snapshot().mode
}

// ============================================================================
// Cycle
// ============================================================================

#[test]
fn default_focus_runs_1500_ticks_then_short_break() {
    let clock = ManualClock::new(local_noon(day(6)));
    let mut service = memory_service(Settings::default(), &clock);

    service.toggle();
    for _ in 0..1499 {
        clock.advance(Duration::seconds(1));
        service.tick();
    }
    assert_eq!(service.snapshot().remaining_secs, 1);
    assert!(service.history().is_empty());

    clock.advance(Duration::seconds(1));
    service.tick();
    let snap = service.snapshot();
    assert_eq!(snap.state, TimerState::Completed);
    assert_eq!(service.history().len(), 1);

    let record = &service.history().records()[0];
    assert_eq!(record.mode, Mode::Focus);
    assert_eq!(record.duration, 1500);
    assert_eq!(record.end_time - record.start_time, Duration::seconds(1500));

    assert_eq!(arm_next(&mut service), Mode::ShortBreak);
    assert_eq!(service.snapshot().remaining_secs, 300);
    assert!(!service.is_running());
}

#[test]
fn long_break_follows_every_fourth_focus() {
    let clock = ManualClock::new(local_noon(day(6)));
    let mut service = memory_service(Settings::default(), &clock);

    let mut breaks = Vec::new();
    for _ in 0..12 {
        assert_eq!(service.snapshot().mode, Mode::Focus);
        service.skip();
        let next = arm_next(&mut service);
        breaks.push(next);
        service.skip();
        assert_eq!(arm_next(&mut service), Mode::Focus);
    }

    for (i, mode) in breaks.iter().enumerate() {
        let expected = if (i + 1) % 4 == 0 {
            Mode::LongBreak
        } else {
            Mode::ShortBreak
        };
        assert_eq!(*mode, expected, "break after focus #{}", i + 1);
    }
    assert_eq!(service.stats().total_sessions, 12);
    assert_eq!(service.history().len(), 24);
    assert_eq!(service.engine().current_session_number(), 13);
}

#[test]
fn changing_mode_mid_session_preserves_remaining_time() {
    let clock = ManualClock::new(local_noon(day(6)));
    let mut service = memory_service(Settings::default(), &clock);

    service.toggle();
    for _ in 0..100 {
        service.tick();
    }
    service.change_mode(Mode::ShortBreak);
    assert_eq!(service.snapshot().remaining_secs, 300);
    service.change_mode(Mode::Focus);
    assert_eq!(service.snapshot().remaining_secs, 1400);
    assert!(!service.is_running());
    assert!(service.history().is_empty());
}

#[test]
fn changing_mode_after_completion_does_not_credit_twice() {
    let clock = ManualClock::new(local_noon(day(6)));
    let mut service = memory_service(Settings::default(), &clock);

    run_out(&mut service, &clock);
    assert_eq!(service.stats().total_sessions, 1);

    // Leave before the arm fires, then come back to focus.
    service.change_mode(Mode::ShortBreak);
    service.change_mode(Mode::Focus);
    let snap = service.snapshot();
    assert_eq!(snap.remaining_secs, 1500);
    assert_eq!(snap.state, TimerState::Idle);

    service.toggle();
    assert!(service.is_running());
    service.skip();
    assert_eq!(service.stats().total_sessions, 2);
    assert_eq!(service.history().len(), 2);
    assert_eq!(service.stats().total_focus_secs, 3000);
}

#[test]
fn auto_start_arms_running() {
    let clock = ManualClock::new(local_noon(day(6)));
    let settings = Settings {
        auto_start_breaks: true,
        ..Settings::default()
    };
    let mut service = memory_service(settings, &clock);

    service.skip();
    let arm = service.pending_arm().unwrap();
    assert!(arm.auto_start);
    assert_eq!(arm.delay_ms, 2000);
    arm_next(&mut service);
    assert!(service.is_running());

    // Break completion goes back to focus without auto-start.
    service.skip();
    let arm = service.pending_arm().unwrap();
    assert_eq!(arm.next_mode, Mode::Focus);
    assert!(!arm.auto_start);
    assert_eq!(arm.delay_ms, 1000);
}

// ============================================================================
// Streak
// ============================================================================

#[test]
fn streak_grows_on_consecutive_days_and_restarts_after_a_gap() {
    let clock = ManualClock::new(local_noon(day(6)));
    let mut service = memory_service(Settings::default(), &clock);

    service.skip();
    assert_eq!(service.stats().streak, 1);

    // Second focus the same day leaves the streak alone.
    service.reset();
    service.skip();
    assert_eq!(service.stats().streak, 1);

    clock.set(local_noon(day(7)));
    service.reset();
    service.skip();
    assert_eq!(service.stats().streak, 2);

    clock.set(local_noon(day(10)));
    service.reset();
    service.skip();
    assert_eq!(service.stats().streak, 1);
    assert_eq!(service.stats().last_session_date, Some(day(10)));
    assert_eq!(service.stats().total_sessions, 4);
}

#[test]
fn break_sessions_do_not_touch_stats() {
    let clock = ManualClock::new(local_noon(day(6)));
    let mut service = memory_service(Settings::default(), &clock);

    service.change_mode(Mode::LongBreak);
    service.skip();
    assert_eq!(service.history().len(), 1);
    assert_eq!(service.stats().total_sessions, 0);
    assert_eq!(service.stats().streak, 0);
}

// ============================================================================
// Events
// ============================================================================

#[test]
fn completion_emits_recorded_event_with_totals() {
    let clock = ManualClock::new(local_noon(day(6)));
    let mut service = memory_service(Settings::default(), &clock);
    run_out(&mut service, &clock);

    let events = service.drain_events();
    let recorded = events.iter().find_map(|e| match e {
        Event::SessionRecorded {
            record,
            total_sessions,
            streak,
            ..
        } => Some((record.clone(), *total_sessions, *streak)),
        _ => None,
    });
    let (record, total, streak) = recorded.expect("session recorded event");
    assert_eq!(record.mode, Mode::Focus);
    assert_eq!(total, 1);
    assert_eq!(streak, 1);

    // Events serialize with a type tag for front-ends.
    let json = serde_json::to_value(&events[0]).unwrap();
    assert_eq!(json["type"], "TimerStarted");
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn sqlite_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timefocus.db");
    let clock = ManualClock::new(local_noon(day(6)));

    {
        let store = SqliteStore::open(&path).unwrap();
        let mut ledger = Ledger::new(Box::new(store), clock.now());
        ledger.save_settings(&Settings {
            focus_minutes: 30,
            ..Settings::default()
        });
        let mut service =
            TimerService::new(ledger, Box::new(RecordingNotifier::new()), Box::new(clock.clone()));
        service.skip();
        service.complete_task();
    }

    let store = SqliteStore::open(&path).unwrap();
    let history: SessionHistory = read_json(&store, keys::SESSION_HISTORY).unwrap().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history.records()[0].duration, 1800);

    let ledger = Ledger::new(Box::new(store), clock.now());
    assert_eq!(ledger.stats().total_sessions, 1);
    assert_eq!(ledger.stats().tasks_completed, 1);
    assert_eq!(ledger.stats().total_focus_secs, 1800);

    let service =
        TimerService::new(ledger, Box::new(RecordingNotifier::new()), Box::new(clock));
    assert_eq!(service.snapshot().remaining_secs, 1800);
}
