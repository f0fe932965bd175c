//! Timer engine implementation.
//!
//! The engine is a second-granularity state machine with no internal
//! threads and no I/O. The caller feeds it one `tick()` per elapsed second
//! while it is running and passes the current wall-clock time into every
//! command. Completing a session hands a [`Completion`] back to the caller,
//! which is responsible for committing it.
//!
//! ## State Transitions
//!
//! ```text
//! Idle/Paused <-> Running -> Completed --(settle delay)--> Idle | Running (next mode)
//! ```
//!
//! The hop out of `Completed` is deferred: completion stores a
//! [`PendingArm`] and the caller fires it once the delay has elapsed.
//! Any mutating command issued in the meantime cancels it.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(Settings::default());
//! engine.toggle(now);
//! // Once per second:
//! if let Some(done) = engine.tick(now) { /* commit */ }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::mode::{Mode, PerMode};
use super::settings::Settings;
use crate::events::Event;

/// Settle delay before arming the next mode when it will wait for the user.
pub const SETTLE_DELAY: Duration = Duration::from_secs(1);
/// Settle delay before arming a next mode that starts on its own.
pub const AUTO_START_SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Coarse phase derived from the engine flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Completed,
}

/// A deferred "arm the next mode" action scheduled by a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingArm {
    pub id: u64,
    pub next_mode: Mode,
    pub auto_start: bool,
    pub delay_ms: u64,
}

impl PendingArm {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Everything the accounting layer needs to know about a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub mode: Mode,
    /// Always the configured duration, even when the session was skipped.
    pub duration_secs: u32,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub next_mode: Mode,
    pub auto_start: bool,
}

/// Read-only view of the engine for front-ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub mode: Mode,
    pub remaining_secs: u32,
    pub total_secs: u32,
    pub is_running: bool,
    pub session_completed: bool,
    pub current_session_number: u32,
    pub completed_focus_count: u32,
    pub settings: Settings,
    pub pending_arm: Option<PendingArm>,
}

/// Core timer engine.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    settings: Settings,
    durations: PerMode<u32>,
    mode: Mode,
    remaining_secs: u32,
    is_running: bool,
    session_completed: bool,
    session_started_at: Option<DateTime<Utc>>,
    completed_focus_count: u32,
    current_session_number: u32,
    saved_remaining: PerMode<u32>,
    pending_arm: Option<PendingArm>,
    next_arm_id: u64,
    events: Vec<Event>,
}

impl TimerEngine {
    /// Create an idle engine in focus mode with full durations.
    pub fn new(settings: Settings) -> Self {
        let durations = PerMode::from_fn(|m| settings.duration_secs(m));
        Self {
            remaining_secs: durations.get(Mode::Focus),
            settings,
            durations,
            mode: Mode::Focus,
            is_running: false,
            session_completed: false,
            session_started_at: None,
            completed_focus_count: 0,
            current_session_number: 1,
            saved_remaining: durations,
            pending_arm: None,
            next_arm_id: 1,
            events: Vec::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        if self.session_completed {
            TimerState::Completed
        } else if self.is_running {
            TimerState::Running
        } else {
            TimerState::Idle
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn session_completed(&self) -> bool {
        self.session_completed
    }

    pub fn session_started_at(&self) -> Option<DateTime<Utc>> {
        self.session_started_at
    }

    pub fn completed_focus_count(&self) -> u32 {
        self.completed_focus_count
    }

    pub fn current_session_number(&self) -> u32 {
        self.current_session_number
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn pending_arm(&self) -> Option<PendingArm> {
        self.pending_arm
    }

    pub fn full_duration(&self, mode: Mode) -> u32 {
        self.durations.get(mode)
    }

    pub fn saved_remaining(&self, mode: Mode) -> u32 {
        self.saved_remaining.get(mode)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            state: self.state(),
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            total_secs: self.full_duration(self.mode),
            is_running: self.is_running,
            session_completed: self.session_completed,
            current_session_number: self.current_session_number,
            completed_focus_count: self.completed_focus_count,
            settings: self.settings.clone(),
            pending_arm: self.pending_arm,
        }
    }

    /// Take the events produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or resume the countdown. Never resurrects a finished session.
    pub fn start(&mut self, now: DateTime<Utc>) {
        if self.is_running || self.remaining_secs == 0 {
            return;
        }
        let resumed = self.session_started_at.is_some();
        if !resumed {
            self.session_started_at = Some(now);
        }
        self.is_running = true;
        tracing::debug!(mode = %self.mode, remaining = self.remaining_secs, resumed, "timer started");
        self.events.push(Event::TimerStarted {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            resumed,
            at: now,
        });
    }

    pub fn pause(&mut self, now: DateTime<Utc>) {
        if !self.is_running {
            return;
        }
        self.is_running = false;
        tracing::debug!(mode = %self.mode, remaining = self.remaining_secs, "timer paused");
        self.events.push(Event::TimerPaused {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: now,
        });
    }

    pub fn toggle(&mut self, now: DateTime<Utc>) {
        if self.is_running {
            self.pause(now);
        } else {
            self.start(now);
        }
    }

    /// Advance by one second. Returns the completion when this tick
    /// drives the countdown to zero.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Completion> {
        if !self.is_running || self.remaining_secs == 0 {
            return None;
        }
        self.remaining_secs -= 1;
        self.saved_remaining.set(self.mode, self.remaining_secs);
        if self.remaining_secs == 0 {
            return self.complete(now);
        }
        None
    }

    /// Jump to zero and complete, crediting the full configured duration.
    pub fn skip(&mut self, now: DateTime<Utc>) -> Option<Completion> {
        if self.session_completed {
            return None;
        }
        self.remaining_secs = 0;
        self.saved_remaining.set(self.mode, 0);
        self.complete(now)
    }

    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.cancel_pending_arm(now);
        self.is_running = false;
        let full = self.full_duration(self.mode);
        self.remaining_secs = full;
        self.saved_remaining.set(self.mode, full);
        self.session_completed = false;
        self.session_started_at = None;
        self.events.push(Event::TimerReset {
            mode: self.mode,
            remaining_secs: full,
            at: now,
        });
    }

    /// Switch to `new_mode`, remembering where the current mode left off.
    /// Never records a session.
    pub fn change_mode(&mut self, new_mode: Mode, now: DateTime<Utc>) {
        self.cancel_pending_arm(now);
        let from = self.mode;
        // A finished countdown already had its saved time reset by `complete`.
        if !self.session_completed {
            self.saved_remaining.set(from, self.remaining_secs);
        }
        self.is_running = false;
        self.mode = new_mode;
        self.remaining_secs = self.saved_remaining.get(new_mode);
        self.session_completed = false;
        self.session_started_at = None;
        tracing::debug!(%from, to = %new_mode, remaining = self.remaining_secs, "mode changed");
        self.events.push(Event::ModeChanged {
            from,
            to: new_mode,
            remaining_secs: self.remaining_secs,
            at: now,
        });
    }

    /// Replace the settings. Progress on the active countdown is abandoned:
    /// every mode goes back to its new full duration.
    pub fn update_settings(&mut self, settings: Settings, now: DateTime<Utc>) {
        self.cancel_pending_arm(now);
        self.durations = PerMode::from_fn(|m| settings.duration_secs(m));
        self.saved_remaining = self.durations;
        self.settings = settings;
        self.remaining_secs = self.full_duration(self.mode);
        self.session_completed = false;
        self.session_started_at = if self.is_running { Some(now) } else { None };
        self.events.push(Event::SettingsUpdated {
            settings: self.settings.clone(),
            remaining_secs: self.remaining_secs,
            at: now,
        });
    }

    /// Arm the next mode scheduled by the last completion. Stale ids
    /// (cancelled or superseded arms) are ignored.
    pub fn fire_pending_arm(&mut self, id: u64, now: DateTime<Utc>) -> bool {
        match self.pending_arm {
            Some(arm) if arm.id == id => {
                self.pending_arm = None;
                self.arm(arm.next_mode, arm.auto_start, now);
                true
            }
            _ => false,
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self, now: DateTime<Utc>) -> Option<Completion> {
        if self.session_completed {
            return None;
        }
        self.is_running = false;
        self.session_completed = true;

        let mode = self.mode;
        let duration_secs = self.full_duration(mode);
        let started_at = self.session_started_at.take().unwrap_or(now);

        let next_mode = if mode == Mode::Focus {
            self.completed_focus_count += 1;
            self.current_session_number += 1;
            let interval = self.settings.long_break_interval.max(1);
            if self.completed_focus_count % interval == 0 {
                Mode::LongBreak
            } else {
                Mode::ShortBreak
            }
        } else {
            Mode::Focus
        };

        if mode == Mode::Focus {
            self.saved_remaining = self.durations;
        } else {
            self.saved_remaining.set(Mode::Focus, self.durations.get(Mode::Focus));
            self.saved_remaining.set(mode, self.durations.get(mode));
        }

        let auto_start = self.settings.auto_starts(next_mode);
        let delay = if auto_start {
            AUTO_START_SETTLE_DELAY
        } else {
            SETTLE_DELAY
        };
        let id = self.next_arm_id;
        self.next_arm_id += 1;
        self.pending_arm = Some(PendingArm {
            id,
            next_mode,
            auto_start,
            delay_ms: delay.as_millis() as u64,
        });

        tracing::info!(%mode, duration_secs, %next_mode, "session completed");
        self.events.push(Event::TimerCompleted {
            mode,
            duration_secs,
            next_mode,
            at: now,
        });

        Some(Completion {
            mode,
            duration_secs,
            started_at,
            ended_at: now,
            next_mode,
            auto_start,
        })
    }

    fn arm(&mut self, mode: Mode, auto_start: bool, now: DateTime<Utc>) {
        self.mode = mode;
        self.remaining_secs = self.full_duration(mode);
        self.session_completed = false;
        self.session_started_at = None;
        self.is_running = false;
        tracing::info!(%mode, auto_start, "next mode armed");
        self.events.push(Event::ModeArmed {
            mode,
            remaining_secs: self.remaining_secs,
            auto_started: auto_start,
            at: now,
        });
        if auto_start {
            self.start(now);
        }
    }

    fn cancel_pending_arm(&mut self, now: DateTime<Utc>) {
        if let Some(arm) = self.pending_arm.take() {
            tracing::debug!(id = arm.id, next_mode = %arm.next_mode, "pending arm cancelled");
            self.events.push(Event::ArmCancelled {
                next_mode: arm.next_mode,
                at: now,
            });
        }
    }
}
