use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::history::SessionRecord;
use crate::timer::{Mode, Settings};

/// Every state change in the system produces an Event.
/// Front-ends subscribe to them; tests drain them from the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: Mode,
        remaining_secs: u32,
        /// False on the first start of a countdown, true when resuming.
        resumed: bool,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: Mode,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerCompleted {
        mode: Mode,
        duration_secs: u32,
        next_mode: Mode,
        at: DateTime<Utc>,
    },
    /// The completion was committed to history (and stats, for focus).
    SessionRecorded {
        record: SessionRecord,
        total_sessions: u32,
        streak: u32,
        at: DateTime<Utc>,
    },
    /// The next mode was armed after the settle delay.
    ModeArmed {
        mode: Mode,
        remaining_secs: u32,
        auto_started: bool,
        at: DateTime<Utc>,
    },
    /// A user command superseded the deferred arm.
    ArmCancelled {
        next_mode: Mode,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: Mode,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    ModeChanged {
        from: Mode,
        to: Mode,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    SettingsUpdated {
        settings: Settings,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TaskCompleted {
        tasks_completed: u32,
        at: DateTime<Utc>,
    },
}
