//! User-configurable timer settings.
//!
//! Persisted as JSON under the `settings` key. Field names are camelCase;
//! the older `focusTime`-style names are accepted on read.

use serde::{Deserialize, Serialize};

use super::mode::Mode;
use crate::error::ValidationError;

pub const MINUTES_RANGE: (u32, u32) = (1, 180);
pub const LONG_BREAK_INTERVAL_RANGE: (u32, u32) = (2, 12);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_focus_minutes", alias = "focusTime")]
    pub focus_minutes: u32,
    #[serde(default = "default_short_break_minutes", alias = "shortBreakTime")]
    pub short_break_minutes: u32,
    #[serde(default = "default_long_break_minutes", alias = "longBreakTime")]
    pub long_break_minutes: u32,
    #[serde(default = "default_long_break_interval")]
    pub long_break_interval: u32,
    #[serde(default)]
    pub auto_start_breaks: bool,
    #[serde(default, alias = "autoStartPomodoros")]
    pub auto_start_focus: bool,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
}

fn default_focus_minutes() -> u32 {
    25
}
fn default_short_break_minutes() -> u32 {
    5
}
fn default_long_break_minutes() -> u32 {
    15
}
fn default_long_break_interval() -> u32 {
    4
}
fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            long_break_interval: default_long_break_interval(),
            auto_start_breaks: false,
            auto_start_focus: false,
            sound_enabled: true,
        }
    }
}

impl Settings {
    pub fn minutes(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Focus => self.focus_minutes,
            Mode::ShortBreak => self.short_break_minutes,
            Mode::LongBreak => self.long_break_minutes,
        }
    }

    /// Full countdown length for `mode`, in seconds.
    pub fn duration_secs(&self, mode: Mode) -> u32 {
        self.minutes(mode).saturating_mul(60)
    }

    /// Whether arming `next` should start the countdown on its own.
    pub fn auto_starts(&self, next: Mode) -> bool {
        if next.is_break() {
            self.auto_start_breaks
        } else {
            self.auto_start_focus
        }
    }

    /// Boundary check applied before settings reach the engine.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let (min, max) = MINUTES_RANGE;
        for (field, value) in [
            ("focus_minutes", self.focus_minutes),
            ("short_break_minutes", self.short_break_minutes),
            ("long_break_minutes", self.long_break_minutes),
        ] {
            check_range(field, value, min, max)?;
        }
        let (min, max) = LONG_BREAK_INTERVAL_RANGE;
        check_range("long_break_interval", self.long_break_interval, min, max)
    }
}

fn check_range(field: &'static str, value: u32, min: u32, max: u32) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            min,
            max,
            value,
        })
    }
}
