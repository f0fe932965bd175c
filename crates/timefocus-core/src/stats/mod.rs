//! Aggregate statistics over completed sessions.
//!
//! [`AggregateStats`] is the single running-totals record persisted under
//! `user-stats`. Streak evaluation lives in [`streak`], and read-only
//! analytics over history live in [`summary`].

pub mod streak;
pub mod summary;

pub use streak::apply_streak;
pub use summary::{DailyFocus, ProductivityLevel, Summary};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Running totals. Monotonic except for `streak`, which may reset to 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    #[serde(default)]
    pub total_sessions: u32,
    /// Seconds.
    #[serde(default, rename = "totalFocusTime")]
    pub total_focus_secs: u64,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub tasks_completed: u32,
    /// Seconds, `total_focus_secs / total_sessions`.
    #[serde(
        default,
        rename = "averageSessionLength",
        deserialize_with = "whole_seconds"
    )]
    pub average_session_secs: u32,
    #[serde(default = "Utc::now")]
    pub join_date: DateTime<Utc>,
    #[serde(default, deserialize_with = "calendar_date")]
    pub last_session_date: Option<NaiveDate>,
}

impl AggregateStats {
    pub fn new(join_date: DateTime<Utc>) -> Self {
        Self {
            total_sessions: 0,
            total_focus_secs: 0,
            streak: 0,
            tasks_completed: 0,
            average_session_secs: 0,
            join_date,
            last_session_date: None,
        }
    }

    /// Credit one completed focus session of `duration_secs`.
    pub fn record_focus(&mut self, duration_secs: u32) {
        self.total_sessions += 1;
        self.total_focus_secs += u64::from(duration_secs);
        self.recompute_average();
    }

    pub fn record_task(&mut self) {
        self.tasks_completed += 1;
    }

    fn recompute_average(&mut self) {
        if self.total_sessions > 0 {
            self.average_session_secs =
                (self.total_focus_secs / u64::from(self.total_sessions)) as u32;
        }
    }
}

/// Older stores may hold a fractional average; round it to whole seconds.
fn whole_seconds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0);
    Ok(value.round() as u32)
}

/// Accepts `2024-09-03` and the `Tue Sep 03 2024` form older stores wrote.
/// Anything else reads as no date, which restarts the streak.
fn calendar_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(serde_json::Value::as_str).and_then(parse_date))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%a %b %d %Y"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|at| at.date_naive()))
}
