//! Read-only analytics derived from history, stats and the task list.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::AggregateStats;
use crate::history::SessionHistory;

/// Number of days covered by the weekly figures, today included.
pub const WEEK_DAYS: u64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductivityLevel {
    GettingStarted,
    BuildingMomentum,
    Focused,
    Productive,
    Master,
}

impl ProductivityLevel {
    pub fn for_sessions(total_sessions: u32) -> Self {
        match total_sessions {
            0..=4 => Self::GettingStarted,
            5..=19 => Self::BuildingMomentum,
            20..=49 => Self::Focused,
            50..=99 => Self::Productive,
            _ => Self::Master,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::GettingStarted => "Getting Started",
            Self::BuildingMomentum => "Building Momentum",
            Self::Focused => "Focused",
            Self::Productive => "Productive",
            Self::Master => "Master",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyFocus {
    pub date: NaiveDate,
    /// Short weekday name, e.g. "Mon".
    pub day: String,
    pub focus_min: u32,
    pub sessions: u32,
}

/// Snapshot of the analytics view.
///
/// Minute figures count every recorded session, breaks included, and are
/// rounded to the nearest minute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub today_focus_min: u32,
    pub weekly_focus_min: u32,
    pub weekly_sessions: u32,
    pub daily: Vec<DailyFocus>,
    pub total_sessions: u32,
    pub total_focus_min: u32,
    pub average_session_min: u32,
    pub current_streak: u32,
    pub tasks_completed: u32,
    pub total_tasks: u32,
    pub completion_rate_pct: u32,
    pub level: ProductivityLevel,
}

impl Summary {
    /// `tasks` is the raw task list; only each entry's `completed` flag is read.
    pub fn build(
        history: &SessionHistory,
        stats: &AggregateStats,
        tasks: &[serde_json::Value],
        today: NaiveDate,
    ) -> Self {
        let daily: Vec<DailyFocus> = (0..WEEK_DAYS)
            .rev()
            .filter_map(|back| today.checked_sub_days(Days::new(back)))
            .map(|date| {
                let (secs, sessions) = history
                    .on_day(date)
                    .fold((0u64, 0u32), |(s, n), r| (s + u64::from(r.duration), n + 1));
                DailyFocus {
                    date,
                    day: date.weekday().to_string(),
                    focus_min: round_minutes(secs),
                    sessions,
                }
            })
            .collect();

        let today_secs: u64 = history.on_day(today).map(|r| u64::from(r.duration)).sum();
        let week_start = today.checked_sub_days(Days::new(WEEK_DAYS - 1));
        let (week_secs, weekly_sessions) = history
            .records()
            .iter()
            .filter(|r| week_start.map_or(true, |start| r.local_date() >= start))
            .fold((0u64, 0u32), |(s, n), r| (s + u64::from(r.duration), n + 1));

        let total_tasks = tasks.len() as u32;
        let done_tasks = tasks
            .iter()
            .filter(|t| t.get("completed").and_then(|c| c.as_bool()).unwrap_or(false))
            .count() as u32;
        let completion_rate_pct = if total_tasks > 0 {
            ((f64::from(done_tasks) / f64::from(total_tasks)) * 100.0).round() as u32
        } else {
            0
        };

        Self {
            today_focus_min: round_minutes(today_secs),
            weekly_focus_min: round_minutes(week_secs),
            weekly_sessions,
            daily,
            total_sessions: stats.total_sessions,
            total_focus_min: round_minutes(stats.total_focus_secs),
            average_session_min: round_minutes(u64::from(stats.average_session_secs)),
            current_streak: stats.streak,
            tasks_completed: stats.tasks_completed,
            total_tasks,
            completion_rate_pct,
            level: ProductivityLevel::for_sessions(stats.total_sessions),
        }
    }
}

fn round_minutes(secs: u64) -> u32 {
    ((secs + 30) / 60) as u32
}
