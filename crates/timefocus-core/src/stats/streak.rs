//! Day streak evaluation.
//!
//! The streak is evaluated lazily, only after a focus completion. A day
//! with no focus session does not break the streak until the next focus
//! session completes.

use chrono::{Days, NaiveDate};

use super::AggregateStats;
use crate::history::SessionHistory;

/// Update `stats.streak` and `stats.last_session_date` for `today`.
///
/// Expects the focus session that triggered the call to already be in
/// `history`. Returns the resulting streak.
pub fn apply_streak(stats: &mut AggregateStats, history: &SessionHistory, today: NaiveDate) -> u32 {
    if history.has_focus_on(today) {
        let yesterday = today.checked_sub_days(Days::new(1));
        match stats.last_session_date {
            Some(last) if Some(last) == yesterday => stats.streak += 1,
            Some(last) if last == today => {}
            _ => stats.streak = 1,
        }
    }
    stats.last_session_date = Some(today);
    stats.streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{Completion, Mode};
    use chrono::{DateTime, Local, TimeZone, Utc};

    fn noon(day: NaiveDate) -> DateTime<Utc> {
        Local
            .from_local_datetime(&day.and_hms_opt(12, 0, 0).unwrap())
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn focus_on(history: &mut SessionHistory, day: NaiveDate) {
        let end = noon(day);
        history.append(&Completion {
            mode: Mode::Focus,
            duration_secs: 1500,
            started_at: end,
            ended_at: end,
            next_mode: Mode::ShortBreak,
            auto_start: false,
        });
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    #[test]
    fn first_session_starts_streak() {
        let mut stats = AggregateStats::new(Utc::now());
        let mut history = SessionHistory::new();
        focus_on(&mut history, day(10));
        assert_eq!(apply_streak(&mut stats, &history, day(10)), 1);
        assert_eq!(stats.last_session_date, Some(day(10)));
    }

    #[test]
    fn consecutive_days_extend_and_gap_resets() {
        let mut stats = AggregateStats::new(Utc::now());
        let mut history = SessionHistory::new();

        focus_on(&mut history, day(10));
        assert_eq!(apply_streak(&mut stats, &history, day(10)), 1);

        focus_on(&mut history, day(11));
        assert_eq!(apply_streak(&mut stats, &history, day(11)), 2);

        focus_on(&mut history, day(13));
        assert_eq!(apply_streak(&mut stats, &history, day(13)), 1);
    }

    #[test]
    fn second_session_same_day_keeps_streak() {
        let mut stats = AggregateStats::new(Utc::now());
        let mut history = SessionHistory::new();
        focus_on(&mut history, day(10));
        apply_streak(&mut stats, &history, day(10));
        focus_on(&mut history, day(11));
        apply_streak(&mut stats, &history, day(11));
        focus_on(&mut history, day(11));
        assert_eq!(apply_streak(&mut stats, &history, day(11)), 2);
    }

    #[test]
    fn no_focus_today_leaves_streak_but_moves_date() {
        let mut stats = AggregateStats::new(Utc::now());
        stats.streak = 4;
        stats.last_session_date = Some(day(9));
        let history = SessionHistory::new();
        assert_eq!(apply_streak(&mut stats, &history, day(10)), 4);
        assert_eq!(stats.last_session_date, Some(day(10)));
    }
}
