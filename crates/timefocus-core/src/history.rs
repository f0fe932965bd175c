//! Append-only log of completed sessions.
//!
//! Persisted as a JSON array under the `session-history` key and capped at
//! the most recent [`HISTORY_LIMIT`] entries.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Completion, Mode};

pub const HISTORY_LIMIT: usize = 100;

/// One completed session. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: i64,
    pub mode: Mode,
    /// Seconds credited to the session.
    pub duration: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub date: DateTime<Utc>,
}

impl SessionRecord {
    /// Local calendar day the session finished on.
    pub fn local_date(&self) -> NaiveDate {
        self.date.with_timezone(&Local).date_naive()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionHistory {
    records: Vec<SessionRecord>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record for `completion`, evicting the oldest entries past
    /// the cap. Returns the appended record.
    pub fn append(&mut self, completion: &Completion) -> SessionRecord {
        let mut id = completion.ended_at.timestamp_millis();
        if let Some(last) = self.records.last() {
            id = id.max(last.id + 1);
        }
        let record = SessionRecord {
            id,
            mode: completion.mode,
            duration: completion.duration_secs,
            start_time: completion.started_at,
            end_time: completion.ended_at,
            date: completion.ended_at,
        };
        self.push(record.clone());
        record
    }

    pub fn push(&mut self, record: SessionRecord) {
        self.records.push(record);
        if self.records.len() > HISTORY_LIMIT {
            let excess = self.records.len() - HISTORY_LIMIT;
            self.records.drain(..excess);
        }
    }

    /// Whether any focus session finished on `day` (local time).
    pub fn has_focus_on(&self, day: NaiveDate) -> bool {
        self.records
            .iter()
            .any(|r| r.mode == Mode::Focus && r.local_date() == day)
    }

    /// Records that finished on `day` (local time).
    pub fn on_day(&self, day: NaiveDate) -> impl Iterator<Item = &SessionRecord> {
        self.records.iter().filter(move |r| r.local_date() == day)
    }
}
