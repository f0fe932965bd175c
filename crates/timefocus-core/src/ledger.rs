//! Session accounting.
//!
//! [`Ledger`] is the only writer of history, stats and settings. Completions
//! are committed through [`Ledger::commit`], which performs the whole
//! read-modify-write for history, totals and streak in one place.
//!
//! Store failures never reach the caller: they are logged, the write is
//! dropped, and the in-memory copies carry on as the source of truth.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::history::{SessionHistory, SessionRecord};
use crate::notify::NotificationPrefs;
use crate::stats::{apply_streak, AggregateStats};
use crate::storage::{keys, read_json, write_json, KeyValueStore};
use crate::timer::{Completion, Mode, Settings};

/// Result of committing one completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    pub record: SessionRecord,
    pub stats: AggregateStats,
}

pub struct Ledger {
    store: Box<dyn KeyValueStore + Send>,
    history: SessionHistory,
    stats: AggregateStats,
}

impl Ledger {
    /// Wrap `store`, loading history and stats (defaults when absent).
    pub fn new(store: Box<dyn KeyValueStore + Send>, now: DateTime<Utc>) -> Self {
        let mut ledger = Self {
            store,
            history: SessionHistory::new(),
            stats: AggregateStats::new(now),
        };
        ledger.history = ledger.load(keys::SESSION_HISTORY).unwrap_or_default();
        if let Some(stats) = ledger.load(keys::USER_STATS) {
            ledger.stats = stats;
        }
        ledger
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    pub fn stats(&self) -> &AggregateStats {
        &self.stats
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        &*self.store
    }

    pub fn store_mut(&mut self) -> &mut dyn KeyValueStore {
        &mut *self.store
    }

    /// Record `completion` and, for focus sessions, update totals and streak.
    pub fn commit(&mut self, completion: &Completion, today: NaiveDate) -> CommitOutcome {
        if let Some(history) = self.load(keys::SESSION_HISTORY) {
            self.history = history;
        }
        let record = self.history.append(completion);
        persist(&mut *self.store, keys::SESSION_HISTORY, &self.history);

        if completion.mode == Mode::Focus {
            self.reload_stats();
            self.stats.record_focus(completion.duration_secs);
            apply_streak(&mut self.stats, &self.history, today);
            persist(&mut *self.store, keys::USER_STATS, &self.stats);
        }

        tracing::debug!(
            id = record.id,
            mode = %record.mode,
            total_sessions = self.stats.total_sessions,
            streak = self.stats.streak,
            "session committed"
        );

        CommitOutcome {
            record,
            stats: self.stats.clone(),
        }
    }

    /// Bump the completed-task counter. Returns the new count.
    pub fn record_task_completed(&mut self) -> u32 {
        self.reload_stats();
        self.stats.record_task();
        persist(&mut *self.store, keys::USER_STATS, &self.stats);
        self.stats.tasks_completed
    }

    pub fn load_settings(&self) -> Settings {
        self.load(keys::SETTINGS).unwrap_or_default()
    }

    pub fn save_settings(&mut self, settings: &Settings) {
        persist(&mut *self.store, keys::SETTINGS, settings);
    }

    pub fn notification_prefs(&self) -> NotificationPrefs {
        self.load(keys::NOTIFICATIONS).unwrap_or_default()
    }

    pub fn save_notification_prefs(&mut self, prefs: &NotificationPrefs) {
        persist(&mut *self.store, keys::NOTIFICATIONS, prefs);
    }

    pub fn motivation_enabled(&self) -> bool {
        self.load(keys::MOTIVATION_ENABLED).unwrap_or(true)
    }

    pub fn set_motivation_enabled(&mut self, enabled: bool) {
        persist(&mut *self.store, keys::MOTIVATION_ENABLED, &enabled);
    }

    /// Raw task list, or empty when absent.
    pub fn tasks(&self) -> Vec<serde_json::Value> {
        self.load(keys::TASKS).unwrap_or_default()
    }

    fn reload_stats(&mut self) {
        if let Some(stats) = self.load(keys::USER_STATS) {
            self.stats = stats;
        }
    }

    /// Read `key`, logging store failures. `None` means "use what you have".
    pub(crate) fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match read_json(&*self.store, key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "store read failed; using in-memory state");
                None
            }
        }
    }
}

fn persist<T: Serialize + ?Sized>(store: &mut dyn KeyValueStore, key: &str, value: &T) {
    if let Err(e) = write_json(store, key, value) {
        tracing::warn!(key, error = %e, "store write failed; change kept in memory only");
    }
}
