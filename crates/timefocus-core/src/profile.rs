//! User profile: display name, join date and session-based level.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::ledger::Ledger;
use crate::storage::{keys, write_json};

pub const DEFAULT_USERNAME: &str = "Pomodoro Master";

/// Session thresholds for levels 1 through 4; level 5 has no ceiling.
const LEVEL_CEILINGS: [u32; 4] = [10, 50, 100, 250];
const LEVEL_TITLES: [&str; 5] = ["Beginner", "Focused", "Productive", "Expert", "Master"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub level: u8,
    pub title: String,
    /// Total sessions needed to reach the next level; `None` at the top.
    pub next_at: Option<u32>,
}

impl Level {
    pub fn for_sessions(total_sessions: u32) -> Self {
        let idx = LEVEL_CEILINGS
            .iter()
            .position(|&ceiling| total_sessions < ceiling)
            .unwrap_or(LEVEL_CEILINGS.len());
        Self {
            level: idx as u8 + 1,
            title: LEVEL_TITLES[idx].to_string(),
            next_at: LEVEL_CEILINGS.get(idx).copied(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    pub join_date: DateTime<Utc>,
    pub total_sessions: u32,
    pub level: Level,
}

impl Profile {
    /// Read the profile, recording `now` as the join date on first use.
    pub fn load(ledger: &mut Ledger, now: DateTime<Utc>) -> Self {
        let username: String = ledger
            .load(keys::USERNAME)
            .unwrap_or_else(|| DEFAULT_USERNAME.to_string());
        let join_date = match ledger.load(keys::JOIN_DATE) {
            Some(date) => date,
            None => {
                if let Err(e) = write_json(ledger.store_mut(), keys::JOIN_DATE, &now) {
                    tracing::warn!(error = %e, "could not record join date");
                }
                now
            }
        };
        let total_sessions = ledger.stats().total_sessions;
        Self {
            username,
            join_date,
            total_sessions,
            level: Level::for_sessions(total_sessions),
        }
    }

    /// Store a new display name. Surrounding whitespace is trimmed.
    pub fn rename(ledger: &mut Ledger, name: &str) -> Result<String, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "username".into(),
                message: "cannot be empty".into(),
            });
        }
        if let Err(e) = write_json(ledger.store_mut(), keys::USERNAME, name) {
            tracing::warn!(error = %e, "could not store username");
        }
        Ok(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 2, 8, 30, 0).unwrap()
    }

    #[test]
    fn level_thresholds() {
        assert_eq!(Level::for_sessions(0).level, 1);
        assert_eq!(Level::for_sessions(9).next_at, Some(10));
        assert_eq!(Level::for_sessions(10).level, 2);
        assert_eq!(Level::for_sessions(99).title, "Productive");
        assert_eq!(Level::for_sessions(249).level, 4);
        let top = Level::for_sessions(250);
        assert_eq!(top.level, 5);
        assert_eq!(top.title, "Master");
        assert!(top.next_at.is_none());
    }

    #[test]
    fn first_load_records_join_date() {
        let mut ledger = Ledger::new(Box::new(MemoryStore::new()), now());
        let profile = Profile::load(&mut ledger, now());
        assert_eq!(profile.username, DEFAULT_USERNAME);
        assert_eq!(profile.join_date, now());

        let later = now() + chrono::Duration::days(3);
        let again = Profile::load(&mut ledger, later);
        assert_eq!(again.join_date, now());
    }

    #[test]
    fn rename_trims_and_rejects_blank() {
        let mut ledger = Ledger::new(Box::new(MemoryStore::new()), now());
        assert_eq!(Profile::rename(&mut ledger, "  Ada  ").unwrap(), "Ada");
        assert_eq!(Profile::load(&mut ledger, now()).username, "Ada");
        assert!(Profile::rename(&mut ledger, "   ").is_err());
    }
}
