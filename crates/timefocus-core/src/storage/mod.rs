mod config;
pub mod database;
pub mod json_path;
mod memory;

pub use config::{Config, LoggingConfig, NotificationsConfig, StorageConfig};
pub use database::SqliteStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;

/// Keys the application keeps in the key-value store.
pub mod keys {
    pub const SETTINGS: &str = "settings";
    pub const TASKS: &str = "tasks";
    pub const SESSION_HISTORY: &str = "session-history";
    pub const USER_STATS: &str = "user-stats";
    pub const USERNAME: &str = "username";
    pub const JOIN_DATE: &str = "join-date";
    pub const MOTIVATION_ENABLED: &str = "motivation-enabled";
    pub const NOTIFICATIONS: &str = "notifications";
}

/// String key-value persistence boundary.
///
/// Values are serialized JSON documents. A missing key is `Ok(None)`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// Read and decode a JSON value.
///
/// Malformed JSON is treated the same as a missing key; only store
/// failures are reported as errors.
pub fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::debug!(key, error = %e, "ignoring malformed stored value");
            Ok(None)
        }
    }
}

/// Encode and write a JSON value.
pub fn write_json<T: Serialize + ?Sized>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value)
        .map_err(|e| StoreError::QueryFailed(format!("cannot encode {key}: {e}")))?;
    store.set(key, &raw)
}

/// Returns the timefocus data directory.
///
/// `TIMEFOCUS_DATA_DIR` overrides the location outright. Otherwise this is
/// `~/.config/timefocus[-dev]/`, with the `-dev` suffix selected by
/// `TIMEFOCUS_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = if let Some(dir) = std::env::var_os("TIMEFOCUS_DATA_DIR") {
        PathBuf::from(dir)
    } else {
        let base_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config");

        let env = std::env::var("TIMEFOCUS_ENV").unwrap_or_else(|_| "production".to_string());

        if env == "dev" {
            base_dir.join("timefocus-dev")
        } else {
            base_dir.join("timefocus")
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
