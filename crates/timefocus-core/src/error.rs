//! Core error types for timefocus-core.
//!
//! The timer engine itself never fails; these errors surface from the
//! storage layer, the configuration file, settings validation and the
//! async driver handle.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error for callers that mix storage, config and driver calls.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("store: {0}")]
    Store(#[from] StoreError),

    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid settings: {0}")]
    Validation(#[from] ValidationError),

    /// The driver task has exited and dropped its command receiver
    #[error("timer driver has stopped")]
    DriverStopped,
}

/// Key-value store failures.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("cannot open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("store query failed: {0}")]
    QueryFailed(String),

    #[error("store is locked by another process")]
    Locked,
}

/// Configuration file and dot-path key errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    #[error("cannot write config {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    #[error("unknown key: {0}")]
    UnknownKey(String),

    #[error("bad value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("config is not valid TOML: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("'{field}' must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
        value: u32,
    },

    #[error("'{field}' {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

pub type Result<T, E = CoreError> = std::result::Result<T, E>;
