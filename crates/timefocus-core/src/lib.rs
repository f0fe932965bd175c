//! # Timefocus Core Library
//!
//! This library provides the core logic for the timefocus Pomodoro timer:
//! the countdown state machine, session accounting and persistence. Front-ends
//! (the `timefocus` CLI, or anything else) build a [`TimerService`] at their
//! top level and drive it, either directly or through the async driver.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A pure state machine. Every command takes the current
//!   time; nothing inside reads the system clock or spawns timers
//! - **Driver**: A tokio task that owns the service and feeds it one-second
//!   ticks and deferred mode arms
//! - **Ledger**: The single place where completed sessions become history,
//!   totals and streaks
//! - **Storage**: A string key-value store (SQLite or in-memory) plus a TOML
//!   configuration file
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`TimerService`]: Engine plus ledger, notifier and clock
//! - [`Ledger`]: Session history and aggregate statistics
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod history;
pub mod ledger;
pub mod motivation;
pub mod notify;
pub mod profile;
pub mod service;
pub mod stats;
pub mod storage;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use events::Event;
pub use history::{SessionHistory, SessionRecord};
pub use ledger::{CommitOutcome, Ledger};
pub use notify::{LogNotifier, NotificationPrefs, NotificationRequest, Notifier};
pub use profile::{Level, Profile};
pub use service::TimerService;
pub use stats::{AggregateStats, Summary};
pub use storage::{Config, KeyValueStore, MemoryStore, SqliteStore};
pub use timer::{Command, Mode, PendingArm, Settings, TimerEngine, TimerHandle, TimerSnapshot, TimerState};
