pub mod config;
pub mod profile;
pub mod run;
pub mod settings;
pub mod stats;
pub mod task;

use chrono::Utc;
use serde::Serialize;
use timefocus_core::{Config, Ledger, SqliteStore};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Open the configured database and load history and stats from it.
pub fn open_ledger(config: &Config) -> Result<Ledger, Box<dyn std::error::Error>> {
    let path = config.database_path()?;
    let store = SqliteStore::open(&path)?;
    tracing::debug!(path = %path.display(), "opened store");
    Ok(Ledger::new(Box::new(store), Utc::now()))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
