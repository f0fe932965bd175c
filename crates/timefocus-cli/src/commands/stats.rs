use clap::Subcommand;
use timefocus_core::{Clock, Config, SessionRecord, Summary, SystemClock};

use super::{open_ledger, print_json, CliResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today, the last 7 days and lifetime totals
    Summary,
    /// Most recent sessions, newest first
    History {
        /// Number of sessions to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// Stored aggregate counters
    Raw,
}

pub fn run(config: &Config, action: StatsAction) -> CliResult {
    let ledger = open_ledger(config)?;

    match action {
        StatsAction::Summary => {
            let summary = Summary::build(
                ledger.history(),
                ledger.stats(),
                &ledger.tasks(),
                SystemClock.today(),
            );
            print_json(&summary)?;
        }
        StatsAction::History { limit } => {
            let recent: Vec<&SessionRecord> =
                ledger.history().records().iter().rev().take(limit).collect();
            print_json(&recent)?;
        }
        StatsAction::Raw => print_json(ledger.stats())?,
    }
    Ok(())
}
