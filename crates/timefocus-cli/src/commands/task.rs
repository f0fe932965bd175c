use clap::Subcommand;
use timefocus_core::Config;

use super::{open_ledger, CliResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Count one completed task
    Complete,
}

pub fn run(config: &Config, action: TaskAction) -> CliResult {
    let mut ledger = open_ledger(config)?;

    match action {
        TaskAction::Complete => {
            let total = ledger.record_task_completed();
            println!("tasks completed: {total}");
        }
    }
    Ok(())
}
