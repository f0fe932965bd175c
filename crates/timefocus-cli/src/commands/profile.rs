use chrono::Utc;
use clap::Subcommand;
use timefocus_core::{Config, Profile};

use super::{open_ledger, print_json, CliResult};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show name, join date and level
    Show,
    /// Change the display name
    Rename {
        /// New display name
        name: String,
    },
    /// Show or change whether motivational messages are enabled
    Motivation {
        /// "true" or "false"; omit to print the current value
        enabled: Option<bool>,
    },
}

pub fn run(config: &Config, action: ProfileAction) -> CliResult {
    let mut ledger = open_ledger(config)?;

    match action {
        ProfileAction::Show => print_json(&Profile::load(&mut ledger, Utc::now()))?,
        ProfileAction::Rename { name } => {
            Profile::rename(&mut ledger, &name)?;
            print_json(&Profile::load(&mut ledger, Utc::now()))?;
        }
        ProfileAction::Motivation { enabled } => {
            if let Some(enabled) = enabled {
                ledger.set_motivation_enabled(enabled);
            }
            println!("{}", ledger.motivation_enabled());
        }
    }
    Ok(())
}
