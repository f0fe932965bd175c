use clap::Subcommand;
use timefocus_core::storage::json_path;
use timefocus_core::{Config, NotificationPrefs, Settings};

use super::{open_ledger, print_json, CliResult};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the timer settings as JSON
    Show,
    /// Change one setting
    Set {
        /// Setting key (e.g. "focusMinutes", "autoStartBreaks")
        key: String,
        /// New value
        value: String,
    },
    /// Restore the default settings
    Reset,
    /// Show or change notification preferences
    Notifications {
        /// Preference key ("enabled", "sound", "vibration", "desktop"); omit to print all
        key: Option<String>,
        /// New value; omit to print the current one
        value: Option<String>,
    },
}

pub fn run(config: &Config, action: SettingsAction) -> CliResult {
    let mut ledger = open_ledger(config)?;

    match action {
        SettingsAction::Show => print_json(&ledger.load_settings())?,
        SettingsAction::Set { key, value } => {
            let current = ledger.load_settings();
            let updated: Settings = json_path::with_field(&current, &key, &value)?;
            updated.validate()?;
            ledger.save_settings(&updated);
            print_json(&updated)?;
        }
        SettingsAction::Reset => {
            let defaults = Settings::default();
            ledger.save_settings(&defaults);
            print_json(&defaults)?;
        }
        SettingsAction::Notifications { key: None, .. } => print_json(&ledger.notification_prefs())?,
        SettingsAction::Notifications {
            key: Some(key),
            value: None,
        } => {
            let prefs = serde_json::to_value(ledger.notification_prefs())?;
            match json_path::get_by_path(&prefs, &key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        SettingsAction::Notifications {
            key: Some(key),
            value: Some(value),
        } => {
            let updated: NotificationPrefs =
                json_path::with_field(&ledger.notification_prefs(), &key, &value)?;
            ledger.save_notification_prefs(&updated);
            print_json(&updated)?;
        }
    }
    Ok(())
}
