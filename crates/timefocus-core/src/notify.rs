//! Completion notifications.
//!
//! The engine decides whether to ask for a notification and what it says.
//! Delivery (desktop popup, sound, vibration) belongs to a [`Notifier`].

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use crate::timer::{Mode, Settings};

/// User notification preferences, stored under the `notifications` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPrefs {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub sound: bool,
    #[serde(default = "default_true")]
    pub vibration: bool,
    #[serde(default = "default_true")]
    pub desktop: bool,
}

fn default_true() -> bool {
    true
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            enabled: true,
            sound: true,
            vibration: true,
            desktop: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    pub sound: bool,
    pub vibration: bool,
    pub desktop: bool,
}

impl NotificationRequest {
    /// Build the request for a finished `mode`, or `None` when
    /// notifications are switched off.
    pub fn for_completion(mode: Mode, settings: &Settings, prefs: &NotificationPrefs) -> Option<Self> {
        if !prefs.enabled {
            return None;
        }
        let (title, body) = match mode {
            Mode::Focus => (
                "Focus Session Complete!".to_string(),
                format!(
                    "Great job! You focused for {} minutes. Time for a break!",
                    settings.focus_minutes
                ),
            ),
            Mode::ShortBreak => (
                "Short Break Over!".to_string(),
                "Break time is over. Ready to get back to work?".to_string(),
            ),
            Mode::LongBreak => (
                "Long Break Complete!".to_string(),
                "You're fully recharged! Time for productive work!".to_string(),
            ),
        };
        Some(Self {
            title,
            body,
            sound: settings.sound_enabled && prefs.sound,
            vibration: prefs.vibration,
            desktop: prefs.desktop,
        })
    }
}

/// Delivers notification requests. Delivery failures are the notifier's
/// own business; nothing is reported back.
pub trait Notifier {
    fn notify(&self, request: &NotificationRequest);
}

/// Writes notifications to the log only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, request: &NotificationRequest) {
        tracing::info!(
            title = %request.title,
            body = %request.body,
            sound = request.sound,
            "notification"
        );
    }
}

/// Keeps every request it receives. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<NotificationRequest>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<NotificationRequest> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, request: &NotificationRequest) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(request.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_message_mentions_minutes() {
        let settings = Settings {
            focus_minutes: 50,
            ..Settings::default()
        };
        let req =
            NotificationRequest::for_completion(Mode::Focus, &settings, &NotificationPrefs::default())
                .unwrap();
        assert_eq!(req.title, "Focus Session Complete!");
        assert!(req.body.contains("50 minutes"));
        assert!(req.sound);
    }

    #[test]
    fn disabled_prefs_suppress_request() {
        let prefs = NotificationPrefs {
            enabled: false,
            ..NotificationPrefs::default()
        };
        assert!(NotificationRequest::for_completion(Mode::LongBreak, &Settings::default(), &prefs)
            .is_none());
    }

    #[test]
    fn sound_requires_both_flags() {
        let settings = Settings {
            sound_enabled: false,
            ..Settings::default()
        };
        let req = NotificationRequest::for_completion(
            Mode::ShortBreak,
            &settings,
            &NotificationPrefs::default(),
        )
        .unwrap();
        assert!(!req.sound);
        assert!(req.desktop);
        assert_eq!(req.title, "Short Break Over!");
    }

    #[test]
    fn recording_notifier_shares_buffer() {
        let notifier = RecordingNotifier::new();
        let handle = notifier.clone();
        let req = NotificationRequest::for_completion(
            Mode::Focus,
            &Settings::default(),
            &NotificationPrefs::default(),
        )
        .unwrap();
        notifier.notify(&req);
        assert_eq!(handle.sent(), vec![req]);
    }
}
