//! Interactive timer session.
//!
//! Reads one command per stdin line and prints the timer status as it
//! changes. The countdown itself runs in the core driver task.

use chrono::Utc;
use notify_rust::Notification;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use timefocus_core::motivation;
use timefocus_core::notify::{LogNotifier, NotificationRequest, Notifier};
use timefocus_core::timer::driver;
use timefocus_core::{
    Command, Config, Event, KeyValueStore, Ledger, MemoryStore, Mode, SqliteStore, SystemClock,
    TimerService, TimerSnapshot, TimerState,
};

use super::CliResult;

const HELP: &str = "t/enter: start or pause  s: skip  r: reset  m <focus|short|long>: switch mode  d: task done  q: quit";

/// Desktop popups through the platform notification service.
struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, request: &NotificationRequest) {
        if !request.desktop {
            LogNotifier.notify(request);
            return;
        }
        let mut notification = Notification::new();
        notification
            .summary(&request.title)
            .body(&request.body)
            .appname("timefocus");
        if request.sound {
            notification.sound_name("complete");
        }
        if let Err(e) = notification.show() {
            tracing::warn!(error = %e, "desktop notification failed");
        }
    }
}

#[derive(Debug, PartialEq)]
enum Input {
    Command(Command),
    Quit,
}

fn parse_input(line: &str) -> Result<Input, String> {
    let mut parts = line.split_whitespace();
    let input = match parts.next() {
        None | Some("t") => Input::Command(Command::Toggle),
        Some("s") => Input::Command(Command::Skip),
        Some("r") => Input::Command(Command::Reset),
        Some("d") => Input::Command(Command::CompleteTask),
        Some("q") => Input::Quit,
        Some("m") => {
            let mode: Mode = parts
                .next()
                .ok_or_else(|| "usage: m <focus|short|long>".to_string())?
                .parse()?;
            Input::Command(Command::ChangeMode(mode))
        }
        Some(other) => return Err(format!("unknown input '{other}' ({HELP})")),
    };
    Ok(input)
}

fn status_line(snap: &TimerSnapshot) -> String {
    let state = match snap.state {
        TimerState::Idle => "paused",
        TimerState::Running => "running",
        TimerState::Completed => "done",
    };
    format!(
        "[{}] {:02}:{:02} {state}  session #{}",
        snap.mode.label(),
        snap.remaining_secs / 60,
        snap.remaining_secs % 60,
        snap.current_session_number
    )
}

fn event_line(event: &Event) -> Option<String> {
    match event {
        Event::TimerCompleted {
            mode, next_mode, ..
        } => Some(format!("{} complete, {} is next", mode.label(), next_mode.label())),
        Event::SessionRecorded {
            record,
            total_sessions,
            streak,
            ..
        } => Some(format!(
            "recorded {} min {}; {total_sessions} focus sessions, {streak} day streak",
            (record.duration + 30) / 60,
            record.mode.label()
        )),
        Event::ModeArmed {
            mode, auto_started, ..
        } => Some(if *auto_started {
            format!("{} started", mode.label())
        } else {
            format!("{} ready", mode.label())
        }),
        Event::TaskCompleted {
            tasks_completed, ..
        } => Some(format!("tasks completed: {tasks_completed}")),
        _ => None,
    }
}

fn motivation_line(event: &Event) -> Option<String> {
    match event {
        Event::TimerCompleted { mode, at, .. } => Some(format!(
            "{} {}",
            motivation::message_for(*mode, at.timestamp_millis().unsigned_abs()),
            motivation::follow_up(*mode)
        )),
        _ => None,
    }
}

fn print_event(event: &Event, motivation: bool) {
    if let Some(line) = event_line(event) {
        println!("{line}");
    }
    if motivation {
        if let Some(line) = motivation_line(event) {
            println!("{line}");
        }
    }
}

pub fn run(config: &Config, ephemeral: bool) -> CliResult {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run_session(config, ephemeral));
    // A pending stdin read would otherwise hold the runtime open.
    runtime.shutdown_background();
    result
}

async fn run_session(config: &Config, ephemeral: bool) -> CliResult {
    let store: Box<dyn KeyValueStore + Send> = if ephemeral {
        Box::new(MemoryStore::new())
    } else {
        Box::new(SqliteStore::open(config.database_path()?)?)
    };
    let notifier: Box<dyn Notifier + Send> = if config.notifications.desktop {
        Box::new(DesktopNotifier)
    } else {
        Box::new(LogNotifier)
    };
    let ledger = Ledger::new(store, Utc::now());
    let motivation = ledger.motivation_enabled();
    let service = TimerService::new(ledger, notifier, Box::new(SystemClock));

    let (handle, task) = driver::spawn(service);
    let mut state = handle.subscribe_state();
    let mut events = handle.subscribe_events();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}");
    let mut last_status = status_line(&handle.snapshot());
    println!("{last_status}");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_input(&line) {
                    Ok(Input::Quit) => break,
                    Ok(Input::Command(command)) => handle.send(command)?,
                    Err(message) => eprintln!("{message}"),
                }
            }
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                let status = status_line(&state.borrow_and_update());
                if status != last_status {
                    println!("{status}");
                    last_status = status;
                }
            }
            event = events.recv() => match event {
                Ok(event) => print_event(&event, motivation),
                Err(RecvError::Lagged(skipped)) => tracing::warn!(skipped, "event stream lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    }

    // The driver may already be gone if it stopped on its own.
    let _ = handle.send(Command::Shutdown);
    let service = task.await?;
    while let Ok(event) = events.try_recv() {
        print_event(&event, motivation);
    }
    println!(
        "{} focus sessions in total, {} day streak",
        service.stats().total_sessions,
        service.stats().streak
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_letter_commands() {
        assert_eq!(parse_input(""), Ok(Input::Command(Command::Toggle)));
        assert_eq!(parse_input("t"), Ok(Input::Command(Command::Toggle)));
        assert_eq!(parse_input(" s "), Ok(Input::Command(Command::Skip)));
        assert_eq!(parse_input("r"), Ok(Input::Command(Command::Reset)));
        assert_eq!(parse_input("d"), Ok(Input::Command(Command::CompleteTask)));
        assert_eq!(parse_input("q"), Ok(Input::Quit));
    }

    #[test]
    fn parses_mode_switch() {
        assert_eq!(
            parse_input("m long"),
            Ok(Input::Command(Command::ChangeMode(Mode::LongBreak)))
        );
        assert!(parse_input("m").is_err());
        assert!(parse_input("m nap").is_err());
        assert!(parse_input("x").is_err());
    }

    #[test]
    fn motivation_follows_completions_only() {
        let at = Utc::now();
        let completed = Event::TimerCompleted {
            mode: Mode::Focus,
            duration_secs: 1500,
            next_mode: Mode::ShortBreak,
            at,
        };
        let line = motivation_line(&completed).unwrap();
        assert!(line.ends_with("Time for a well-deserved break."), "{line}");

        let reset = Event::TimerReset {
            mode: Mode::Focus,
            remaining_secs: 1500,
            at,
        };
        assert!(motivation_line(&reset).is_none());
    }

    #[test]
    fn status_line_formats_countdown() {
        let service = TimerService::new(
            Ledger::new(Box::new(MemoryStore::new()), Utc::now()),
            Box::new(LogNotifier),
            Box::new(SystemClock),
        );
        let line = status_line(&service.snapshot());
        assert!(line.contains("25:00"), "{line}");
        assert!(line.contains("paused"), "{line}");
        assert!(line.contains("#1"), "{line}");
    }
}
