//! Async driver for [`TimerService`].
//!
//! A single tokio task owns the service and reacts to three sources:
//! commands from the handle, the one-second tick interval, and the settle
//! delay of a pending arm. The interval only exists while the engine is
//! running and the settle sleep only exists while an arm is pending, so
//! pausing, switching modes or shutting down leaves nothing ticking.

use std::pin::Pin;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior, Sleep};

use super::{Mode, Settings, TimerSnapshot};
use crate::error::CoreError;
use crate::events::Event;
use crate::service::TimerService;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);
const EVENT_BUFFER: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Toggle,
    Skip,
    Reset,
    ChangeMode(Mode),
    UpdateSettings(Settings),
    CompleteTask,
    Shutdown,
}

/// Front-end side of a running driver.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<TimerSnapshot>,
    events: broadcast::Sender<Event>,
}

impl TimerHandle {
    pub fn send(&self, command: Command) -> Result<(), CoreError> {
        self.commands
            .send(command)
            .map_err(|_| CoreError::DriverStopped)
    }

    /// Latest published state.
    pub fn snapshot(&self) -> TimerSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<TimerSnapshot> {
        self.state.clone()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }
}

/// Spawn the driver task. The task hands the service back when it stops.
pub fn spawn(service: TimerService) -> (TimerHandle, JoinHandle<TimerService>) {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(service.snapshot());
    let (event_tx, _) = broadcast::channel(EVENT_BUFFER);

    let handle = TimerHandle {
        commands: cmd_tx,
        state: state_rx,
        events: event_tx.clone(),
    };
    let task = tokio::spawn(run(service, cmd_rx, state_tx, event_tx));
    (handle, task)
}

struct ArmTimer {
    id: u64,
    sleep: Pin<Box<Sleep>>,
}

async fn run(
    mut service: TimerService,
    mut commands: mpsc::UnboundedReceiver<Command>,
    state: watch::Sender<TimerSnapshot>,
    events: broadcast::Sender<Event>,
) -> TimerService {
    let mut ticker: Option<Interval> = None;
    let mut arm_timer: Option<ArmTimer> = None;

    loop {
        for event in service.drain_events() {
            // No subscribers is fine.
            let _ = events.send(event);
        }
        state.send_replace(service.snapshot());

        sync_ticker(&mut ticker, service.is_running());
        sync_arm_timer(&mut arm_timer, &service);
        let arm_id = arm_timer.as_ref().map(|a| a.id);

        tokio::select! {
            command = commands.recv() => match command {
                Some(Command::Shutdown) | None => break,
                Some(command) => apply(&mut service, command),
            },
            () = next_tick(&mut ticker) => service.tick(),
            () = arm_elapsed(&mut arm_timer) => {
                arm_timer = None;
                if let Some(id) = arm_id {
                    service.fire_pending_arm(id);
                }
            }
        }
    }

    for event in service.drain_events() {
        let _ = events.send(event);
    }
    state.send_replace(service.snapshot());
    tracing::debug!("timer driver stopped");
    service
}

fn apply(service: &mut TimerService, command: Command) {
    tracing::debug!(?command, "command");
    match command {
        Command::Toggle => service.toggle(),
        Command::Skip => service.skip(),
        Command::Reset => service.reset(),
        Command::ChangeMode(mode) => service.change_mode(mode),
        Command::UpdateSettings(settings) => service.update_settings(settings),
        Command::CompleteTask => service.complete_task(),
        Command::Shutdown => {}
    }
}

/// Create the interval when the engine starts running, drop it when it stops.
fn sync_ticker(ticker: &mut Option<Interval>, running: bool) {
    match (running, ticker.is_some()) {
        (true, false) => {
            let mut interval = time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            *ticker = Some(interval);
        }
        (false, true) => *ticker = None,
        _ => {}
    }
}

/// Keep the settle sleep in step with the engine's pending arm.
fn sync_arm_timer(arm_timer: &mut Option<ArmTimer>, service: &TimerService) {
    match service.pending_arm() {
        Some(arm) if arm_timer.as_ref().map(|a| a.id) != Some(arm.id) => {
            *arm_timer = Some(ArmTimer {
                id: arm.id,
                sleep: Box::pin(time::sleep(arm.delay())),
            });
        }
        Some(_) => {}
        None => *arm_timer = None,
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

async fn arm_elapsed(arm_timer: &mut Option<ArmTimer>) {
    match arm_timer {
        Some(arm) => arm.sleep.as_mut().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::ledger::Ledger;
    use crate::notify::LogNotifier;
    use crate::storage::MemoryStore;
    use chrono::Utc;

    fn one_minute_service(settings: Settings) -> TimerService {
        let mut ledger = Ledger::new(Box::new(MemoryStore::new()), Utc::now());
        ledger.save_settings(&settings);
        TimerService::new(ledger, Box::new(LogNotifier), Box::new(SystemClock))
    }

    fn quick() -> Settings {
        Settings {
            focus_minutes: 1,
            short_break_minutes: 1,
            long_break_minutes: 1,
            ..Settings::default()
        }
    }

    async fn settle() {
        time::sleep(Duration::from_millis(500)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn counts_down_while_running() {
        let (handle, task) = spawn(one_minute_service(quick()));
        handle.send(Command::Toggle).unwrap();
        time::sleep(Duration::from_millis(10_500)).await;

        let snap = handle.snapshot();
        assert!(snap.is_running);
        assert_eq!(snap.remaining_secs, 50);

        handle.send(Command::Toggle).unwrap();
        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(handle.snapshot().remaining_secs, 50);

        handle.send(Command::Shutdown).unwrap();
        let service = task.await.unwrap();
        assert!(!service.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn completion_arms_next_mode_after_delay() {
        let (handle, task) = spawn(one_minute_service(quick()));
        handle.send(Command::Toggle).unwrap();
        time::sleep(Duration::from_millis(60_500)).await;

        let snap = handle.snapshot();
        assert!(snap.session_completed);
        assert_eq!(snap.mode, Mode::Focus);

        time::sleep(Duration::from_secs(2)).await;
        let snap = handle.snapshot();
        assert_eq!(snap.mode, Mode::ShortBreak);
        assert!(!snap.is_running);
        assert_eq!(snap.remaining_secs, 60);

        handle.send(Command::Shutdown).unwrap();
        let service = task.await.unwrap();
        assert_eq!(service.history().len(), 1);
        assert_eq!(service.stats().total_sessions, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_command_cancels_deferred_arm() {
        let (handle, task) = spawn(one_minute_service(quick()));
        handle.send(Command::Skip).unwrap();
        settle().await;
        assert!(handle.snapshot().pending_arm.is_some());

        handle.send(Command::Reset).unwrap();
        time::sleep(Duration::from_secs(5)).await;

        let snap = handle.snapshot();
        assert_eq!(snap.mode, Mode::Focus);
        assert_eq!(snap.remaining_secs, 60);
        assert!(snap.pending_arm.is_none());

        handle.send(Command::Shutdown).unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn auto_start_chains_into_break() {
        let settings = Settings {
            auto_start_breaks: true,
            ..quick()
        };
        let (handle, task) = spawn(one_minute_service(settings));
        let mut events = handle.subscribe_events();
        handle.send(Command::Skip).unwrap();
        // Arm after 2 s, then ten ticks of the break.
        time::sleep(Duration::from_millis(12_500)).await;

        let snap = handle.snapshot();
        assert_eq!(snap.mode, Mode::ShortBreak);
        assert!(snap.is_running);
        assert_eq!(snap.remaining_secs, 50);

        let mut saw_armed = false;
        while let Ok(event) = events.try_recv() {
            if matches!(event, Event::ModeArmed { auto_started: true, .. }) {
                saw_armed = true;
            }
        }
        assert!(saw_armed);

        handle.send(Command::Shutdown).unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn send_after_shutdown_reports_stopped() {
        let (handle, task) = spawn(one_minute_service(quick()));
        handle.send(Command::Shutdown).unwrap();
        task.await.unwrap();
        assert!(matches!(
            handle.send(Command::Toggle),
            Err(CoreError::DriverStopped)
        ));
    }
}
