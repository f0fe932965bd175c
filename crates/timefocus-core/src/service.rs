//! The timer as seen by front-ends.
//!
//! [`TimerService`] ties the engine to its collaborators: the ledger for
//! persistence, a notifier for completion alerts and a clock. It is built
//! explicitly at the application's top level and handed to whoever drives
//! it (normally [`crate::timer::driver`]).

use crate::clock::Clock;
use crate::events::Event;
use crate::history::SessionHistory;
use crate::ledger::Ledger;
use crate::notify::{NotificationRequest, Notifier};
use crate::stats::AggregateStats;
use crate::timer::{Completion, Mode, PendingArm, Settings, TimerEngine, TimerSnapshot};

pub struct TimerService {
    engine: TimerEngine,
    ledger: Ledger,
    notifier: Box<dyn Notifier + Send>,
    clock: Box<dyn Clock + Send>,
    outbox: Vec<Event>,
}

impl TimerService {
    /// Build the service with settings loaded from the ledger's store.
    pub fn new(
        ledger: Ledger,
        notifier: Box<dyn Notifier + Send>,
        clock: Box<dyn Clock + Send>,
    ) -> Self {
        let settings = ledger.load_settings();
        Self {
            engine: TimerEngine::new(settings),
            ledger,
            notifier,
            clock,
            outbox: Vec::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn snapshot(&self) -> TimerSnapshot {
        self.engine.snapshot()
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn settings(&self) -> &Settings {
        self.engine.settings()
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    pub fn pending_arm(&self) -> Option<PendingArm> {
        self.engine.pending_arm()
    }

    pub fn history(&self) -> &SessionHistory {
        self.ledger.history()
    }

    pub fn stats(&self) -> &AggregateStats {
        self.ledger.stats()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    /// Take the events produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.collect_engine_events();
        std::mem::take(&mut self.outbox)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn toggle(&mut self) {
        let now = self.clock.now();
        self.engine.toggle(now);
        self.collect_engine_events();
    }

    pub fn skip(&mut self) {
        let now = self.clock.now();
        let completion = self.engine.skip(now);
        self.collect_engine_events();
        if let Some(completion) = completion {
            self.on_completion(completion);
        }
    }

    pub fn reset(&mut self) {
        let now = self.clock.now();
        self.engine.reset(now);
        self.collect_engine_events();
    }

    pub fn change_mode(&mut self, mode: Mode) {
        let now = self.clock.now();
        self.engine.change_mode(mode, now);
        self.collect_engine_events();
    }

    /// Apply and persist new settings. Callers validate beforehand.
    pub fn update_settings(&mut self, settings: Settings) {
        let now = self.clock.now();
        self.ledger.save_settings(&settings);
        self.engine.update_settings(settings, now);
        self.collect_engine_events();
    }

    pub fn complete_task(&mut self) {
        let tasks_completed = self.ledger.record_task_completed();
        self.outbox.push(Event::TaskCompleted {
            tasks_completed,
            at: self.clock.now(),
        });
    }

    /// One elapsed second of the countdown.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        if let Some(completion) = self.engine.tick(now) {
            self.collect_engine_events();
            self.on_completion(completion);
        }
    }

    /// Arm the next mode once the settle delay has passed.
    pub fn fire_pending_arm(&mut self, id: u64) -> bool {
        let now = self.clock.now();
        let armed = self.engine.fire_pending_arm(id, now);
        self.collect_engine_events();
        armed
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn on_completion(&mut self, completion: Completion) {
        let today = self.clock.today();
        let outcome = self.ledger.commit(&completion, today);

        let prefs = self.ledger.notification_prefs();
        if let Some(request) =
            NotificationRequest::for_completion(completion.mode, self.engine.settings(), &prefs)
        {
            self.notifier.notify(&request);
        }

        self.outbox.push(Event::SessionRecorded {
            record: outcome.record,
            total_sessions: outcome.stats.total_sessions,
            streak: outcome.stats.streak,
            at: completion.ended_at,
        });
    }

    fn collect_engine_events(&mut self) {
        self.outbox.extend(self.engine.drain_events());
    }
}
