use std::time::Duration;

use foundation::time::Time;
use runtime::{Observers, SubscriptionId, Timeline, TimerId, TimerQueue};
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::counter::{MessageCycle, ProgressCounter};
use crate::loader::LoaderConfig;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SplitConfig {
    pub loader: LoaderConfig,
    /// Pause between reaching 100% and the start of `splitting`.
    pub split_delay: Duration,
    /// Length of the `splitting` phase; completion fires at its end.
    pub split_duration: Duration,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            loader: LoaderConfig {
                duration: Duration::from_millis(3_000),
                ticks: 55,
                step: 2,
            },
            split_delay: Duration::from_millis(200),
            split_duration: Duration::from_millis(1_200),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitPhase {
    Loading,
    Splitting,
    Done,
}

impl SplitPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            SplitPhase::Loading => "loading",
            SplitPhase::Splitting => "splitting",
            SplitPhase::Done => "done",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct SplitSnapshot {
    pub active: bool,
    pub phase: SplitPhase,
    pub progress: u32,
    pub message_index: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Tick {
    Progress,
    Message,
    BeginSplit,
    FinishSplit,
}

/// Progress loader with a door-split exit: `loading → splitting → done`.
///
/// Shares the counter contract of [`crate::ProgressLoader`], but reaching
/// 100% only schedules the split. `on_complete` fires once, when
/// `splitting` ends.
pub struct SplitLoader {
    config: SplitConfig,
    messages: Vec<String>,
    counter: ProgressCounter,
    cycle: MessageCycle,
    phase: SplitPhase,
    active: bool,
    progress_timer: Option<TimerId>,
    message_timer: Option<TimerId>,
    timers: TimerQueue<Tick>,
    on_complete: Option<Box<dyn FnMut()>>,
    observers: Observers<SplitSnapshot>,
}

impl std::fmt::Debug for SplitLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SplitLoader")
            .field("config", &self.config)
            .field("snapshot", &self.snapshot())
            .field("pending_timers", &self.timers.len())
            .finish()
    }
}

impl SplitLoader {
    pub fn new(config: SplitConfig, messages: Vec<String>) -> Self {
        let cycle = MessageCycle::new(messages.len());
        Self {
            config,
            messages,
            counter: ProgressCounter::new(config.loader.step),
            cycle,
            phase: SplitPhase::Loading,
            active: false,
            progress_timer: None,
            message_timer: None,
            timers: TimerQueue::new(),
            on_complete: None,
            observers: Observers::new(),
        }
    }

    pub fn on_complete(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    pub fn set_on_complete(&mut self, f: impl FnMut() + 'static) {
        self.on_complete = Some(Box::new(f));
    }

    pub fn subscribe(&mut self, f: impl FnMut(&SplitSnapshot) + 'static) -> SubscriptionId {
        self.observers.subscribe(f)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn phase(&self) -> SplitPhase {
        self.phase
    }

    pub fn progress(&self) -> u32 {
        self.counter.value()
    }

    pub fn message_index(&self) -> usize {
        self.cycle.index()
    }

    pub fn current_message(&self) -> Option<&str> {
        self.messages.get(self.cycle.index()).map(String::as_str)
    }

    pub fn snapshot(&self) -> SplitSnapshot {
        SplitSnapshot {
            active: self.active,
            phase: self.phase,
            progress: self.counter.value(),
            message_index: self.cycle.index(),
        }
    }

    pub fn set_loading(&mut self, loading: bool, now: Time) {
        if loading {
            self.start(now);
        } else {
            self.stop();
        }
    }

    fn publish(&mut self) {
        let snap = self.snapshot();
        self.observers.notify(&snap);
    }

    fn enter(&mut self, next: SplitPhase) {
        debug_assert!(next > self.phase, "{:?} -> {:?}", self.phase, next);
        debug!(from = self.phase.as_str(), to = next.as_str(), "split loader transition");
        self.phase = next;
    }

    /// Progress is full: stop counting, then wait `split_delay`.
    fn loaded(&mut self, at: Time) {
        if let Some(id) = self.progress_timer.take() {
            self.timers.cancel(id);
        }
        self.timers.schedule_once(at + self.config.split_delay, Tick::BeginSplit);
    }

    fn begin_split(&mut self, at: Time) {
        if let Some(id) = self.message_timer.take() {
            self.timers.cancel(id);
        }
        self.enter(SplitPhase::Splitting);
        self.timers.schedule_once(at + self.config.split_duration, Tick::FinishSplit);
    }

    fn finish_split(&mut self) {
        self.timers.cancel_all();
        self.enter(SplitPhase::Done);
        self.active = false;
        if let Some(f) = self.on_complete.as_mut() {
            f();
        }
    }
}

impl Timeline for SplitLoader {
    fn start(&mut self, now: Time) {
        if self.active {
            trace!("split loader already active");
            return;
        }
        self.timers.cancel_all();
        self.counter.reset();
        self.cycle.reset();
        self.phase = SplitPhase::Loading;
        self.active = true;
        self.progress_timer = None;
        self.message_timer = None;

        let loader = self.config.loader;
        let count = self.messages.len();
        if count > 1 {
            match loader.message_interval(count) {
                Some(iv) => {
                    self.message_timer = self.timers.schedule_every(now + iv, iv, Tick::Message).ok();
                }
                None => warn!("split loader message interval is zero; messages stay static"),
            }
        }
        match loader.tick_interval() {
            Some(iv) => {
                self.progress_timer = self.timers.schedule_every(now + iv, iv, Tick::Progress).ok();
            }
            None => {
                warn!("split loader has no tick interval; skipping to split delay");
                self.counter.fill();
                self.loaded(now);
            }
        }
        debug!(at_ms = now.as_millis_f64(), "split loader started");
        self.publish();
    }

    fn stop(&mut self) {
        let cancelled = self.timers.cancel_all();
        self.progress_timer = None;
        self.message_timer = None;
        if self.active {
            self.active = false;
            debug!(cancelled, phase = self.phase.as_str(), "split loader stopped");
            self.publish();
        }
    }

    fn advance_to(&mut self, now: Time) {
        while self.active {
            let Some(fired) = self.timers.pop_due(now) else {
                break;
            };
            match fired.payload {
                Tick::Progress => {
                    if self.counter.advance() {
                        self.loaded(fired.due);
                    }
                    trace!(progress = self.counter.value(), "split loader tick");
                }
                Tick::Message => self.cycle.advance(),
                Tick::BeginSplit => self.begin_split(fired.due),
                Tick::FinishSplit => self.finish_split(),
            }
            self.publish();
        }
    }

    fn is_running(&self) -> bool {
        self.active
    }
}
