use std::time::Duration;

use foundation::time::{Time, split_duration};
use runtime::{Observers, SubscriptionId, Timeline, TimerId, TimerQueue};
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::counter::{MessageCycle, ProgressCounter};

/// Timing for a progress loader: `ticks` equal intervals across `duration`,
/// each adding `step` percent.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub duration: Duration,
    pub ticks: u32,
    pub step: u32,
}

impl LoaderConfig {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            ..Self::default()
        }
    }

    /// `None` for a zero duration or zero ticks.
    pub fn tick_interval(&self) -> Option<Duration> {
        split_duration(self.duration, self.ticks)
    }

    /// `None` for an empty message list or zero duration.
    pub fn message_interval(&self, message_count: usize) -> Option<Duration> {
        split_duration(self.duration, u32::try_from(message_count).ok()?)
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(2_500),
            ticks: 50,
            step: 2,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct LoaderSnapshot {
    pub active: bool,
    pub progress: u32,
    pub message_index: usize,
    pub completed: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Tick {
    Progress,
    Message,
}

/// Simulated loading counter with a rotating status message.
///
/// While active, progress climbs by `step` on every tick until it reaches
/// 100, at which point `on_complete` fires once for this activation and the
/// progress timer is cancelled. The message index keeps cycling until the
/// loader is stopped. Every activation starts again from zero.
pub struct ProgressLoader {
    config: LoaderConfig,
    messages: Vec<String>,
    counter: ProgressCounter,
    cycle: MessageCycle,
    active: bool,
    completed: bool,
    progress_timer: Option<TimerId>,
    timers: TimerQueue<Tick>,
    on_complete: Option<Box<dyn FnMut()>>,
    observers: Observers<LoaderSnapshot>,
}

impl std::fmt::Debug for ProgressLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressLoader")
            .field("config", &self.config)
            .field("snapshot", &self.snapshot())
            .field("pending_timers", &self.timers.len())
            .finish()
    }
}

impl ProgressLoader {
    pub fn new(config: LoaderConfig, messages: Vec<String>) -> Self {
        let cycle = MessageCycle::new(messages.len());
        Self {
            config,
            messages,
            counter: ProgressCounter::new(config.step),
            cycle,
            active: false,
            completed: false,
            progress_timer: None,
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

    pub fn subscribe(&mut self, f: impl FnMut(&LoaderSnapshot) + 'static) -> SubscriptionId {
        self.observers.subscribe(f)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn snapshot(&self) -> LoaderSnapshot {
        LoaderSnapshot {
            active: self.active,
            progress: self.counter.value(),
            message_index: self.cycle.index(),
            completed: self.completed,
        }
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

    /// Mirrors an `isLoading` flag: `true` activates, `false` tears down.
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

    fn complete(&mut self) {
        if let Some(id) = self.progress_timer.take() {
            self.timers.cancel(id);
        }
        if self.completed {
            return;
        }
        self.completed = true;
        debug!("loader reached 100%");
        if let Some(f) = self.on_complete.as_mut() {
            f();
        }
    }
}

impl Timeline for ProgressLoader {
    fn start(&mut self, now: Time) {
        if self.active {
            trace!("loader already active");
            return;
        }
        self.timers.cancel_all();
        self.counter.reset();
        self.cycle.reset();
        self.completed = false;
        self.active = true;

        match self.config.tick_interval() {
            Some(iv) => {
                self.progress_timer = self.timers.schedule_every(now + iv, iv, Tick::Progress).ok();
            }
            None => {
                warn!(duration_ms = self.config.duration.as_millis() as u64, "loader has no tick interval; completing immediately");
                self.counter.fill();
                self.complete();
            }
        }
        match self.config.message_interval(self.messages.len()) {
            Some(iv) if self.messages.len() > 1 => {
                let _ = self.timers.schedule_every(now + iv, iv, Tick::Message);
            }
            Some(_) => {}
            None if self.messages.is_empty() => trace!("loader has no messages"),
            None => warn!("loader message interval is zero; messages stay static"),
        }
        debug!(at_ms = now.as_millis_f64(), "loader started");
        self.publish();
    }

    fn stop(&mut self) {
        let cancelled = self.timers.cancel_all();
        self.progress_timer = None;
        if self.active {
            self.active = false;
            debug!(cancelled, progress = self.counter.value(), "loader stopped");
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
                        self.complete();
                    }
                    trace!(progress = self.counter.value(), "loader tick");
                }
                Tick::Message => self.cycle.advance(),
            }
            self.publish();
        }
    }

    fn is_running(&self) -> bool {
        self.active
    }
}
