use std::time::Duration;

use foundation::time::Time;
use runtime::{Observers, SubscriptionId, Timeline, TimerQueue};
use serde::Serialize;
use tracing::{debug, trace};

use crate::error::ConfigError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntroPhase {
    Entering,
    Holding,
    Exiting,
    Done,
}

impl IntroPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            IntroPhase::Entering => "entering",
            IntroPhase::Holding => "holding",
            IntroPhase::Exiting => "exiting",
            IntroPhase::Done => "done",
        }
    }
}

/// Offsets from `start` at which each transition happens.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct IntroTimings {
    hold_at: Duration,
    exit_at: Duration,
    done_at: Duration,
}

impl IntroTimings {
    pub fn new(hold_at: Duration, exit_at: Duration, done_at: Duration) -> Result<Self, ConfigError> {
        if !(hold_at < exit_at && exit_at < done_at) {
            return Err(ConfigError::PhaseOrder {
                hold_ms: hold_at.as_millis() as u64,
                exit_ms: exit_at.as_millis() as u64,
                done_ms: done_at.as_millis() as u64,
            });
        }
        Ok(Self {
            hold_at,
            exit_at,
            done_at,
        })
    }

    pub fn hold_at(&self) -> Duration {
        self.hold_at
    }

    pub fn exit_at(&self) -> Duration {
        self.exit_at
    }

    pub fn done_at(&self) -> Duration {
        self.done_at
    }
}

impl Default for IntroTimings {
    fn default() -> Self {
        Self {
            hold_at: Duration::from_millis(800),
            exit_at: Duration::from_millis(2_800),
            done_at: Duration::from_millis(4_200),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Cue {
    Hold,
    Exit,
    Done,
}

/// One-shot splash phase machine: `entering → holding → exiting → done`.
///
/// Transitions are purely time-driven. `on_complete` runs exactly once, at
/// the `done` transition; stopping early cancels it along with the timers.
/// A stopped (not finished) sequencer restarts from `entering`.
pub struct IntroSequencer {
    timings: IntroTimings,
    phase: IntroPhase,
    running: bool,
    timers: TimerQueue<Cue>,
    on_complete: Option<Box<dyn FnOnce()>>,
    observers: Observers<IntroPhase>,
}

impl std::fmt::Debug for IntroSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntroSequencer")
            .field("phase", &self.phase)
            .field("running", &self.running)
            .field("pending_timers", &self.timers.len())
            .finish()
    }
}

impl IntroSequencer {
    pub fn new(timings: IntroTimings, on_complete: impl FnOnce() + 'static) -> Self {
        Self {
            timings,
            phase: IntroPhase::Entering,
            running: false,
            timers: TimerQueue::new(),
            on_complete: Some(Box::new(on_complete)),
            observers: Observers::new(),
        }
    }

    pub fn phase(&self) -> IntroPhase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == IntroPhase::Done
    }

    /// Subscribers see the `entering` phase on start and every later
    /// transition.
    pub fn subscribe(&mut self, f: impl FnMut(&IntroPhase) + 'static) -> SubscriptionId {
        self.observers.subscribe(f)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn enter(&mut self, next: IntroPhase) {
        debug_assert!(next > self.phase, "{:?} -> {:?}", self.phase, next);
        debug!(from = self.phase.as_str(), to = next.as_str(), "intro transition");
        self.phase = next;
        self.observers.notify(&next);
    }

    fn finish(&mut self) {
        self.running = false;
        self.timers.cancel_all();
        self.enter(IntroPhase::Done);
        if let Some(done) = self.on_complete.take() {
            done();
        }
    }
}

impl Timeline for IntroSequencer {
    fn start(&mut self, now: Time) {
        if self.running || self.is_done() {
            trace!(phase = self.phase.as_str(), "intro start ignored");
            return;
        }
        self.timers.cancel_all();
        self.phase = IntroPhase::Entering;
        self.timers.schedule_once(now + self.timings.hold_at, Cue::Hold);
        self.timers.schedule_once(now + self.timings.exit_at, Cue::Exit);
        self.timers.schedule_once(now + self.timings.done_at, Cue::Done);
        self.running = true;
        debug!(at_ms = now.as_millis_f64(), "intro started");
        self.observers.notify(&IntroPhase::Entering);
    }

    fn stop(&mut self) {
        let cancelled = self.timers.cancel_all();
        if self.running {
            debug!(phase = self.phase.as_str(), cancelled, "intro stopped early");
        }
        self.running = false;
    }

    fn advance_to(&mut self, now: Time) {
        while self.running {
            let Some(fired) = self.timers.pop_due(now) else {
                break;
            };
            match fired.payload {
                Cue::Hold => self.enter(IntroPhase::Holding),
                Cue::Exit => self.enter(IntroPhase::Exiting),
                Cue::Done => self.finish(),
            }
        }
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::{IntroPhase, IntroSequencer, IntroTimings};
    use crate::error::ConfigError;
    use foundation::time::Time;
    use runtime::Timeline;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn ms(v: u64) -> Time {
        Time::from_millis(v)
    }

    fn recorded() -> (IntroSequencer, Rc<RefCell<Vec<IntroPhase>>>, Rc<RefCell<u32>>) {
        let completions = Rc::new(RefCell::new(0));
        let c = completions.clone();
        let mut seq = IntroSequencer::new(IntroTimings::default(), move || *c.borrow_mut() += 1);
        let phases = Rc::new(RefCell::new(Vec::new()));
        let p = phases.clone();
        seq.subscribe(move |phase| p.borrow_mut().push(*phase));
        (seq, phases, completions)
    }

    #[test]
    fn visits_every_phase_in_order() {
        let (mut seq, phases, completions) = recorded();
        seq.start(ms(0));
        for t in (0..=5_000).step_by(100) {
            seq.advance_to(ms(t));
        }
        assert_eq!(
            *phases.borrow(),
            vec![
                IntroPhase::Entering,
                IntroPhase::Holding,
                IntroPhase::Exiting,
                IntroPhase::Done
            ]
        );
        assert_eq!(*completions.borrow(), 1);
    }

    #[test]
    fn transitions_happen_at_fixed_offsets() {
        let (mut seq, _, completions) = recorded();
        seq.start(ms(1_000));
        seq.advance_to(ms(1_799));
        assert_eq!(seq.phase(), IntroPhase::Entering);
        seq.advance_to(ms(1_800));
        assert_eq!(seq.phase(), IntroPhase::Holding);
        seq.advance_to(ms(3_800));
        assert_eq!(seq.phase(), IntroPhase::Exiting);
        seq.advance_to(ms(5_199));
        assert_eq!(*completions.borrow(), 0);
        seq.advance_to(ms(5_200));
        assert!(seq.is_done());
        assert_eq!(*completions.borrow(), 1);
    }

    #[test]
    fn single_large_jump_still_visits_each_phase() {
        let (mut seq, phases, _) = recorded();
        seq.start(ms(0));
        seq.advance_to(ms(60_000));
        assert_eq!(phases.borrow().len(), 4);
        assert!(seq.is_done());
    }

    #[test]
    fn done_is_terminal() {
        let (mut seq, phases, completions) = recorded();
        seq.start(ms(0));
        seq.advance_to(ms(4_200));
        seq.start(ms(5_000));
        seq.advance_to(ms(20_000));
        assert_eq!(phases.borrow().len(), 4);
        assert_eq!(*completions.borrow(), 1);
        assert!(!seq.is_running());
    }

    #[test]
    fn early_stop_cancels_completion() {
        let (mut seq, _, completions) = recorded();
        seq.start(ms(0));
        seq.advance_to(ms(1_000));
        seq.stop();
        seq.stop();
        seq.advance_to(ms(10_000));
        assert_eq!(seq.phase(), IntroPhase::Holding);
        assert_eq!(*completions.borrow(), 0);
    }

    #[test]
    fn restart_after_stop_begins_from_entering() {
        let (mut seq, phases, completions) = recorded();
        seq.start(ms(0));
        seq.advance_to(ms(900));
        seq.stop();
        seq.start(ms(10_000));
        assert_eq!(seq.phase(), IntroPhase::Entering);
        seq.advance_to(ms(14_200));
        assert!(seq.is_done());
        assert_eq!(*completions.borrow(), 1);
        assert_eq!(phases.borrow().len(), 6);
    }

    #[test]
    fn rejects_out_of_order_offsets() {
        let err = IntroTimings::new(
            Duration::from_millis(800),
            Duration::from_millis(800),
            Duration::from_millis(900),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::PhaseOrder {
                hold_ms: 800,
                exit_ms: 800,
                done_ms: 900
            }
        );
    }
}
