//! Headless runs of the choreography machines for the `choreo` CLI.
//!
//! Each simulation drives one machine from a [`FrameClock`] fed by a
//! [`ManualClock`] at a fixed frame interval and records every snapshot the
//! machine publishes, stamped with the frame time.
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use catalog::DomainId;
use choreography::{
    IndicatorState, IntroPhase, IntroSequencer, LoaderSnapshot, ProgressLoader, ResolvedConfig,
    ScrollIndicator, SplitLoader, SplitSnapshot,
};
use foundation::time::Time;
use runtime::{Clock, FrameClock, ManualClock, Scheduler, Timeline};
use serde::Serialize;
use tracing::debug;

/// One recorded event: `state` as published at `t_ms`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample<S> {
    pub t_ms: f64,
    #[serde(flatten)]
    pub state: S,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhaseRow {
    pub phase: IntroPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompletionRow {
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimOptions {
    pub frame: Duration,
    pub until: Duration,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            frame: Duration::from_micros(16_667),
            until: Duration::from_secs(6),
        }
    }
}

/// Recorded samples plus the completion time, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace<S> {
    pub samples: Vec<Sample<S>>,
    pub completed_at_ms: Option<f64>,
}

impl<S: Serialize> Trace<S> {
    /// One JSON object per line. A final row reports completion, stamped
    /// with the completion time when there was one.
    pub fn to_json_lines(&self) -> Result<String, String> {
        let mut out = String::new();
        for s in &self.samples {
            out.push_str(&serde_json::to_string(s).map_err(|e| e.to_string())?);
            out.push('\n');
        }
        let state = CompletionRow {
            completed: self.completed_at_ms.is_some(),
        };
        let last = match self.completed_at_ms {
            Some(t_ms) => serde_json::to_string(&Sample { t_ms, state }),
            None => serde_json::to_string(&state),
        };
        out.push_str(&last.map_err(|e| e.to_string())?);
        out.push('\n');
        Ok(out)
    }
}

type Recorder<S> = Rc<RefCell<Vec<Sample<S>>>>;

fn stamp<S>(clock: &ManualClock, log: &Recorder<S>, state: S) {
    log.borrow_mut().push(Sample {
        t_ms: clock.now().as_millis_f64(),
        state,
    });
}

/// Runs `machine` frame by frame until it stops or `opts.until` elapses.
fn drive(machine: Box<dyn Timeline>, clock: &ManualClock, opts: SimOptions) {
    let mut scheduler = Scheduler::new();
    scheduler.add("sim", machine);
    let mut frames = FrameClock::new();
    let step = if opts.frame.is_zero() { Duration::from_millis(1) } else { opts.frame };
    let end = Time::ZERO + opts.until;
    loop {
        let summary = scheduler.run_frame(frames.tick(clock.now()));
        if summary.advanced == 0 || clock.now() >= end {
            break;
        }
        clock.advance(step);
    }
    debug!(at_ms = clock.now().as_millis_f64(), "simulation finished");
}

pub fn simulate_intro(config: &ResolvedConfig, opts: SimOptions) -> Trace<PhaseRow> {
    let clock = ManualClock::new();
    let log: Recorder<PhaseRow> = Rc::default();
    let done = Rc::new(RefCell::new(None));

    let done_slot = Rc::clone(&done);
    let done_clock = clock.clone();
    let mut intro = IntroSequencer::new(config.intro, move || {
        *done_slot.borrow_mut() = Some(done_clock.now().as_millis_f64());
    });
    let (c, l) = (clock.clone(), Rc::clone(&log));
    intro.subscribe(move |p| stamp(&c, &l, PhaseRow { phase: *p }));
    intro.start(clock.now());
    drive(Box::new(intro), &clock, opts);

    let completed_at_ms = *done.borrow();
    let samples = log.borrow().clone();
    Trace {
        samples,
        completed_at_ms,
    }
}

pub fn simulate_loader(
    config: &ResolvedConfig,
    messages: Vec<String>,
    opts: SimOptions,
) -> Trace<LoaderSnapshot> {
    let clock = ManualClock::new();
    let log: Recorder<LoaderSnapshot> = Rc::default();
    let done = Rc::new(RefCell::new(None));

    let done_slot = Rc::clone(&done);
    let done_clock = clock.clone();
    let mut loader = ProgressLoader::new(config.loader, messages).on_complete(move || {
        done_slot
            .borrow_mut()
            .get_or_insert(done_clock.now().as_millis_f64());
    });
    let (c, l) = (clock.clone(), Rc::clone(&log));
    loader.subscribe(move |s| stamp(&c, &l, *s));
    loader.start(clock.now());
    // The loader keeps cycling messages after completion; stop at the deadline.
    drive(Box::new(loader), &clock, opts);

    let completed_at_ms = *done.borrow();
    let samples = log.borrow().clone();
    Trace {
        samples,
        completed_at_ms,
    }
}

pub fn simulate_split(
    config: &ResolvedConfig,
    messages: Vec<String>,
    opts: SimOptions,
) -> Trace<SplitSnapshot> {
    let clock = ManualClock::new();
    let log: Recorder<SplitSnapshot> = Rc::default();
    let done = Rc::new(RefCell::new(None));

    let done_slot = Rc::clone(&done);
    let done_clock = clock.clone();
    let mut split = SplitLoader::new(config.split, messages).on_complete(move || {
        done_slot
            .borrow_mut()
            .get_or_insert(done_clock.now().as_millis_f64());
    });
    let (c, l) = (clock.clone(), Rc::clone(&log));
    split.subscribe(move |s| stamp(&c, &l, *s));
    split.start(clock.now());
    drive(Box::new(split), &clock, opts);

    let completed_at_ms = *done.borrow();
    let samples = log.borrow().clone();
    Trace {
        samples,
        completed_at_ms,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolveRow {
    pub progress: f64,
    pub domain: DomainId,
    pub indicator: IndicatorState,
}

/// Samples `steps + 1` evenly spaced scroll positions in `[0, 1]`.
pub fn sweep_scroll(config: &ResolvedConfig, steps: u32) -> Vec<ResolveRow> {
    let steps = steps.max(1);
    let mut indicator = ScrollIndicator::new(config.indicator.clone(), config.ranges.clone());
    (0..=steps)
        .map(|i| {
            let progress = f64::from(i) / f64::from(steps);
            ResolveRow {
                progress,
                domain: config.ranges.resolve(progress),
                indicator: indicator.update(progress),
            }
        })
        .collect()
}
