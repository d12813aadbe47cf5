use tracing::debug;

use crate::frame::Frame;
use crate::timeline::Timeline;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FrameRunSummary {
    pub advanced: usize,
    pub idle: usize,
}

struct Entry {
    id: &'static str,
    /// Smaller values run earlier.
    priority: i32,
    order: u64,
    timeline: Box<dyn Timeline>,
}

/// Owns a set of timelines and advances them once per frame.
///
/// The machines are independent; ordering is only made deterministic:
/// `(priority, id, insertion_order)`.
#[derive(Default)]
pub struct Scheduler {
    next_order: u64,
    entries: Vec<Entry>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: &'static str, timeline: Box<dyn Timeline>) {
        self.add_with_priority(id, 0, timeline);
    }

    pub fn add_with_priority(
        &mut self,
        id: &'static str,
        priority: i32,
        timeline: Box<dyn Timeline>,
    ) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);
        self.entries.push(Entry {
            id,
            priority,
            order,
            timeline,
        });
        self.entries.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.id.cmp(b.id))
                .then_with(|| a.order.cmp(&b.order))
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut (dyn Timeline + 'static)> {
        self.entries
            .iter_mut()
            .find(|e| e.id == id)
            .map(|e| e.timeline.as_mut())
    }

    /// Stops and detaches the first timeline registered under `id`.
    pub fn remove(&mut self, id: &str) -> Option<Box<dyn Timeline>> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        let mut entry = self.entries.remove(idx);
        entry.timeline.stop();
        debug!(timeline = entry.id, "timeline removed");
        Some(entry.timeline)
    }

    /// Advances every running timeline to the frame's time.
    pub fn run_frame(&mut self, frame: Frame) -> FrameRunSummary {
        let mut advanced = 0usize;
        for entry in &mut self.entries {
            if !entry.timeline.is_running() {
                continue;
            }
            entry.timeline.advance_to(frame.time);
            advanced += 1;
        }
        FrameRunSummary {
            advanced,
            idle: self.entries.len() - advanced,
        }
    }

    pub fn stop_all(&mut self) {
        for entry in &mut self.entries {
            entry.timeline.stop();
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop_all();
    }
}

#[cfg(test)]
mod tests {
    use super::Scheduler;
    use crate::frame::Frame;
    use crate::timeline::Timeline;
    use foundation::time::Time;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Probe {
        name: &'static str,
        running: bool,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Timeline for Probe {
        fn start(&mut self, _now: Time) {
            self.running = true;
        }

        fn stop(&mut self) {
            if self.running {
                self.log.borrow_mut().push(format!("{}:stop", self.name));
            }
            self.running = false;
        }

        fn advance_to(&mut self, now: Time) {
            self.log
                .borrow_mut()
                .push(format!("{}@{}", self.name, now.as_millis_f64()));
        }

        fn is_running(&self) -> bool {
            self.running
        }
    }

    fn probe(name: &'static str, log: &Rc<RefCell<Vec<String>>>) -> Box<Probe> {
        Box::new(Probe {
            name,
            running: true,
            log: log.clone(),
        })
    }

    #[test]
    fn advances_in_stable_id_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut sched = Scheduler::new();
        sched.add("b", probe("b", &log));
        sched.add("a", probe("a", &log));

        let summary = sched.run_frame(Frame::first(Time::from_millis(16)));
        assert_eq!(*log.borrow(), vec!["a@16", "b@16"]);
        assert_eq!(summary.advanced, 2);
    }

    #[test]
    fn lower_priority_value_runs_first() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut sched = Scheduler::new();
        sched.add_with_priority("a", 10, probe("a", &log));
        sched.add_with_priority("b", -1, probe("b", &log));
        sched.run_frame(Frame::first(Time::ZERO));
        assert_eq!(*log.borrow(), vec!["b@0", "a@0"]);
    }

    #[test]
    fn skips_stopped_timelines() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut sched = Scheduler::new();
        sched.add("a", probe("a", &log));
        sched.get_mut("a").unwrap().stop();
        log.borrow_mut().clear();

        let summary = sched.run_frame(Frame::first(Time::ZERO));
        assert!(log.borrow().is_empty());
        assert_eq!(summary.idle, 1);
    }

    #[test]
    fn remove_stops_the_timeline() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut sched = Scheduler::new();
        sched.add("a", probe("a", &log));
        let removed = sched.remove("a").unwrap();
        assert!(!removed.is_running());
        assert_eq!(*log.borrow(), vec!["a:stop"]);
        assert!(sched.remove("a").is_none());
        assert!(sched.is_empty());
    }
}
