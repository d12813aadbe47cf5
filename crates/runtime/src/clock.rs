use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use foundation::time::Time;

/// Source of "now" for timers and frame callbacks.
pub trait Clock {
    fn now(&self) -> Time;
}

/// Manually advanced clock for headless runs and tests.
///
/// Clones share the same underlying time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Time>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(t: Time) -> Self {
        Self {
            now: Rc::new(Cell::new(t)),
        }
    }

    pub fn advance(&self, by: Duration) -> Time {
        let t = self.now.get() + by;
        self.now.set(t);
        t
    }

    /// Moves the clock to `t`; earlier values are ignored.
    pub fn set(&self, t: Time) {
        if t > self.now.get() {
            self.now.set(t);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Time {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, ManualClock};
    use foundation::time::Time;
    use std::time::Duration;

    #[test]
    fn clones_share_time() {
        let a = ManualClock::new();
        let b = a.clone();
        a.advance(Duration::from_millis(5));
        assert_eq!(b.now(), Time::from_millis(5));
    }

    #[test]
    fn set_never_rewinds() {
        let c = ManualClock::starting_at(Time::from_millis(10));
        c.set(Time::from_millis(3));
        assert_eq!(c.now(), Time::from_millis(10));
        c.set(Time::from_millis(12));
        assert_eq!(c.now(), Time::from_millis(12));
    }
}
