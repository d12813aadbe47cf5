use foundation::time::Time;

/// Explicit start/stop lifecycle for a time-driven state machine.
///
/// `advance_to` is the only way time reaches a machine, so a host (or a
/// test) can drive it from any clock. `stop` cancels everything the machine
/// has scheduled and must be safe to call repeatedly.
pub trait Timeline {
    fn start(&mut self, now: Time);
    fn stop(&mut self);
    fn advance_to(&mut self, now: Time);
    fn is_running(&self) -> bool;
}

impl<T: Timeline + ?Sized> Timeline for Box<T> {
    fn start(&mut self, now: Time) {
        (**self).start(now)
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn advance_to(&mut self, now: Time) {
        (**self).advance_to(now)
    }

    fn is_running(&self) -> bool {
        (**self).is_running()
    }
}
