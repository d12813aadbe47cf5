use std::cell::RefCell;
use std::rc::Rc;

use catalog::{SessionStore, has_visited, mark_visited};
use tracing::{debug, warn};

use crate::intro::{IntroSequencer, IntroTimings};

/// Plays the intro at most once per session.
///
/// Storage failures never block the page: an unreadable store counts as a
/// first visit and a failed write is only logged.
#[derive(Debug)]
pub struct IntroGate<S> {
    store: S,
}

impl<S: SessionStore + 'static> IntroGate<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn should_play(&self) -> bool {
        match has_visited(&self.store) {
            Ok(visited) => !visited,
            Err(e) => {
                warn!(error = %e, "session store unreadable; playing intro");
                true
            }
        }
    }

    pub fn mark_shown(&mut self) {
        if let Err(e) = mark_visited(&mut self.store) {
            warn!(error = %e, "could not persist intro visit marker");
        }
    }

    /// Builds the sequencer for this session, or `None` when the intro has
    /// already played. Completion records the visit, then calls `on_done`.
    pub fn begin(
        gate: &Rc<RefCell<Self>>,
        timings: IntroTimings,
        on_done: impl FnOnce() + 'static,
    ) -> Option<IntroSequencer> {
        if !gate.borrow().should_play() {
            debug!("intro already shown this session");
            return None;
        }
        let gate = Rc::clone(gate);
        Some(IntroSequencer::new(timings, move || {
            gate.borrow_mut().mark_shown();
            on_done();
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::IntroGate;
    use crate::intro::IntroTimings;
    use catalog::{InMemorySessionStore, SessionError, SessionStore, has_visited};
    use foundation::time::Time;
    use runtime::Timeline;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct BrokenStore;

    impl SessionStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, SessionError> {
            Err(SessionError::StorageUnavailable)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), SessionError> {
            Err(SessionError::StorageUnavailable)
        }

        fn remove(&mut self, _key: &str) -> Result<bool, SessionError> {
            Err(SessionError::StorageUnavailable)
        }
    }

    #[test]
    fn plays_once_per_session() {
        let gate = Rc::new(RefCell::new(IntroGate::new(InMemorySessionStore::new())));
        let shown = Rc::new(RefCell::new(false));
        let s = shown.clone();

        let mut seq = IntroGate::begin(&gate, IntroTimings::default(), move || {
            *s.borrow_mut() = true;
        })
        .expect("first visit plays");
        seq.start(Time::ZERO);
        seq.advance_to(Time::from_millis(4_200));

        assert!(*shown.borrow());
        assert!(has_visited(gate.borrow().store()).unwrap());
        assert!(IntroGate::begin(&gate, IntroTimings::default(), || {}).is_none());
    }

    #[test]
    fn aborted_intro_does_not_mark_visit() {
        let gate = Rc::new(RefCell::new(IntroGate::new(InMemorySessionStore::new())));
        let mut seq = IntroGate::begin(&gate, IntroTimings::default(), || {}).unwrap();
        seq.start(Time::ZERO);
        seq.advance_to(Time::from_millis(3_000));
        seq.stop();
        assert!(gate.borrow().should_play());
    }

    #[test]
    fn broken_storage_still_plays() {
        let mut gate = IntroGate::new(BrokenStore);
        assert!(gate.should_play());
        gate.mark_shown();
        assert!(gate.should_play());
    }
}
