//! Deterministic timer queue standing in for `setTimeout`/`setInterval`.
//!
//! Key properties:
//! - Total ordering on `(due, id)`: equal due times fire in scheduling order.
//! - Timers fire one at a time via [`TimerQueue::pop_due`], so a handler can
//!   cancel sibling timers before they are observed.
//! - Intervals re-arm at `due + interval`; a large clock jump replays every
//!   missed occurrence in order.
//! - Cancellation is idempotent.
use std::time::Duration;

use foundation::time::Time;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TimerError {
    ZeroInterval,
}

impl std::fmt::Display for TimerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimerError::ZeroInterval => write!(f, "interval timers need a non-zero period"),
        }
    }
}

impl std::error::Error for TimerError {}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Key {
    due: Time,
    id: TimerId,
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.due
            .cmp(&other.due)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug)]
struct Entry<T> {
    key: Key,
    interval: Option<Duration>,
    payload: T,
}

/// A timer that came due.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Fired<T> {
    pub id: TimerId,
    /// The scheduled time, which may be earlier than the poll time.
    pub due: Time,
    pub payload: T,
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    next_id: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<T: Copy> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn alloc_id(&mut self) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub fn schedule_once(&mut self, at: Time, payload: T) -> TimerId {
        let id = self.alloc_id();
        self.entries.push(Entry {
            key: Key { due: at, id },
            interval: None,
            payload,
        });
        id
    }

    /// Schedules a repeating timer whose first occurrence is `first_at`.
    pub fn schedule_every(
        &mut self,
        first_at: Time,
        interval: Duration,
        payload: T,
    ) -> Result<TimerId, TimerError> {
        if interval.is_zero() {
            return Err(TimerError::ZeroInterval);
        }
        let id = self.alloc_id();
        self.entries.push(Entry {
            key: Key { due: first_at, id },
            interval: Some(interval),
            payload,
        });
        Ok(id)
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.key.id == id)
    }

    /// Returns `false` when `id` is unknown or was already cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        if let Some(idx) = self.entries.iter().position(|e| e.key.id == id) {
            self.entries.swap_remove(idx);
            return true;
        }
        false
    }

    /// Cancels everything; returns how many timers were pending.
    pub fn cancel_all(&mut self) -> usize {
        let n = self.entries.len();
        self.entries.clear();
        n
    }

    pub fn next_due(&self) -> Option<Time> {
        self.entries.iter().map(|e| e.key).min().map(|k| k.due)
    }

    /// Pops the earliest timer with `due <= now`.
    pub fn pop_due(&mut self, now: Time) -> Option<Fired<T>> {
        let mut best_idx: Option<usize> = None;
        for (idx, entry) in self.entries.iter().enumerate() {
            match best_idx {
                None => best_idx = Some(idx),
                Some(best) => {
                    if entry.key < self.entries[best].key {
                        best_idx = Some(idx);
                    }
                }
            }
        }

        let idx = best_idx?;
        let key = self.entries[idx].key;
        if key.due > now {
            return None;
        }

        let entry = &mut self.entries[idx];
        let fired = Fired {
            id: key.id,
            due: key.due,
            payload: entry.payload,
        };
        match entry.interval {
            Some(interval) => entry.key.due = key.due + interval,
            None => {
                self.entries.swap_remove(idx);
            }
        }
        Some(fired)
    }
}

#[cfg(test)]
mod tests {
    use super::{TimerError, TimerQueue};
    use foundation::time::Time;
    use std::time::Duration;

    fn ms(v: u64) -> Time {
        Time::from_millis(v)
    }

    #[test]
    fn once_timers_fire_in_due_order() {
        let mut q = TimerQueue::new();
        q.schedule_once(ms(30), "c");
        q.schedule_once(ms(10), "a");
        q.schedule_once(ms(20), "b");

        let mut seen = Vec::new();
        while let Some(f) = q.pop_due(ms(100)) {
            seen.push(f.payload);
        }
        assert_eq!(seen, vec!["a", "b", "c"]);
        assert!(q.is_empty());
    }

    #[test]
    fn equal_due_times_fire_in_scheduling_order() {
        let mut q = TimerQueue::new();
        q.schedule_once(ms(5), 1);
        q.schedule_once(ms(5), 2);
        assert_eq!(q.pop_due(ms(5)).unwrap().payload, 1);
        assert_eq!(q.pop_due(ms(5)).unwrap().payload, 2);
    }

    #[test]
    fn nothing_fires_before_due() {
        let mut q = TimerQueue::new();
        q.schedule_once(ms(10), ());
        assert!(q.pop_due(ms(9)).is_none());
        assert_eq!(q.next_due(), Some(ms(10)));
        assert!(q.pop_due(ms(10)).is_some());
    }

    #[test]
    fn interval_replays_missed_occurrences() {
        let mut q = TimerQueue::new();
        q.schedule_every(ms(50), Duration::from_millis(50), "tick").unwrap();
        let mut dues = Vec::new();
        while let Some(f) = q.pop_due(ms(220)) {
            dues.push(f.due);
        }
        assert_eq!(dues, vec![ms(50), ms(100), ms(150), ms(200)]);
        assert_eq!(q.next_due(), Some(ms(250)));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut q: TimerQueue<()> = TimerQueue::new();
        assert_eq!(
            q.schedule_every(ms(0), Duration::ZERO, ()),
            Err(TimerError::ZeroInterval)
        );
        assert!(q.is_empty());
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut q = TimerQueue::new();
        let a = q.schedule_once(ms(1), "a");
        q.schedule_once(ms(2), "b");
        assert!(q.cancel(a));
        assert!(!q.cancel(a));
        assert!(!q.is_scheduled(a));
        assert_eq!(q.pop_due(ms(10)).unwrap().payload, "b");
        assert_eq!(q.cancel_all(), 0);
    }

    #[test]
    fn handler_can_cancel_sibling_before_it_fires() {
        let mut q = TimerQueue::new();
        q.schedule_once(ms(10), "first");
        let second = q.schedule_once(ms(10), "second");
        let f = q.pop_due(ms(10)).unwrap();
        assert_eq!(f.payload, "first");
        assert!(q.cancel(second));
        assert!(q.pop_due(ms(10)).is_none());
    }
}
