/// Change-notification registry for state snapshots.
///
/// Subscribers are called in subscription order. A subscriber must not
/// re-enter the owner that is notifying it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(pub u64);

type Callback<S> = Box<dyn FnMut(&S)>;

pub struct Observers<S> {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Callback<S>)>,
}

impl<S> Default for Observers<S> {
    fn default() -> Self {
        Self {
            next_id: 0,
            subscribers: Vec::new(),
        }
    }
}

impl<S> std::fmt::Debug for Observers<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("len", &self.subscribers.len())
            .finish()
    }
}

impl<S> Observers<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, f: impl FnMut(&S) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.subscribers.push((id, Box::new(f)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn notify(&mut self, state: &S) {
        for (_, f) in &mut self.subscribers {
            f(state);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub fn clear(&mut self) {
        self.subscribers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::Observers;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn notifies_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut obs = Observers::new();
        let l1 = log.clone();
        obs.subscribe(move |v: &u32| l1.borrow_mut().push(("a", *v)));
        let l2 = log.clone();
        obs.subscribe(move |v: &u32| l2.borrow_mut().push(("b", *v)));

        obs.notify(&7);
        assert_eq!(*log.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let hits = Rc::new(RefCell::new(0));
        let mut obs = Observers::new();
        let h = hits.clone();
        let id = obs.subscribe(move |_: &()| *h.borrow_mut() += 1);

        assert!(obs.unsubscribe(id));
        assert!(!obs.unsubscribe(id));
        obs.notify(&());
        assert_eq!(*hits.borrow(), 0);
        assert!(obs.is_empty());
    }
}
