use std::collections::BTreeMap;
use std::time::Duration;

use foundation::time::Time;

/// Marks whose alpha drops to this or below are pruned.
pub const DEFAULT_EPSILON: f64 = 0.01;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mark {
    pub intensity: f64,
    pub born: Time,
}

impl Mark {
    /// `intensity * max(0, 1 - elapsed / fade)`. A zero fade is fully faded.
    pub fn alpha_at(&self, now: Time, fade: Duration) -> f64 {
        let fade_s = fade.as_secs_f64();
        if fade_s <= 0.0 {
            return 0.0;
        }
        let elapsed = now.since(self.born).as_secs_f64();
        (self.intensity * (1.0 - elapsed / fade_s)).max(0.0)
    }
}

/// Decaying marks keyed by position.
///
/// Insertion and refresh are driven by pointer input; [`MarkMap::prune`]
/// must run every paint tick to keep the live set bounded.
#[derive(Debug, Clone)]
pub struct MarkMap<K> {
    fade: Duration,
    epsilon: f64,
    marks: BTreeMap<K, Mark>,
}

impl<K: Ord + Copy> MarkMap<K> {
    pub fn new(fade: Duration) -> Self {
        Self::with_epsilon(fade, DEFAULT_EPSILON)
    }

    pub fn with_epsilon(fade: Duration, epsilon: f64) -> Self {
        Self {
            fade,
            epsilon: epsilon.max(0.0),
            marks: BTreeMap::new(),
        }
    }

    pub fn fade(&self) -> Duration {
        self.fade
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }

    pub fn get(&self, key: &K) -> Option<&Mark> {
        self.marks.get(key)
    }

    pub fn alpha(&self, key: &K, now: Time) -> f64 {
        self.marks
            .get(key)
            .map(|m| m.alpha_at(now, self.fade))
            .unwrap_or(0.0)
    }

    /// Inserts or restarts the mark at `key`.
    pub fn refresh(&mut self, key: K, intensity: f64, now: Time) {
        self.marks.insert(
            key,
            Mark {
                intensity: intensity.clamp(0.0, 1.0),
                born: now,
            },
        );
    }

    /// Like [`MarkMap::refresh`] but never dims a brighter mark already at
    /// `key`. Returns whether the mark was written.
    pub fn refresh_if_brighter(&mut self, key: K, intensity: f64, now: Time) -> bool {
        if self.alpha(&key, now) >= intensity {
            return false;
        }
        self.refresh(key, intensity, now);
        true
    }

    /// Drops every mark at or below epsilon; returns how many went.
    pub fn prune(&mut self, now: Time) -> usize {
        let before = self.marks.len();
        let (fade, eps) = (self.fade, self.epsilon);
        self.marks.retain(|_, m| m.alpha_at(now, fade) > eps);
        before - self.marks.len()
    }

    /// Prunes, then returns the survivors with their current alpha, dimmest
    /// first so brighter marks composite on top.
    pub fn live(&mut self, now: Time) -> Vec<(K, f64)> {
        self.prune(now);
        let mut out: Vec<(K, f64)> = self
            .marks
            .iter()
            .map(|(k, m)| (*k, m.alpha_at(now, self.fade)))
            .collect();
        out.sort_by(|a, b| a.1.total_cmp(&b.1));
        out
    }
}
