use catalog::DomainId;
use foundation::math::{Keyframes, clamp01};
use runtime::{Observers, SubscriptionId};
use serde::Serialize;
use tracing::debug;

use crate::error::ConfigError;
use crate::motion::MotionPreference;
use crate::scroll::RangeTable;

pub const DEFAULT_VISIBLE_BELOW: f64 = 0.98;
pub const SCALE_KEYFRAMES: [(f64, f64); 3] = [(0.0, 1.0), (0.1, 0.7), (0.15, 0.65)];
pub const OPACITY_KEYFRAMES: [(f64, f64); 5] =
    [(0.0, 1.0), (0.05, 1.0), (0.12, 0.9), (0.98, 0.9), (1.0, 0.0)];

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorConfig {
    visible_below: f64,
    scale: Keyframes,
    opacity: Keyframes,
}

impl IndicatorConfig {
    pub fn new(visible_below: f64, scale: Keyframes, opacity: Keyframes) -> Result<Self, ConfigError> {
        if !(visible_below > 0.0 && visible_below <= 1.0) {
            return Err(ConfigError::Cutoff(visible_below));
        }
        Ok(Self {
            visible_below,
            scale,
            opacity,
        })
    }

    pub fn visible_below(&self) -> f64 {
        self.visible_below
    }

    pub fn scale_at(&self, progress: f64) -> f64 {
        self.scale.sample(progress)
    }

    pub fn opacity_at(&self, progress: f64) -> f64 {
        self.opacity.sample(progress)
    }
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            visible_below: DEFAULT_VISIBLE_BELOW,
            scale: Keyframes::new(SCALE_KEYFRAMES.to_vec()).unwrap_or_else(|_| Keyframes::constant(1.0)),
            opacity: Keyframes::new(OPACITY_KEYFRAMES.to_vec())
                .unwrap_or_else(|_| Keyframes::constant(1.0)),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct IndicatorState {
    pub domain: DomainId,
    pub visible: bool,
    pub scale: f64,
    pub opacity: f64,
    pub label: &'static str,
}

impl IndicatorState {
    fn label_for(domain: DomainId) -> &'static str {
        match domain {
            DomainId::Landing => "",
            other => other.as_str(),
        }
    }
}

/// Floating domain badge driven by page scroll progress.
///
/// Observers are notified only when the derived state changes, so feeding
/// every scroll sample is fine.
#[derive(Debug)]
pub struct ScrollIndicator {
    config: IndicatorConfig,
    table: RangeTable,
    motion: MotionPreference,
    progress: f64,
    state: IndicatorState,
    observers: Observers<IndicatorState>,
}

impl ScrollIndicator {
    pub fn new(config: IndicatorConfig, table: RangeTable) -> Self {
        let motion = MotionPreference::Full;
        let state = Self::derive(&config, &table, motion, 0.0);
        Self {
            config,
            table,
            motion,
            progress: 0.0,
            state,
            observers: Observers::new(),
        }
    }

    fn derive(
        config: &IndicatorConfig,
        table: &RangeTable,
        motion: MotionPreference,
        progress: f64,
    ) -> IndicatorState {
        let domain = table.resolve(progress);
        let label = IndicatorState::label_for(domain);
        if motion.is_reduced() {
            return IndicatorState {
                domain,
                visible: false,
                scale: 1.0,
                opacity: 1.0,
                label,
            };
        }
        IndicatorState {
            domain,
            visible: progress < config.visible_below,
            scale: config.scale_at(progress),
            opacity: config.opacity_at(progress),
            label,
        }
    }

    pub fn state(&self) -> IndicatorState {
        self.state
    }

    pub fn motion(&self) -> MotionPreference {
        self.motion
    }

    pub fn subscribe(&mut self, f: impl FnMut(&IndicatorState) + 'static) -> SubscriptionId {
        self.observers.subscribe(f)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Feeds one scroll sample. Out-of-range values are clamped.
    pub fn update(&mut self, progress: f64) -> IndicatorState {
        self.progress = clamp01(progress);
        self.refresh();
        self.state
    }

    pub fn set_motion(&mut self, motion: MotionPreference) {
        if self.motion != motion {
            self.motion = motion;
            self.refresh();
        }
    }

    fn refresh(&mut self) {
        let next = Self::derive(&self.config, &self.table, self.motion, self.progress);
        if next == self.state {
            return;
        }
        if next.domain != self.state.domain {
            debug!(from = self.state.domain.as_str(), to = next.domain.as_str(), "indicator domain");
        }
        self.state = next;
        self.observers.notify(&next);
    }
}
