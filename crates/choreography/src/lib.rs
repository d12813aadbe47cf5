//! Scroll- and time-driven sequencing for the portfolio site.
//!
//! Every machine here is headless: it is driven by explicit `start`,
//! `stop` and `advance_to(now)` calls (see [`runtime::Timeline`]) and
//! publishes snapshots to subscribers. Rendering lives elsewhere.
pub mod config;
pub mod counter;
pub mod error;
pub mod gate;
pub mod indicator;
pub mod intro;
pub mod loader;
pub mod motion;
pub mod parallax;
pub mod scroll;
pub mod split;

pub use config::{ChoreographyConfig, ResolvedConfig};
pub use error::*;
pub use gate::IntroGate;
pub use indicator::{IndicatorConfig, IndicatorState, ScrollIndicator};
pub use intro::{IntroPhase, IntroSequencer, IntroTimings};
pub use loader::{LoaderConfig, LoaderSnapshot, ProgressLoader};
pub use motion::MotionPreference;
pub use parallax::{LayerOffset, ParallaxLayer, ParallaxRig, himalayan_layers, pointer_from_viewport};
pub use scroll::{RangeTable, ScrollRange, resolve_domain};
pub use split::{SplitConfig, SplitLoader, SplitPhase, SplitSnapshot};
