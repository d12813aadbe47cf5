use std::time::Duration;

use foundation::math::Keyframes;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;
use crate::indicator::{DEFAULT_VISIBLE_BELOW, IndicatorConfig, OPACITY_KEYFRAMES, SCALE_KEYFRAMES};
use crate::intro::IntroTimings;
use crate::loader::LoaderConfig;
use crate::parallax::{ParallaxLayer, ParallaxRig, himalayan_layers};
use crate::scroll::{RangeTable, ScrollRange};
use crate::split::SplitConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroSettings {
    pub hold_ms: u64,
    pub exit_ms: u64,
    pub done_ms: u64,
}

impl Default for IntroSettings {
    fn default() -> Self {
        Self {
            hold_ms: 800,
            exit_ms: 2_800,
            done_ms: 4_200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderSettings {
    pub duration_ms: u64,
    pub ticks: u32,
    pub step: u32,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            duration_ms: 2_500,
            ticks: 50,
            step: 2,
        }
    }
}

impl LoaderSettings {
    fn checked(&self, which: &'static str) -> Result<LoaderConfig, ConfigError> {
        if self.ticks == 0 {
            return Err(ConfigError::ZeroTicks(which));
        }
        if self.step == 0 {
            return Err(ConfigError::ZeroStep(which));
        }
        if u64::from(self.ticks) * u64::from(self.step) < 100 {
            let needed = 100u32.div_ceil(self.step);
            warn!(
                which,
                ticks = self.ticks,
                step = self.step,
                needed,
                "loader will overrun its duration before reaching 100%"
            );
        }
        Ok(LoaderConfig {
            duration: Duration::from_millis(self.duration_ms),
            ticks: self.ticks,
            step: self.step,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitSettings {
    pub duration_ms: u64,
    pub ticks: u32,
    pub step: u32,
    pub split_delay_ms: u64,
    pub split_duration_ms: u64,
}

impl Default for SplitSettings {
    fn default() -> Self {
        Self {
            duration_ms: 3_000,
            ticks: 55,
            step: 2,
            split_delay_ms: 200,
            split_duration_ms: 1_200,
        }
    }
}

impl SplitSettings {
    fn loader(&self) -> LoaderSettings {
        LoaderSettings {
            duration_ms: self.duration_ms,
            ticks: self.ticks,
            step: self.step,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorSettings {
    pub visible_below: f64,
    pub scale: Vec<(f64, f64)>,
    pub opacity: Vec<(f64, f64)>,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            visible_below: DEFAULT_VISIBLE_BELOW,
            scale: SCALE_KEYFRAMES.to_vec(),
            opacity: OPACITY_KEYFRAMES.to_vec(),
        }
    }
}

/// Tunables for every machine, as loaded from JSON. Missing fields take
/// the site's values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoreographyConfig {
    pub intro: IntroSettings,
    pub loader: LoaderSettings,
    pub split: SplitSettings,
    pub indicator: IndicatorSettings,
    pub scroll_ranges: Vec<ScrollRange>,
    pub parallax: Vec<ParallaxLayer>,
}

impl Default for ChoreographyConfig {
    fn default() -> Self {
        Self {
            intro: IntroSettings::default(),
            loader: LoaderSettings::default(),
            split: SplitSettings::default(),
            indicator: IndicatorSettings::default(),
            scroll_ranges: RangeTable::site_default().ranges().to_vec(),
            parallax: himalayan_layers(),
        }
    }
}

/// Checked runtime form of [`ChoreographyConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub intro: IntroTimings,
    pub loader: LoaderConfig,
    pub split: SplitConfig,
    pub indicator: IndicatorConfig,
    pub ranges: RangeTable,
    pub parallax: ParallaxRig,
}

impl ChoreographyConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn intro_timings(&self) -> Result<IntroTimings, ConfigError> {
        IntroTimings::new(
            Duration::from_millis(self.intro.hold_ms),
            Duration::from_millis(self.intro.exit_ms),
            Duration::from_millis(self.intro.done_ms),
        )
    }

    pub fn loader_config(&self) -> Result<LoaderConfig, ConfigError> {
        self.loader.checked("loader")
    }

    pub fn split_config(&self) -> Result<SplitConfig, ConfigError> {
        Ok(SplitConfig {
            loader: self.split.loader().checked("split")?,
            split_delay: Duration::from_millis(self.split.split_delay_ms),
            split_duration: Duration::from_millis(self.split.split_duration_ms),
        })
    }

    pub fn range_table(&self) -> Result<RangeTable, ConfigError> {
        Ok(RangeTable::new(self.scroll_ranges.clone())?)
    }

    pub fn indicator_config(&self) -> Result<IndicatorConfig, ConfigError> {
        let scale = Keyframes::new(self.indicator.scale.clone()).map_err(|source| {
            ConfigError::Keyframes {
                which: "scale",
                source,
            }
        })?;
        let opacity = Keyframes::new(self.indicator.opacity.clone()).map_err(|source| {
            ConfigError::Keyframes {
                which: "opacity",
                source,
            }
        })?;
        IndicatorConfig::new(self.indicator.visible_below, scale, opacity)
    }

    pub fn parallax_rig(&self) -> ParallaxRig {
        ParallaxRig::new(self.parallax.clone())
    }

    /// Fails on the first invalid section.
    pub fn validate(&self) -> Result<ResolvedConfig, ConfigError> {
        Ok(ResolvedConfig {
            intro: self.intro_timings()?,
            loader: self.loader_config()?,
            split: self.split_config()?,
            indicator: self.indicator_config()?,
            ranges: self.range_table()?,
            parallax: self.parallax_rig(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::ChoreographyConfig;
    use crate::error::{ConfigError, RangeTableError};
    use crate::indicator::IndicatorConfig;
    use crate::intro::IntroTimings;
    use crate::loader::LoaderConfig;
    use crate::scroll::RangeTable;
    use crate::split::SplitConfig;
    use foundation::math::KeyframeError;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_runtime_defaults() {
        let r = ChoreographyConfig::default().validate().unwrap();
        assert_eq!(r.intro, IntroTimings::default());
        assert_eq!(r.loader, LoaderConfig::default());
        assert_eq!(r.split, SplitConfig::default());
        assert_eq!(r.indicator, IndicatorConfig::default());
        assert_eq!(r.ranges, RangeTable::site_default());
        assert_eq!(r.parallax.layers().len(), 6);
    }

    #[test]
    fn undersized_loader_is_accepted_and_overruns() {
        use crate::loader::ProgressLoader;
        use foundation::time::Time;
        use runtime::Timeline;

        let c = ChoreographyConfig::from_json(
            r#"{"loader":{"duration_ms":1000,"ticks":10,"step":2}}"#,
        )
        .unwrap();
        let r = c.validate().unwrap();
        let mut loader = ProgressLoader::new(r.loader, vec!["a".to_string()]);
        loader.start(Time::ZERO);
        loader.advance_to(Time::from_millis(1_000));
        assert_eq!(loader.progress(), 20);
        assert!(!loader.snapshot().completed);
        loader.advance_to(Time::from_millis(5_000));
        assert_eq!(loader.progress(), 100);
        assert!(loader.snapshot().completed);
    }

    #[test]
    fn empty_json_is_default() {
        assert_eq!(ChoreographyConfig::from_json("{}").unwrap(), ChoreographyConfig::default());
    }

    #[test]
    fn partial_override() {
        let c = ChoreographyConfig::from_json(r#"{"loader":{"duration_ms":1000},"split":{"ticks":60}}"#)
            .unwrap();
        assert_eq!(c.loader.duration_ms, 1_000);
        assert_eq!(c.loader.ticks, 50);
        assert_eq!(c.split.ticks, 60);
        assert_eq!(c.split.split_delay_ms, 200);
        assert_eq!(c.split.duration_ms, 3_000);
    }

    #[test]
    fn json_round_trip() {
        let c = ChoreographyConfig::default();
        let raw = c.to_json_pretty().unwrap();
        assert_eq!(ChoreographyConfig::from_json(&raw).unwrap(), c);
    }

    #[test]
    fn reports_invalid_sections() {
        let c = ChoreographyConfig::from_json(r#"{"intro":{"hold_ms":3000}}"#).unwrap();
        assert!(matches!(c.validate(), Err(ConfigError::PhaseOrder { .. })));

        let c = ChoreographyConfig::from_json(r#"{"loader":{"ticks":0}}"#).unwrap();
        assert_eq!(c.validate(), Err(ConfigError::ZeroTicks("loader")));

        let c = ChoreographyConfig::from_json(r#"{"split":{"step":0}}"#).unwrap();
        assert_eq!(c.validate(), Err(ConfigError::ZeroStep("split")));

        let c = ChoreographyConfig::from_json(
            r#"{"scroll_ranges":[{"domain":"landing","start":0.0,"end":0.5},{"domain":"web3","start":0.6,"end":1.0}]}"#,
        )
        .unwrap();
        assert_eq!(
            c.validate(),
            Err(ConfigError::Ranges(RangeTableError::Gap {
                index: 0,
                end: 0.5,
                next_start: 0.6
            }))
        );

        let c = ChoreographyConfig::from_json(r#"{"indicator":{"scale":[[0.5,1.0],[0.1,0.5]]}}"#).unwrap();
        assert_eq!(
            c.validate(),
            Err(ConfigError::Keyframes {
                which: "scale",
                source: KeyframeError::NotAscending { index: 1 }
            })
        );
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            ChoreographyConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
