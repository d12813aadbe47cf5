use foundation::color::Rgb;
use foundation::math::Vec2;
use foundation::time::Time;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::commands::{DrawCmd, PaintFrame};
use crate::error::{PainterError, positive, seconds, unit};
use crate::marks::{DEFAULT_EPSILON, MarkMap};
use crate::raster::RasterSize;
use crate::trail::resample;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    pub radius_px: f64,
    pub fade_s: f64,
    pub intensity: f64,
    pub epsilon: f64,
    pub color: String,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            radius_px: 28.0,
            fade_s: 1.2,
            intensity: 0.85,
            epsilon: DEFAULT_EPSILON,
            color: "#7c6cf0".to_string(),
        }
    }
}

/// Soft radial blobs stamped along the pointer path.
///
/// Samples further apart than half a radius are joined by resampled
/// stamps so fast strokes stay continuous.
#[derive(Debug, Clone)]
pub struct BrushTrail {
    radius: f64,
    intensity: f64,
    color: Rgb,
    size: RasterSize,
    last: Option<Vec2>,
    marks: MarkMap<(i64, i64)>,
}

impl BrushTrail {
    pub fn new(config: &BrushConfig) -> Result<Self, PainterError> {
        let radius = positive("radius_px", config.radius_px)?;
        let fade = seconds("fade_s", config.fade_s)?;
        Ok(Self {
            radius,
            intensity: unit("intensity", config.intensity)?,
            color: Rgb::from_hex(&config.color)?,
            size: RasterSize::default(),
            last: None,
            marks: MarkMap::with_epsilon(fade, unit("epsilon", config.epsilon)?),
        })
    }

    /// Maximum distance between consecutive stamps.
    pub fn step(&self) -> f64 {
        self.radius / 2.0
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    pub fn live_marks(&self) -> usize {
        self.marks.len()
    }

    pub fn resize(&mut self, size: RasterSize) -> bool {
        if size == self.size {
            return false;
        }
        debug!(w = size.css_width, h = size.css_height, "brush trail resized");
        self.size = size;
        self.last = None;
        self.marks.clear();
        true
    }

    fn stamp(&mut self, p: Vec2, now: Time) {
        let key = (p.x.round() as i64, p.y.round() as i64);
        self.marks.refresh(key, self.intensity, now);
    }

    /// Returns how many stamps the sample produced. Samples outside the
    /// canvas break the stroke.
    pub fn pointer_move(&mut self, pos: Vec2, now: Time) -> usize {
        if !pos.is_finite() || !self.size.contains(pos.x, pos.y) {
            self.last = None;
            return 0;
        }
        let points = match self.last {
            Some(last) if last.distance(pos) > self.step() => resample(last, pos, self.step()),
            _ => vec![pos],
        };
        for &p in &points {
            self.stamp(p, now);
        }
        self.last = Some(pos);
        points.len()
    }

    pub fn pointer_leave(&mut self) {
        self.last = None;
    }

    pub fn tick(&mut self, now: Time) -> PaintFrame {
        let mut frame = PaintFrame::default();
        frame.commands.push(DrawCmd::Clear {
            width: self.size.css_width,
            height: self.size.css_height,
        });
        for ((x, y), alpha) in self.marks.live(now) {
            frame.commands.push(DrawCmd::Blob {
                x: x as f64,
                y: y as f64,
                radius: self.radius,
                color: self.color.with_alpha(alpha),
            });
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::{BrushConfig, BrushTrail};
    use crate::raster::RasterSize;
    use foundation::math::Vec2;
    use foundation::time::Time;

    fn brush() -> BrushTrail {
        let mut b = BrushTrail::new(&BrushConfig {
            radius_px: 20.0,
            ..BrushConfig::default()
        })
        .unwrap();
        b.resize(RasterSize::for_container(1_000.0, 600.0, 1.0));
        b
    }

    #[test]
    fn fast_stroke_is_resampled() {
        let mut b = brush();
        assert_eq!(b.pointer_move(Vec2::new(0.0, 0.0), Time::ZERO), 1);
        assert_eq!(b.pointer_move(Vec2::new(500.0, 0.0), Time::ZERO), 50);
        assert_eq!(b.live_marks(), 51);
    }

    #[test]
    fn slow_stroke_stamps_once() {
        let mut b = brush();
        b.pointer_move(Vec2::new(100.0, 100.0), Time::ZERO);
        assert_eq!(b.pointer_move(Vec2::new(105.0, 100.0), Time::ZERO), 1);
    }

    #[test]
    fn leaving_the_canvas_breaks_the_stroke() {
        let mut b = brush();
        b.pointer_move(Vec2::new(10.0, 10.0), Time::ZERO);
        assert_eq!(b.pointer_move(Vec2::new(-5.0, 10.0), Time::ZERO), 0);
        assert_eq!(b.pointer_move(Vec2::new(400.0, 10.0), Time::ZERO), 1);
    }

    #[test]
    fn blobs_fade_out_completely() {
        let mut b = brush();
        b.pointer_move(Vec2::new(10.0, 10.0), Time::ZERO);
        b.pointer_move(Vec2::new(300.0, 300.0), Time::ZERO);
        assert!(b.tick(Time::from_millis(600)).len() > 1);
        let f = b.tick(Time::from_millis(1_200));
        assert_eq!(f.len(), 1);
        assert_eq!(b.live_marks(), 0);
    }
}
