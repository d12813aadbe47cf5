use foundation::math::{Vec2, clamp01};
use serde::{Deserialize, Serialize};

use crate::motion::MotionPreference;

/// One depth layer: vertical travel over the full scroll range and lateral
/// shift per unit of normalised pointer offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallaxLayer {
    pub name: String,
    pub travel_px: f64,
    pub lateral_px: f64,
}

impl ParallaxLayer {
    pub fn new(name: impl Into<String>, travel_px: f64, lateral_px: f64) -> Self {
        Self {
            name: name.into(),
            travel_px,
            lateral_px,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize)]
pub struct LayerOffset {
    pub x: f64,
    pub y: f64,
}

/// Back-to-front Himalayan landscape layers.
pub fn himalayan_layers() -> Vec<ParallaxLayer> {
    vec![
        ParallaxLayer::new("clouds", 15.0, -2.0),
        ParallaxLayer::new("snow-peak", 30.0, -3.0),
        ParallaxLayer::new("far-mountains", 70.0, -6.0),
        ParallaxLayer::new("mid-mountains", 120.0, -10.0),
        ParallaxLayer::new("near-hills", 200.0, -15.0),
        ParallaxLayer::new("trees", 300.0, -20.0),
    ]
}

/// Maps a viewport position to `[-1, 1]` per axis, centre at 0.
pub fn pointer_from_viewport(client: Vec2, viewport: Vec2) -> Vec2 {
    let axis = |v: f64, extent: f64| {
        if extent > 0.0 && v.is_finite() {
            ((v / extent - 0.5) * 2.0).clamp(-1.0, 1.0)
        } else {
            0.0
        }
    };
    Vec2::new(axis(client.x, viewport.x), axis(client.y, viewport.y))
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParallaxRig {
    layers: Vec<ParallaxLayer>,
    motion: MotionPreference,
}

impl Default for ParallaxRig {
    fn default() -> Self {
        Self::new(himalayan_layers())
    }
}

impl ParallaxRig {
    pub fn new(layers: Vec<ParallaxLayer>) -> Self {
        Self {
            layers,
            motion: MotionPreference::Full,
        }
    }

    pub fn layers(&self) -> &[ParallaxLayer] {
        &self.layers
    }

    pub fn set_motion(&mut self, motion: MotionPreference) {
        self.motion = motion;
    }

    /// One offset per layer, in layer order. Reduced motion pins every
    /// layer at the origin.
    pub fn offsets(&self, progress: f64, pointer: Vec2) -> Vec<LayerOffset> {
        if self.motion.is_reduced() {
            return vec![LayerOffset::default(); self.layers.len()];
        }
        let p = clamp01(progress);
        let px = if pointer.x.is_finite() {
            pointer.x.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        self.layers
            .iter()
            .map(|l| LayerOffset {
                x: px * l.lateral_px,
                y: p * l.travel_px,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{LayerOffset, ParallaxRig, pointer_from_viewport};
    use crate::motion::MotionPreference;
    use foundation::math::Vec2;

    #[test]
    fn foreground_moves_fastest() {
        let rig = ParallaxRig::default();
        let o = rig.offsets(1.0, Vec2::new(0.0, 0.0));
        assert_eq!(o.len(), 6);
        assert_eq!(o[0].y, 15.0);
        assert_eq!(o[5].y, 300.0);
        assert!(o.windows(2).all(|w| w[0].y < w[1].y));
    }

    #[test]
    fn pointer_shifts_layers_against_its_direction() {
        let rig = ParallaxRig::default();
        let o = rig.offsets(0.5, Vec2::new(1.0, 0.0));
        assert_eq!(o[5], LayerOffset { x: -20.0, y: 150.0 });
        assert_eq!(o[0].x, -2.0);
    }

    #[test]
    fn reduced_motion_is_static() {
        let mut rig = ParallaxRig::default();
        rig.set_motion(MotionPreference::Reduced);
        let o = rig.offsets(0.8, Vec2::new(-1.0, 1.0));
        assert!(o.iter().all(|l| *l == LayerOffset::default()));
    }

    #[test]
    fn viewport_mapping() {
        let vp = Vec2::new(1000.0, 800.0);
        assert_eq!(pointer_from_viewport(Vec2::new(500.0, 400.0), vp), Vec2::new(0.0, 0.0));
        assert_eq!(pointer_from_viewport(Vec2::new(0.0, 800.0), vp), Vec2::new(-1.0, 1.0));
        assert_eq!(pointer_from_viewport(Vec2::new(10.0, 10.0), Vec2::new(0.0, 0.0)), Vec2::new(0.0, 0.0));
    }
}
