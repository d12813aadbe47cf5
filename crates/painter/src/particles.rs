use std::f64::consts::PI;

use catalog::DomainId;
use foundation::color::Rgb;
use foundation::math::Vec3;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ParticlePreset {
    pub count: usize,
    pub radius: f64,
    pub size: f64,
    pub color: Rgb,
    pub speed: f64,
    pub opacity: f64,
}

impl ParticlePreset {
    pub fn for_domain(domain: DomainId) -> Self {
        let p = |count, radius, size, color, speed, opacity| Self {
            count,
            radius,
            size,
            color,
            speed,
            opacity,
        };
        match domain {
            DomainId::Landing => p(40, 2.5, 0.025, Rgb::new(0x7c, 0x5c, 0xfc), 0.3, 0.6),
            DomainId::Backend => p(30, 2.8, 0.03, Rgb::new(0x81, 0x8c, 0xf8), 0.4, 0.7),
            DomainId::Cloud => p(80, 3.0, 0.02, Rgb::new(0x22, 0xd3, 0xee), 0.6, 0.5),
            DomainId::Ai => p(60, 2.6, 0.028, Rgb::new(0x10, 0xb9, 0x81), 0.5, 0.65),
            DomainId::Web3 => p(35, 2.8, 0.035, Rgb::new(0xa8, 0x55, 0xf7), 0.35, 0.75),
        }
    }

    pub fn effective_count(&self, reduced_quality: bool) -> usize {
        if reduced_quality {
            ((self.count as f64 * 0.55).round() as usize).max(16)
        } else {
            self.count
        }
    }
}

/// Deterministic hash in `[0, 1)` of a seed.
pub fn pseudo_random(seed: f64) -> f64 {
    let v = (seed * 12.9898).sin() * 43758.5453;
    v - v.floor()
}

#[derive(Debug, Clone, PartialEq)]
struct Particle {
    base: Vec3,
    spin: f64,
}

/// Particles scattered in a shell around the avatar, orbiting the Y axis
/// and bobbing vertically.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleField {
    preset: ParticlePreset,
    reduced_quality: bool,
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new(domain: DomainId, reduced_quality: bool) -> Self {
        let preset = ParticlePreset::for_domain(domain);
        let particles = (0..preset.effective_count(reduced_quality))
            .map(|i| {
                let seed = i as f64 + preset.radius * 100.0;
                let theta = pseudo_random(seed + 1.0) * PI * 2.0;
                let phi = (2.0 * pseudo_random(seed + 2.0) - 1.0).acos();
                let r = preset.radius * (0.6 + pseudo_random(seed + 3.0) * 0.4);
                Particle {
                    base: Vec3::new(
                        r * phi.sin() * theta.cos(),
                        r * phi.sin() * theta.sin(),
                        r * phi.cos(),
                    ),
                    spin: (pseudo_random(seed + 4.0) - 0.5) * 0.01,
                }
            })
            .collect();
        Self {
            preset,
            reduced_quality,
            particles,
        }
    }

    pub fn preset(&self) -> &ParticlePreset {
        &self.preset
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn opacity(&self) -> f64 {
        if self.reduced_quality {
            self.preset.opacity * 0.9
        } else {
            self.preset.opacity
        }
    }

    pub fn base_positions(&self) -> Vec<Vec3> {
        self.particles.iter().map(|p| p.base).collect()
    }

    /// Positions `elapsed_s` seconds after the field was created.
    pub fn positions_at(&self, elapsed_s: f64) -> Vec<Vec3> {
        let t = elapsed_s * self.preset.speed;
        self.particles
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let angle = t * (0.5 + p.spin * 10.0);
                let orbit = p.base.rotate_y(angle);
                Vec3::new(orbit.x, p.base.y + (t + i as f64 * 0.1).sin() * 0.15, orbit.z)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{ParticleField, ParticlePreset, pseudo_random};
    use catalog::DomainId;

    #[test]
    fn reduced_quality_thins_the_field() {
        let full = ParticleField::new(DomainId::Cloud, false);
        let lite = ParticleField::new(DomainId::Cloud, true);
        assert_eq!(full.len(), 80);
        assert_eq!(lite.len(), 44);
        assert_eq!(ParticlePreset::for_domain(DomainId::Backend).effective_count(true), 17);
        assert_eq!(ParticlePreset::for_domain(DomainId::Landing).effective_count(true), 22);
        assert!((lite.opacity() - 0.45).abs() < 1e-9);
    }

    #[test]
    fn placement_is_deterministic_and_inside_the_shell() {
        let a = ParticleField::new(DomainId::Ai, false);
        let b = ParticleField::new(DomainId::Ai, false);
        assert_eq!(a, b);
        let r = a.preset().radius;
        for p in a.base_positions() {
            let d = p.length();
            assert!(d >= r * 0.6 - 1e-9 && d <= r + 1e-9, "{d}");
        }
    }

    #[test]
    fn orbit_preserves_horizontal_distance() {
        let f = ParticleField::new(DomainId::Web3, false);
        let base = f.base_positions();
        let later = f.positions_at(3.0);
        for (b, l) in base.iter().zip(&later) {
            let hb = b.x.hypot(b.z);
            let hl = l.x.hypot(l.z);
            assert!((hb - hl).abs() < 1e-9);
            assert!((l.y - b.y).abs() <= 0.15 + 1e-9);
        }
    }

    #[test]
    fn hash_is_in_unit_interval() {
        for i in 0..1_000 {
            let v = pseudo_random(i as f64 * 0.37);
            assert!((0.0..1.0).contains(&v));
        }
    }
}
