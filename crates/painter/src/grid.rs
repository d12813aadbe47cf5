use foundation::color::{Rgb, Rgba};
use foundation::math::Vec2;
use foundation::time::Time;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::commands::{DrawCmd, PaintFrame};
use crate::error::{PainterError, positive, seconds, unit};
use crate::marks::{DEFAULT_EPSILON, MarkMap};
use crate::raster::RasterSize;
use crate::trail::resample;

const NEIGHBOURS: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlowGridConfig {
    pub cell_px: f64,
    pub fade_s: f64,
    /// Intensity of the four neighbours lit around the hovered cell.
    pub halo: f64,
    pub epsilon: f64,
    pub primary: String,
    pub secondary: String,
    /// Edge colour of the readability vignette drawn over the cells.
    pub vignette: String,
    /// Vignette opacity at the edge; 0 disables it.
    pub vignette_alpha: f64,
}

impl Default for GlowGridConfig {
    fn default() -> Self {
        Self {
            cell_px: 38.0,
            fade_s: 1.8,
            halo: 0.4,
            epsilon: DEFAULT_EPSILON,
            primary: "#7c6cf0".to_string(),
            secondary: "#b4a0fa".to_string(),
            vignette: "#faf9f7".to_string(),
            vignette_alpha: 0.85,
        }
    }
}

/// Grid of cells that glow under the pointer and fade out behind it.
#[derive(Debug, Clone)]
pub struct GlowGrid {
    cell: f64,
    halo: f64,
    primary: Rgb,
    secondary: Rgb,
    vignette: Rgba,
    size: RasterSize,
    pointer: Option<Vec2>,
    /// Samples since the last tick, resampled to half-cell spacing.
    pending: Vec<Vec2>,
    marks: MarkMap<(i64, i64)>,
}

impl GlowGrid {
    pub fn new(config: &GlowGridConfig) -> Result<Self, PainterError> {
        let cell = positive("cell_px", config.cell_px)?;
        let fade = seconds("fade_s", config.fade_s)?;
        let halo = unit("halo", config.halo)?;
        let epsilon = unit("epsilon", config.epsilon)?;
        let vignette_alpha = unit("vignette_alpha", config.vignette_alpha)?;
        Ok(Self {
            cell,
            halo,
            primary: Rgb::from_hex(&config.primary)?,
            secondary: Rgb::from_hex(&config.secondary)?,
            vignette: Rgb::from_hex(&config.vignette)?.with_alpha(vignette_alpha),
            size: RasterSize::default(),
            pointer: None,
            pending: Vec::new(),
            marks: MarkMap::with_epsilon(fade, epsilon),
        })
    }

    /// Recolours without dropping live marks.
    pub fn set_colors(&mut self, primary: Rgb, secondary: Rgb) {
        self.primary = primary;
        self.secondary = secondary;
    }

    pub fn size(&self) -> RasterSize {
        self.size
    }

    pub fn live_marks(&self) -> usize {
        self.marks.len()
    }

    pub fn cols(&self) -> u32 {
        (self.size.css_width / self.cell).ceil() as u32
    }

    pub fn rows(&self) -> u32 {
        (self.size.css_height / self.cell).ceil() as u32
    }

    /// New backing size; prior marks are discarded. Returns `false`, keeping
    /// every mark, when `size` matches the current one.
    pub fn resize(&mut self, size: RasterSize) -> bool {
        if size == self.size {
            return false;
        }
        debug!(w = size.css_width, h = size.css_height, dpr = size.dpr, "glow grid resized");
        self.size = size;
        self.pointer = None;
        self.pending.clear();
        self.marks.clear();
        true
    }

    /// Interpolation step for fast swipes: half a cell.
    pub fn step(&self) -> f64 {
        self.cell / 2.0
    }

    /// Position relative to the canvas, in CSS pixels. A jump from the
    /// previous sample is filled in so every crossed cell lights up.
    pub fn pointer_move(&mut self, pos: Vec2) {
        if !(pos.is_finite() && pos.x >= 0.0 && pos.y >= 0.0) {
            self.pointer = None;
            return;
        }
        match self.pointer {
            Some(prev) => self.pending.extend(resample(prev, pos, self.step())),
            None => self.pending.push(pos),
        }
        self.pointer = Some(pos);
    }

    pub fn pointer_leave(&mut self) {
        self.pointer = None;
    }

    fn in_bounds(&self, col: i64, row: i64) -> bool {
        col >= 0 && row >= 0 && col < i64::from(self.cols()) && row < i64::from(self.rows())
    }

    fn light(&mut self, p: Vec2, now: Time) {
        let col = (p.x / self.cell).floor() as i64;
        let row = (p.y / self.cell).floor() as i64;
        if !self.in_bounds(col, row) {
            return;
        }
        self.marks.refresh((col, row), 1.0, now);
        for (dc, dr) in NEIGHBOURS {
            let (nc, nr) = (col + dc, row + dr);
            if self.in_bounds(nc, nr) {
                self.marks.refresh_if_brighter((nc, nr), self.halo, now);
            }
        }
    }

    /// Lights every cell crossed since the last tick plus the hovered one,
    /// prunes faded cells and emits the frame.
    pub fn tick(&mut self, now: Time) -> PaintFrame {
        for p in std::mem::take(&mut self.pending) {
            self.light(p, now);
        }
        if let Some(p) = self.pointer {
            self.light(p, now);
        }

        let mut frame = PaintFrame::default();
        frame.commands.push(DrawCmd::Clear {
            width: self.size.css_width,
            height: self.size.css_height,
        });
        frame.commands.push(DrawCmd::GridLines {
            cell: self.cell,
            cols: self.cols(),
            rows: self.rows(),
            color: Rgb::new(0, 0, 0).with_alpha(0.04),
        });
        for ((col, row), alpha) in self.marks.live(now) {
            frame.commands.push(self.cell_cmd(col, row, alpha));
        }
        if self.vignette.a > 0.0 {
            let (w, h) = (self.size.css_width, self.size.css_height);
            frame.commands.push(DrawCmd::Vignette {
                width: w,
                height: h,
                inner_radius: w.min(h) * 0.25,
                outer_radius: w.max(h) * 0.55,
                color: self.vignette,
            });
        }
        frame
    }

    fn cell_cmd(&self, col: i64, row: i64, alpha: f64) -> DrawCmd {
        let rgba = |c: Rgb, a: f64| -> Rgba { c.with_alpha(a) };
        DrawCmd::GlowCell {
            x: col as f64 * self.cell,
            y: row as f64 * self.cell,
            size: self.cell,
            alpha,
            inner: rgba(self.primary, alpha * 0.3),
            mid: rgba(self.secondary, alpha * 0.15),
            border: rgba(self.primary, alpha * 0.25),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GlowGrid, GlowGridConfig};
    use crate::commands::DrawCmd;
    use crate::error::PainterError;
    use crate::raster::RasterSize;
use crate::trail::resample;
    use foundation::math::Vec2;
    use foundation::time::Time;
    use pretty_assertions::assert_eq;

    fn grid() -> GlowGrid {
        let mut g = GlowGrid::new(&GlowGridConfig::default()).unwrap();
        g.resize(RasterSize::for_container(380.0, 380.0, 1.0));
        g
    }

    fn cells(frame: &crate::PaintFrame) -> Vec<(f64, f64, f64)> {
        frame
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCmd::GlowCell { x, y, alpha, .. } => Some((*x, *y, *alpha)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn hover_lights_cell_and_halo() {
        let mut g = grid();
        g.pointer_move(Vec2::new(50.0, 50.0));
        let f = g.tick(Time::ZERO);
        let lit = cells(&f);
        assert_eq!(lit.len(), 5);
        // Dimmest first; the hovered cell at (38, 38) is drawn last.
        assert_eq!(lit.last(), Some(&(38.0, 38.0, 1.0)));
        assert!(lit[..4].iter().all(|c| (c.2 - 0.4).abs() < 1e-9));
    }

    #[test]
    fn halo_is_clipped_at_edges() {
        let mut g = grid();
        g.pointer_move(Vec2::new(1.0, 1.0));
        assert_eq!(cells(&g.tick(Time::ZERO)).len(), 3);
    }

    #[test]
    fn trail_fades_after_leave() {
        let mut g = grid();
        for i in 0..10 {
            g.pointer_move(Vec2::new(5.0 + 38.0 * i as f64, 100.0));
            g.tick(Time::from_millis(16 * i));
        }
        assert!(g.live_marks() > 10);
        g.pointer_leave();
        g.tick(Time::from_millis(16 * 9 + 1_800));
        assert_eq!(g.live_marks(), 0);
    }

    #[test]
    fn resize_discards_marks() {
        let mut g = grid();
        g.pointer_move(Vec2::new(50.0, 50.0));
        g.tick(Time::ZERO);
        g.resize(RasterSize::for_container(200.0, 200.0, 2.0));
        assert_eq!(g.live_marks(), 0);
        assert_eq!((g.cols(), g.rows()), (6, 6));
    }

    #[test]
    fn swipe_between_ticks_lights_every_crossed_cell() {
        let mut g = grid();
        g.pointer_move(Vec2::new(5.0, 100.0));
        g.tick(Time::ZERO);
        g.pointer_move(Vec2::new(370.0, 100.0));
        let f = g.tick(Time::from_millis(16));
        let mut cols: Vec<f64> = cells(&f)
            .into_iter()
            .filter(|c| c.1 == 76.0 && c.2 > 0.9)
            .map(|c| c.0)
            .collect();
        cols.sort_by(f64::total_cmp);
        let expected: Vec<f64> = (0..10).map(|c| c as f64 * 38.0).collect();
        assert_eq!(cols, expected);
    }

    #[test]
    fn leave_breaks_the_stroke() {
        let mut g = grid();
        g.pointer_move(Vec2::new(5.0, 5.0));
        g.tick(Time::ZERO);
        g.pointer_leave();
        g.pointer_move(Vec2::new(370.0, 5.0));
        let lit: Vec<_> = cells(&g.tick(Time::from_millis(16)))
            .into_iter()
            .filter(|c| c.2 > 0.9)
            .collect();
        assert!(lit.iter().all(|c| c.0 == 0.0 || c.0 == 342.0), "{lit:?}");
    }

    #[test]
    fn frame_ends_with_vignette() {
        let mut g = grid();
        let f = g.tick(Time::ZERO);
        assert!(matches!(f.commands.first(), Some(DrawCmd::Clear { .. })));
        match f.commands.last() {
            Some(DrawCmd::Vignette { inner_radius, outer_radius, color, .. }) => {
                assert!((inner_radius - 95.0).abs() < 1e-9);
                assert!((outer_radius - 209.0).abs() < 1e-9);
                assert_eq!(color.a, 0.85);
            }
            other => panic!("expected vignette, got {other:?}"),
        }

        let cfg = GlowGridConfig {
            vignette_alpha: 0.0,
            ..GlowGridConfig::default()
        };
        let mut plain = GlowGrid::new(&cfg).unwrap();
        plain.resize(RasterSize::for_container(380.0, 380.0, 1.0));
        let f = plain.tick(Time::ZERO);
        assert!(!f.commands.iter().any(|c| matches!(c, DrawCmd::Vignette { .. })));
    }

    #[test]
    fn negative_pointer_is_ignored() {
        let mut g = grid();
        g.pointer_move(Vec2::new(-1.0, -1.0));
        assert!(cells(&g.tick(Time::ZERO)).is_empty());
    }

    #[test]
    fn rejects_bad_config() {
        let cfg = GlowGridConfig {
            cell_px: 0.0,
            ..GlowGridConfig::default()
        };
        assert!(matches!(GlowGrid::new(&cfg), Err(PainterError::NonPositive { field: "cell_px", .. })));
        let cfg = GlowGridConfig {
            primary: "violet".into(),
            ..GlowGridConfig::default()
        };
        assert!(matches!(GlowGrid::new(&cfg), Err(PainterError::Color(_))));
    }
}
