use std::collections::BTreeMap;

use foundation::color::Hsl;
use foundation::math::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::commands::{DrawCmd, PaintFrame};
use crate::error::{PainterError, positive};
use crate::raster::RasterSize;

/// Violet → teal → amber → purple, closing back on violet.
pub const PALETTE: [Hsl; 5] = [
    Hsl::new(248.0, 81.0, 62.0),
    Hsl::new(160.0, 62.0, 44.0),
    Hsl::new(30.0, 80.0, 56.0),
    Hsl::new(268.0, 81.0, 69.0),
    Hsl::new(248.0, 81.0, 62.0),
];

/// Colour at position `t` along the palette loop; `t` wraps into `[0, 1)`.
pub fn palette_at(t: f64) -> Hsl {
    let t = if t.is_finite() { t.rem_euclid(1.0) } else { 0.0 };
    let n = PALETTE.len() - 1;
    let i = ((t * n as f64).floor() as usize).min(n - 1);
    let f = t * n as f64 - i as f64;
    PALETTE[i].lerp(PALETTE[i + 1], f)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixelPaintConfig {
    pub block_px: f64,
    /// Palette advance per painted block.
    pub hue_step: f64,
}

impl Default for PixelPaintConfig {
    fn default() -> Self {
        Self {
            block_px: 22.0,
            hue_step: 0.0022,
        }
    }
}

/// Persistent pixel-art paint: blocks never fade, later strokes overwrite.
#[derive(Debug, Clone)]
pub struct PixelPaint {
    block: f64,
    hue_step: f64,
    position: f64,
    size: RasterSize,
    last: Option<Vec2>,
    blocks: BTreeMap<(i64, i64), Hsl>,
}

impl PixelPaint {
    pub fn new(config: &PixelPaintConfig) -> Result<Self, PainterError> {
        Ok(Self {
            block: positive("block_px", config.block_px)?,
            hue_step: positive("hue_step", config.hue_step)?,
            position: 0.0,
            size: RasterSize::default(),
            last: None,
            blocks: BTreeMap::new(),
        })
    }

    pub fn has_started(&self) -> bool {
        !self.blocks.is_empty()
    }

    pub fn painted_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Interpolation step for fast strokes: half a block.
    pub fn step(&self) -> f64 {
        self.block / 2.0
    }

    /// Clears the paint when the raster changes. An unchanged size returns
    /// `false` and keeps every block, so the host must not reset its canvas.
    pub fn resize(&mut self, size: RasterSize) -> bool {
        if size == self.size {
            return false;
        }
        debug!(w = size.css_width, h = size.css_height, "pixel paint resized");
        self.size = size;
        self.last = None;
        self.blocks.clear();
        true
    }

    fn paint_at(&mut self, p: Vec2, out: &mut Vec<DrawCmd>) {
        let col = (p.x / self.block).floor() as i64;
        let row = (p.y / self.block).floor() as i64;
        let color = palette_at(self.position);
        self.blocks.insert((col, row), color);
        out.push(self.block_cmd(col, row, color));
        self.position = (self.position + self.hue_step).rem_euclid(1.0);
    }

    fn block_cmd(&self, col: i64, row: i64, color: Hsl) -> DrawCmd {
        DrawCmd::Block {
            x: col as f64 * self.block,
            y: row as f64 * self.block,
            size: self.block - 1.0,
            color,
        }
    }

    /// Paints along the stroke and returns only the new blocks, for
    /// incremental drawing. Outside the canvas the stroke is broken.
    pub fn pointer_move(&mut self, pos: Vec2) -> Vec<DrawCmd> {
        if !pos.is_finite() || !self.size.contains(pos.x, pos.y) {
            self.last = None;
            return Vec::new();
        }
        let mut out = Vec::new();
        match self.last {
            Some(last) => {
                let steps = ((last.distance(pos) / self.step()).ceil() as usize).max(1);
                for k in 0..=steps {
                    self.paint_at(last.lerp(pos, k as f64 / steps as f64), &mut out);
                }
            }
            None => self.paint_at(pos, &mut out),
        }
        self.last = Some(pos);
        out
    }

    pub fn pointer_leave(&mut self) {
        self.last = None;
    }

    /// Full repaint of everything painted since the last resize.
    pub fn redraw(&self) -> PaintFrame {
        let mut frame = PaintFrame::default();
        frame.commands.push(DrawCmd::Clear {
            width: self.size.css_width,
            height: self.size.css_height,
        });
        for (&(col, row), &color) in &self.blocks {
            frame.commands.push(self.block_cmd(col, row, color));
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::{PALETTE, PixelPaint, PixelPaintConfig, palette_at};
    use crate::commands::DrawCmd;
    use crate::raster::RasterSize;
    use foundation::math::Vec2;

    fn paint() -> PixelPaint {
        let mut p = PixelPaint::new(&PixelPaintConfig::default()).unwrap();
        p.resize(RasterSize::for_container(880.0, 440.0, 1.0));
        p
    }

    #[test]
    fn palette_hits_stops_and_wraps() {
        assert_eq!(palette_at(0.0), PALETTE[0]);
        assert_eq!(palette_at(0.25), PALETTE[1]);
        assert_eq!(palette_at(0.5), PALETTE[2]);
        assert_eq!(palette_at(1.25), PALETTE[1]);
        let mid = palette_at(0.125);
        assert!((mid.h - 204.0).abs() < 1e-9);
    }

    #[test]
    fn first_sample_paints_one_snapped_block() {
        let mut p = paint();
        let cmds = p.pointer_move(Vec2::new(30.0, 50.0));
        assert_eq!(cmds.len(), 1);
        assert!(matches!(
            cmds[0],
            DrawCmd::Block { x, y, size, .. } if x == 22.0 && y == 44.0 && size == 21.0
        ));
        assert!(p.has_started());
    }

    #[test]
    fn fast_stroke_is_interpolated_at_half_blocks() {
        let mut p = paint();
        p.pointer_move(Vec2::new(0.0, 0.0));
        // 110 px at an 11 px step: 10 steps, 11 samples inclusive.
        let cmds = p.pointer_move(Vec2::new(110.0, 0.0));
        assert_eq!(cmds.len(), 11);
        assert_eq!(p.painted_blocks(), 6);
    }

    #[test]
    fn hue_advances_per_block() {
        let mut p = paint();
        let a = p.pointer_move(Vec2::new(5.0, 5.0));
        p.pointer_leave();
        let b = p.pointer_move(Vec2::new(100.0, 100.0));
        let hue = |c: &DrawCmd| match c {
            DrawCmd::Block { color, .. } => color.h,
            _ => f64::NAN,
        };
        assert!(hue(&b[0]) < hue(&a[0]));
    }

    #[test]
    fn outside_breaks_stroke_and_resize_clears() {
        let mut p = paint();
        p.pointer_move(Vec2::new(10.0, 10.0));
        assert!(p.pointer_move(Vec2::new(900.0, 10.0)).is_empty());
        assert_eq!(p.pointer_move(Vec2::new(400.0, 10.0)).len(), 1);
        assert_eq!(p.redraw().len(), 3);
        p.resize(RasterSize::for_container(100.0, 100.0, 1.0));
        assert!(!p.has_started());
        assert_eq!(p.redraw().len(), 1);
    }

    #[test]
    fn same_size_resize_keeps_paint() {
        let mut p = paint();
        p.pointer_move(Vec2::new(10.0, 10.0));
        assert!(!p.resize(RasterSize::for_container(880.0, 440.0, 1.0)));
        assert_eq!(p.painted_blocks(), 1);
        assert!(p.resize(RasterSize::for_container(880.0, 440.0, 2.0)));
        assert_eq!(p.painted_blocks(), 0);
    }
}
