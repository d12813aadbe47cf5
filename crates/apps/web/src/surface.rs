use catalog::DomainId;
use foundation::math::Vec2;
use foundation::time::Time;
use painter::{
    BrushConfig, BrushTrail, GlowGrid, GlowGridConfig, PaintFrame, PainterError, PixelPaint,
    PixelPaintConfig, RasterSize,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::listeners::ListenerSet;
use crate::render;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PainterKind {
    Glow,
    Brush,
    Pixel,
}

impl PainterKind {
    pub fn parse(s: &str) -> Result<Self, JsValue> {
        match s.trim().to_ascii_lowercase().as_str() {
            "glow" | "grid" => Ok(PainterKind::Glow),
            "brush" | "trail" => Ok(PainterKind::Brush),
            "pixel" | "paint" => Ok(PainterKind::Pixel),
            other => Err(JsValue::from_str(&format!("unknown painter kind: {other}"))),
        }
    }
}

enum Painter {
    Glow(GlowGrid),
    Brush(BrushTrail),
    Pixel(PixelPaint),
}

impl Painter {
    fn new(kind: PainterKind) -> Result<Self, PainterError> {
        Ok(match kind {
            PainterKind::Glow => Painter::Glow(GlowGrid::new(&GlowGridConfig::default())?),
            PainterKind::Brush => Painter::Brush(BrushTrail::new(&BrushConfig::default())?),
            PainterKind::Pixel => Painter::Pixel(PixelPaint::new(&PixelPaintConfig::default())?),
        })
    }

    /// `true` when the raster changed and the painter dropped its marks.
    fn resize(&mut self, size: RasterSize) -> bool {
        match self {
            Painter::Glow(g) => g.resize(size),
            Painter::Brush(b) => b.resize(size),
            Painter::Pixel(p) => p.resize(size),
        }
    }

    fn live_marks(&self) -> usize {
        match self {
            Painter::Glow(g) => g.live_marks(),
            Painter::Brush(b) => b.live_marks(),
            Painter::Pixel(p) => p.painted_blocks(),
        }
    }
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// One canvas and the painter that owns its raster.
pub struct Surface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    painter: Painter,
    pub listeners: ListenerSet,
}

impl Surface {
    pub fn new(canvas: HtmlCanvasElement, kind: PainterKind) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let painter = Painter::new(kind).map_err(js_err)?;
        Ok(Self {
            canvas,
            ctx,
            painter,
            listeners: ListenerSet::new(),
        })
    }

    /// Matches the backing store to the parent's layout size.
    pub fn sync_size(&mut self, dpr: f64) -> Result<(), JsValue> {
        let (w, h) = match self.canvas.parent_element() {
            Some(p) => (f64::from(p.client_width()), f64::from(p.client_height())),
            None => (f64::from(self.canvas.client_width()), f64::from(self.canvas.client_height())),
        };
        let size = RasterSize::for_container(w, h, dpr);
        // Writing the canvas width wipes its bitmap, so only do it when the
        // painter has dropped its state too.
        if !self.painter.resize(size) {
            return Ok(());
        }
        self.canvas.set_width(size.pixel_width);
        self.canvas.set_height(size.pixel_height);
        self.ctx.set_transform(size.dpr, 0.0, 0.0, size.dpr, 0.0, 0.0)?;
        if let Painter::Pixel(p) = &self.painter {
            render::draw(&self.ctx, &p.redraw())?;
        }
        Ok(())
    }

    pub fn recolor(&mut self, domain: DomainId) {
        let Some(palette) = catalog::BUILTIN.get(domain).and_then(|d| d.palette().ok()) else {
            return;
        };
        match &mut self.painter {
            Painter::Glow(g) => g.set_colors(palette.primary, palette.secondary),
            Painter::Brush(b) => b.set_color(palette.primary),
            Painter::Pixel(_) => {}
        }
    }

    /// `client` is the event's viewport position.
    pub fn pointer_move(&mut self, client: Vec2, now: Time) -> Result<(), JsValue> {
        let rect = self.canvas.get_bounding_client_rect();
        let local = Vec2::new(client.x - rect.left(), client.y - rect.top());
        match &mut self.painter {
            Painter::Glow(g) => g.pointer_move(local),
            Painter::Brush(b) => {
                b.pointer_move(local, now);
            }
            Painter::Pixel(p) => {
                let commands = p.pointer_move(local);
                render::draw(&self.ctx, &PaintFrame { commands })?;
            }
        }
        Ok(())
    }

    pub fn pointer_leave(&mut self) {
        match &mut self.painter {
            Painter::Glow(g) => g.pointer_leave(),
            Painter::Brush(b) => b.pointer_leave(),
            Painter::Pixel(p) => p.pointer_leave(),
        }
    }

    /// Per-frame repaint; pixel paint only redraws on input.
    pub fn paint(&mut self, now: Time) -> Result<(), JsValue> {
        let frame = match &mut self.painter {
            Painter::Glow(g) => g.tick(now),
            Painter::Brush(b) => b.tick(now),
            Painter::Pixel(_) => return Ok(()),
        };
        render::draw(&self.ctx, &frame)
    }

    pub fn live_marks(&self) -> usize {
        self.painter.live_marks()
    }
}

#[cfg(test)]
mod tests {
    use super::{Painter, PainterKind};
    use foundation::math::Vec2;
    use painter::RasterSize;

    fn size(dpr: f64) -> RasterSize {
        RasterSize::for_container(440.0, 220.0, dpr)
    }

    #[test]
    fn unchanged_size_keeps_pixel_paint() {
        let mut p = Painter::new(PainterKind::Pixel).unwrap();
        assert!(p.resize(size(1.0)));
        if let Painter::Pixel(px) = &mut p {
            px.pointer_move(Vec2::new(10.0, 10.0));
        }
        assert!(!p.resize(size(1.0)));
        assert_eq!(p.live_marks(), 1);
        assert!(p.resize(size(2.0)));
        assert_eq!(p.live_marks(), 0);
    }

    #[test]
    fn kinds_parse_with_aliases() {
        assert_eq!(PainterKind::parse(" Grid ").unwrap(), PainterKind::Glow);
        assert_eq!(PainterKind::parse("trail").unwrap(), PainterKind::Brush);
        assert_eq!(PainterKind::parse("pixel").unwrap(), PainterKind::Pixel);
    }
}
