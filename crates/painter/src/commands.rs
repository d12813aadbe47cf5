use foundation::color::{Hsl, Rgba};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear {
        width: f64,
        height: f64,
    },
    GridLines {
        cell: f64,
        cols: u32,
        rows: u32,
        color: Rgba,
    },
    /// Cell-sized radial glow with a thin border.
    GlowCell {
        x: f64,
        y: f64,
        size: f64,
        alpha: f64,
        inner: Rgba,
        mid: Rgba,
        border: Rgba,
    },
    /// Radial gradient from `color` at the centre to transparent at `radius`.
    Blob {
        x: f64,
        y: f64,
        radius: f64,
        color: Rgba,
    },
    Block {
        x: f64,
        y: f64,
        size: f64,
        color: Hsl,
    },
    /// Full-canvas radial fade, transparent inside `inner_radius` and
    /// `color` from `outer_radius` outwards.
    Vignette {
        width: f64,
        height: f64,
        inner_radius: f64,
        outer_radius: f64,
        color: Rgba,
    },
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct PaintFrame {
    pub commands: Vec<DrawCmd>,
}

impl PaintFrame {
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
