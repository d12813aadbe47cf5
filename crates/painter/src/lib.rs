//! Procedural canvas painters.
//!
//! Painters are headless: they take pointer samples, container sizes and
//! frame times, and emit a [`PaintFrame`] of [`DrawCmd`]s for a host
//! surface to execute.
pub mod brush;
pub mod commands;
pub mod error;
pub mod grid;
pub mod marks;
pub mod particles;
pub mod pixel;
pub mod raster;
pub mod trail;

pub use brush::{BrushConfig, BrushTrail};
pub use commands::{DrawCmd, PaintFrame};
pub use error::PainterError;
pub use grid::{GlowGrid, GlowGridConfig};
pub use marks::{Mark, MarkMap};
pub use particles::{ParticleField, ParticlePreset};
pub use pixel::{PixelPaint, PixelPaintConfig};
pub use raster::RasterSize;
pub use trail::resample;
