pub const MIN_DPR: f64 = 1.0;
pub const MAX_DPR: f64 = 2.0;

/// Backing-store size for a canvas filling a container.
///
/// `css_*` are layout pixels; `pixel_*` are device pixels after the
/// (clamped) device pixel ratio.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct RasterSize {
    pub css_width: f64,
    pub css_height: f64,
    pub dpr: f64,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

impl RasterSize {
    pub fn for_container(css_width: f64, css_height: f64, dpr: f64) -> Self {
        let extent = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        let css_width = extent(css_width);
        let css_height = extent(css_height);
        let dpr = if dpr.is_finite() {
            dpr.clamp(MIN_DPR, MAX_DPR)
        } else {
            MIN_DPR
        };
        Self {
            css_width,
            css_height,
            dpr,
            pixel_width: (css_width * dpr).round() as u32,
            pixel_height: (css_height * dpr).round() as u32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pixel_width == 0 || self.pixel_height == 0
    }

    /// True for points inside `[0, w] × [0, h]` in CSS pixels.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && y >= 0.0 && x <= self.css_width && y <= self.css_height
    }
}
