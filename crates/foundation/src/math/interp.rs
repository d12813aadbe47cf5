/// Linear interpolation between `a` and `b`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Clamps to `[0, 1]`; NaN maps to 0.
pub fn clamp01(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[derive(Debug, Clone, PartialEq)]
pub enum KeyframeError {
    Empty,
    NonFinite { index: usize },
    NotAscending { index: usize },
}

impl std::fmt::Display for KeyframeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyframeError::Empty => write!(f, "keyframes must not be empty"),
            KeyframeError::NonFinite { index } => {
                write!(f, "keyframe {index} is not finite")
            }
            KeyframeError::NotAscending { index } => {
                write!(f, "keyframe {index} is not strictly after its predecessor")
            }
        }
    }
}

impl std::error::Error for KeyframeError {}

/// Piecewise-linear mapping from an input domain to output values.
///
/// Inputs outside the first/last control point clamp to the end values.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframes {
    points: Vec<(f64, f64)>,
}

impl Keyframes {
    pub fn new(points: Vec<(f64, f64)>) -> Result<Self, KeyframeError> {
        if points.is_empty() {
            return Err(KeyframeError::Empty);
        }
        for (i, &(x, y)) in points.iter().enumerate() {
            if !x.is_finite() || !y.is_finite() {
                return Err(KeyframeError::NonFinite { index: i });
            }
            if i > 0 && x <= points[i - 1].0 {
                return Err(KeyframeError::NotAscending { index: i });
            }
        }
        Ok(Self { points })
    }

    /// A mapping that returns `value` everywhere.
    pub fn constant(value: f64) -> Self {
        Self {
            points: vec![(0.0, value)],
        }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn sample(&self, x: f64) -> f64 {
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];
        if x.is_nan() || x <= first.0 {
            return first.1;
        }
        if x >= last.0 {
            return last.1;
        }
        for w in self.points.windows(2) {
            let (x0, y0) = w[0];
            let (x1, y1) = w[1];
            if x < x1 {
                return lerp(y0, y1, (x - x0) / (x1 - x0));
            }
        }
        last.1
    }
}
