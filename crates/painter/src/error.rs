use foundation::color::ColorError;

#[derive(Debug, Clone, PartialEq)]
pub enum PainterError {
    /// A size, duration or step that must be strictly positive and finite.
    NonPositive { field: &'static str, value: f64 },
    /// An intensity or ratio outside `[0, 1]`.
    OutOfUnitRange { field: &'static str, value: f64 },
    Color(ColorError),
}

impl std::fmt::Display for PainterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PainterError::NonPositive { field, value } => {
                write!(f, "{field} must be positive and finite, got {value}")
            }
            PainterError::OutOfUnitRange { field, value } => {
                write!(f, "{field} must lie in [0, 1], got {value}")
            }
            PainterError::Color(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for PainterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PainterError::Color(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ColorError> for PainterError {
    fn from(e: ColorError) -> Self {
        PainterError::Color(e)
    }
}

pub(crate) fn positive(field: &'static str, value: f64) -> Result<f64, PainterError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(PainterError::NonPositive { field, value })
    }
}

pub(crate) fn unit(field: &'static str, value: f64) -> Result<f64, PainterError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(PainterError::OutOfUnitRange { field, value })
    }
}

pub(crate) fn seconds(field: &'static str, value: f64) -> Result<std::time::Duration, PainterError> {
    positive(field, value).and_then(|v| {
        std::time::Duration::try_from_secs_f64(v).map_err(|_| PainterError::NonPositive { field, value })
    })
}
