use foundation::math::KeyframeError;

#[derive(Debug, Clone, PartialEq)]
pub enum RangeTableError {
    Empty,
    NonFinite { index: usize },
    Inverted { index: usize, start: f64, end: f64 },
    NotAnchored { start: f64 },
    Gap { index: usize, end: f64, next_start: f64 },
    Overlap { index: usize, end: f64, next_start: f64 },
    OpenEnded { end: f64 },
}

impl std::fmt::Display for RangeTableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeTableError::Empty => write!(f, "scroll range table is empty"),
            RangeTableError::NonFinite { index } => {
                write!(f, "scroll range {index} has a non-finite bound")
            }
            RangeTableError::Inverted { index, start, end } => {
                write!(f, "scroll range {index} is empty or inverted: [{start}, {end})")
            }
            RangeTableError::NotAnchored { start } => {
                write!(f, "first scroll range must start at 0, starts at {start}")
            }
            RangeTableError::Gap {
                index,
                end,
                next_start,
            } => write!(
                f,
                "gap after scroll range {index}: ends at {end}, next starts at {next_start}"
            ),
            RangeTableError::Overlap {
                index,
                end,
                next_start,
            } => write!(
                f,
                "scroll range {index} overlaps its successor: ends at {end}, next starts at {next_start}"
            ),
            RangeTableError::OpenEnded { end } => {
                write!(f, "last scroll range must end at 1, ends at {end}")
            }
        }
    }
}

impl std::error::Error for RangeTableError {}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Parse(String),
    PhaseOrder {
        hold_ms: u64,
        exit_ms: u64,
        done_ms: u64,
    },
    ZeroTicks(&'static str),
    ZeroStep(&'static str),
    Cutoff(f64),
    Keyframes {
        which: &'static str,
        source: KeyframeError,
    },
    Ranges(RangeTableError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "config parse error: {msg}"),
            ConfigError::PhaseOrder {
                hold_ms,
                exit_ms,
                done_ms,
            } => write!(
                f,
                "intro offsets must be strictly increasing: hold={hold_ms}ms exit={exit_ms}ms done={done_ms}ms"
            ),
            ConfigError::ZeroTicks(which) => write!(f, "{which}: ticks must be non-zero"),
            ConfigError::ZeroStep(which) => write!(f, "{which}: step must be non-zero"),
            ConfigError::Cutoff(v) => write!(f, "visibility cutoff must lie in (0, 1]: {v}"),
            ConfigError::Keyframes { which, source } => write!(f, "{which} keyframes: {source}"),
            ConfigError::Ranges(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Keyframes { source, .. } => Some(source),
            ConfigError::Ranges(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RangeTableError> for ConfigError {
    fn from(e: RangeTableError) -> Self {
        ConfigError::Ranges(e)
    }
}
