/// Colour primitives shared by configuration tables and painters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    Malformed(String),
}

impl std::fmt::Display for ColorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorError::Malformed(s) => write!(f, "unrecognised colour: {s:?}"),
        }
    }
}

impl std::error::Error for ColorError {}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` or `#rgb`.
    pub fn from_hex(s: &str) -> Result<Self, ColorError> {
        let bad = || ColorError::Malformed(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(bad)?;
        let nibble = |c: u8| (c as char).to_digit(16).map(|d| d as u8).ok_or_else(bad);
        let bytes = hex.as_bytes();
        match bytes.len() {
            6 => {
                let byte = |i: usize| Ok::<u8, ColorError>(nibble(bytes[i])? << 4 | nibble(bytes[i + 1])?);
                Ok(Self::new(byte(0)?, byte(2)?, byte(4)?))
            }
            3 => {
                let short = |i: usize| nibble(bytes[i]).map(|n| n << 4 | n);
                Ok(Self::new(short(0)?, short(1)?, short(2)?))
            }
            _ => Err(bad()),
        }
    }

    pub fn with_alpha(self, a: f64) -> Rgba {
        Rgba { rgb: self, a }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub a: f64,
}

impl Rgba {
    /// Parses hex colours (opaque), `rgb(r, g, b)` and `rgba(r, g, b, a)`.
    pub fn parse_css(s: &str) -> Result<Self, ColorError> {
        let t = s.trim();
        if t.starts_with('#') {
            return Ok(Rgb::from_hex(t)?.with_alpha(1.0));
        }
        let bad = || ColorError::Malformed(s.to_string());
        let (body, want_alpha) = if let Some(rest) = t.strip_prefix("rgba(") {
            (rest, true)
        } else if let Some(rest) = t.strip_prefix("rgb(") {
            (rest, false)
        } else {
            return Err(bad());
        };
        let body = body.strip_suffix(')').ok_or_else(bad)?;
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        if parts.len() != if want_alpha { 4 } else { 3 } {
            return Err(bad());
        }
        let channel = |p: &str| p.parse::<u8>().map_err(|_| bad());
        let rgb = Rgb::new(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?);
        let a = if want_alpha {
            let a = parts[3].parse::<f64>().map_err(|_| bad())?;
            if !(0.0..=1.0).contains(&a) {
                return Err(bad());
            }
            a
        } else {
            1.0
        };
        Ok(rgb.with_alpha(a))
    }

    pub fn to_css(self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.rgb.r,
            self.rgb.g,
            self.rgb.b,
            trim_float(self.a)
        )
    }
}

/// Hue in degrees, saturation and lightness in percent.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(
            self.h + (other.h - self.h) * t,
            self.s + (other.s - self.s) * t,
            self.l + (other.l - self.l) * t,
        )
    }

    pub fn to_css(self) -> String {
        format!("hsl({},{:.1}%,{:.1}%)", trim_float(self.h), self.s, self.l)
    }
}

fn trim_float(v: f64) -> String {
    let s = format!("{v:.4}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-" { "0".to_string() } else { s.to_string() }
}

#[cfg(test)]
mod tests {
    use super::{Hsl, Rgb, Rgba};

    #[test]
    fn parses_hex_forms() {
        assert_eq!(Rgb::from_hex("#7c5cfc").unwrap(), Rgb::new(0x7c, 0x5c, 0xfc));
        assert_eq!(Rgb::from_hex("#fff").unwrap(), Rgb::new(255, 255, 255));
        assert!(Rgb::from_hex("7c5cfc").is_err());
        assert!(Rgb::from_hex("#7c5cf").is_err());
        assert!(Rgb::from_hex("#zzzzzz").is_err());
        assert_eq!(Rgb::new(1, 2, 255).to_hex(), "#0102ff");
    }

    #[test]
    fn parses_css_rgba() {
        let c = Rgba::parse_css("rgba(124, 92, 252, 0.25)").unwrap();
        assert_eq!(c.rgb, Rgb::new(124, 92, 252));
        assert_eq!(c.a, 0.25);
        assert_eq!(c.to_css(), "rgba(124, 92, 252, 0.25)");
        assert_eq!(Rgba::parse_css("#000000").unwrap().a, 1.0);
        assert!(Rgba::parse_css("rgba(1, 2, 3)").is_err());
        assert!(Rgba::parse_css("rgba(1, 2, 3, 4)").is_err());
        assert!(Rgba::parse_css("hsl(1, 2%, 3%)").is_err());
    }

    #[test]
    fn hsl_lerp_and_css() {
        let a = Hsl::new(248.0, 81.0, 62.0);
        let b = Hsl::new(160.0, 62.0, 44.0);
        let mid = a.lerp(b, 0.5);
        assert_eq!(mid, Hsl::new(204.0, 71.5, 53.0));
        assert_eq!(mid.to_css(), "hsl(204,71.5%,53.0%)");
    }
}
