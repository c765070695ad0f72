//! RGBA color type used for particle swatches and backdrop gradient stops.
//!
//! Components are `f64` in [0, 1], straight (not premultiplied) alpha. Colors
//! parse from CSS-style hex strings (`#rgb`, `#rrggbb`, `#rrggbbaa`) and
//! serialize back to `#rrggbbaa`.

use crate::error::BackdropError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// sRGB color with straight alpha, all components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    /// Fully transparent black, the color of a cleared surface.
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a color from float components. Values are stored as given.
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from 8-bit channels and a float alpha, like CSS `rgba()`.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa` (the `#` is optional, case insensitive).
    ///
    /// Returns `BackdropError::InvalidColor` for any other length or non-hex digits.
    pub fn from_hex(hex: &str) -> Result<Rgba, BackdropError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(BackdropError::InvalidColor(format!(
                "non-hex digit in color: {hex}"
            )));
        }
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => hex.to_owned(),
            n => {
                return Err(BackdropError::InvalidColor(format!(
                    "expected 3, 6 or 8 hex digits, got {n}"
                )))
            }
        };
        let channel = |i: usize, name: &str| {
            u8::from_str_radix(&expanded[i..i + 2], 16)
                .map_err(|e| BackdropError::InvalidColor(format!("invalid {name} component: {e}")))
        };
        let r = channel(0, "red")?;
        let g = channel(2, "green")?;
        let b = channel(4, "blue")?;
        let a = if expanded.len() == 8 {
            channel(6, "alpha")? as f64 / 255.0
        } else {
            1.0
        };
        Ok(Rgba::from_rgba8(r, g, b, a))
    }

    /// Formats the color as `#rrggbbaa`, quantizing each component to 8 bits.
    pub fn to_hex(self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
    }

    /// Formats the color as a CSS `rgba(r, g, b, a)` string.
    pub fn to_css(self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("rgba({r}, {g}, {b}, {:.3})", self.a.clamp(0.0, 1.0))
    }

    /// Quantizes to four 8-bit channels with rounding.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Returns the same color with alpha scaled by `factor` (clamped to [0, 1]).
    pub fn fade(self, factor: f64) -> Self {
        Self {
            a: (self.a * factor.clamp(0.0, 1.0)).clamp(0.0, 1.0),
            ..self
        }
    }

    /// Linear interpolation between two colors, `t` clamped to [0, 1].
    pub fn lerp(self, other: Rgba, t: f64) -> Rgba {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        Rgba {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgba::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
