//! Theme-dependent particle palettes and backdrop gradients.
//!
//! A [`Palette`] is chosen once when a field is initialized and never
//! re-derived afterwards; switching [`Theme`] means building a new field.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::error::BackdropError;
use crate::prng::Xorshift64;

/// All recognized theme names.
const THEME_NAMES: &[&str] = &["dark", "light"];

/// Light or dark color scheme, supplied by the hosting page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Returns the opposite theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Returns true for [`Theme::Dark`].
    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    /// Lowercase name, as accepted by [`Theme::from_name`].
    pub fn name(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Looks up a theme by name (case insensitive).
    pub fn from_name(name: &str) -> Result<Self, BackdropError> {
        match name.to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(BackdropError::UnknownTheme(name.to_string())),
        }
    }

    /// Returns a slice of all theme names.
    pub fn list_names() -> &'static [&'static str] {
        THEME_NAMES
    }

    /// The particle palette for this theme.
    pub fn palette(self) -> Palette {
        Palette::for_theme(self)
    }

    /// The radial gradient painted behind the particles for this theme.
    pub fn backdrop(self) -> Backdrop {
        Backdrop::for_theme(self)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = BackdropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::from_name(s)
    }
}

/// An ordered, non-empty set of particle colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Rgba>", into = "Vec<Rgba>")]
pub struct Palette {
    swatches: Vec<Rgba>,
}

impl Palette {
    /// Creates a palette from explicit colors. Requires at least one color.
    pub fn new(swatches: Vec<Rgba>) -> Result<Self, BackdropError> {
        if swatches.is_empty() {
            return Err(BackdropError::InvalidPalette(
                "palette requires at least 1 color".to_string(),
            ));
        }
        Ok(Self { swatches })
    }

    /// Creates a palette by parsing hex color strings (`#rgb`, `#rrggbb`, `#rrggbbaa`).
    pub fn from_hex(hexes: &[&str]) -> Result<Self, BackdropError> {
        let swatches = hexes
            .iter()
            .map(|h| Rgba::from_hex(h))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(swatches)
    }

    /// The built-in palette for `theme`.
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    /// Indigo, violet, pink at two-thirds opacity.
    pub fn dark() -> Self {
        Self::from_hex(&["#6366f1aa", "#8b5cf6aa", "#ec4899aa"])
            .expect("dark palette hex values are valid")
    }

    /// Blue, purple, lavender at two-thirds opacity.
    pub fn light() -> Self {
        Self::from_hex(&["#3b82f6aa", "#7c3aedaa", "#a855f7aa"])
            .expect("light palette hex values are valid")
    }

    /// Number of swatches.
    pub fn len(&self) -> usize {
        self.swatches.len()
    }

    /// Always false for a constructed palette.
    pub fn is_empty(&self) -> bool {
        self.swatches.is_empty()
    }

    /// Read-only access to the swatches in order.
    pub fn swatches(&self) -> &[Rgba] {
        &self.swatches
    }

    /// Returns true if `color` is one of this palette's swatches.
    pub fn contains(&self, color: Rgba) -> bool {
        self.swatches.contains(&color)
    }

    /// Picks a swatch uniformly at random.
    pub fn pick(&self, rng: &mut Xorshift64) -> Rgba {
        self.swatches[rng.next_usize(self.swatches.len())]
    }
}

impl TryFrom<Vec<Rgba>> for Palette {
    type Error = BackdropError;

    fn try_from(swatches: Vec<Rgba>) -> Result<Self, Self::Error> {
        Palette::new(swatches)
    }
}

impl From<Palette> for Vec<Rgba> {
    fn from(palette: Palette) -> Self {
        palette.swatches
    }
}

/// Inner and outer stops of the backdrop's radial gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Backdrop {
    /// Color at the surface midpoint.
    pub inner: Rgba,
    /// Color at `max(width, height) / 2` from the midpoint and beyond.
    pub outer: Rgba,
}

impl Backdrop {
    /// The built-in gradient for `theme`.
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                inner: Rgba::from_rgba8(15, 10, 35, 0.7),
                outer: Rgba::from_rgba8(5, 2, 15, 0.9),
            },
            Theme::Light => Self {
                inner: Rgba::from_rgba8(230, 240, 255, 0.6),
                outer: Rgba::from_rgba8(255, 255, 255, 0.8),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggled_flips_and_round_trips() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
    }

    #[test]
    fn from_name_is_case_insensitive() {
        assert_eq!(Theme::from_name("Dark").unwrap(), Theme::Dark);
        assert_eq!("LIGHT".parse::<Theme>().unwrap(), Theme::Light);
    }

    #[test]
    fn from_name_rejects_unknown() {
        assert!(matches!(
            Theme::from_name("sepia"),
            Err(BackdropError::UnknownTheme(name)) if name == "sepia"
        ));
    }

    #[test]
    fn every_listed_name_parses() {
        for name in Theme::list_names() {
            let theme = Theme::from_name(name).unwrap();
            assert_eq!(theme.name(), *name);
        }
    }

    #[test]
    fn toggling_flips_is_dark() {
        assert!(Theme::Dark.is_dark());
        assert!(!Theme::Dark.toggled().is_dark());
    }

    #[test]
    fn theme_serializes_as_lowercase() {
        assert_eq!(serde_json::to_string(&Theme::Light).unwrap(), "\"light\"");
    }

    #[test]
    fn built_in_palettes_have_three_swatches() {
        assert_eq!(Palette::dark().len(), 3);
        assert_eq!(Palette::light().len(), 3);
    }

    #[test]
    fn dark_and_light_palettes_share_no_swatches() {
        let dark = Palette::dark();
        let light = Palette::light();
        assert!(dark.swatches().iter().all(|c| !light.contains(*c)));
    }

    #[test]
    fn new_with_empty_vec_returns_error() {
        assert!(matches!(
            Palette::new(vec![]),
            Err(BackdropError::InvalidPalette(_))
        ));
    }

    #[test]
    fn from_hex_propagates_color_errors() {
        assert!(matches!(
            Palette::from_hex(&["#000000", "nope"]),
            Err(BackdropError::InvalidColor(_))
        ));
    }

    #[test]
    fn pick_always_returns_a_swatch() {
        let palette = Palette::light();
        let mut rng = Xorshift64::new(3);
        for _ in 0..200 {
            assert!(palette.contains(palette.pick(&mut rng)));
        }
    }

    #[test]
    fn pick_reaches_every_swatch() {
        let palette = Palette::dark();
        let mut rng = Xorshift64::new(11);
        let mut seen = [false; 3];
        for _ in 0..300 {
            let c = palette.pick(&mut rng);
            let idx = palette.swatches().iter().position(|s| *s == c).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn palette_deserialize_rejects_empty_list() {
        let result: Result<Palette, _> = serde_json::from_str("[]");
        assert!(result.is_err());
    }

    #[test]
    fn palette_deserializes_from_hex_list() {
        let palette: Palette = serde_json::from_str(r##"["#ff0000", "#00ff0080"]"##).unwrap();
        assert_eq!(palette.len(), 2);
    }

    #[test]
    fn dark_backdrop_is_darker_than_light() {
        let dark = Backdrop::for_theme(Theme::Dark);
        let light = Backdrop::for_theme(Theme::Light);
        assert!(dark.inner.r < light.inner.r);
        assert!(dark.outer.b < light.outer.b);
    }

    #[test]
    fn backdrop_outer_stop_is_more_opaque() {
        for theme in [Theme::Dark, Theme::Light] {
            let b = theme.backdrop();
            assert!(b.outer.a > b.inner.a, "{theme}: outer should be more opaque");
        }
    }
}
