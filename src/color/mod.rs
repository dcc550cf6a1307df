//! Scalar-to-color mapping.
//!
//! A [`ColorMapping`] is either a standard palette, known only by name and
//! drawn by the rendering backend, or a custom [`Gradient`] of control points
//! that is interpolated here.

pub mod backend;
pub mod mapper;
pub mod normalize;
pub mod palettes;

use serde::Serialize;
use thiserror::Error;

use crate::suggest::hint;

pub use backend::{Colorscale, ColorbarRange, facecolors};
pub use mapper::{ColorBuffer, ColorMapper, PaletteResolver, apply};
pub use normalize::normalize;
pub use palettes::{DEFAULT_PALETTE, lookup, palette_names};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaletteError {
    #[error("unknown palette `{name}`{}", hint(.suggestion))]
    Unknown {
        name: String,
        suggestion: Option<String>,
    },
    #[error("invalid hex color `{0}`")]
    InvalidColor(String),
    #[error("a gradient needs at least two stops, got {found}")]
    TooFewStops { found: usize },
    #[error("stop {index} has position {position}, expected a finite value in [0, 1]")]
    StopOutOfRange { index: usize, position: f64 },
    #[error("stop {index} at {position} lies before the previous stop")]
    Unordered { index: usize, position: f64 },
    #[error("gradient must run from 0 to 1, got {first} to {last}")]
    Unanchored { first: f64, last: f64 },
}

/// An RGB color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    #[must_use]
    pub fn from_rgb255(r: f64, g: f64, b: f64) -> Self {
        Self::new(r / 255.0, g / 255.0, b / 255.0)
    }

    /// Parses `#rrggbb`, `#rgb` or the `0x` prefixed forms.
    pub fn from_hex(text: &str) -> Result<Self, PaletteError> {
        let invalid = || PaletteError::InvalidColor(text.to_owned());
        let trimmed = text.trim();
        let digits = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .ok_or_else(invalid)?;

        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|ch| [ch, ch]).collect(),
            6 => digits.to_owned(),
            _ => return Err(invalid()),
        };

        let value = u32::from_str_radix(&expanded, 16).map_err(|_| invalid())?;
        let r = f64::from((value >> 16) & 0xFF);
        let g = f64::from((value >> 8) & 0xFF);
        let b = f64::from(value & 0xFF);
        Ok(Self::from_rgb255(r, g, b))
    }

    /// 8-bit channels, truncating `channel * 255` the way integer casts of
    /// float colors do in most plotting front-ends.
    #[must_use]
    pub fn to_rgb255(self) -> [u8; 3] {
        [self.r, self.g, self.b].map(|channel| (channel.clamp(0.0, 1.0) * 255.0) as u8)
    }

    /// `rgb(R,G,B)` with truncated 8-bit channels.
    #[must_use]
    pub fn to_css(self) -> String {
        let [r, g, b] = self.to_rgb255();
        format!("rgb({r},{g},{b})")
    }

    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let s = 1.0 - t;
        Self::new(
            self.r * s + other.r * t,
            self.g * s + other.g * t,
            self.b * s + other.b * t,
        )
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorStop {
    pub position: f64,
    pub color: Rgb,
}

impl ColorStop {
    #[must_use]
    pub const fn new(position: f64, color: Rgb) -> Self {
        Self { position, color }
    }
}

/// Ordered control points from position 0 to position 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gradient {
    stops: Vec<ColorStop>,
}

impl Gradient {
    /// Checks that there are at least two stops, every position is finite and
    /// in `[0, 1]`, positions never decrease, and the ends sit at 0 and 1.
    pub fn new(stops: Vec<ColorStop>) -> Result<Self, PaletteError> {
        if stops.len() < 2 {
            return Err(PaletteError::TooFewStops { found: stops.len() });
        }
        for (index, stop) in stops.iter().enumerate() {
            if !stop.position.is_finite() || !(0.0..=1.0).contains(&stop.position) {
                return Err(PaletteError::StopOutOfRange {
                    index,
                    position: stop.position,
                });
            }
        }
        for (index, pair) in stops.windows(2).enumerate() {
            if pair[1].position < pair[0].position {
                return Err(PaletteError::Unordered {
                    index: index + 1,
                    position: pair[1].position,
                });
            }
        }
        let first = stops[0].position;
        let last = stops[stops.len() - 1].position;
        if first != 0.0 || last != 1.0 {
            return Err(PaletteError::Unanchored { first, last });
        }
        Ok(Self { stops })
    }

    /// Colors spread evenly over `[0, 1]`.
    pub fn evenly_spaced(colors: &[Rgb]) -> Result<Self, PaletteError> {
        if colors.len() < 2 {
            return Err(PaletteError::TooFewStops {
                found: colors.len(),
            });
        }
        let last = (colors.len() - 1) as f64;
        let stops = colors
            .iter()
            .enumerate()
            .map(|(index, color)| ColorStop::new(index as f64 / last, *color))
            .collect();
        Self::new(stops)
    }

    pub fn from_hex(colors: &[&str]) -> Result<Self, PaletteError> {
        let colors = colors
            .iter()
            .map(|text| Rgb::from_hex(text))
            .collect::<Result<Vec<_>, _>>()?;
        Self::evenly_spaced(&colors)
    }

    #[must_use]
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Piecewise-linear color at `t`. Values outside `[0, 1]` are clamped;
    /// NaN gives the first color.
    #[must_use]
    pub fn sample(&self, t: f64) -> Rgb {
        let first = self.stops[0];
        if t.is_nan() {
            return first.color;
        }
        let t = t.clamp(0.0, 1.0);
        let upper = self
            .stops
            .iter()
            .position(|stop| stop.position >= t)
            .unwrap_or(self.stops.len() - 1);
        if upper == 0 {
            return first.color;
        }
        let low = self.stops[upper - 1];
        let high = self.stops[upper];
        let width = high.position - low.position;
        if width <= 0.0 {
            return high.color;
        }
        low.color.lerp(high.color, (t - low.position) / width)
    }
}

/// How a surface should be colored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColorMapping {
    /// Resolved by the rendering backend.
    Standard { name: String },
    Custom { name: String, gradient: Gradient },
}

impl ColorMapping {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Standard { name } | Self::Custom { name, .. } => name,
        }
    }

    #[must_use]
    pub fn gradient(&self) -> Option<&Gradient> {
        match self {
            Self::Standard { .. } => None,
            Self::Custom { gradient, .. } => Some(gradient),
        }
    }

    #[must_use]
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(Rgb::from_hex("#ff0000").unwrap(), Rgb::new(1.0, 0.0, 0.0));
        assert_eq!(Rgb::from_hex("0x00ff00").unwrap(), Rgb::new(0.0, 1.0, 0.0));
        assert_eq!(Rgb::from_hex("#00f").unwrap(), Rgb::new(0.0, 0.0, 1.0));
        assert!(Rgb::from_hex("red").is_err());
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("#gggggg").is_err());
    }

    #[test]
    fn css_channels_truncate() {
        let color = Rgb::from_hex("#03045e").unwrap();
        assert_eq!(color.to_rgb255(), [3, 4, 94]);
        assert_eq!(Rgb::new(0.999, 0.5, 0.0).to_css(), "rgb(254,127,0)");
    }

    #[test]
    fn gradient_validation() {
        let black = Rgb::new(0.0, 0.0, 0.0);
        let white = Rgb::new(1.0, 1.0, 1.0);
        assert!(matches!(
            Gradient::new(vec![ColorStop::new(0.0, black)]),
            Err(PaletteError::TooFewStops { found: 1 })
        ));
        assert!(matches!(
            Gradient::new(vec![ColorStop::new(0.0, black), ColorStop::new(1.5, white)]),
            Err(PaletteError::StopOutOfRange { index: 1, .. })
        ));
        assert!(matches!(
            Gradient::new(vec![
                ColorStop::new(0.0, black),
                ColorStop::new(0.6, white),
                ColorStop::new(0.4, black),
                ColorStop::new(1.0, white),
            ]),
            Err(PaletteError::Unordered { index: 2, .. })
        ));
        assert!(matches!(
            Gradient::new(vec![ColorStop::new(0.1, black), ColorStop::new(1.0, white)]),
            Err(PaletteError::Unanchored { .. })
        ));
    }

    #[test]
    fn gradient_interpolates_between_neighbours() {
        let gradient = Gradient::evenly_spaced(&[
            Rgb::new(0.0, 0.0, 0.0),
            Rgb::new(1.0, 0.0, 0.0),
            Rgb::new(1.0, 1.0, 0.0),
        ])
        .unwrap();
        assert_eq!(gradient.sample(0.0), Rgb::new(0.0, 0.0, 0.0));
        assert_eq!(gradient.sample(0.25), Rgb::new(0.5, 0.0, 0.0));
        assert_eq!(gradient.sample(0.75), Rgb::new(1.0, 0.5, 0.0));
        assert_eq!(gradient.sample(1.0), Rgb::new(1.0, 1.0, 0.0));
        assert_eq!(gradient.sample(7.0), Rgb::new(1.0, 1.0, 0.0));
        assert_eq!(gradient.sample(f64::NAN), Rgb::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn repeated_position_makes_a_hard_edge() {
        let gradient = Gradient::new(vec![
            ColorStop::new(0.0, Rgb::new(0.0, 0.0, 0.0)),
            ColorStop::new(0.5, Rgb::new(0.0, 0.0, 0.0)),
            ColorStop::new(0.5, Rgb::new(1.0, 1.0, 1.0)),
            ColorStop::new(1.0, Rgb::new(1.0, 1.0, 1.0)),
        ])
        .unwrap();
        assert_eq!(gradient.sample(0.5), Rgb::new(0.0, 0.0, 0.0));
        assert_eq!(gradient.sample(0.51), Rgb::new(1.0, 1.0, 1.0));
    }
}
