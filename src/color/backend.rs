//! Color data in the shapes the two rendering backends consume.

use serde::Serialize;

use super::mapper::ColorBuffer;
use super::ColorMapping;

/// Samples taken from a custom gradient for the interactive backend.
pub const COLORSCALE_SAMPLES: usize = 11;

/// Colorscale for the interactive scene backend: a palette name it knows, or
/// `(position, "rgb(R,G,B)")` pairs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Colorscale {
    Named(String),
    Stops(Vec<(f64, String)>),
}

impl Colorscale {
    #[must_use]
    pub fn from_mapping(mapping: &ColorMapping) -> Self {
        match mapping {
            ColorMapping::Standard { name } => Self::Named(name.clone()),
            ColorMapping::Custom { gradient, .. } => {
                let last = (COLORSCALE_SAMPLES - 1) as f64;
                Self::Stops(
                    (0..COLORSCALE_SAMPLES)
                        .map(|i| {
                            let position = i as f64 / last;
                            (position, gradient.sample(position).to_css())
                        })
                        .collect(),
                )
            }
        }
    }
}

/// Row-major RGBA face colors for the static raster backend, `None` when the
/// buffer has no resolved colors.
#[must_use]
pub fn facecolors(buffer: &ColorBuffer, alpha: f64) -> Option<Vec<[f64; 4]>> {
    let alpha = if alpha.is_finite() { alpha.clamp(0.0, 1.0) } else { 1.0 };
    buffer.colors().map(|colors| {
        colors
            .iter()
            .map(|color| [color.r, color.g, color.b, alpha])
            .collect()
    })
}

/// Value range shown next to the color bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorbarRange {
    pub min: f64,
    pub max: f64,
    pub label: &'static str,
}

impl ColorbarRange {
    #[must_use]
    pub fn from_buffer(buffer: &ColorBuffer) -> Option<Self> {
        buffer.z_range().map(|(min, max)| Self {
            min,
            max,
            label: "Z Value",
        })
    }
}
