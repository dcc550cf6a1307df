use serde::Serialize;

use super::normalize::normalize;
use super::{ColorMapping, Gradient, Rgb};
use crate::grid::Grid;

/// Supplies gradients for standard palette names, which the engine itself
/// only knows by name.
pub trait PaletteResolver {
    fn resolve(&self, name: &str) -> Option<Gradient>;
}

/// Per-sample color data with the same shape as the field it was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBuffer {
    palette: String,
    intensities: Grid,
    colors: Option<Vec<Rgb>>,
    z_range: Option<(f64, f64)>,
    flat: bool,
    fallback_count: usize,
}

impl ColorBuffer {
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        self.intensities.shape()
    }

    #[must_use]
    pub fn palette(&self) -> &str {
        &self.palette
    }

    /// Normalized positions in `[0, 1]`, fallback already applied.
    #[must_use]
    pub const fn intensities(&self) -> &Grid {
        &self.intensities
    }

    /// Row-major colors, present when a gradient was available.
    #[must_use]
    pub fn colors(&self) -> Option<&[Rgb]> {
        self.colors.as_deref()
    }

    #[must_use]
    pub fn color(&self, row: usize, column: usize) -> Option<Rgb> {
        let (rows, columns) = self.shape();
        if row >= rows || column >= columns {
            return None;
        }
        self.colors.as_ref()?.get(row * columns + column).copied()
    }

    /// Finite min/max of the source field.
    #[must_use]
    pub const fn z_range(&self) -> Option<(f64, f64)> {
        self.z_range
    }

    /// True when the field had zero spread and an index ramp was used.
    #[must_use]
    pub const fn is_flat(&self) -> bool {
        self.flat
    }

    #[must_use]
    pub const fn fallback_count(&self) -> usize {
        self.fallback_count
    }
}

/// Turns scalar fields into [`ColorBuffer`]s.
#[derive(Default)]
pub struct ColorMapper<'a> {
    resolver: Option<&'a dyn PaletteResolver>,
}

impl<'a> ColorMapper<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self { resolver: None }
    }

    #[must_use]
    pub fn with_resolver(resolver: &'a dyn PaletteResolver) -> Self {
        Self {
            resolver: Some(resolver),
        }
    }

    #[must_use]
    pub fn apply(&self, mapping: &ColorMapping, z: &Grid) -> ColorBuffer {
        let normalized = normalize(z);

        let resolved;
        let gradient = match mapping {
            ColorMapping::Custom { gradient, .. } => Some(gradient),
            ColorMapping::Standard { name } => {
                resolved = self.resolver.and_then(|resolver| resolver.resolve(name));
                resolved.as_ref()
            }
        };

        let colors = gradient.map(|gradient| {
            normalized
                .positions
                .values()
                .iter()
                .map(|position| gradient.sample(*position))
                .collect()
        });

        if normalized.fallback_count > 0 {
            log::debug!(
                "{} of {} samples use the fallback color",
                normalized.fallback_count,
                z.len()
            );
        }

        ColorBuffer {
            palette: mapping.name().to_owned(),
            intensities: normalized.positions,
            colors,
            z_range: normalized.range,
            flat: normalized.flat,
            fallback_count: normalized.fallback_count,
        }
    }
}

/// Colors `z` with `mapping` and no resolver for standard palettes.
#[must_use]
pub fn apply(mapping: &ColorMapping, z: &Grid) -> ColorBuffer {
    ColorMapper::new().apply(mapping, z)
}
