//! Scalar field to `[0, 1]` positions.

use serde::Serialize;

use crate::grid::{Grid, linspace};

/// Positions in `[0, 1]` for every entry of a scalar field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Normalized {
    pub positions: Grid,
    /// Finite min/max of the input, `None` when nothing was finite.
    pub range: Option<(f64, f64)>,
    /// The finite values were all equal and an index ramp was used instead.
    pub flat: bool,
    /// Entries that got the fallback position 0 because they were NaN or
    /// infinite.
    pub fallback_count: usize,
}

/// Min/max normalization over the finite entries of `z`.
///
/// A field whose finite values are all equal (zero spread) gets an evenly
/// spaced ramp over its row-major indices instead, so it still shows a
/// gradient. NaN and infinite entries map to 0.
#[must_use]
pub fn normalize(z: &Grid) -> Normalized {
    let fallback_count = z.non_finite_count();
    let Some((min, max)) = z.finite_range() else {
        return Normalized {
            positions: z.map(|_| 0.0),
            range: None,
            flat: false,
            fallback_count,
        };
    };

    let spread = max - min;
    if spread == 0.0 {
        let ramp = linspace(0.0, 1.0, z.len());
        let (rows, columns) = z.shape();
        let positions = Grid::from_fn(rows, columns, |row, column| {
            let index = row * columns + column;
            match z.get(row, column) {
                Some(value) if value.is_finite() => ramp[index],
                _ => 0.0,
            }
        });
        return Normalized {
            positions,
            range: Some((min, max)),
            flat: true,
            fallback_count,
        };
    }

    // Halve everything when max - min overflows; the ratio is unchanged.
    let scale = if spread.is_finite() { 1.0 } else { 0.5 };
    let denominator = max * scale - min * scale;
    let positions = z.map(|value| {
        if value.is_finite() {
            ((value * scale - min * scale) / denominator).clamp(0.0, 1.0)
        } else {
            0.0
        }
    });

    Normalized {
        positions,
        range: Some((min, max)),
        flat: false,
        fallback_count,
    }
}
