//! Dense row-major 2D arrays of samples.
//!
//! A [`Grid`] is the array type every stage of the pipeline exchanges: the
//! parameter grids fed to compiled expressions, the X/Y/Z coordinate arrays
//! of a sampled mesh and the scalar field handed to the color mapper. Rows
//! follow the second parameter (v or y), columns the first (u or x).

use core::fmt;

use serde::Serialize;

/// A rectangular array of `f64` values stored row by row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    rows: usize,
    columns: usize,
    values: Vec<f64>,
}

impl Grid {
    /// Creates a grid when the dimensions match the number of values.
    #[must_use]
    pub fn new(rows: usize, columns: usize, values: Vec<f64>) -> Option<Self> {
        if rows == 0 || columns == 0 || values.len() != rows * columns {
            return None;
        }
        Some(Self {
            rows,
            columns,
            values,
        })
    }

    /// Builds a grid by calling `f(row, column)` for every cell.
    #[must_use]
    pub fn from_fn(rows: usize, columns: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut values = Vec::with_capacity(rows * columns);
        for row in 0..rows {
            for column in 0..columns {
                values.push(f(row, column));
            }
        }
        Self {
            rows,
            columns,
            values,
        }
    }

    #[must_use]
    pub fn filled(rows: usize, columns: usize, value: f64) -> Self {
        Self {
            rows,
            columns,
            values: vec![value; rows * columns],
        }
    }

    /// `(rows, columns)`.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All values in row-major order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        self.values.get(row * self.columns + column).copied()
    }

    /// Borrow one row.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.columns;
        Some(&self.values[start..start + self.columns])
    }

    /// Copy one column.
    #[must_use]
    pub fn column(&self, column: usize) -> Option<Vec<f64>> {
        if column >= self.columns {
            return None;
        }
        Some(
            (0..self.rows)
                .map(|row| self.values[row * self.columns + column])
                .collect(),
        )
    }

    /// Applies `f` to every value, keeping the shape.
    #[must_use]
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            rows: self.rows,
            columns: self.columns,
            values: self.values.iter().copied().map(f).collect(),
        }
    }

    /// Combines two equal-shaped grids element by element.
    pub fn zip_map(&self, other: &Self, mut f: impl FnMut(f64, f64) -> f64) -> Result<Self, ShapeMismatch> {
        if self.shape() != other.shape() {
            return Err(ShapeMismatch::new(self.shape(), other.shape()));
        }
        let values = self
            .values
            .iter()
            .zip(&other.values)
            .map(|(a, b)| f(*a, *b))
            .collect();
        Ok(Self {
            rows: self.rows,
            columns: self.columns,
            values,
        })
    }

    /// Minimum and maximum over the finite entries, `None` when there are none.
    #[must_use]
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|value| value.is_finite())
            .fold(None, |range, value| match range {
                None => Some((value, value)),
                Some((min, max)) => Some((min.min(value), max.max(value))),
            })
    }

    /// Number of NaN or infinite entries.
    #[must_use]
    pub fn non_finite_count(&self) -> usize {
        self.values.iter().filter(|value| !value.is_finite()).count()
    }
}

/// Two grids that had to share a shape did not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeMismatch {
    pub expected: (usize, usize),
    pub found: (usize, usize),
}

impl ShapeMismatch {
    #[must_use]
    pub const fn new(expected: (usize, usize), found: (usize, usize)) -> Self {
        Self { expected, found }
    }
}

impl fmt::Display for ShapeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expected grid of shape {}x{} but got {}x{}",
            self.expected.0, self.expected.1, self.found.0, self.found.1
        )
    }
}

impl std::error::Error for ShapeMismatch {}

/// `count` evenly spaced samples from `start` to `end`, both inclusive.
///
/// The last sample is exactly `end`, so closed parameter ranges such as
/// `[0, 2π]` meet at the seam.
#[must_use]
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            let mut values: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
            values[count - 1] = end;
            values
        }
    }
}

/// Outer-product grids of two axes.
///
/// Returns `(first, second)` of shape `(second_axis.len(), first_axis.len())`
/// where `first[row][col] == first_axis[col]` and
/// `second[row][col] == second_axis[row]`.
#[must_use]
pub fn meshgrid(first_axis: &[f64], second_axis: &[f64]) -> (Grid, Grid) {
    let rows = second_axis.len();
    let columns = first_axis.len();
    let first = Grid::from_fn(rows, columns, |_, column| first_axis[column]);
    let second = Grid::from_fn(rows, columns, |row, _| second_axis[row]);
    (first, second)
}
