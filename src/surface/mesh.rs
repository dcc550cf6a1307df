//! Sampled surfaces and the derived data renderers need.

use serde::Serialize;

use super::SurfaceKind;
use super::sampler::SamplingError;
use crate::grid::{Grid, ShapeMismatch};

/// X, Y and Z grids of identical shape `(v_res, u_res)`. Non-finite samples
/// are kept as they are.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceMesh {
    kind: SurfaceKind,
    title: String,
    x: Grid,
    y: Grid,
    z: Grid,
}

impl SurfaceMesh {
    pub fn new(
        kind: SurfaceKind,
        title: impl Into<String>,
        x: Grid,
        y: Grid,
        z: Grid,
    ) -> Result<Self, SamplingError> {
        for other in [&y, &z] {
            if other.shape() != x.shape() {
                return Err(ShapeMismatch::new(x.shape(), other.shape()).into());
            }
        }
        Ok(Self {
            kind,
            title: title.into(),
            x,
            y,
            z,
        })
    }

    #[must_use]
    pub const fn kind(&self) -> SurfaceKind {
        self.kind
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub const fn x(&self) -> &Grid {
        &self.x
    }

    #[must_use]
    pub const fn y(&self) -> &Grid {
        &self.y
    }

    #[must_use]
    pub const fn z(&self) -> &Grid {
        &self.z
    }

    /// `(rows, columns)`, i.e. `(v_res, u_res)`.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        self.x.shape()
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.x.len()
    }

    #[must_use]
    pub fn point(&self, row: usize, column: usize) -> Option<[f64; 3]> {
        Some([
            self.x.get(row, column)?,
            self.y.get(row, column)?,
            self.z.get(row, column)?,
        ])
    }

    /// Vertices in row-major order.
    #[must_use]
    pub fn vertices(&self) -> Vec<[f64; 3]> {
        self.x
            .values()
            .iter()
            .zip(self.y.values())
            .zip(self.z.values())
            .map(|((x, y), z)| [*x, *y, *z])
            .collect()
    }

    /// Vertices with at least one NaN or infinite coordinate.
    #[must_use]
    pub fn non_finite_count(&self) -> usize {
        self.vertices()
            .iter()
            .filter(|point| !is_finite_point(point))
            .count()
    }

    /// Two triangles per grid cell, `[i0, i1, i2]` then `[i2, i1, i3]` where
    /// `i0`/`i1` are the cell's first-row corners. Cells touching a
    /// non-finite vertex are left out.
    #[must_use]
    pub fn triangle_indices(&self) -> Vec<u32> {
        let (rows, columns) = self.shape();
        if rows < 2 || columns < 2 {
            return Vec::new();
        }
        let finite: Vec<bool> = self.vertices().iter().map(is_finite_point).collect();
        let mut indices = Vec::with_capacity((rows - 1) * (columns - 1) * 6);

        for row in 0..rows - 1 {
            for column in 0..columns - 1 {
                let i0 = row * columns + column;
                let i1 = i0 + 1;
                let i2 = i0 + columns;
                let i3 = i2 + 1;
                if ![i0, i1, i2, i3].iter().all(|i| finite[*i]) {
                    continue;
                }
                let [i0, i1, i2, i3] = [i0, i1, i2, i3].map(|i| i as u32);
                indices.extend_from_slice(&[i0, i1, i2]);
                indices.extend_from_slice(&[i2, i1, i3]);
            }
        }

        indices
    }

    /// Polylines along every grid row, then along every grid column.
    #[must_use]
    pub fn wireframe(&self) -> Vec<Vec<[f64; 3]>> {
        let (rows, columns) = self.shape();
        let along_rows = (0..rows).map(|row| {
            (0..columns)
                .filter_map(|column| self.point(row, column))
                .collect::<Vec<_>>()
        });
        let along_columns = (0..columns).map(|column| {
            (0..rows)
                .filter_map(|row| self.point(row, column))
                .collect::<Vec<_>>()
        });
        along_rows.chain(along_columns).collect()
    }

    /// Equal-aspect bounds over the finite samples, `None` when an axis has
    /// no finite value at all.
    #[must_use]
    pub fn bounds(&self) -> Option<SceneBounds> {
        SceneBounds::cube(
            self.x.finite_range()?,
            self.y.finite_range()?,
            self.z.finite_range()?,
        )
    }
}

fn is_finite_point(point: &[f64; 3]) -> bool {
    point.iter().all(|value| value.is_finite())
}

/// Axis ranges of a cube centered on the data, so no axis looks stretched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SceneBounds {
    pub x: [f64; 2],
    pub y: [f64; 2],
    pub z: [f64; 2],
}

impl SceneBounds {
    /// Each axis becomes `mid ± max_span / 2`, where `max_span` is the widest
    /// of the three input ranges.
    #[must_use]
    pub fn cube(x: (f64, f64), y: (f64, f64), z: (f64, f64)) -> Option<Self> {
        let half = [x, y, z]
            .iter()
            .map(|(min, max)| max - min)
            .fold(0.0_f64, f64::max)
            / 2.0;
        if !half.is_finite() {
            return None;
        }
        let around = |(min, max): (f64, f64)| {
            let mid = (max + min) / 2.0;
            [mid - half, mid + half]
        };
        Some(Self {
            x: around(x),
            y: around(y),
            z: around(z),
        })
    }

    #[must_use]
    pub fn half_extent(&self) -> f64 {
        (self.x[1] - self.x[0]) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(rows: usize, columns: usize) -> SurfaceMesh {
        let x = Grid::from_fn(rows, columns, |_, column| column as f64);
        let y = Grid::from_fn(rows, columns, |row, _| row as f64);
        let z = Grid::filled(rows, columns, 0.0);
        SurfaceMesh::new(SurfaceKind::Explicit, "flat", x, y, z).expect("same shape")
    }

    #[test]
    fn rejects_mismatched_grids() {
        let x = Grid::filled(2, 3, 0.0);
        let y = Grid::filled(2, 3, 0.0);
        let z = Grid::filled(3, 2, 0.0);
        let err = SurfaceMesh::new(SurfaceKind::Explicit, "bad", x, y, z).unwrap_err();
        assert!(matches!(err, SamplingError::ShapeMismatch(_)));
    }

    #[test]
    fn triangulates_in_grid_order() {
        let mesh = flat(2, 3);
        assert_eq!(mesh.triangle_indices(), vec![0, 1, 3, 3, 1, 4, 1, 2, 4, 4, 2, 5]);
    }

    #[test]
    fn skips_cells_with_non_finite_vertices() {
        let x = Grid::from_fn(3, 3, |_, column| column as f64);
        let y = Grid::from_fn(3, 3, |row, _| row as f64);
        let z = Grid::from_fn(3, 3, |row, column| if row == 0 && column == 0 { f64::NAN } else { 0.0 });
        let mesh = SurfaceMesh::new(SurfaceKind::Explicit, "hole", x, y, z).expect("same shape");
        assert_eq!(mesh.non_finite_count(), 1);
        assert_eq!(mesh.triangle_indices().len(), 3 * 6);
    }

    #[test]
    fn wireframe_has_rows_then_columns() {
        let mesh = flat(2, 3);
        let lines = mesh.wireframe();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0].len(), 3);
        assert_eq!(lines[2].len(), 2);
        assert_eq!(lines[2][1], [0.0, 1.0, 0.0]);
    }

    #[test]
    fn bounds_form_a_cube() {
        let bounds = SceneBounds::cube((0.0, 4.0), (-1.0, 1.0), (10.0, 10.0)).expect("finite");
        assert_eq!(bounds.x, [0.0, 4.0]);
        assert_eq!(bounds.y, [-2.0, 2.0]);
        assert_eq!(bounds.z, [8.0, 12.0]);
        assert_eq!(bounds.half_extent(), 2.0);
    }

    #[test]
    fn bounds_need_finite_values_on_every_axis() {
        let x = Grid::filled(2, 2, 0.0);
        let y = Grid::filled(2, 2, 0.0);
        let z = Grid::filled(2, 2, f64::NAN);
        let mesh = SurfaceMesh::new(SurfaceKind::Explicit, "void", x, y, z).expect("same shape");
        assert!(mesh.bounds().is_none());
    }
}
