//! Evaluates a surface definition over an evenly spaced parameter grid.

use thiserror::Error;

use super::definition::SurfaceDefinition;
use super::mesh::SurfaceMesh;
use super::Resolution;
use crate::grid::{ShapeMismatch, linspace, meshgrid};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SamplingError {
    #[error("surface grids disagree: {0}")]
    ShapeMismatch(#[from] ShapeMismatch),
    #[error("cannot sample a {u}x{v} grid")]
    EmptyGrid { u: usize, v: usize },
}

/// Samples `definition` at `resolution.u × resolution.v` points with both
/// domain endpoints included. The mesh has shape `(resolution.v,
/// resolution.u)`; rows follow the second parameter.
pub fn sample(
    definition: &dyn SurfaceDefinition,
    resolution: Resolution,
) -> Result<SurfaceMesh, SamplingError> {
    if resolution.u == 0 || resolution.v == 0 {
        return Err(SamplingError::EmptyGrid {
            u: resolution.u,
            v: resolution.v,
        });
    }

    let domain = definition.domain();
    let us = linspace(domain.u.start, domain.u.end, resolution.u);
    let vs = linspace(domain.v.start, domain.v.end, resolution.v);
    let (u, v) = meshgrid(&us, &vs);

    let [x, y, z] = definition.evaluate(&u, &v)?;
    let mesh = SurfaceMesh::new(definition.kind(), definition.title(), x, y, z)?;

    let non_finite = mesh.non_finite_count();
    if non_finite > 0 {
        log::warn!(
            "{}: {non_finite} of {} samples are not finite",
            definition.kind().id(),
            mesh.vertex_count()
        );
    }
    log::debug!(
        "sampled {} at {}x{}",
        definition.kind().id(),
        resolution.u,
        resolution.v
    );

    Ok(mesh)
}
