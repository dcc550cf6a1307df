//! Request to colored mesh in one call.

use serde::Serialize;

use crate::color::{self, ColorBuffer, ColorMapper, ColorMapping};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::surface::{
    SceneBounds, SurfaceMesh, SurfaceRequest, ValidatedRequest, build_definition, sample,
};

/// A sampled, colored surface ready for a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedSurface {
    #[serde(skip)]
    pub request: ValidatedRequest,
    pub mesh: SurfaceMesh,
    pub mapping: ColorMapping,
    pub colors: ColorBuffer,
    pub bounds: Option<SceneBounds>,
}

/// Validates `request`, compiles or looks up its definition, samples it and
/// colors the Z field with `palette`.
pub fn generate(
    request: &SurfaceRequest,
    palette: &str,
    config: &EngineConfig,
) -> Result<GeneratedSurface, EngineError> {
    generate_with(request, palette, config, &ColorMapper::new())
}

/// As [`generate`], with a caller-supplied mapper (e.g. one that resolves
/// standard palettes).
pub fn generate_with(
    request: &SurfaceRequest,
    palette: &str,
    config: &EngineConfig,
    mapper: &ColorMapper<'_>,
) -> Result<GeneratedSurface, EngineError> {
    let validated = request.validate(&config.limits)?;
    let mapping = color::lookup(palette)?;
    log::debug!(
        "generating {} at {}x{} with `{}`",
        validated.kind.id(),
        validated.resolution.u,
        validated.resolution.v,
        mapping.name()
    );

    let definition = build_definition(&validated, &config.compiler())?;
    let mesh = sample(definition.as_ref(), validated.resolution)?;
    let colors = mapper.apply(&mapping, mesh.z());
    let bounds = mesh.bounds();

    Ok(GeneratedSurface {
        request: validated,
        mesh,
        mapping,
        colors,
        bounds,
    })
}
