//! Backend-agnostic presentation of a generated surface.
//!
//! Both rendering adapters (static raster and interactive scene) read the
//! same [`RenderPlan`]: style, opacity, camera, cube axis ranges, wireframe
//! polylines and color bar.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::{ColorbarRange, Colorscale};
use crate::pipeline::GeneratedSurface;
use crate::surface::SceneBounds;

/// Camera distance from the scene center, the length of (1.5, 1.5, 1.5).
pub const EYE_DISTANCE: f64 = 2.598_076_211_353_316;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderStyle {
    #[default]
    Surface,
    Wireframe,
    SurfaceAndWireframe,
}

impl RenderStyle {
    pub const ALL: [Self; 3] = [Self::Surface, Self::Wireframe, Self::SurfaceAndWireframe];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Surface => "Surface",
            Self::Wireframe => "Wireframe",
            Self::SurfaceAndWireframe => "Surface + Wireframe",
        }
    }

    #[must_use]
    pub const fn draws_surface(self) -> bool {
        matches!(self, Self::Surface | Self::SurfaceAndWireframe)
    }

    #[must_use]
    pub const fn draws_wireframe(self) -> bool {
        matches!(self, Self::Wireframe | Self::SurfaceAndWireframe)
    }
}

impl fmt::Display for RenderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RenderStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "surface" => Ok(Self::Surface),
            "wireframe" => Ok(Self::Wireframe),
            "surfacewireframe" | "surfaceandwireframe" | "both" => Ok(Self::SurfaceAndWireframe),
            _ => Err(format!("unknown render style `{s}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub style: RenderStyle,
    pub opacity: f64,
    /// Degrees above the xy plane.
    pub elevation: f64,
    /// Degrees around the z axis.
    pub azimuth: f64,
    pub show_grid: bool,
    pub show_axes: bool,
    pub show_colorbar: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            style: RenderStyle::Surface,
            opacity: 0.8,
            elevation: 30.0,
            azimuth: -60.0,
            show_grid: true,
            show_axes: true,
            show_colorbar: true,
        }
    }
}

impl ViewSettings {
    /// Clamps opacity to `[0, 1]`, elevation to `[-90, 90]` and azimuth to
    /// `[-180, 180]`. Non-finite values revert to the defaults.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let clamp = |value: f64, fallback: f64, min: f64, max: f64| {
            if value.is_finite() {
                value.clamp(min, max)
            } else {
                fallback
            }
        };
        Self {
            opacity: clamp(self.opacity, defaults.opacity, 0.0, 1.0),
            elevation: clamp(self.elevation, defaults.elevation, -90.0, 90.0),
            azimuth: clamp(self.azimuth, defaults.azimuth, -180.0, 180.0),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Camera {
    pub elevation: f64,
    pub azimuth: f64,
    /// Eye position relative to the scene center, for backends that place
    /// the camera by coordinates.
    pub eye: [f64; 3],
}

impl Camera {
    #[must_use]
    pub fn new(elevation: f64, azimuth: f64) -> Self {
        let (elevation_rad, azimuth_rad) = (elevation.to_radians(), azimuth.to_radians());
        let eye = [
            EYE_DISTANCE * elevation_rad.cos() * azimuth_rad.cos(),
            EYE_DISTANCE * elevation_rad.cos() * azimuth_rad.sin(),
            EYE_DISTANCE * elevation_rad.sin(),
        ];
        Self {
            elevation,
            azimuth,
            eye,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPlan {
    pub title: String,
    pub style: RenderStyle,
    pub opacity: f64,
    pub camera: Camera,
    pub show_grid: bool,
    pub show_axes: bool,
    pub axis_labels: [&'static str; 3],
    pub bounds: Option<SceneBounds>,
    /// Grid rows then grid columns; empty unless the style draws a wireframe.
    pub wireframe: Vec<Vec<[f64; 3]>>,
    pub colorscale: Colorscale,
    /// `None` when the color bar is hidden or the field has no finite value.
    pub colorbar: Option<ColorbarRange>,
}

impl RenderPlan {
    #[must_use]
    pub fn new(surface: &GeneratedSurface, settings: &ViewSettings) -> Self {
        let settings = settings.sanitized();
        let wireframe = if settings.style.draws_wireframe() {
            surface.mesh.wireframe()
        } else {
            Vec::new()
        };
        let colorbar = if settings.show_colorbar {
            ColorbarRange::from_buffer(&surface.colors)
        } else {
            None
        };

        Self {
            title: surface.mesh.title().to_owned(),
            style: settings.style,
            opacity: settings.opacity,
            camera: Camera::new(settings.elevation, settings.azimuth),
            show_grid: settings.show_grid,
            show_axes: settings.show_axes,
            axis_labels: ["X-axis", "Y-axis", "Z-axis"],
            bounds: surface.bounds,
            wireframe,
            colorscale: Colorscale::from_mapping(&surface.mapping),
            colorbar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_out_of_range_settings() {
        let settings = ViewSettings {
            opacity: 1.7,
            elevation: -120.0,
            azimuth: f64::NAN,
            ..ViewSettings::default()
        }
        .sanitized();
        assert_eq!(settings.opacity, 1.0);
        assert_eq!(settings.elevation, -90.0);
        assert_eq!(settings.azimuth, -60.0);
    }

    #[test]
    fn parses_style_labels() {
        for style in RenderStyle::ALL {
            assert_eq!(style.label().parse::<RenderStyle>(), Ok(style));
        }
        assert_eq!("surface_and_wireframe".parse::<RenderStyle>(), Ok(RenderStyle::SurfaceAndWireframe));
        assert!("mesh".parse::<RenderStyle>().is_err());
    }

    #[test]
    fn camera_eye_lies_on_sphere() {
        let camera = Camera::new(30.0, -60.0);
        let [x, y, z] = camera.eye;
        assert!(((x * x + y * y + z * z).sqrt() - EYE_DISTANCE).abs() < 1e-12);
        assert!(z > 0.0 && y < 0.0 && x > 0.0);
    }
}
