#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod color;
pub mod config;
pub mod error;
pub mod expr;
pub mod grid;
pub mod pipeline;
pub mod suggest;
pub mod surface;
pub mod view;

use std::fmt;

use serde::Serialize;
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

use color::{ColorbarRange, Colorscale, facecolors};
use surface::{SceneBounds, SurfaceCatalog, SurfaceCategory, SurfaceKind};

pub use config::EngineConfig;
pub use error::EngineError;
pub use pipeline::{GeneratedSurface, generate};
pub use surface::SurfaceRequest;
pub use view::{RenderPlan, ViewSettings};

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            // no-op fallback when panic hook is disabled
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {
    // no-op fallback when debug logs are disabled
}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

#[derive(Debug, Serialize)]
struct SurfaceSummary {
    id: &'static str,
    title: &'static str,
    category: SurfaceCategory,
}

#[derive(Debug, Serialize)]
struct MeshExport<'a> {
    kind: SurfaceKind,
    title: &'a str,
    rows: usize,
    columns: usize,
    vertices: Vec<[f64; 3]>,
    indices: Vec<u32>,
    non_finite: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    bounds: Option<SceneBounds>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
enum ColorExport<'a> {
    Scene {
        colorscale: Colorscale,
        intensities: &'a [f64],
        colorbar: Option<ColorbarRange>,
    },
    Raster {
        palette: &'a str,
        intensities: &'a [f64],
        #[serde(skip_serializing_if = "Option::is_none")]
        facecolors: Option<Vec<[f64; 4]>>,
        colorbar: Option<ColorbarRange>,
    },
}

/// Public entry point for consumers.
#[wasm_bindgen]
pub struct Engine {
    config: EngineConfig,
    last_result: Option<GeneratedSurface>,
    last_error: Option<String>,
}

#[wasm_bindgen]
impl Engine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Engine {
        Engine::with_config(EngineConfig::default())
    }

    /// Builds an engine from a JSON configuration document.
    #[wasm_bindgen]
    pub fn from_config_json(json: &str) -> Result<Engine, JsValue> {
        let config = EngineConfig::from_json_str(json).map_err(to_js_error)?;
        Ok(Engine::with_config(config))
    }

    /// Surface kinds in catalog order.
    #[wasm_bindgen]
    pub fn list_surfaces(&self) -> Result<JsValue, JsValue> {
        let summaries: Vec<SurfaceSummary> = SurfaceCatalog::list_kinds()
            .iter()
            .map(|kind| SurfaceSummary {
                id: kind.id(),
                title: kind.title(),
                category: kind.category(),
            })
            .collect();
        to_js_value(&summaries)
    }

    /// Display metadata for one surface kind.
    #[wasm_bindgen]
    pub fn describe_surface(&self, kind: &str) -> Result<JsValue, JsValue> {
        let kind: SurfaceKind = kind.parse().map_err(to_js_error)?;
        to_js_value(SurfaceCatalog::describe(kind))
    }

    #[wasm_bindgen]
    pub fn list_palettes(&self) -> Result<JsValue, JsValue> {
        to_js_value(&color::palette_names())
    }

    /// Starting values for the controls (resolution, palette, view).
    #[wasm_bindgen]
    pub fn get_defaults(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.config.defaults)
    }

    /// Generates a surface from a request object. On failure the previous
    /// result stays available and the error text is kept in `last_error`.
    #[wasm_bindgen]
    pub fn generate(&mut self, request: JsValue, palette: &str) -> Result<(), JsValue> {
        let request: SurfaceRequest = match serde_wasm_bindgen::from_value(request) {
            Ok(request) => request,
            Err(err) => {
                let message = format!("malformed request: {err}");
                self.last_error = Some(message.clone());
                return Err(js_error(&message));
            }
        };
        self.generate_surface(&request, palette)
            .map(|_| ())
            .map_err(to_js_error)
    }

    /// Vertices, triangle indices and bounds of the last generated surface.
    #[wasm_bindgen]
    pub fn get_mesh(&self) -> Result<JsValue, JsValue> {
        let surface = self.require_result()?;
        let mesh = &surface.mesh;
        let (rows, columns) = mesh.shape();
        to_js_value(&MeshExport {
            kind: mesh.kind(),
            title: mesh.title(),
            rows,
            columns,
            vertices: mesh.vertices(),
            indices: mesh.triangle_indices(),
            non_finite: mesh.non_finite_count(),
            bounds: surface.bounds,
        })
    }

    /// Color data for `"scene"` (interactive) or `"raster"` (static) backends.
    #[wasm_bindgen]
    pub fn get_colors(&self, backend: &str, alpha: Option<f64>) -> Result<JsValue, JsValue> {
        let surface = self.require_result()?;
        let colors = &surface.colors;
        let colorbar = ColorbarRange::from_buffer(colors);
        let export = match backend.trim().to_ascii_lowercase().as_str() {
            "scene" | "interactive" => ColorExport::Scene {
                colorscale: Colorscale::from_mapping(&surface.mapping),
                intensities: colors.intensities().values(),
                colorbar,
            },
            "raster" | "static" => ColorExport::Raster {
                palette: colors.palette(),
                intensities: colors.intensities().values(),
                facecolors: facecolors(
                    colors,
                    alpha.unwrap_or(self.config.defaults.view.opacity),
                ),
                colorbar,
            },
            other => return Err(js_error(&format!("unknown render backend `{other}`"))),
        };
        to_js_value(&export)
    }

    /// Presentation data for the last surface; `settings` may be omitted.
    #[wasm_bindgen]
    pub fn get_render_plan(&self, settings: JsValue) -> Result<JsValue, JsValue> {
        let settings: ViewSettings = if settings.is_undefined() || settings.is_null() {
            self.config.defaults.view
        } else {
            serde_wasm_bindgen::from_value(settings).map_err(to_js_error)?
        };
        let surface = self.require_result()?;
        to_js_value(&RenderPlan::new(surface, &settings))
    }

    /// Message of the most recent failed request, cleared by a success.
    #[wasm_bindgen]
    pub fn last_error(&self) -> Option<String> {
        self.last_error.clone()
    }
}

impl Engine {
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            last_result: None,
            last_error: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs the pipeline and stores the result. A failure leaves the
    /// previous result in place.
    pub fn generate_surface(
        &mut self,
        request: &SurfaceRequest,
        palette: &str,
    ) -> Result<&GeneratedSurface, EngineError> {
        match pipeline::generate(request, palette, &self.config) {
            Ok(surface) => {
                debug_log!(
                    "generated {} ({} vertices)",
                    surface.mesh.title(),
                    surface.mesh.vertex_count()
                );
                self.last_error = None;
                let stored: &GeneratedSurface = self.last_result.insert(surface);
                Ok(stored)
            }
            Err(err) => {
                log::warn!("surface generation failed: {err}");
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    #[must_use]
    pub fn last_result(&self) -> Option<&GeneratedSurface> {
        self.last_result.as_ref()
    }

    #[must_use]
    pub fn render_plan(&self, settings: &ViewSettings) -> Option<RenderPlan> {
        self.last_result
            .as_ref()
            .map(|surface| RenderPlan::new(surface, settings))
    }

    fn require_result(&self) -> Result<&GeneratedSurface, JsValue> {
        self.last_result
            .as_ref()
            .ok_or_else(|| js_error("no surface has been generated yet"))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

fn to_js_value<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|err| JsError::new(&err.to_string()).into())
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{Resolution, SurfaceKind};

    #[test]
    fn failed_request_keeps_previous_result() {
        let mut engine = Engine::new();
        let good = SurfaceRequest::new(SurfaceKind::Torus, Resolution::new(8, 6));
        engine.generate_surface(&good, "viridis").expect("valid");

        let bad = SurfaceRequest::explicit("__import__('os')", Resolution::new(8, 6));
        assert!(engine.generate_surface(&bad, "viridis").is_err());

        let kept = engine.last_result().expect("previous result");
        assert_eq!(kept.mesh.kind(), SurfaceKind::Torus);
        assert!(engine.last_error().is_some_and(|message| message.contains("z(x,y)")));
    }

    #[test]
    fn success_clears_last_error() {
        let mut engine = Engine::default();
        let bad = SurfaceRequest::new(SurfaceKind::Sphere, Resolution::new(1, 1));
        assert!(engine.generate_surface(&bad, "viridis").is_err());
        assert!(engine.last_error().is_some());

        let good = SurfaceRequest::new(SurfaceKind::Sphere, Resolution::new(4, 4));
        engine.generate_surface(&good, "ocean").expect("valid");
        assert!(engine.last_error().is_none());
        assert!(engine.render_plan(&ViewSettings::default()).is_some());
    }
}
