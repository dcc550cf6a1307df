//! Engine limits and defaults, loadable from JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::{self, DEFAULT_PALETTE, PaletteError};
use crate::expr::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_LENGTH, ExpressionCompiler};
use crate::surface::Resolution;
use crate::surface::request::MIN_RESOLUTION;
use crate::view::ViewSettings;

pub const DEFAULT_MAX_RESOLUTION: usize = 400;
/// Hard ceiling for `max_resolution`; no configuration may raise it.
pub const RESOLUTION_CEILING: usize = 1000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("`{name}` = {value} is invalid: {reason}")]
    InvalidLimit {
        name: &'static str,
        value: usize,
        reason: &'static str,
    },
    #[error("default resolution {u}x{v} is outside [{min}, {max}]")]
    DefaultResolution {
        u: usize,
        v: usize,
        min: usize,
        max: usize,
    },
    #[error("default palette: {0}")]
    Palette(#[from] PaletteError),
}

/// What happens to a resolution outside `[2, max_resolution]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPolicy {
    #[default]
    Reject,
    Clamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_resolution: usize,
    pub max_expression_length: usize,
    pub max_nesting_depth: usize,
    pub resolution_policy: ResolutionPolicy,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_resolution: DEFAULT_MAX_RESOLUTION,
            max_expression_length: DEFAULT_MAX_LENGTH,
            max_nesting_depth: DEFAULT_MAX_DEPTH,
            resolution_policy: ResolutionPolicy::Reject,
        }
    }
}

impl Limits {
    #[must_use]
    pub const fn compiler(&self) -> ExpressionCompiler {
        ExpressionCompiler::new(self.max_expression_length, self.max_nesting_depth)
    }
}

/// Values a front-end starts from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub resolution: Resolution,
    pub palette: String,
    pub view: ViewSettings,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            resolution: Resolution::new(100, 50),
            palette: DEFAULT_PALETTE.to_owned(),
            view: ViewSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub limits: Limits,
    pub defaults: Defaults,
}

impl EngineConfig {
    /// Parses and validates a JSON document. Missing fields keep their
    /// defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = &self.limits;
        if limits.max_resolution < MIN_RESOLUTION {
            return Err(ConfigError::InvalidLimit {
                name: "max_resolution",
                value: limits.max_resolution,
                reason: "must be at least 2",
            });
        }
        if limits.max_resolution > RESOLUTION_CEILING {
            return Err(ConfigError::InvalidLimit {
                name: "max_resolution",
                value: limits.max_resolution,
                reason: "must be at most 1000",
            });
        }
        for (name, value) in [
            ("max_expression_length", limits.max_expression_length),
            ("max_nesting_depth", limits.max_nesting_depth),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidLimit {
                    name,
                    value,
                    reason: "must be positive",
                });
            }
        }

        let Resolution { u, v } = self.defaults.resolution;
        let range = MIN_RESOLUTION..=limits.max_resolution;
        if !range.contains(&u) || !range.contains(&v) {
            return Err(ConfigError::DefaultResolution {
                u,
                v,
                min: MIN_RESOLUTION,
                max: limits.max_resolution,
            });
        }

        color::lookup(&self.defaults.palette)?;
        Ok(())
    }

    #[must_use]
    pub const fn compiler(&self) -> ExpressionCompiler {
        self.limits.compiler()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::RenderStyle;

    #[test]
    fn empty_document_gives_defaults() {
        let config = EngineConfig::from_json_str("{}").expect("valid");
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.limits.max_resolution, 400);
        assert_eq!(config.defaults.resolution, Resolution::new(100, 50));
        assert_eq!(config.defaults.palette, "viridis");
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = EngineConfig::from_json_str(
            r#"{"limits":{"resolution_policy":"clamp","max_resolution":120},
                "defaults":{"resolution":{"u":60,"v":30},"view":{"style":"wireframe"}}}"#,
        )
        .expect("valid");
        assert_eq!(config.limits.resolution_policy, ResolutionPolicy::Clamp);
        assert_eq!(config.limits.max_expression_length, 512);
        assert_eq!(config.defaults.view.style, RenderStyle::Wireframe);
        assert_eq!(config.defaults.view.opacity, 0.8);
    }

    #[test]
    fn rejects_inconsistent_limits() {
        let err = EngineConfig::from_json_str(r#"{"limits":{"max_resolution":1}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLimit { name: "max_resolution", .. }));

        let err = EngineConfig::from_json_str(r#"{"limits":{"max_resolution":40}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::DefaultResolution { u: 100, .. }));

        let err = EngineConfig::from_json_str(r#"{"defaults":{"palette":"sunrise"}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Palette(_)));

        let err = EngineConfig::from_json_str(r#"{"limits":{"max_resolution":18446744073709551615}}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidLimit { name: "max_resolution", value: usize::MAX, .. }
        ));

        let err = EngineConfig::from_json_str(r#"{"limits":{"max_resolution":1001}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLimit { value: 1001, .. }));
        EngineConfig::from_json_str(r#"{"limits":{"max_resolution":1000}}"#).expect("at ceiling");

        let err = EngineConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn compiler_follows_limits() {
        let limits = Limits {
            max_expression_length: 4,
            ..Limits::default()
        };
        assert!(limits.compiler().compile("u + v", "u", "v").is_err());
    }
}
