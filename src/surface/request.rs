//! What a caller asks for, and the checks it must pass before sampling.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::catalog::SurfaceCatalog;
use super::{Domain, Interval, Resolution, SurfaceKind};
use crate::config::{Limits, RESOLUTION_CEILING, ResolutionPolicy};
use crate::suggest::{closest_name, hint};

/// Fewest samples per axis that still span a domain.
pub const MIN_RESOLUTION: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceRequest {
    pub kind: SurfaceKind,
    pub resolution: Resolution,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
    #[serde(default)]
    pub expressions: Vec<String>,
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    #[error("{axis} resolution {value} is outside [{min}, {max}]")]
    Resolution {
        axis: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },
    #[error("{axis} range [{start}, {end}] must be finite")]
    NonFiniteDomain {
        axis: &'static str,
        start: f64,
        end: f64,
    },
    #[error("{axis} range [{start}, {end}] has its minimum above its maximum")]
    ReversedDomain {
        axis: &'static str,
        start: f64,
        end: f64,
    },
    #[error("{kind} takes {expected} expression(s), got {found}")]
    ExpressionCount {
        kind: SurfaceKind,
        expected: usize,
        found: usize,
    },
    #[error("{kind} has no parameter `{name}`{}", hint(.suggestion))]
    UnknownParameter {
        kind: SurfaceKind,
        name: String,
        suggestion: Option<String>,
    },
    #[error("parameter `{name}` = {value} must be {requirement}")]
    InvalidParameter {
        name: String,
        value: f64,
        requirement: &'static str,
    },
}

impl SurfaceRequest {
    #[must_use]
    pub fn new(kind: SurfaceKind, resolution: Resolution) -> Self {
        Self {
            kind,
            resolution,
            domain: None,
            expressions: Vec::new(),
            params: BTreeMap::new(),
        }
    }

    /// A request pre-filled with the catalog's default expressions.
    #[must_use]
    pub fn with_defaults(kind: SurfaceKind, resolution: Resolution) -> Self {
        Self::new(kind, resolution).with_expressions(
            SurfaceCatalog::default_expressions(kind)
                .iter()
                .map(|source| (*source).to_owned()),
        )
    }

    #[must_use]
    pub fn parametric(x: &str, y: &str, z: &str, resolution: Resolution) -> Self {
        Self::new(SurfaceKind::Parametric, resolution).with_expressions([x, y, z].map(str::to_owned))
    }

    #[must_use]
    pub fn explicit(z: &str, resolution: Resolution) -> Self {
        Self::new(SurfaceKind::Explicit, resolution).with_expressions([z.to_owned()])
    }

    #[must_use]
    pub fn with_expressions(mut self, expressions: impl IntoIterator<Item = String>) -> Self {
        self.expressions = expressions.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = Some(domain);
        self
    }

    #[must_use]
    pub fn with_param(mut self, name: &str, value: f64) -> Self {
        self.params.insert(name.to_owned(), value);
        self
    }

    /// Checks the request against `limits` and fills in defaults.
    pub fn validate(&self, limits: &Limits) -> Result<ValidatedRequest, RequestError> {
        let (first, second) = self.kind.variables();
        let resolution = Resolution::new(
            check_resolution(first, self.resolution.u, limits)?,
            check_resolution(second, self.resolution.v, limits)?,
        );

        let domain = self.resolve_domain()?;

        let expected = self.kind.expression_labels().len();
        if self.expressions.len() != expected {
            return Err(RequestError::ExpressionCount {
                kind: self.kind,
                expected,
                found: self.expressions.len(),
            });
        }

        let params = self.resolve_params()?;

        Ok(ValidatedRequest {
            kind: self.kind,
            resolution,
            domain,
            expressions: self.expressions.clone(),
            params,
        })
    }

    fn resolve_domain(&self) -> Result<Domain, RequestError> {
        let canonical = self.kind.default_domain();
        if self.kind.is_builtin() {
            if self.domain.is_some() {
                log::warn!(
                    "{} always samples its canonical domain; ignoring the requested one",
                    self.kind.id()
                );
            }
            return Ok(canonical);
        }

        let domain = self.domain.unwrap_or(canonical);
        let (first, second) = self.kind.variables();
        check_interval(first, domain.u)?;
        check_interval(second, domain.v)?;
        Ok(domain)
    }

    fn resolve_params(&self) -> Result<BTreeMap<&'static str, f64>, RequestError> {
        let specs = SurfaceCatalog::describe(self.kind).parameters;

        for (name, value) in &self.params {
            let Some(spec) = specs.iter().find(|spec| spec.name == name.as_str()) else {
                return Err(RequestError::UnknownParameter {
                    kind: self.kind,
                    name: name.clone(),
                    suggestion: closest_name(name, specs.iter().map(|spec| spec.name))
                        .map(str::to_owned),
                });
            };
            if !spec.constraint.admits(*value) {
                return Err(RequestError::InvalidParameter {
                    name: name.clone(),
                    value: *value,
                    requirement: spec.constraint.describe(),
                });
            }
        }

        Ok(specs
            .iter()
            .map(|spec| {
                let value = self.params.get(spec.name).copied().unwrap_or(spec.default);
                (spec.name, value)
            })
            .collect())
    }
}

fn check_resolution(axis: &'static str, value: usize, limits: &Limits) -> Result<usize, RequestError> {
    let max = limits.max_resolution.clamp(MIN_RESOLUTION, RESOLUTION_CEILING);
    if (MIN_RESOLUTION..=max).contains(&value) {
        return Ok(value);
    }
    match limits.resolution_policy {
        ResolutionPolicy::Reject => Err(RequestError::Resolution {
            axis,
            value,
            min: MIN_RESOLUTION,
            max,
        }),
        ResolutionPolicy::Clamp => {
            let clamped = value.clamp(MIN_RESOLUTION, max);
            log::warn!("{axis} resolution {value} clamped to {clamped}");
            Ok(clamped)
        }
    }
}

fn check_interval(axis: &'static str, interval: Interval) -> Result<(), RequestError> {
    let Interval { start, end } = interval;
    if !interval.is_finite() {
        return Err(RequestError::NonFiniteDomain { axis, start, end });
    }
    if start > end {
        return Err(RequestError::ReversedDomain { axis, start, end });
    }
    Ok(())
}

/// A request that passed validation, with every default resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub kind: SurfaceKind,
    pub resolution: Resolution,
    pub domain: Domain,
    pub expressions: Vec<String>,
    pub params: BTreeMap<&'static str, f64>,
}

impl ValidatedRequest {
    /// Value of a catalog parameter, NaN when the kind has no such parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> f64 {
        self.params.get(name).copied().unwrap_or(f64::NAN)
    }
}
