//! Surface families, requests and sampling.
//!
//! Built-in families and user expressions both implement
//! [`SurfaceDefinition`], so the sampler and everything downstream treat them
//! the same way.

pub mod builtin;
pub mod catalog;
pub mod definition;
pub mod mesh;
pub mod request;
pub mod sampler;

use core::fmt;
use core::str::FromStr;
use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::suggest::{closest_name, hint};

pub use builtin::{KleinBottle, MobiusStrip, Sphere, Torus};
pub use catalog::{Constraint, ParameterSpec, SurfaceCatalog, SurfaceDescription};
pub use definition::{
    ExplicitSurface, ExpressionError, ParametricSurface, SurfaceDefinition, build_definition,
};
pub use mesh::{SceneBounds, SurfaceMesh};
pub use request::{RequestError, SurfaceRequest, ValidatedRequest};
pub use sampler::{SamplingError, sample};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceCategory {
    BuiltIn,
    Parametric,
    Explicit,
}

/// Every surface the engine can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    MobiusStrip,
    KleinBottle,
    Torus,
    Sphere,
    Parametric,
    Explicit,
}

impl SurfaceKind {
    /// Catalog order.
    pub const ALL: [Self; 6] = [
        Self::MobiusStrip,
        Self::KleinBottle,
        Self::Torus,
        Self::Sphere,
        Self::Parametric,
        Self::Explicit,
    ];

    /// Stable identifier used on the wire and on the command line.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::MobiusStrip => "mobius_strip",
            Self::KleinBottle => "klein_bottle",
            Self::Torus => "torus",
            Self::Sphere => "sphere",
            Self::Parametric => "parametric",
            Self::Explicit => "explicit",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::MobiusStrip => "Möbius Strip",
            Self::KleinBottle => "Klein Bottle",
            Self::Torus => "Torus",
            Self::Sphere => "Sphere",
            Self::Parametric => "Custom Parametric Surface",
            Self::Explicit => "Custom Explicit Surface z=f(x,y)",
        }
    }

    #[must_use]
    pub const fn category(self) -> SurfaceCategory {
        match self {
            Self::MobiusStrip | Self::KleinBottle | Self::Torus | Self::Sphere => {
                SurfaceCategory::BuiltIn
            }
            Self::Parametric => SurfaceCategory::Parametric,
            Self::Explicit => SurfaceCategory::Explicit,
        }
    }

    #[must_use]
    pub const fn is_builtin(self) -> bool {
        matches!(self.category(), SurfaceCategory::BuiltIn)
    }

    /// Parameter domain used when a request does not supply one. Built-in
    /// families always sample this domain.
    #[must_use]
    pub const fn default_domain(self) -> Domain {
        match self {
            Self::MobiusStrip => Domain::new(Interval::new(0.0, TAU), Interval::new(-1.0, 1.0)),
            Self::KleinBottle | Self::Torus | Self::Parametric => {
                Domain::new(Interval::new(0.0, TAU), Interval::new(0.0, TAU))
            }
            Self::Sphere => Domain::new(Interval::new(0.0, TAU), Interval::new(0.0, PI)),
            Self::Explicit => Domain::new(Interval::new(-5.0, 5.0), Interval::new(-5.0, 5.0)),
        }
    }

    /// Names of the two free variables in user expressions.
    #[must_use]
    pub const fn variables(self) -> (&'static str, &'static str) {
        match self {
            Self::Explicit => ("x", "y"),
            _ => ("u", "v"),
        }
    }

    /// Labels of the expressions a request of this kind must carry, in order.
    #[must_use]
    pub const fn expression_labels(self) -> &'static [&'static str] {
        match self {
            Self::Parametric => &["x(u,v)", "y(u,v)", "z(u,v)"],
            Self::Explicit => &["z(x,y)"],
            _ => &[],
        }
    }
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown surface kind `{name}`{}", hint(.suggestion))]
pub struct UnknownSurfaceKind {
    pub name: String,
    pub suggestion: Option<String>,
}

impl FromStr for SurfaceKind {
    type Err = UnknownSurfaceKind;

    /// Accepts the identifier, the title or a short alias, ignoring case,
    /// spaces and dashes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .map(|c| if c == 'ö' { 'o' } else { c })
            .collect();

        let kind = match key.as_str() {
            "mobius" | "mobiusstrip" => Some(Self::MobiusStrip),
            "klein" | "kleinbottle" => Some(Self::KleinBottle),
            "torus" => Some(Self::Torus),
            "sphere" => Some(Self::Sphere),
            "parametric" | "customparametric" | "customparametricsurface" => {
                Some(Self::Parametric)
            }
            "explicit" | "customexplicit" | "customexplicitsurface" => Some(Self::Explicit),
            _ => None,
        };

        kind.ok_or_else(|| UnknownSurfaceKind {
            name: s.to_owned(),
            suggestion: closest_name(s.trim(), Self::ALL.iter().map(|kind| kind.id()))
                .map(str::to_owned),
        })
    }
}

/// Closed parameter range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    #[must_use]
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.start.is_finite() && self.end.is_finite()
    }
}

/// Rectangular parameter domain. For explicit surfaces `u` is the x range and
/// `v` the y range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub u: Interval,
    pub v: Interval,
}

impl Domain {
    #[must_use]
    pub const fn new(u: Interval, v: Interval) -> Self {
        Self { u, v }
    }
}

/// Samples per parameter axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub u: usize,
    pub v: usize,
}

impl Resolution {
    #[must_use]
    pub const fn new(u: usize, v: usize) -> Self {
        Self { u, v }
    }

    /// Grid shape `(rows, columns)` of a mesh sampled at this resolution.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.v, self.u)
    }
}

#[cfg(test)]
mod tests;
