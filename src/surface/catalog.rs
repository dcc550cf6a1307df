//! Read-only metadata for every surface kind.

use serde::Serialize;

use super::SurfaceKind;

/// Admissible values of a tunable parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    Positive,
    NonNegative,
}

impl Constraint {
    #[must_use]
    pub fn admits(self, value: f64) -> bool {
        value.is_finite()
            && match self {
                Self::Positive => value > 0.0,
                Self::NonNegative => value >= 0.0,
            }
    }

    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Positive => "finite and > 0",
            Self::NonNegative => "finite and >= 0",
        }
    }
}

/// A tunable numeric parameter and its slider range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
    pub constraint: Constraint,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SurfaceDescription {
    pub kind: SurfaceKind,
    pub title: &'static str,
    pub summary: &'static str,
    pub equations: &'static [&'static str],
    pub domain: &'static str,
    pub parameters: &'static [ParameterSpec],
    pub properties: &'static [&'static str],
    pub euler_characteristic: Option<i32>,
    pub orientable: Option<bool>,
}

const TORUS_PARAMETERS: &[ParameterSpec] = &[
    ParameterSpec {
        name: "R",
        label: "Major radius (R)",
        min: 0.5,
        max: 5.0,
        default: 2.0,
        step: 0.1,
        constraint: Constraint::Positive,
    },
    ParameterSpec {
        name: "r",
        label: "Minor radius (r)",
        min: 0.1,
        max: 3.0,
        default: 0.5,
        step: 0.1,
        constraint: Constraint::NonNegative,
    },
];

const SPHERE_PARAMETERS: &[ParameterSpec] = &[ParameterSpec {
    name: "r",
    label: "Radius (r)",
    min: 0.1,
    max: 5.0,
    default: 1.0,
    step: 0.1,
    constraint: Constraint::Positive,
}];

// Indexed by `SurfaceKind::ALL` order.
static DESCRIPTIONS: [SurfaceDescription; 6] = [
    SurfaceDescription {
        kind: SurfaceKind::MobiusStrip,
        title: "Möbius Strip",
        summary: "A non-orientable surface with only one side and one boundary component.",
        equations: &[
            "x = (1 + (v/2)cos(u/2))cos(u)",
            "y = (1 + (v/2)cos(u/2))sin(u)",
            "z = (v/2)sin(u/2)",
        ],
        domain: "u ∈ [0, 2π] (angular), v ∈ [-1, 1] (width)",
        parameters: &[],
        properties: &[
            "Single-sided surface",
            "Non-orientable",
            "Requires a 720° rotation to return to its initial state",
        ],
        euler_characteristic: Some(0),
        orientable: Some(false),
    },
    SurfaceDescription {
        kind: SurfaceKind::KleinBottle,
        title: "Klein Bottle",
        summary: "A non-orientable closed surface that cannot be embedded in three-dimensional \
                  space without intersecting itself.",
        equations: &[
            "r = 4(1 - cos(u)/2)",
            "x = 6cos(u)(1 + sin(u)) + r cos(v + π)",
            "y = 16 sin(u)",
            "z = 6cos(u)(1 + sin(u)) + r sin(v)",
        ],
        domain: "u, v ∈ [0, 2π]",
        parameters: &[],
        properties: &[
            "Non-orientable surface",
            "Has no inside or outside",
            "Self-intersects in this 3D representation",
        ],
        euler_characteristic: Some(0),
        orientable: Some(false),
    },
    SurfaceDescription {
        kind: SurfaceKind::Torus,
        title: "Torus",
        summary: "A surface of revolution generated by revolving a circle around an axis \
                  coplanar with the circle.",
        equations: &[
            "x = (R + r cos(v))cos(u)",
            "y = (R + r cos(v))sin(u)",
            "z = r sin(v)",
        ],
        domain: "u, v ∈ [0, 2π]",
        parameters: TORUS_PARAMETERS,
        properties: &["Orientable surface", "Genus 1 (one hole)"],
        euler_characteristic: Some(0),
        orientable: Some(true),
    },
    SurfaceDescription {
        kind: SurfaceKind::Sphere,
        title: "Sphere",
        summary: "The set of all points in 3D space at a fixed distance from a center.",
        equations: &[
            "x = r sin(v)cos(u)",
            "y = r sin(v)sin(u)",
            "z = r cos(v)",
        ],
        domain: "u ∈ [0, 2π] (longitude), v ∈ [0, π] (latitude)",
        parameters: SPHERE_PARAMETERS,
        properties: &[
            "Orientable surface",
            "Surface area = 4πr²",
            "Volume = (4/3)πr³",
        ],
        euler_characteristic: Some(2),
        orientable: Some(true),
    },
    SurfaceDescription {
        kind: SurfaceKind::Parametric,
        title: "Custom Parametric Surface",
        summary: "x(u,v), y(u,v) and z(u,v) typed by the user.",
        equations: &[
            "x(u,v) = (1 + 0.5*cos(v))*cos(u)",
            "y(u,v) = (1 + 0.5*cos(v))*sin(u)",
            "z(u,v) = 0.5*sin(v)",
        ],
        domain: "u, v over a user-chosen range, default [0, 2π]",
        parameters: &[],
        properties: &[],
        euler_characteristic: None,
        orientable: None,
    },
    SurfaceDescription {
        kind: SurfaceKind::Explicit,
        title: "Custom Explicit Surface z=f(x,y)",
        summary: "A height field z = f(x, y) typed by the user.",
        equations: &["z(x,y) = sin(sqrt(x**2 + y**2))"],
        domain: "x, y over a user-chosen range, default [-5, 5]",
        parameters: &[],
        properties: &[],
        euler_characteristic: None,
        orientable: None,
    },
];

/// Registry of the surface kinds the engine offers.
pub struct SurfaceCatalog;

impl SurfaceCatalog {
    #[must_use]
    pub fn list_kinds() -> &'static [SurfaceKind] {
        &SurfaceKind::ALL
    }

    #[must_use]
    pub fn describe(kind: SurfaceKind) -> &'static SurfaceDescription {
        let index = SurfaceKind::ALL
            .iter()
            .position(|candidate| *candidate == kind)
            .unwrap_or_default();
        &DESCRIPTIONS[index]
    }

    #[must_use]
    pub fn descriptions() -> &'static [SurfaceDescription] {
        &DESCRIPTIONS
    }

    #[must_use]
    pub fn parameter(kind: SurfaceKind, name: &str) -> Option<&'static ParameterSpec> {
        Self::describe(kind)
            .parameters
            .iter()
            .find(|spec| spec.name == name)
    }

    /// Default expressions shown for the custom kinds.
    #[must_use]
    pub fn default_expressions(kind: SurfaceKind) -> &'static [&'static str] {
        match kind {
            SurfaceKind::Parametric => &[
                "(1 + 0.5*cos(v))*cos(u)",
                "(1 + 0.5*cos(v))*sin(u)",
                "0.5*sin(v)",
            ],
            SurfaceKind::Explicit => &["sin(sqrt(x**2 + y**2))"],
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptions_follow_kind_order() {
        for kind in SurfaceCatalog::list_kinds() {
            let description = SurfaceCatalog::describe(*kind);
            assert_eq!(description.kind, *kind);
            assert_eq!(description.title, kind.title());
        }
    }

    #[test]
    fn torus_parameters_have_defaults() {
        let major = SurfaceCatalog::parameter(SurfaceKind::Torus, "R").expect("R");
        let minor = SurfaceCatalog::parameter(SurfaceKind::Torus, "r").expect("r");
        assert_eq!(major.default, 2.0);
        assert_eq!(minor.default, 0.5);
        assert!(SurfaceCatalog::parameter(SurfaceKind::MobiusStrip, "r").is_none());
    }

    #[test]
    fn constraints_reject_non_finite() {
        assert!(!Constraint::Positive.admits(0.0));
        assert!(Constraint::NonNegative.admits(0.0));
        assert!(!Constraint::NonNegative.admits(f64::NAN));
        assert!(!Constraint::Positive.admits(f64::INFINITY));
    }

    #[test]
    fn euler_characteristics_match_topology() {
        assert_eq!(SurfaceCatalog::describe(SurfaceKind::Sphere).euler_characteristic, Some(2));
        assert_eq!(SurfaceCatalog::describe(SurfaceKind::Torus).euler_characteristic, Some(0));
        assert_eq!(SurfaceCatalog::describe(SurfaceKind::MobiusStrip).orientable, Some(false));
    }
}
