use std::f64::consts::TAU;

use crate::config::Limits;
use crate::expr::{ExpressionCompiler, ParseError};
use crate::grid::linspace;
use crate::surface::{
    ExplicitSurface, ParametricSurface, Resolution, SurfaceDefinition, SurfaceKind,
    SurfaceRequest, build_definition, sample,
};

#[test]
fn parametric_matches_direct_closed_form() {
    let request = SurfaceRequest::with_defaults(SurfaceKind::Parametric, Resolution::new(50, 50));
    let validated = request.validate(&Limits::default()).expect("valid");
    let definition = build_definition(&validated, &ExpressionCompiler::default()).expect("compiles");
    let mesh = sample(definition.as_ref(), validated.resolution).expect("sample");

    let us = linspace(0.0, TAU, 50);
    let vs = linspace(0.0, TAU, 50);
    for (row, v) in vs.iter().enumerate() {
        for (column, u) in us.iter().enumerate() {
            let tube = 1.0 + 0.5 * v.cos();
            let expected = [tube * u.cos(), tube * u.sin(), 0.5 * v.sin()];
            let actual = mesh.point(row, column).expect("in range");
            for (a, e) in actual.iter().zip(expected) {
                assert!((a - e).abs() < 1e-12, "({row}, {column}): {actual:?} vs {expected:?}");
            }
        }
    }
}

#[test]
fn explicit_keeps_identity_xy_grids() {
    let request = SurfaceRequest::explicit("x * y", Resolution::new(3, 2));
    let validated = request.validate(&Limits::default()).expect("valid");
    let definition = build_definition(&validated, &ExpressionCompiler::default()).expect("compiles");
    let mesh = sample(definition.as_ref(), validated.resolution).expect("sample");

    assert_eq!(mesh.x().row(0), Some(&[-5.0, 0.0, 5.0][..]));
    assert_eq!(mesh.y().column(0), Some(vec![-5.0, 5.0]));
    assert_eq!(mesh.point(1, 2), Some([5.0, 5.0, 25.0]));
}

#[test]
fn explicit_singularity_produces_non_finite_samples() {
    let request = SurfaceRequest::explicit("1/x", Resolution::new(5, 3));
    let validated = request.validate(&Limits::default()).expect("valid");
    let definition = build_definition(&validated, &ExpressionCompiler::default()).expect("compiles");
    let mesh = sample(definition.as_ref(), validated.resolution).expect("sample never fails on NaN");

    // x = 0 sits in the middle column
    assert!(mesh.z().get(0, 2).is_some_and(|z| z.is_infinite()));
    assert_eq!(mesh.non_finite_count(), 3);
}

#[test]
fn failing_component_is_labelled() {
    let compiler = ExpressionCompiler::default();
    let domain = SurfaceKind::Parametric.default_domain();
    let expressions = ["u".to_owned(), "import(v)".to_owned(), "0".to_owned()];
    let err = ParametricSurface::compile(&compiler, &expressions, domain).unwrap_err();
    assert_eq!(err.label, "y(u,v)");
    assert!(matches!(err.source, ParseError::UnknownFunction { .. }));
}

#[test]
fn explicit_rejects_parametric_variables() {
    let compiler = ExpressionCompiler::default();
    let domain = SurfaceKind::Explicit.default_domain();
    let err = ExplicitSurface::compile(&compiler, &["u * v".to_owned()], domain).unwrap_err();
    assert_eq!(err.label, "z(x,y)");
    assert!(matches!(err.source, ParseError::UnknownIdentifier { .. }));
}

#[test]
fn point_at_agrees_with_grid_evaluation() {
    let compiler = ExpressionCompiler::default();
    let expressions = ["u + v".to_owned(), "u - v".to_owned(), "u * v".to_owned()];
    let surface =
        ParametricSurface::compile(&compiler, &expressions, SurfaceKind::Parametric.default_domain())
            .expect("compiles");
    assert_eq!(surface.point_at(2.0, 3.0), [5.0, -1.0, 6.0]);
    assert_eq!(surface.sources(), ["u + v", "u - v", "u * v"]);
}
