use crate::config::Limits;
use crate::expr::ExpressionCompiler;
use crate::surface::{
    Domain, Interval, Resolution, SamplingError, SurfaceKind, SurfaceRequest, Torus,
    build_definition, sample,
};

#[test]
fn shape_is_v_by_u_for_every_kind() {
    let compiler = ExpressionCompiler::default();
    for kind in SurfaceKind::ALL {
        for (u, v) in [(2, 2), (2, 7), (20, 10), (100, 50), (13, 200)] {
            let request = SurfaceRequest::with_defaults(kind, Resolution::new(u, v));
            let validated = request.validate(&Limits::default()).expect("valid");
            let definition = build_definition(&validated, &compiler).expect("definition");
            let mesh = sample(definition.as_ref(), validated.resolution).expect("sample");
            assert_eq!(mesh.shape(), (v, u), "{kind:?} at {u}x{v}");
            assert_eq!(mesh.z().shape(), (v, u));
        }
    }
}

#[test]
fn empty_resolution_is_a_sampling_error() {
    let err = sample(&Torus::default(), Resolution::new(0, 4)).unwrap_err();
    assert_eq!(err, SamplingError::EmptyGrid { u: 0, v: 4 });
}

#[test]
fn degenerate_domain_repeats_one_row() {
    let request = SurfaceRequest::explicit("x + y", Resolution::new(5, 3))
        .with_domain(Domain::new(Interval::new(-1.0, 1.0), Interval::new(2.0, 2.0)));
    let validated = request.validate(&Limits::default()).expect("valid");
    let definition = build_definition(&validated, &ExpressionCompiler::default()).expect("definition");
    let mesh = sample(definition.as_ref(), validated.resolution).expect("sample");

    assert_eq!(mesh.shape(), (3, 5));
    assert!(mesh.y().values().iter().all(|y| *y == 2.0));
    assert_eq!(mesh.z().row(0), mesh.z().row(2));
}
