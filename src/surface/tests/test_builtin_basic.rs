use std::f64::consts::TAU;

use crate::surface::{
    KleinBottle, MobiusStrip, Resolution, Sphere, SurfaceDefinition, SurfaceKind, Torus, sample,
};

const EPS: f64 = 1e-9;

fn assert_point_eq(actual: [f64; 3], expected: [f64; 3]) {
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < EPS, "{actual:?} != {expected:?}");
    }
}

fn first_corner(definition: &dyn SurfaceDefinition) -> [f64; 3] {
    let mesh = sample(definition, Resolution::new(4, 3)).expect("sample");
    mesh.point(0, 0).expect("corner")
}

#[test]
fn mobius_min_corner_matches_closed_form() {
    // u = 0, v = -1: radial = 1 - 0.5
    assert_point_eq(first_corner(&MobiusStrip), [0.5, 0.0, 0.0]);
}

#[test]
fn klein_min_corner_matches_closed_form() {
    // u = 0, v = 0: r = 2, body = 6, cos(pi) = -1
    assert_point_eq(first_corner(&KleinBottle), [4.0, 0.0, 6.0]);
}

#[test]
fn torus_min_corner_is_exact() {
    let mesh = sample(&Torus::new(2.0, 0.5), Resolution::new(4, 4)).expect("sample");
    assert_eq!(mesh.point(0, 0), Some([2.5, 0.0, 0.0]));
}

#[test]
fn sphere_min_corner_is_north_pole() {
    assert_point_eq(first_corner(&Sphere::new(1.0)), [0.0, 0.0, 1.0]);
}

#[test]
fn torus_closes_at_the_seam() {
    let mesh = sample(&Torus::default(), Resolution::new(9, 5)).expect("sample");
    let (rows, columns) = mesh.shape();
    let start = mesh.point(0, 0).expect("start");
    let end = mesh.point(rows - 1, columns - 1).expect("end");
    assert_point_eq(start, end);
}

#[test]
fn sphere_samples_lie_on_the_radius() {
    let radius = 2.5;
    let mesh = sample(&Sphere::new(radius), Resolution::new(12, 7)).expect("sample");
    for [x, y, z] in mesh.vertices() {
        let distance = (x * x + y * y + z * z).sqrt();
        assert!((distance - radius).abs() < EPS);
    }
}

#[test]
fn builtins_report_their_kind_and_title() {
    let mesh = sample(&KleinBottle, Resolution::new(3, 3)).expect("sample");
    assert_eq!(mesh.kind(), SurfaceKind::KleinBottle);
    assert_eq!(mesh.title(), "Klein Bottle");

    let domain = MobiusStrip.domain();
    assert_eq!((domain.u.start, domain.u.end), (0.0, TAU));
    assert_eq!((domain.v.start, domain.v.end), (-1.0, 1.0));
}

#[test]
fn zero_tube_radius_collapses_to_a_circle() {
    let mesh = sample(&Torus::new(2.0, 0.0), Resolution::new(8, 4)).expect("sample");
    assert!(mesh.z().values().iter().all(|z| *z == 0.0));
    assert_eq!(mesh.non_finite_count(), 0);
}
