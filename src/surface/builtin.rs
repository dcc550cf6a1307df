//! Closed-form built-in surface families.

use std::f64::consts::PI;

use super::definition::SurfaceDefinition;
use super::{Domain, SurfaceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MobiusStrip;

impl SurfaceDefinition for MobiusStrip {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::MobiusStrip
    }

    fn domain(&self) -> Domain {
        SurfaceKind::MobiusStrip.default_domain()
    }

    fn point_at(&self, u: f64, v: f64) -> [f64; 3] {
        let half_angle = u / 2.0;
        let radial = 1.0 + 0.5 * v * half_angle.cos();
        [radial * u.cos(), radial * u.sin(), 0.5 * v * half_angle.sin()]
    }
}

/// The usual self-intersecting immersion of the Klein bottle in 3D.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KleinBottle;

impl SurfaceDefinition for KleinBottle {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::KleinBottle
    }

    fn domain(&self) -> Domain {
        SurfaceKind::KleinBottle.default_domain()
    }

    fn point_at(&self, u: f64, v: f64) -> [f64; 3] {
        let r = 4.0 * (1.0 - u.cos() / 2.0);
        let body = 6.0 * u.cos() * (1.0 + u.sin());
        [body + r * (v + PI).cos(), 16.0 * u.sin(), body + r * v.sin()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Torus {
    pub major_radius: f64,
    pub minor_radius: f64,
}

impl Torus {
    #[must_use]
    pub const fn new(major_radius: f64, minor_radius: f64) -> Self {
        Self {
            major_radius,
            minor_radius,
        }
    }
}

impl Default for Torus {
    fn default() -> Self {
        Self::new(2.0, 0.5)
    }
}

impl SurfaceDefinition for Torus {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Torus
    }

    fn domain(&self) -> Domain {
        SurfaceKind::Torus.default_domain()
    }

    fn point_at(&self, u: f64, v: f64) -> [f64; 3] {
        let tube = self.major_radius + self.minor_radius * v.cos();
        [tube * u.cos(), tube * u.sin(), self.minor_radius * v.sin()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub radius: f64,
}

impl Sphere {
    #[must_use]
    pub const fn new(radius: f64) -> Self {
        Self { radius }
    }
}

impl Default for Sphere {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl SurfaceDefinition for Sphere {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Sphere
    }

    fn domain(&self) -> Domain {
        SurfaceKind::Sphere.default_domain()
    }

    // u is longitude, v is the polar angle measured from +z.
    fn point_at(&self, u: f64, v: f64) -> [f64; 3] {
        let ring = self.radius * v.sin();
        [ring * u.cos(), ring * u.sin(), self.radius * v.cos()]
    }
}
