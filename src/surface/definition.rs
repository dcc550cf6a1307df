//! The common generation contract and the two user-defined surface shapes.

use thiserror::Error;

use super::builtin::{KleinBottle, MobiusStrip, Sphere, Torus};
use super::request::ValidatedRequest;
use super::{Domain, SurfaceKind};
use crate::expr::{CompiledExpression, ExpressionCompiler, ParseError};
use crate::grid::{Grid, ShapeMismatch};

/// Anything that maps a rectangular parameter domain to points in space.
pub trait SurfaceDefinition {
    fn kind(&self) -> SurfaceKind;

    fn domain(&self) -> Domain;

    fn point_at(&self, u: f64, v: f64) -> [f64; 3];

    #[must_use]
    fn title(&self) -> &'static str {
        self.kind().title()
    }

    /// Evaluates the surface over two equal-shaped parameter grids and returns
    /// the X, Y and Z grids.
    fn evaluate(&self, u: &Grid, v: &Grid) -> Result<[Grid; 3], ShapeMismatch> {
        if u.shape() != v.shape() {
            return Err(ShapeMismatch::new(u.shape(), v.shape()));
        }
        let points: Vec<[f64; 3]> = u
            .values()
            .iter()
            .zip(v.values())
            .map(|(u, v)| self.point_at(*u, *v))
            .collect();
        let (rows, columns) = u.shape();
        let axis = |k: usize| Grid::from_fn(rows, columns, |row, column| points[row * columns + column][k]);
        Ok([axis(0), axis(1), axis(2)])
    }
}

/// An expression failed to compile; `label` names the input field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {label} expression: {source}")]
pub struct ExpressionError {
    pub label: &'static str,
    pub source: ParseError,
}

fn compile_labeled(
    compiler: &ExpressionCompiler,
    kind: SurfaceKind,
    expressions: &[String],
    index: usize,
) -> Result<CompiledExpression, ExpressionError> {
    let label = kind.expression_labels().get(index).copied().unwrap_or("surface");
    let (first, second) = kind.variables();
    let source = expressions.get(index).map_or("", String::as_str);
    compiler
        .compile(source, first, second)
        .map_err(|source| ExpressionError { label, source })
}

/// `x(u,v)`, `y(u,v)`, `z(u,v)` typed by the user.
#[derive(Debug)]
pub struct ParametricSurface {
    x: CompiledExpression,
    y: CompiledExpression,
    z: CompiledExpression,
    domain: Domain,
}

impl ParametricSurface {
    /// Compiles the three components from `[x, y, z]`.
    pub fn compile(
        compiler: &ExpressionCompiler,
        expressions: &[String],
        domain: Domain,
    ) -> Result<Self, ExpressionError> {
        let kind = SurfaceKind::Parametric;
        Ok(Self {
            x: compile_labeled(compiler, kind, expressions, 0)?,
            y: compile_labeled(compiler, kind, expressions, 1)?,
            z: compile_labeled(compiler, kind, expressions, 2)?,
            domain,
        })
    }

    #[must_use]
    pub fn sources(&self) -> [&str; 3] {
        [self.x.source(), self.y.source(), self.z.source()]
    }
}

impl SurfaceDefinition for ParametricSurface {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Parametric
    }

    fn domain(&self) -> Domain {
        self.domain
    }

    fn point_at(&self, u: f64, v: f64) -> [f64; 3] {
        [self.x.eval(u, v), self.y.eval(u, v), self.z.eval(u, v)]
    }

    fn evaluate(&self, u: &Grid, v: &Grid) -> Result<[Grid; 3], ShapeMismatch> {
        Ok([
            self.x.evaluate(u, v)?,
            self.y.evaluate(u, v)?,
            self.z.evaluate(u, v)?,
        ])
    }
}

/// A height field `z(x,y)`; X and Y are the sampling grids themselves.
#[derive(Debug)]
pub struct ExplicitSurface {
    z: CompiledExpression,
    domain: Domain,
}

impl ExplicitSurface {
    pub fn compile(
        compiler: &ExpressionCompiler,
        expressions: &[String],
        domain: Domain,
    ) -> Result<Self, ExpressionError> {
        Ok(Self {
            z: compile_labeled(compiler, SurfaceKind::Explicit, expressions, 0)?,
            domain,
        })
    }

    #[must_use]
    pub fn source(&self) -> &str {
        self.z.source()
    }
}

impl SurfaceDefinition for ExplicitSurface {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Explicit
    }

    fn domain(&self) -> Domain {
        self.domain
    }

    fn point_at(&self, x: f64, y: f64) -> [f64; 3] {
        [x, y, self.z.eval(x, y)]
    }

    fn evaluate(&self, x: &Grid, y: &Grid) -> Result<[Grid; 3], ShapeMismatch> {
        let z = self.z.evaluate(x, y)?;
        Ok([x.clone(), y.clone(), z])
    }
}

/// Turns a validated request into something the sampler can evaluate.
pub fn build_definition(
    request: &ValidatedRequest,
    compiler: &ExpressionCompiler,
) -> Result<Box<dyn SurfaceDefinition>, ExpressionError> {
    let definition: Box<dyn SurfaceDefinition> = match request.kind {
        SurfaceKind::MobiusStrip => Box::new(MobiusStrip),
        SurfaceKind::KleinBottle => Box::new(KleinBottle),
        SurfaceKind::Torus => Box::new(Torus::new(request.param("R"), request.param("r"))),
        SurfaceKind::Sphere => Box::new(Sphere::new(request.param("r"))),
        SurfaceKind::Parametric => Box::new(ParametricSurface::compile(
            compiler,
            &request.expressions,
            request.domain,
        )?),
        SurfaceKind::Explicit => Box::new(ExplicitSurface::compile(
            compiler,
            &request.expressions,
            request.domain,
        )?),
    };
    log::debug!("built {} definition", request.kind.id());
    Ok(definition)
}
