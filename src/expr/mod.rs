//! Compiles user-typed math into numeric functions of two variables.
//!
//! The grammar is deliberately small: numbers, the two declared variables,
//! `pi`/`e`, `+ - * / ^` and the single-argument functions in
//! [`allow_list::FUNCTIONS`]. Sources pass a lexical allow-list check
//! ([`scan`]) before meval parses them, and evaluation runs against a context
//! that contains the allow-list only. Numeric domain errors are not errors:
//! `log(-1)` is NaN and `1/0` is infinite, so a bad sample never aborts a
//! whole mesh.

pub mod allow_list;
mod scan;

use core::fmt;

use meval::{Context, ContextProvider, Expr};
use thiserror::Error;

use crate::grid::{Grid, ShapeMismatch};
use crate::suggest::hint;

pub const DEFAULT_MAX_LENGTH: usize = 512;
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Why an expression was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expression is empty")]
    Empty,
    #[error("expression is {length} characters long, the limit is {limit}")]
    TooLong { length: usize, limit: usize },
    #[error("parentheses nest deeper than {limit} levels at `{fragment}`")]
    TooDeep { limit: usize, fragment: String },
    #[error("character `{fragment}` at offset {offset} is not allowed in an expression")]
    DisallowedCharacter { fragment: String, offset: usize },
    #[error("unknown function `{name}`{}", hint(.suggestion))]
    UnknownFunction {
        name: String,
        suggestion: Option<String>,
    },
    #[error("unknown identifier `{name}`{}", hint(.suggestion))]
    UnknownIdentifier {
        name: String,
        suggestion: Option<String>,
    },
    #[error("function `{name}` must be called with parentheses")]
    MissingCall { name: String },
    #[error("function `{name}` takes exactly one argument, got {found}")]
    Arity { name: String, found: usize },
    #[error("invalid syntax at `{fragment}`: {reason}")]
    Syntax { fragment: String, reason: String },
    #[error("invalid variable names `{first}` and `{second}`")]
    InvalidVariables { first: String, second: String },
}

impl ParseError {
    /// The part of the source that caused the error.
    #[must_use]
    pub fn fragment(&self) -> &str {
        match self {
            Self::Empty | Self::TooLong { .. } => "",
            Self::TooDeep { fragment, .. }
            | Self::DisallowedCharacter { fragment, .. }
            | Self::Syntax { fragment, .. } => fragment,
            Self::UnknownFunction { name, .. }
            | Self::UnknownIdentifier { name, .. }
            | Self::MissingCall { name }
            | Self::Arity { name, .. } => name,
            Self::InvalidVariables { first, .. } => first,
        }
    }
}

/// Compiler with configurable input limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpressionCompiler {
    max_length: usize,
    max_depth: usize,
}

impl Default for ExpressionCompiler {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LENGTH, DEFAULT_MAX_DEPTH)
    }
}

impl ExpressionCompiler {
    #[must_use]
    pub const fn new(max_length: usize, max_depth: usize) -> Self {
        Self {
            max_length,
            max_depth,
        }
    }

    /// Compiles `source` as a function of `first` and `second`.
    pub fn compile(
        &self,
        source: &str,
        first: &str,
        second: &str,
    ) -> Result<CompiledExpression, ParseError> {
        validate_variables(first, second)?;

        let length = source.chars().count();
        if length > self.max_length {
            return Err(ParseError::TooLong {
                length,
                limit: self.max_length,
            });
        }

        let normalized = scan::normalize(source);
        if normalized.text.is_empty() {
            return Err(ParseError::Empty);
        }

        scan::validate(&normalized, first, second, self.max_depth)?;

        let normalized = normalized.text;
        let expr = normalized
            .parse::<Expr>()
            .map_err(|error| syntax_error(&normalized, &error))?;

        log::debug!("compiled `{normalized}` as f({first}, {second})");

        Ok(CompiledExpression {
            source: normalized,
            first: first.to_owned(),
            second: second.to_owned(),
            expr,
            context: allow_list::build_context(),
        })
    }
}

/// Compiles with the default limits.
pub fn compile(source: &str, first: &str, second: &str) -> Result<CompiledExpression, ParseError> {
    ExpressionCompiler::default().compile(source, first, second)
}

/// Quotes meval's failure from the token it stopped at when it reports one.
fn syntax_error(source: &str, error: &meval::Error) -> ParseError {
    let fragment = match error {
        meval::Error::ParseError(meval::ParseError::UnexpectedToken(offset)) => {
            scan::fragment_at(source, *offset)
        }
        _ => scan::fragment_at(source, 0),
    };
    ParseError::Syntax {
        fragment,
        reason: error.to_string(),
    }
}

fn validate_variables(first: &str, second: &str) -> Result<(), ParseError> {
    let acceptable = |name: &str| {
        is_identifier(name) && !allow_list::is_function(name) && !allow_list::is_constant(name)
    };
    if first == second || !acceptable(first) || !acceptable(second) {
        return Err(ParseError::InvalidVariables {
            first: first.to_owned(),
            second: second.to_owned(),
        });
    }
    Ok(())
}

fn is_identifier(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// A validated expression, ready to be evaluated element-wise.
pub struct CompiledExpression {
    source: String,
    first: String,
    second: String,
    expr: Expr,
    context: Context<'static>,
}

impl fmt::Debug for CompiledExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledExpression")
            .field("source", &self.source)
            .field("first", &self.first)
            .field("second", &self.second)
            .finish_non_exhaustive()
    }
}

impl CompiledExpression {
    /// The normalized source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn variables(&self) -> (&str, &str) {
        (&self.first, &self.second)
    }

    /// Evaluates at a single point.
    #[must_use]
    pub fn eval(&self, first: f64, second: f64) -> f64 {
        let bound = BoundVariables {
            first: &self.first,
            second: &self.second,
            values: (first, second),
        };
        // Every name was checked at compile time, so meval cannot fail on
        // lookups here; anything else it reports is treated as a NaN sample.
        self.expr
            .eval_with_context((&bound, &self.context))
            .unwrap_or(f64::NAN)
    }

    /// Evaluates over two equal-shaped grids.
    pub fn evaluate(&self, first: &Grid, second: &Grid) -> Result<Grid, ShapeMismatch> {
        first.zip_map(second, |a, b| self.eval(a, b))
    }
}

struct BoundVariables<'a> {
    first: &'a str,
    second: &'a str,
    values: (f64, f64),
}

impl ContextProvider for BoundVariables<'_> {
    fn get_var(&self, name: &str) -> Option<f64> {
        if name == self.first {
            Some(self.values.0)
        } else if name == self.second {
            Some(self.values.1)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_parametric_component() {
        let expr = compile("(1 + 0.5*cos(v))*cos(u)", "u", "v").expect("compiles");
        let value = expr.eval(0.0, 0.0);
        assert!((value - 1.5).abs() < 1e-12);
    }

    #[test]
    fn accepts_python_style_power() {
        let expr = compile("sin(sqrt(x**2 + y**2))", "x", "y").expect("compiles");
        assert_eq!(expr.source(), "sin(sqrt(x^2 + y^2))");
        let value = expr.eval(3.0, 4.0);
        assert!((value - 5.0_f64.sin()).abs() < 1e-12);
    }

    #[test]
    fn constants_are_available() {
        let expr = compile("pi + e", "u", "v").expect("compiles");
        let expected = std::f64::consts::PI + std::f64::consts::E;
        assert!((expr.eval(0.0, 0.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn constant_expression_broadcasts_over_grid() {
        let expr = compile("0.5", "u", "v").expect("compiles");
        let grid = Grid::filled(3, 4, 1.0);
        let out = expr.evaluate(&grid, &grid).expect("same shape");
        assert_eq!(out.shape(), (3, 4));
        assert!(out.values().iter().all(|value| *value == 0.5));
    }

    #[test]
    fn rejects_injection_attempts() {
        for source in [
            "__import__('os').system('ls')",
            "open('/etc/passwd')",
            "u; v",
            "u = 1",
            "exec(u)",
            "u.__class__",
            "[u for u in v]",
            "lambda: 1",
        ] {
            let result = compile(source, "u", "v");
            assert!(result.is_err(), "`{source}` should be rejected");
        }
    }

    #[test]
    fn parse_errors_carry_offending_text() {
        let err = compile("open(u)", "u", "v").unwrap_err();
        assert_eq!(err.fragment(), "open");

        let err = compile("u; v", "u", "v").unwrap_err();
        assert_eq!(err.fragment(), ";");

        let err = compile("u == v", "u", "v").unwrap_err();
        assert_eq!(err.fragment(), "=");
    }

    #[test]
    fn suggests_close_function_names() {
        let err = compile("sinn(u)", "u", "v").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnknownFunction { ref suggestion, .. } if suggestion.as_deref() == Some("sin")
        ));
        assert!(err.to_string().contains("did you mean `sin`"));
    }

    #[test]
    fn rejects_foreign_variables() {
        let err = compile("x + y", "u", "v").unwrap_err();
        assert!(matches!(err, ParseError::UnknownIdentifier { ref name, .. } if name == "x"));
    }

    #[test]
    fn rejects_invalid_variable_names() {
        assert!(matches!(compile("u", "u", "u"), Err(ParseError::InvalidVariables { .. })));
        assert!(matches!(compile("u", "sin", "v"), Err(ParseError::InvalidVariables { .. })));
        assert!(matches!(compile("u", "u", "e"), Err(ParseError::InvalidVariables { .. })));
    }

    #[test]
    fn empty_and_oversized_sources_fail() {
        assert_eq!(compile("   ", "u", "v").unwrap_err(), ParseError::Empty);

        let compiler = ExpressionCompiler::new(8, 4);
        let err = compiler.compile("u + v + u + v", "u", "v").unwrap_err();
        assert_eq!(err, ParseError::TooLong { length: 13, limit: 8 });
    }

    #[test]
    fn malformed_syntax_is_a_parse_error() {
        let err = compile("u + * v", "u", "v").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));
        assert_eq!(err.fragment(), "* v");
    }

    #[test]
    fn accepts_every_literal_form() {
        for (source, expected) in [
            (".5", 0.5),
            ("0.5", 0.5),
            ("3.", 3.0),
            ("2E3", 2000.0),
            ("1e-3*u", 2e-3),
            ("-.25 + u", 1.75),
            ("(.5)^2", 0.25),
        ] {
            let expr = compile(source, "u", "v")
                .unwrap_or_else(|err| panic!("`{source}` should compile: {err}"));
            assert!((expr.eval(2.0, 0.0) - expected).abs() < 1e-12, "`{source}`");
        }
    }

    fn same_sample(actual: f64, expected: f64) -> bool {
        (actual.is_nan() && expected.is_nan()) || (actual - expected).abs() < 1e-12
    }

    #[test]
    fn accepts_every_allowed_function() {
        let (u, v) = (0.5, 1.25);
        for function in allow_list::FUNCTIONS {
            let source = format!("{}(u) + v", function.name);
            let expr = compile(&source, "u", "v")
                .unwrap_or_else(|err| panic!("`{source}` should compile: {err}"));
            let expected = function.apply(u) + v;
            assert!(same_sample(expr.eval(u, v), expected), "`{source}`");

            let nested = format!("{}(abs(v) - u) * u", function.name);
            let expr = compile(&nested, "u", "v")
                .unwrap_or_else(|err| panic!("`{nested}` should compile: {err}"));
            let expected = function.apply(v.abs() - u) * u;
            assert!(same_sample(expr.eval(u, v), expected), "`{nested}`");
        }

        for (name, value) in allow_list::CONSTANTS {
            let source = format!("{name} * u + v");
            let expr = compile(&source, "u", "v")
                .unwrap_or_else(|err| panic!("`{source}` should compile: {err}"));
            assert!((expr.eval(u, v) - (value * u + v)).abs() < 1e-12, "`{source}`");
        }
    }

    #[test]
    fn disallowed_character_offset_counts_from_input() {
        let err = compile("  u;v", "u", "v").unwrap_err();
        assert_eq!(err, ParseError::DisallowedCharacter { fragment: ";".to_owned(), offset: 3 });
    }

    #[test]
    fn domain_errors_become_non_finite_samples() {
        let log = compile("log(u)", "u", "v").expect("compiles");
        assert!(log.eval(-1.0, 0.0).is_nan());

        let reciprocal = compile("1/u", "u", "v").expect("compiles");
        assert!(reciprocal.eval(0.0, 0.0).is_infinite());

        let root = compile("sqrt(v)", "u", "v").expect("compiles");
        assert!(root.eval(0.0, -4.0).is_nan());
    }

    #[test]
    fn evaluate_rejects_mismatched_grids() {
        let expr = compile("u * v", "u", "v").expect("compiles");
        let a = Grid::filled(2, 2, 1.0);
        let b = Grid::filled(3, 2, 1.0);
        assert!(expr.evaluate(&a, &b).is_err());
    }
}
