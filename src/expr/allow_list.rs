//! The closed set of functions and constants an expression may reference.

use std::f64::consts::{E, PI};

use meval::Context;

/// A single-argument function callable from user expressions.
#[derive(Debug, Clone, Copy)]
pub struct AllowedFunction {
    pub name: &'static str,
    apply: fn(f64) -> f64,
}

impl AllowedFunction {
    const fn new(name: &'static str, apply: fn(f64) -> f64) -> Self {
        Self { name, apply }
    }

    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        (self.apply)(value)
    }
}

pub const FUNCTIONS: &[AllowedFunction] = &[
    AllowedFunction::new("sin", f64::sin),
    AllowedFunction::new("cos", f64::cos),
    AllowedFunction::new("tan", f64::tan),
    AllowedFunction::new("asin", f64::asin),
    AllowedFunction::new("acos", f64::acos),
    AllowedFunction::new("atan", f64::atan),
    AllowedFunction::new("sinh", f64::sinh),
    AllowedFunction::new("cosh", f64::cosh),
    AllowedFunction::new("tanh", f64::tanh),
    AllowedFunction::new("asinh", f64::asinh),
    AllowedFunction::new("acosh", f64::acosh),
    AllowedFunction::new("atanh", f64::atanh),
    AllowedFunction::new("exp", f64::exp),
    // `log` is the natural logarithm, as in most plotting front-ends.
    AllowedFunction::new("log", f64::ln),
    AllowedFunction::new("ln", f64::ln),
    AllowedFunction::new("sqrt", f64::sqrt),
    AllowedFunction::new("abs", f64::abs),
];

pub const CONSTANTS: &[(&str, f64)] = &[("pi", PI), ("e", E)];

#[must_use]
pub fn is_function(name: &str) -> bool {
    FUNCTIONS.iter().any(|function| function.name == name)
}

#[must_use]
pub fn is_constant(name: &str) -> bool {
    CONSTANTS.iter().any(|(constant, _)| *constant == name)
}

pub fn function_names() -> impl Iterator<Item = &'static str> {
    FUNCTIONS.iter().map(|function| function.name)
}

/// An evaluation context holding the allow-list and nothing else.
///
/// Starts from `Context::empty()` so none of meval's built-ins (`max`,
/// `floor`, `atan2`, ...) leak into user expressions.
pub(crate) fn build_context() -> Context<'static> {
    let mut context = Context::empty();
    for function in FUNCTIONS {
        let apply = function.apply;
        context.func(function.name, apply);
    }
    for (name, value) in CONSTANTS {
        context.var(*name, *value);
    }
    context
}
