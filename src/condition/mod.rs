// SPDX-License-Identifier: MIT

//! Condition evaluation for decision trees
//!
//! A condition is a single comparison of exactly three tokens:
//! - `x == 10`
//! - `y != 9.01`
//! - `x[0] > x[1]`
//!
//! Operands are looked up in the runtime [`Bindings`]; unbound operands are
//! literals, optionally coerced to numbers.

mod ast;
mod bindings;
mod evaluator;
mod parser;

pub use ast::{CompareOp, Comparison, Operand};
pub use bindings::Bindings;
pub use evaluator::{coerce_literal, compare, evaluate, resolve};
pub use parser::parse;

pub(crate) use evaluator::values_equal;

use crate::error::ExpressionError;

/// A parsed comparison ready to be evaluated repeatedly
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    source: String,
    comparison: Comparison,
    coerce_numbers: bool,
}

impl Condition {
    /// Parse a condition with numeric coercion enabled
    pub fn new(expression: &str) -> Result<Self, ExpressionError> {
        Self::with_coercion(expression, true)
    }

    /// Parse a condition, choosing whether literal operands are coerced to numbers
    pub fn with_coercion(expression: &str, coerce_numbers: bool) -> Result<Self, ExpressionError> {
        let comparison = parse(expression)?;
        Ok(Self {
            source: expression.to_string(),
            comparison,
            coerce_numbers,
        })
    }

    /// Evaluate against runtime bindings
    pub fn evaluate(&self, bindings: &Bindings) -> Result<bool, ExpressionError> {
        evaluate(&self.comparison, bindings, self.coerce_numbers)
    }

    /// The expression text this condition was parsed from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn comparison(&self) -> &Comparison {
        &self.comparison
    }

    pub fn coerce_numbers(&self) -> bool {
        self.coerce_numbers
    }
}

impl std::str::FromStr for Condition {
    type Err = ExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Condition::new(s)
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}
