// SPDX-License-Identifier: MIT

//! Parsed form of a comparison expression

use crate::error::ExpressionError;
use std::str::FromStr;

/// A single `left op right` comparison
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub left: Operand,
    pub op: CompareOp,
    pub right: Operand,
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// <
    Lt,
    /// <=
    Lte,
    /// ==
    Eq,
    /// !=
    NotEq,
    /// >=
    Gte,
    /// >
    Gt,
}

/// One side of a comparison: a name with zero or more `[index]` suffixes.
///
/// `x[1][2]` has base `x` and indices `["1", "2"]`. A token that does not
/// look like `name[...]` keeps its full text as the base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operand {
    pub base: String,
    pub indices: Vec<String>,
}

impl Operand {
    /// A bare operand with no index suffix
    pub fn bare(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            indices: vec![],
        }
    }

    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }
}

impl FromStr for CompareOp {
    type Err = ExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "<" => Ok(CompareOp::Lt),
            "<=" => Ok(CompareOp::Lte),
            "==" => Ok(CompareOp::Eq),
            "!=" => Ok(CompareOp::NotEq),
            ">=" => Ok(CompareOp::Gte),
            ">" => Ok(CompareOp::Gt),
            other => Err(ExpressionError::UnknownOperator(other.to_string())),
        }
    }
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Lte => write!(f, "<="),
            CompareOp::Eq => write!(f, "=="),
            CompareOp::NotEq => write!(f, "!="),
            CompareOp::Gte => write!(f, ">="),
            CompareOp::Gt => write!(f, ">"),
        }
    }
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.base)?;
        for index in &self.indices {
            write!(f, "[{}]", index)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.left, self.op, self.right)
    }
}
