// SPDX-License-Identifier: MIT

//! Typed error handling for supernodes
//!
//! Structural validation failures (duplicate sibling names, mismatched
//! field lists, unknown record keys) never leave a tree partially modified.

use thiserror::Error;

/// Top-level error type for supernodes
#[derive(Debug, Error)]
pub enum TreeError {
    /// Two children of the same parent would share a name
    #[error("Two children of the same node cannot have the same name: {0}")]
    DuplicateName(String),

    /// A per-child field list does not match the requested child count
    #[error("Length of `{field}` is {actual}, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A serialized record carries a key that is not a node field
    #[error("'{0}' is not a field of a node")]
    UnknownField(String),

    /// A serialized record has the wrong shape
    #[error("Invalid node record: {0}")]
    InvalidRecord(String),

    /// Column missing from a table
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Expression parsing or evaluation errors
    #[error("Expression error: {0}")]
    Expression(#[from] ExpressionError),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors raised while parsing or evaluating a comparison expression
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    /// Expression did not split into `left op right`
    #[error("Splitting '{expression}' resulted in {parts} parts instead of 3 parts")]
    Malformed { expression: String, parts: usize },

    /// Operator token is not one of `<`, `<=`, `==`, `!=`, `>=`, `>`
    #[error("Unknown comparison operator: {0}")]
    UnknownOperator(String),

    /// List or string index past either end
    #[error("Index {index} out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    /// Map lookup with a missing key
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// Indexing applied to a scalar
    #[error("Value is not indexable: {0}")]
    NotIndexable(String),

    /// Index of the wrong type for the indexed value
    #[error("Invalid index {0}")]
    InvalidIndex(String),

    /// Ordering operator applied to values without an ordering
    #[error("Cannot compare {left} {op} {right}")]
    Incomparable {
        left: String,
        op: String,
        right: String,
    },
}

impl TreeError {
    /// Create a duplicate-name error from a child name
    pub fn duplicate_name(name: &serde_json::Value) -> Self {
        Self::DuplicateName(crate::tree::display_value(name))
    }

    /// Create an invalid-record error
    pub fn invalid_record(message: impl Into<String>) -> Self {
        Self::InvalidRecord(message.into())
    }
}
