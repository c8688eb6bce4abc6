// SPDX-License-Identifier: MIT

//! Functions attached to nodes for decision routing

use crate::condition::{Bindings, Condition};
use crate::error::TreeError;
use serde_json::{json, Value};
use std::sync::Arc;

/// Signature of a native routing function
pub type NativeFn = dyn Fn(&Bindings) -> Value + Send + Sync;

/// A node's routing function: a Rust closure or a parsed comparison.
///
/// The variant is fixed when the function is attached, so routing never
/// re-parses or type-checks it.
#[derive(Clone)]
pub enum NodeFunction {
    /// Closure over the runtime bindings; its output is judged by truthiness
    Native(Arc<NativeFn>),
    /// A `left op right` comparison
    Expression(Condition),
}

impl NodeFunction {
    /// Wrap a closure
    pub fn native<F>(f: F) -> Self
    where
        F: Fn(&Bindings) -> Value + Send + Sync + 'static,
    {
        NodeFunction::Native(Arc::new(f))
    }

    /// Parse an expression with numeric coercion enabled
    pub fn expression(expression: &str) -> Result<Self, TreeError> {
        Ok(NodeFunction::Expression(Condition::new(expression)?))
    }

    /// Call the function with the runtime bindings
    pub fn call(&self, bindings: &Bindings) -> Result<Value, TreeError> {
        match self {
            NodeFunction::Native(f) => Ok(f(bindings)),
            NodeFunction::Expression(cond) => Ok(Value::Bool(cond.evaluate(bindings)?)),
        }
    }

    /// Expression text, if this is an expression
    pub fn source(&self) -> Option<&str> {
        match self {
            NodeFunction::Native(_) => None,
            NodeFunction::Expression(cond) => Some(cond.source()),
        }
    }

    /// Plain form: the expression string, or `{expression, coerce_numbers}`
    /// when coercion is off. Native closures have no plain form.
    pub fn to_plain(&self) -> Option<Value> {
        match self {
            NodeFunction::Native(_) => None,
            NodeFunction::Expression(cond) if cond.coerce_numbers() => {
                Some(Value::String(cond.source().to_string()))
            }
            NodeFunction::Expression(cond) => Some(json!({
                "expression": cond.source(),
                "coerce_numbers": false,
            })),
        }
    }

    /// Inverse of [`NodeFunction::to_plain`]; `null` means no function
    pub fn from_plain(value: &Value) -> Result<Option<Self>, TreeError> {
        match value {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(NodeFunction::expression(s)?)),
            Value::Object(map) => {
                for key in map.keys() {
                    if key != "expression" && key != "coerce_numbers" {
                        return Err(TreeError::UnknownField(format!("function.{}", key)));
                    }
                }
                let source = map
                    .get("expression")
                    .and_then(Value::as_str)
                    .ok_or_else(|| TreeError::invalid_record("function.expression must be a string"))?;
                let coerce = match map.get("coerce_numbers") {
                    None | Some(Value::Null) => true,
                    Some(Value::Bool(b)) => *b,
                    Some(other) => {
                        return Err(TreeError::invalid_record(format!(
                            "function.coerce_numbers must be a boolean, got {}",
                            other
                        )))
                    }
                };
                Ok(Some(NodeFunction::Expression(Condition::with_coercion(
                    source, coerce,
                )?)))
            }
            other => Err(TreeError::invalid_record(format!(
                "function must be an expression string, got {}",
                other
            ))),
        }
    }
}

impl PartialEq for NodeFunction {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NodeFunction::Native(a), NodeFunction::Native(b)) => Arc::ptr_eq(a, b),
            (NodeFunction::Expression(a), NodeFunction::Expression(b)) => a == b,
            _ => false,
        }
    }
}

impl std::fmt::Debug for NodeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeFunction::Native(_) => write!(f, "Native(<fn>)"),
            NodeFunction::Expression(cond) => write!(f, "Expression({:?})", cond.source()),
        }
    }
}

impl std::fmt::Display for NodeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeFunction::Native(_) => write!(f, "<native fn>"),
            NodeFunction::Expression(cond) => write!(f, "{}", cond.source()),
        }
    }
}

impl From<Condition> for NodeFunction {
    fn from(cond: Condition) -> Self {
        NodeFunction::Expression(cond)
    }
}

impl TryFrom<&str> for NodeFunction {
    type Error = TreeError;

    fn try_from(expression: &str) -> Result<Self, Self::Error> {
        NodeFunction::expression(expression)
    }
}

/// Truthiness of a function output: null, false, zero and empty values are false
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
