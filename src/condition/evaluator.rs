//! Comparison evaluator

use super::ast::{CompareOp, Comparison, Operand};
use super::bindings::Bindings;
use crate::error::ExpressionError;
use crate::tree::display_value;
use serde_json::{Number, Value};
use std::cmp::Ordering;

/// Evaluate a comparison against runtime bindings
pub fn evaluate(
    cmp: &Comparison,
    bindings: &Bindings,
    coerce_numbers: bool,
) -> Result<bool, ExpressionError> {
    let left = resolve(&cmp.left, bindings, coerce_numbers)?;
    let right = resolve(&cmp.right, bindings, coerce_numbers)?;
    compare(&left, cmp.op, &right)
}

/// Turn an operand into a concrete value.
///
/// A base that names a binding is replaced by the bound value as-is.
/// Otherwise the base is a literal, numerically coerced when enabled.
/// Index suffixes are then applied left to right; index text is always
/// coerced, so `x[0]` works with coercion off.
pub fn resolve(
    operand: &Operand,
    bindings: &Bindings,
    coerce_numbers: bool,
) -> Result<Value, ExpressionError> {
    let mut value = match bindings.get(&operand.base) {
        Some(bound) => bound.clone(),
        None => literal(&operand.base, coerce_numbers),
    };

    for index in &operand.indices {
        let index = coerce_literal(index);
        value = apply_index(&value, &index)?;
    }
    Ok(value)
}

fn literal(text: &str, coerce_numbers: bool) -> Value {
    if coerce_numbers {
        coerce_literal(text)
    } else {
        Value::String(text.to_string())
    }
}

/// Numeric coercion of a literal token.
///
/// Only digit-only text becomes an integer, so `-10` is not an integer
/// here and goes through the float path instead. Anything that does not
/// parse as a float stays a string.
pub fn coerce_literal(text: &str) -> Value {
    if is_int(text) {
        if let Ok(i) = text.parse::<i64>() {
            return Value::from(i);
        }
        if let Ok(u) = text.parse::<u64>() {
            return Value::from(u);
        }
    }
    if let Ok(f) = text.parse::<f64>() {
        if let Some(n) = Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    Value::String(text.to_string())
}

fn is_int(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

fn apply_index(value: &Value, index: &Value) -> Result<Value, ExpressionError> {
    match value {
        Value::Array(items) => {
            let pos = position(index, items.len())?;
            Ok(items[pos].clone())
        }
        Value::String(s) => {
            let chars: Vec<char> = s.chars().collect();
            let pos = position(index, chars.len())?;
            Ok(Value::String(chars[pos].to_string()))
        }
        Value::Object(map) => {
            let key = display_value(index);
            map.get(&key)
                .cloned()
                .ok_or(ExpressionError::KeyNotFound(key))
        }
        other => Err(ExpressionError::NotIndexable(other.to_string())),
    }
}

/// Sequence position for an integral index; negative counts from the end.
///
/// Whole floats are accepted since `-1` only ever coerces to a float.
fn position(index: &Value, len: usize) -> Result<usize, ExpressionError> {
    let i = index
        .as_i64()
        .or_else(|| {
            index
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        })
        .ok_or_else(|| ExpressionError::InvalidIndex(index.to_string()))?;
    let pos = if i < 0 { i + len as i64 } else { i };
    if pos < 0 || pos >= len as i64 {
        return Err(ExpressionError::IndexOutOfRange { index: i, len });
    }
    Ok(pos as usize)
}

/// Apply a comparison operator to two resolved values
pub fn compare(left: &Value, op: CompareOp, right: &Value) -> Result<bool, ExpressionError> {
    let ordering = || {
        order(left, right).ok_or_else(|| ExpressionError::Incomparable {
            left: left.to_string(),
            op: op.to_string(),
            right: right.to_string(),
        })
    };

    match op {
        CompareOp::Eq => Ok(values_equal(left, right)),
        CompareOp::NotEq => Ok(!values_equal(left, right)),
        CompareOp::Lt => Ok(ordering()? == Ordering::Less),
        CompareOp::Lte => Ok(ordering()? != Ordering::Greater),
        CompareOp::Gte => Ok(ordering()? != Ordering::Less),
        CompareOp::Gt => Ok(ordering()? == Ordering::Greater),
    }
}

#[derive(Clone, Copy)]
enum Num {
    Int(i128),
    Float(f64),
}

impl Num {
    fn to_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(f) => f,
        }
    }
}

fn as_num(value: &Value) -> Option<Num> {
    match value {
        Value::Bool(b) => Some(Num::Int(*b as i128)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Num::Int(i as i128))
            } else if let Some(u) = n.as_u64() {
                Some(Num::Int(u as i128))
            } else {
                n.as_f64().map(Num::Float)
            }
        }
        _ => None,
    }
}

fn num_order(a: Num, b: Num) -> Option<Ordering> {
    match (a, b) {
        (Num::Int(a), Num::Int(b)) => Some(a.cmp(&b)),
        (a, b) => a.to_f64().partial_cmp(&b.to_f64()),
    }
}

/// Equality across value kinds; numbers (and booleans) compare numerically
pub(crate) fn values_equal(left: &Value, right: &Value) -> bool {
    if let (Some(a), Some(b)) = (as_num(left), as_num(right)) {
        return num_order(a, b) == Some(Ordering::Equal);
    }
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(k, v)| b.get(k).map(|w| values_equal(v, w)).unwrap_or(false))
        }
        _ => false,
    }
}

/// Ordering for numbers, strings and lists of orderable values
fn order(left: &Value, right: &Value) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (as_num(left), as_num(right)) {
        return num_order(a, b);
    }
    match (left, right) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Array(a), Value::Array(b)) => {
            for (x, y) in a.iter().zip(b) {
                if !values_equal(x, y) {
                    return order(x, y);
                }
            }
            Some(a.len().cmp(&b.len()))
        }
        _ => None,
    }
}
