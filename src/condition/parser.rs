//! Comparison expression parser
//!
//! Parses expressions of exactly three whitespace-separated tokens:
//! - `x == 10`
//! - `score >= 7.5`
//! - `x[0] > x[1]`

use super::ast::{CompareOp, Comparison, Operand};
use crate::error::ExpressionError;

/// Parse a comparison expression string
pub fn parse(input: &str) -> Result<Comparison, ExpressionError> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    if tokens.len() != 3 {
        return Err(ExpressionError::Malformed {
            expression: input.to_string(),
            parts: tokens.len(),
        });
    }

    let op: CompareOp = tokens[1].parse()?;
    Ok(Comparison {
        left: parse_operand(tokens[0]),
        op,
        right: parse_operand(tokens[2]),
    })
}

/// Split `name[i][j]` into its base and index texts.
///
/// Anything that is not a word followed only by balanced, non-empty
/// bracket groups is kept whole as a bare operand.
pub(crate) fn parse_operand(token: &str) -> Operand {
    let Some(open) = token.find('[') else {
        return Operand::bare(token);
    };

    let base = &token[..open];
    if base.is_empty() || !base.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Operand::bare(token);
    }

    let mut indices = Vec::new();
    let mut depth = 0usize;
    let mut start = open;
    for (offset, c) in token[open..].char_indices() {
        let i = open + offset;
        match c {
            '[' => {
                if depth == 0 {
                    start = i + 1;
                }
                depth += 1;
            }
            ']' => {
                if depth == 0 {
                    return Operand::bare(token);
                }
                depth -= 1;
                if depth == 0 {
                    let index = &token[start..i];
                    if index.is_empty() {
                        return Operand::bare(token);
                    }
                    indices.push(index.to_string());
                }
            }
            // Text between or after bracket groups
            _ if depth == 0 => return Operand::bare(token),
            _ => {}
        }
    }

    if depth != 0 {
        return Operand::bare(token);
    }

    Operand {
        base: base.to_string(),
        indices,
    }
}
