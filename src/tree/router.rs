// SPDX-License-Identifier: MIT

//! Decision routing over a node tree
//!
//! Starting at a node, its function is evaluated against the bindings and
//! the child named by the matching branch becomes the next node. Routing
//! stops at the first node with no function, or whose outcome names no
//! existing child, and returns that node.

use super::function::is_truthy;
use super::node::Node;
use crate::condition::Bindings;
use crate::error::TreeError;
use serde_json::Value;

/// Which branch a function output selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Truthy output
    True,
    /// Output exactly `false`
    False,
    /// Any other falsy output; routing stops
    Undecided,
}

impl From<&Value> for Outcome {
    fn from(output: &Value) -> Self {
        if is_truthy(output) {
            Outcome::True
        } else if *output == Value::Bool(false) {
            Outcome::False
        } else {
            Outcome::Undecided
        }
    }
}

impl Node {
    /// Run the tree as a binary decision tree from this node.
    ///
    /// Only evaluation errors propagate; running out of route is not an
    /// error and yields the node where routing stopped.
    pub fn route(&self, bindings: &Bindings) -> Result<&Node, TreeError> {
        let mut current = self;
        loop {
            match current.next_hop(bindings)? {
                Some(next) => current = next,
                None => return Ok(current),
            }
        }
    }

    /// Evaluate this node's function and pick the child to move to
    pub fn next_hop(&self, bindings: &Bindings) -> Result<Option<&Node>, TreeError> {
        let Some(function) = &self.function else {
            return Ok(None);
        };

        let output = function.call(bindings)?;
        let branch = match Outcome::from(&output) {
            Outcome::True => self.true_branch_name.as_ref(),
            Outcome::False => self.false_branch_name.as_ref(),
            Outcome::Undecided => None,
        };

        let next = branch.and_then(|name| self.get_child(name.clone()));
        log::debug!(
            "Node {} evaluated {} -> {}",
            super::display_value(self.name.as_ref().unwrap_or(&Value::Null)),
            output,
            next.and_then(|n| n.name.as_ref())
                .map(super::display_value)
                .unwrap_or_else(|| "stop".to_string())
        );
        Ok(next)
    }
}
