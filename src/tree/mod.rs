// SPDX-License-Identifier: MIT

//! Named-child trees
//!
//! This module provides:
//! - `Node` - a tree node with a name, payload, id, extra attributes and
//!   owned children
//! - child management by name (append, insert, upsert, remove, split)
//! - depth-first search and root-to-leaf path lists
//! - plain nested-map serialization and ASCII rendering
//! - decision routing driven by each node's `NodeFunction`

mod function;
mod node;
mod plain;
mod query;
mod render;
mod router;
mod split;

pub use function::{NativeFn, NodeFunction};
pub use node::{wrap_as_node, Child, Node};
pub use query::{Descendants, NodeQuery, NODE_FIELDS};
pub use render::{display_value, type_name};
pub use router::Outcome;
pub use split::Split;
