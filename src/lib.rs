// SPDX-License-Identifier: MIT

//! Trees of nodes with uniquely named children and expression-driven
//! decision routing.
//!
//! ```
//! use supernodes::{Bindings, Node};
//!
//! let mut root = Node::named("root")
//!     .with_expression("x > 10")
//!     .unwrap()
//!     .with_branches("big", "small");
//! root.set_child("big", 1);
//! root.set_child("small", 0);
//!
//! let leaf = root.route(&Bindings::new().with("x", 11)).unwrap();
//! assert_eq!(leaf.value, 1);
//! ```

pub mod condition;
pub mod error;
pub mod loader;
pub mod table;
pub mod tree;

pub use condition::{Bindings, CompareOp, Condition};
pub use error::{ExpressionError, TreeError};
pub use loader::TreeLoader;
pub use table::Table;
pub use tree::{Child, Node, NodeFunction, NodeQuery, Outcome, Split};
