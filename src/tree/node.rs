// SPDX-License-Identifier: MIT

//! The tree node and its child management
//!
//! A node owns its children outright; there are no parent links. Children
//! are kept in insertion order and looked up by name with a linear scan.

use super::function::NodeFunction;
use crate::condition::values_equal;
use crate::error::TreeError;
use serde_json::{Map, Value};

/// A tree node carrying a name, a payload, an id and extra attributes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    /// Unique among direct siblings when set; `Some(null)` counts as unset
    pub name: Option<Value>,
    /// Payload, opaque to the tree
    pub value: Value,
    /// Meant to be unique across the whole tree; not enforced.
    /// `Some(null)` counts as unset
    pub id: Option<Value>,
    /// Additional named fields
    pub attributes: Map<String, Value>,
    /// Routing function used by [`Node::route`]
    pub function: Option<NodeFunction>,
    /// Child to route to when `function` is true
    pub true_branch_name: Option<Value>,
    /// Child to route to when `function` is false
    pub false_branch_name: Option<Value>,
    children: Vec<Node>,
}

/// Anything that can be attached as a child.
///
/// Raw values are wrapped in a new node whose `value` is that raw value.
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Node(Node),
    Value(Value),
}

impl From<Node> for Child {
    fn from(node: Node) -> Self {
        Child::Node(node)
    }
}

impl From<Value> for Child {
    fn from(value: Value) -> Self {
        Child::Value(value)
    }
}

macro_rules! child_from_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Child {
                fn from(value: $t) -> Self {
                    Child::Value(Value::from(value))
                }
            }
        )*
    };
}

child_from_scalar!(&str, String, i32, i64, u64, f64, bool);

/// Coerce a child argument into a node
pub fn wrap_as_node(child: impl Into<Child>) -> Node {
    match child.into() {
        Child::Node(node) => node,
        Child::Value(value) => Node::from_value(value),
    }
}

impl From<Child> for Node {
    fn from(child: Child) -> Self {
        wrap_as_node(child)
    }
}

/// `None` for JSON null, otherwise the value
pub(crate) fn non_null(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        other => Some(other),
    }
}

impl Node {
    /// Create an empty node
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node with a name
    pub fn named(name: impl Into<Value>) -> Self {
        Self {
            name: non_null(name.into()),
            ..Self::default()
        }
    }

    /// Create an unnamed node holding a payload
    pub fn from_value(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<Value>) -> Self {
        self.name = non_null(name.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_id(mut self, id: impl Into<Value>) -> Self {
        self.id = non_null(id.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_function(mut self, function: NodeFunction) -> Self {
        self.function = Some(function);
        self
    }

    /// Attach a comparison expression as the routing function
    pub fn with_expression(self, expression: &str) -> Result<Self, TreeError> {
        Ok(self.with_function(NodeFunction::expression(expression)?))
    }

    /// Name the children to follow when the function is true / false
    pub fn with_branches(
        mut self,
        true_branch_name: impl Into<Value>,
        false_branch_name: impl Into<Value>,
    ) -> Self {
        self.true_branch_name = non_null(true_branch_name.into());
        self.false_branch_name = non_null(false_branch_name.into());
        self
    }

    /// Builder-style [`Node::append`]
    pub fn with_child(mut self, child: impl Into<Child>) -> Result<Self, TreeError> {
        self.append(child)?;
        Ok(self)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Direct children in order
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Renaming children through this can break sibling-name uniqueness
    pub(crate) fn children_mut(&mut self) -> &mut [Node] {
        &mut self.children
    }

    /// Names of the direct children that have one, in child order
    pub fn child_names(&self) -> Vec<&Value> {
        self.children.iter().filter_map(Node::name_key).collect()
    }

    /// The name, with a stored `Some(null)` read as no name
    pub fn name_key(&self) -> Option<&Value> {
        self.name.as_ref().filter(|name| !name.is_null())
    }

    /// The id, with a stored `Some(null)` read as no id
    pub fn id_key(&self) -> Option<&Value> {
        self.id.as_ref().filter(|id| !id.is_null())
    }

    /// First direct child with the given name
    pub fn get_child(&self, name: impl Into<Value>) -> Option<&Node> {
        let name = name.into();
        self.children.iter().find(|child| name_matches(child, &name))
    }

    /// Mutable access to the first direct child with the given name
    pub fn get_child_mut(&mut self, name: impl Into<Value>) -> Option<&mut Node> {
        let name = name.into();
        self.children
            .iter_mut()
            .find(|child| name_matches(child, &name))
    }

    /// Add a child at the end.
    ///
    /// Fails with [`TreeError::DuplicateName`] when a sibling already has
    /// the child's name; the children are then left untouched.
    pub fn append(&mut self, child: impl Into<Child>) -> Result<&mut Node, TreeError> {
        let node = wrap_as_node(child);
        self.ensure_unique(&node)?;
        self.children.push(node);
        let last = self.children.len() - 1;
        Ok(&mut self.children[last])
    }

    /// Add a child before `index`.
    ///
    /// Negative indices count from the end; out-of-range indices clamp to
    /// the front or the back.
    pub fn insert(&mut self, index: isize, child: impl Into<Child>) -> Result<&mut Node, TreeError> {
        let node = wrap_as_node(child);
        self.ensure_unique(&node)?;
        let pos = clamp_index(index, self.children.len());
        self.children.insert(pos, node);
        Ok(&mut self.children[pos])
    }

    /// Upsert a child under `name`, replacing any child already using it
    pub fn set_child(&mut self, name: impl Into<Value>, child: impl Into<Child>) -> &mut Node {
        let name = name.into();
        if let Some(pos) = self.children.iter().position(|c| name_matches(c, &name)) {
            log::debug!("Replacing child {}", super::display_value(&name));
            self.children.remove(pos);
        }
        let mut node = wrap_as_node(child);
        node.name = non_null(name);
        self.children.push(node);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Detach and return the first child with the given name
    pub fn remove_child(&mut self, name: impl Into<Value>) -> Option<Node> {
        let name = name.into();
        let pos = self.children.iter().position(|c| name_matches(c, &name))?;
        Some(self.children.remove(pos))
    }

    /// Remove every child and return them in order
    pub fn take_children(&mut self) -> Vec<Node> {
        std::mem::take(&mut self.children)
    }

    pub(crate) fn ensure_unique(&self, node: &Node) -> Result<(), TreeError> {
        if let Some(name) = node.name_key() {
            if self.child_names().iter().any(|n| values_equal(n, name)) {
                return Err(TreeError::duplicate_name(name));
            }
        }
        Ok(())
    }

    /// Append nodes already checked for unique names
    pub(crate) fn extend_unchecked(&mut self, nodes: Vec<Node>) {
        self.children.extend(nodes);
    }
}

/// A `null` lookup matches an unnamed child
fn name_matches(child: &Node, name: &Value) -> bool {
    match (child.name_key(), name) {
        (None, Value::Null) => true,
        (Some(child_name), name) => values_equal(child_name, name),
        (None, _) => false,
    }
}

fn clamp_index(index: isize, len: usize) -> usize {
    if index < 0 {
        let from_end = len as isize + index;
        from_end.max(0) as usize
    } else {
        (index as usize).min(len)
    }
}
