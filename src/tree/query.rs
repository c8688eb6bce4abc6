// SPDX-License-Identifier: MIT

//! Traversal and search over a node's descendants

use super::function::NodeFunction;
use super::node::{non_null, Node};
use crate::condition::values_equal;
use serde_json::{Map, Value};

/// Keys of the core node fields, in serialization order
pub const NODE_FIELDS: [&str; 8] = [
    "name",
    "value",
    "id",
    "attributes",
    "function",
    "true_branch_name",
    "false_branch_name",
    "children",
];

/// Depth-first, pre-order iterator over descendants (the start node excluded)
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

/// Criteria for [`Node::find_all`]; unset criteria match anything
#[derive(Debug, Clone, Default)]
pub struct NodeQuery {
    name: Option<Value>,
    value: Option<Value>,
    function: Option<NodeFunction>,
    attributes: Map<String, Value>,
}

impl NodeQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<Value>) -> Self {
        self.name = non_null(name.into());
        self
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = non_null(value.into());
        self
    }

    pub fn function(mut self, function: NodeFunction) -> Self {
        self.function = Some(function);
        self
    }

    /// Require an extra attribute to be present with this value
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn matches(&self, node: &Node) -> bool {
        if let Some(name) = &self.name {
            if !node.name_key().is_some_and(|n| values_equal(n, name)) {
                return false;
            }
        }
        if let Some(value) = &self.value {
            if !values_equal(&node.value, value) {
                return false;
            }
        }
        if let Some(function) = &self.function {
            if node.function.as_ref() != Some(function) {
                return false;
            }
        }
        self.attributes.iter().all(|(key, expected)| {
            node.attributes
                .get(key)
                .is_some_and(|actual| values_equal(actual, expected))
        })
    }
}

impl Node {
    /// Every descendant in depth-first pre-order, excluding `self`
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children().iter().rev().collect(),
        }
    }

    /// First descendant whose `id` equals `id`
    pub fn find_by_id(&self, id: impl Into<Value>) -> Option<&Node> {
        let id = id.into();
        self.descendants()
            .find(|node| node.id_key().is_some_and(|own| values_equal(own, &id)))
    }

    /// Every descendant matching all criteria of `query`, in pre-order
    pub fn find_all(&self, query: &NodeQuery) -> Vec<&Node> {
        self.descendants().filter(|node| query.matches(node)).collect()
    }

    /// Read a core field or an extra attribute by key.
    ///
    /// Core fields always resolve (unset ones to `null`); `children` and
    /// unknown keys do not.
    pub fn field(&self, key: &str) -> Option<Value> {
        let or_null = |v: &Option<Value>| v.clone().unwrap_or(Value::Null);
        match key {
            "name" => Some(or_null(&self.name)),
            "value" => Some(self.value.clone()),
            "id" => Some(or_null(&self.id)),
            "attributes" => Some(Value::Object(self.attributes.clone())),
            "function" => Some(
                self.function
                    .as_ref()
                    .map(|f| Value::String(f.to_string()))
                    .unwrap_or(Value::Null),
            ),
            "true_branch_name" => Some(or_null(&self.true_branch_name)),
            "false_branch_name" => Some(or_null(&self.false_branch_name)),
            "children" => None,
            other => self.attributes.get(other).cloned(),
        }
    }

    /// Core fields (children excluded) followed by the extra attributes
    pub fn fields(&self, include_null: bool) -> Map<String, Value> {
        let mut fields = Map::new();
        for key in NODE_FIELDS {
            if key == "attributes" || key == "children" {
                continue;
            }
            if let Some(value) = self.field(key) {
                fields.insert(key.to_string(), value);
            }
        }
        for (key, value) in &self.attributes {
            fields.insert(key.clone(), value.clone());
        }
        if !include_null {
            fields.retain(|_, v| !v.is_null());
        }
        fields
    }

    /// One row per leaf: the nodes on the path from `self` down to that leaf
    pub fn to_path_list(&self) -> Vec<Vec<&Node>> {
        let mut rows = Vec::new();
        let mut path = Vec::new();
        collect_paths(self, &mut path, &mut rows);
        rows
    }

    /// Like [`Node::to_path_list`], holding the chosen field of each node.
    ///
    /// A node without the field contributes `null`, so every row is as long
    /// as its path.
    pub fn to_attribute_path_list(&self, attribute: &str) -> Vec<Vec<Value>> {
        self.to_path_list()
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|node| node.field(attribute).unwrap_or(Value::Null))
                    .collect()
            })
            .collect()
    }
}

fn collect_paths<'a>(node: &'a Node, path: &mut Vec<&'a Node>, rows: &mut Vec<Vec<&'a Node>>) {
    path.push(node);
    if !node.has_children() {
        rows.push(path.clone());
    }
    for child in node.children() {
        collect_paths(child, path, rows);
    }
    path.pop();
}
