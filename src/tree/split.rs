// SPDX-License-Identifier: MIT

//! Bulk creation of leaf children

use super::function::NodeFunction;
use super::node::{non_null, Node};
use crate::condition::values_equal;
use crate::error::TreeError;
use serde_json::{Map, Value};

/// Field lists for [`Node::split`].
///
/// Every list that is supplied must have exactly `count` entries.
#[derive(Debug, Clone)]
pub struct Split {
    count: usize,
    names: Option<Vec<Value>>,
    values: Option<Vec<Value>>,
    ids: Option<Vec<Value>>,
    functions: Option<Vec<Option<NodeFunction>>>,
    attributes: Option<Vec<Map<String, Value>>>,
}

impl Split {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            names: None,
            values: None,
            ids: None,
            functions: None,
            attributes: None,
        }
    }

    pub fn names<I, V>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn ids<I, V>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn functions(mut self, functions: Vec<Option<NodeFunction>>) -> Self {
        self.functions = Some(functions);
        self
    }

    pub fn attributes(mut self, attributes: Vec<Map<String, Value>>) -> Self {
        self.attributes = Some(attributes);
        self
    }

    fn check_lengths(&self) -> Result<(), TreeError> {
        let lengths = [
            ("names", self.names.as_ref().map(Vec::len)),
            ("values", self.values.as_ref().map(Vec::len)),
            ("ids", self.ids.as_ref().map(Vec::len)),
            ("functions", self.functions.as_ref().map(Vec::len)),
            ("attributes", self.attributes.as_ref().map(Vec::len)),
        ];
        for (field, len) in lengths {
            if let Some(actual) = len {
                if actual != self.count {
                    return Err(TreeError::LengthMismatch {
                        field,
                        expected: self.count,
                        actual,
                    });
                }
            }
        }
        Ok(())
    }

    fn into_nodes(self) -> Vec<Node> {
        let count = self.count;
        let mut names = column(self.names, count);
        let mut values = column(self.values, count);
        let mut ids = column(self.ids, count);
        let mut functions = column(self.functions, count);
        let mut attributes = column(self.attributes, count);

        (0..count)
            .map(|_| {
                let mut node = Node::new();
                node.name = names.next().and_then(non_null);
                node.value = values.next().unwrap_or_default();
                node.id = ids.next().and_then(non_null);
                node.attributes = attributes.next().unwrap_or_default();
                node.function = functions.next().flatten();
                node
            })
            .collect()
    }
}

/// Supplied entries, or defaults when the list was omitted
fn column<T: Default>(list: Option<Vec<T>>, count: usize) -> impl Iterator<Item = T> {
    let list = list.unwrap_or_else(|| (0..count).map(|_| T::default()).collect());
    list.into_iter()
}

impl Node {
    /// Create `count` leaf children in one call and return them.
    ///
    /// Nothing is appended if a list length is wrong or a name collides
    /// with an existing child or with another new child.
    pub fn split(&mut self, batch: Split) -> Result<&[Node], TreeError> {
        batch.check_lengths()?;
        let nodes = batch.into_nodes();

        let mut seen: Vec<&Value> = self.child_names();
        for node in &nodes {
            if let Some(name) = &node.name {
                if seen.iter().any(|n| values_equal(n, name)) {
                    return Err(TreeError::duplicate_name(name));
                }
                seen.push(name);
            }
        }

        let start = self.child_count();
        log::debug!("Splitting node into {} children", nodes.len());
        self.extend_unchecked(nodes);
        Ok(&self.children()[start..])
    }
}
