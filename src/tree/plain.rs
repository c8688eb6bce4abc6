// SPDX-License-Identifier: MIT

//! Conversion between nodes and plain nested maps
//!
//! A plain record holds every core field by key plus `children`, a list of
//! nested records. Records are format-agnostic; YAML and JSON both carry
//! them.

use super::function::NodeFunction;
use super::node::{non_null, Node};
use super::query::NODE_FIELDS;
use crate::error::TreeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

impl Node {
    /// Serialize this node and its subtree to a nested map
    pub fn to_plain_tree(&self) -> Value {
        let or_null = |v: &Option<Value>| v.clone().unwrap_or(Value::Null);

        let function = match &self.function {
            Some(f) => f.to_plain().unwrap_or_else(|| {
                log::warn!(
                    "Native function on node {} cannot be serialized, writing null",
                    super::display_value(&or_null(&self.name))
                );
                Value::Null
            }),
            None => Value::Null,
        };

        let mut record = Map::new();
        record.insert("name".to_string(), or_null(&self.name));
        record.insert("value".to_string(), self.value.clone());
        record.insert("id".to_string(), or_null(&self.id));
        record.insert(
            "attributes".to_string(),
            Value::Object(self.attributes.clone()),
        );
        record.insert("function".to_string(), function);
        record.insert(
            "true_branch_name".to_string(),
            or_null(&self.true_branch_name),
        );
        record.insert(
            "false_branch_name".to_string(),
            or_null(&self.false_branch_name),
        );
        record.insert(
            "children".to_string(),
            Value::Array(self.children().iter().map(Node::to_plain_tree).collect()),
        );
        Value::Object(record)
    }

    /// Rebuild a node tree from a nested map.
    ///
    /// Missing keys take their defaults; a key that is not a node field is
    /// rejected with [`TreeError::UnknownField`].
    pub fn from_plain_tree(record: &Value) -> Result<Node, TreeError> {
        let map = record
            .as_object()
            .ok_or_else(|| TreeError::invalid_record(format!("expected a map, got {}", record)))?;

        if let Some(key) = map.keys().find(|k| !NODE_FIELDS.contains(&k.as_str())) {
            return Err(TreeError::UnknownField(key.clone()));
        }

        let get = |key: &str| map.get(key).cloned().unwrap_or(Value::Null);

        let mut node = Node::new();
        node.name = non_null(get("name"));
        node.value = get("value");
        node.id = non_null(get("id"));
        node.attributes = match get("attributes") {
            Value::Null => Map::new(),
            Value::Object(attributes) => attributes,
            other => {
                return Err(TreeError::invalid_record(format!(
                    "attributes must be a map, got {}",
                    other
                )))
            }
        };
        node.function = NodeFunction::from_plain(&get("function"))?;
        node.true_branch_name = non_null(get("true_branch_name"));
        node.false_branch_name = non_null(get("false_branch_name"));

        match map.get("children") {
            None | Some(Value::Null) => {}
            Some(Value::Array(children)) => {
                for child in children {
                    node.append(Node::from_plain_tree(child)?)?;
                }
            }
            Some(other) => {
                return Err(TreeError::invalid_record(format!(
                    "children must be a list, got {}",
                    other
                )))
            }
        }

        Ok(node)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_plain_tree().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = Value::deserialize(deserializer)?;
        Node::from_plain_tree(&record).map_err(serde::de::Error::custom)
    }
}
