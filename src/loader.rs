//! Tree loader - YAML and JSON persistence
//!
//! Trees are stored as nested plain records (see [`Node::to_plain_tree`]);
//! any format carrying nested maps and lists round-trips them.

use crate::error::TreeError;
use crate::tree::Node;
use std::fs;
use std::path::Path;

/// Loads and saves node trees
pub struct TreeLoader;

impl TreeLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a tree from a YAML file
    pub fn load_yaml<P: AsRef<Path>>(&self, path: P) -> Result<Node, TreeError> {
        let path = path.as_ref();
        log::debug!("Loading tree from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::parse_yaml(&content)
    }

    /// Write a tree to a YAML file
    pub fn save_yaml<P: AsRef<Path>>(&self, node: &Node, path: P) -> Result<(), TreeError> {
        let path = path.as_ref();
        log::debug!("Saving tree to {}", path.display());
        fs::write(path, Self::to_yaml(node)?)?;
        Ok(())
    }

    /// Parse a tree from a YAML string
    pub fn parse_yaml(content: &str) -> Result<Node, TreeError> {
        let record: serde_json::Value = serde_yaml::from_str(content)?;
        Node::from_plain_tree(&record)
    }

    /// Serialize a tree to a YAML string
    pub fn to_yaml(node: &Node) -> Result<String, TreeError> {
        Ok(serde_yaml::to_string(&node.to_plain_tree())?)
    }

    /// Parse a tree from a JSON string
    pub fn parse_json(content: &str) -> Result<Node, TreeError> {
        let record: serde_json::Value = serde_json::from_str(content)?;
        Node::from_plain_tree(&record)
    }

    /// Serialize a tree to pretty-printed JSON
    pub fn to_json(node: &Node) -> Result<String, TreeError> {
        Ok(serde_json::to_string_pretty(&node.to_plain_tree())?)
    }

    /// Load from a file, choosing JSON for a `.json` extension and YAML otherwise
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Node, TreeError> {
        let path = path.as_ref();
        if path.extension().is_some_and(|ext| ext == "json") {
            let content = fs::read_to_string(path)?;
            Self::parse_json(&content)
        } else {
            self.load_yaml(path)
        }
    }
}

impl Default for TreeLoader {
    fn default() -> Self {
        Self::new()
    }
}
