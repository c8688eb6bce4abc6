//! ASCII rendering of a node and its subtree
//!
//! ```text
//! (name=root, value: int)
//! |__ (name=child-1)
//! |    |__ (name=grandchild)
//! |__ (name=child-2)
//! ```

use super::node::Node;
use serde_json::Value;
use std::fmt;

const PREVIEW_CHARS: usize = 20;

/// Text form of a value: strings unquoted, everything else as JSON
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Short type tag shown in place of a node's payload
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

/// Cut long or multi-line text down to a one-line preview
fn short(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS && !text.contains('\n') {
        return text.to_string();
    }
    let mut preview: String = text
        .trim()
        .chars()
        .take(PREVIEW_CHARS)
        .take_while(|c| *c != '\n')
        .collect();
    preview.push_str(" ...");
    preview
}

impl Node {
    /// One-line summary of the non-null fields of this node
    pub fn summary(&self) -> String {
        let parts: Vec<String> = self
            .fields(false)
            .iter()
            .map(|(key, value)| {
                if key == "value" {
                    format!("value: {}", type_name(value))
                } else {
                    format!("{}={}", key, short(&display_value(value)))
                }
            })
            .collect();
        format!("({})", parts.join(", "))
    }

    /// Render this node and its subtree as an ASCII tree
    pub fn render(&self) -> String {
        let mut out = self.summary();
        let count = self.child_count();
        for (i, child) in self.children().iter().enumerate() {
            let rendered = child.render();
            let mut lines = rendered.lines();
            out.push_str("\n|__ ");
            out.push_str(lines.next().unwrap_or_default());

            let lead = if i + 1 < count { "|    " } else { "     " };
            for line in lines {
                out.push('\n');
                out.push_str(lead);
                out.push_str(line);
            }
        }
        out
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}
