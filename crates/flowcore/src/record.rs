//! Serialized form of a node tree and the loader that rebuilds it.
//!
//! Record field order is fixed (`id`, `name`, `type`, then the payload) so the
//! same tree always renders to the same bytes.

use crate::function::FunctionRegistry;
use crate::{DeserializationError, Node};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Closed set of node types known to the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "FunctionNode")]
    Function,
    #[serde(rename = "SequentialGroup")]
    Sequential,
    #[serde(rename = "ParallelGroup")]
    Parallel,
}

impl NodeKind {
    pub const ALL: [NodeKind; 3] = [NodeKind::Function, NodeKind::Sequential, NodeKind::Parallel];

    /// Tag written to the `type` field
    pub fn tag(self) -> &'static str {
        match self {
            NodeKind::Function => "FunctionNode",
            NodeKind::Sequential => "SequentialGroup",
            NodeKind::Parallel => "ParallelGroup",
        }
    }

    pub fn from_tag(tag: &str) -> Option<NodeKind> {
        NodeKind::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Self-describing record of one node and its subtree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub func: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NodeRecord>>,
}

impl NodeRecord {
    pub fn function(id: &str, name: &str, func: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind: NodeKind::Function,
            func: Some(func.to_string()),
            children: None,
        }
    }

    pub fn group(id: &str, name: &str, kind: NodeKind, children: Vec<NodeRecord>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            func: None,
            children: Some(children),
        }
    }
}

/// Rebuild a node tree from a parsed record.
///
/// Children are fully loaded before their parent is constructed, and any
/// error aborts the whole load.
pub fn load_node(value: &Value, registry: &FunctionRegistry) -> Result<Node, DeserializationError> {
    load_at(value, registry, "$")
}

fn load_at(value: &Value, registry: &FunctionRegistry, path: &str) -> Result<Node, DeserializationError> {
    let record = value.as_object().ok_or_else(|| malformed(path, "expected an object"))?;

    let tag = required_str(record, "type", path)?;
    let kind = NodeKind::from_tag(tag)
        .ok_or_else(|| DeserializationError::UnknownNodeType(tag.to_string()))?;
    let id = required_str(record, "id", path)?;
    let name = required_str(record, "name", path)?;

    match kind {
        NodeKind::Function => {
            let key = required_str(record, "func", path)?;
            let function = registry
                .resolve(key)
                .ok_or_else(|| DeserializationError::Reconstruction {
                    path: path.to_string(),
                    function: key.to_string(),
                })?;
            Ok(Node::function(id, name, function))
        }
        NodeKind::Sequential => {
            let children = load_children(record, registry, path)?;
            Ok(Node::sequential(id, name, children))
        }
        NodeKind::Parallel => {
            let children = load_children(record, registry, path)?;
            Ok(Node::parallel(id, name, children))
        }
    }
}

fn load_children(
    record: &Map<String, Value>,
    registry: &FunctionRegistry,
    path: &str,
) -> Result<Vec<Node>, DeserializationError> {
    let children = record
        .get("children")
        .ok_or_else(|| malformed(path, "missing field 'children'"))?
        .as_array()
        .ok_or_else(|| malformed(path, "field 'children' must be an array"))?;

    children
        .iter()
        .enumerate()
        .map(|(i, child)| load_at(child, registry, &format!("{}.children[{}]", path, i)))
        .collect()
}

fn required_str<'a>(
    record: &'a Map<String, Value>,
    field: &str,
    path: &str,
) -> Result<&'a str, DeserializationError> {
    record
        .get(field)
        .ok_or_else(|| malformed(path, &format!("missing field '{}'", field)))?
        .as_str()
        .ok_or_else(|| malformed(path, &format!("field '{}' must be a string", field)))
}

fn malformed(path: &str, reason: &str) -> DeserializationError {
    DeserializationError::MalformedRecord {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}
