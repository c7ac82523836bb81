use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] DeserializationError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error raised by a function while it runs against the context.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NodeError {
    #[error("Missing context key: {0}")]
    MissingKey(String),

    #[error("Invalid value for '{key}': expected {expected}, got {actual}")]
    InvalidValue {
        key: String,
        expected: String,
        actual: String,
    },

    #[error("Execution failed: {0}")]
    Failed(String),
}

impl NodeError {
    pub fn failed(message: impl Into<String>) -> Self {
        NodeError::Failed(message.into())
    }
}

/// Failure of a node tree at run time.
///
/// Side effects applied to the context before the failure are kept.
#[derive(Error, Debug, Clone)]
pub enum ExecutionError {
    #[error("Node '{id}' ({name}) failed: {source}")]
    Node {
        id: String,
        name: String,
        #[source]
        source: NodeError,
    },

    #[error("Parallel group '{id}' had {} failed branch(es)", .failures.len())]
    Parallel {
        id: String,
        failures: Vec<ExecutionError>,
    },
}

impl ExecutionError {
    /// Leaf failures in the order they were observed, flattening parallel aggregates.
    pub fn node_failures(&self) -> Vec<(&str, &NodeError)> {
        match self {
            ExecutionError::Node { id, source, .. } => vec![(id.as_str(), source)],
            ExecutionError::Parallel { failures, .. } => {
                failures.iter().flat_map(|f| f.node_failures()).collect()
            }
        }
    }

    pub fn first_failure(&self) -> Option<(&str, &NodeError)> {
        self.node_failures().into_iter().next()
    }
}

#[derive(Error, Debug)]
pub enum DeserializationError {
    #[error("Invalid workflow text: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    #[error("Malformed record at {path}: {reason}")]
    MalformedRecord { path: String, reason: String },

    #[error("Cannot reconstruct function '{function}' at {path}: not registered")]
    Reconstruction { path: String, function: String },
}
