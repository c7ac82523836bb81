use crate::events::EventEmitter;
use crate::function::FunctionRegistry;
use crate::record::{load_node, NodeRecord};
use crate::{Context, DeserializationError, ExecutionError, Node};

/// A runnable tree with a single root node
#[derive(Debug, Clone)]
pub struct Workflow {
    root: Node,
}

impl Workflow {
    pub const EMPTY_ROOT_ID: &'static str = "root";
    pub const EMPTY_ROOT_NAME: &'static str = "sequential_root";

    pub fn new(root: Node) -> Self {
        Self { root }
    }

    /// Sequential root with no children
    pub fn empty() -> Self {
        Self::new(Node::sequential(
            Self::EMPTY_ROOT_ID,
            Self::EMPTY_ROOT_NAME,
            Vec::new(),
        ))
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn into_root(self) -> Node {
        self.root
    }

    pub async fn run(&self, ctx: &Context) -> Result<(), ExecutionError> {
        self.root.execute(ctx).await
    }

    pub async fn run_observed(
        &self,
        ctx: &Context,
        events: &EventEmitter,
    ) -> Result<(), ExecutionError> {
        self.root.execute_observed(ctx, events).await
    }

    pub fn to_record(&self) -> NodeRecord {
        self.root.to_record()
    }

    /// Compact JSON; byte-identical across calls for an unchanged tree
    pub fn serialize(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_record())
    }

    pub fn serialize_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_record())
    }

    /// Load using the process-wide function registry
    pub fn load(text: &str) -> Result<Self, DeserializationError> {
        Self::load_with(text, &FunctionRegistry::global())
    }

    pub fn load_with(text: &str, registry: &FunctionRegistry) -> Result<Self, DeserializationError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Ok(Self::new(load_node(&value, registry)?))
    }
}

impl From<Node> for Workflow {
    fn from(root: Node) -> Self {
        Self::new(root)
    }
}
