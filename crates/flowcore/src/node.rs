use crate::events::EventEmitter;
use crate::function::NamedFunction;
use crate::record::{NodeKind, NodeRecord};
use crate::{Context, ExecutionError};
use futures_util::future::BoxFuture;
use futures_util::stream::{FuturesUnordered, StreamExt};
use std::time::Instant;

/// Executable, serializable unit of a workflow tree.
///
/// Parents own their children exclusively, so a tree built from these values
/// is always finite and acyclic. Nodes hold no per-run state.
#[derive(Debug, Clone)]
pub enum Node {
    Function(FunctionNode),
    Sequential(SequentialGroup),
    Parallel(ParallelGroup),
}

/// Leaf that runs one named function against the context
#[derive(Debug, Clone)]
pub struct FunctionNode {
    id: String,
    name: String,
    function: NamedFunction,
}

/// Runs children one after another, stopping at the first failure
#[derive(Debug, Clone)]
pub struct SequentialGroup {
    id: String,
    name: String,
    children: Vec<Node>,
}

/// Runs all children concurrently and waits for every one of them
#[derive(Debug, Clone)]
pub struct ParallelGroup {
    id: String,
    name: String,
    children: Vec<Node>,
}

impl FunctionNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, function: NamedFunction) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            function,
        }
    }

    pub fn function(&self) -> &NamedFunction {
        &self.function
    }
}

impl SequentialGroup {
    pub fn new(id: impl Into<String>, name: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children,
        }
    }
}

impl ParallelGroup {
    pub fn new(id: impl Into<String>, name: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children,
        }
    }
}

impl From<FunctionNode> for Node {
    fn from(node: FunctionNode) -> Self {
        Node::Function(node)
    }
}

impl From<SequentialGroup> for Node {
    fn from(group: SequentialGroup) -> Self {
        Node::Sequential(group)
    }
}

impl From<ParallelGroup> for Node {
    fn from(group: ParallelGroup) -> Self {
        Node::Parallel(group)
    }
}

impl Node {
    pub fn function(id: impl Into<String>, name: impl Into<String>, function: NamedFunction) -> Self {
        FunctionNode::new(id, name, function).into()
    }

    pub fn sequential(id: impl Into<String>, name: impl Into<String>, children: Vec<Node>) -> Self {
        SequentialGroup::new(id, name, children).into()
    }

    pub fn parallel(id: impl Into<String>, name: impl Into<String>, children: Vec<Node>) -> Self {
        ParallelGroup::new(id, name, children).into()
    }

    pub fn id(&self) -> &str {
        match self {
            Node::Function(n) => &n.id,
            Node::Sequential(g) => &g.id,
            Node::Parallel(g) => &g.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Node::Function(n) => &n.name,
            Node::Sequential(g) => &g.name,
            Node::Parallel(g) => &g.name,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Function(_) => NodeKind::Function,
            Node::Sequential(_) => NodeKind::Sequential,
            Node::Parallel(_) => NodeKind::Parallel,
        }
    }

    /// Direct children; empty for function nodes
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Function(_) => &[],
            Node::Sequential(g) => &g.children,
            Node::Parallel(g) => &g.children,
        }
    }

    /// Number of nodes in this subtree, including itself
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(Node::node_count).sum::<usize>()
    }

    /// Height of this subtree; a lone node has depth 1
    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(Node::depth).max().unwrap_or(0)
    }

    /// Structural record that `record::load_node` turns back into an equivalent node
    pub fn to_record(&self) -> NodeRecord {
        match self {
            Node::Function(n) => NodeRecord::function(&n.id, &n.name, n.function.key()),
            Node::Sequential(g) => NodeRecord::group(
                &g.id,
                &g.name,
                NodeKind::Sequential,
                g.children.iter().map(Node::to_record).collect(),
            ),
            Node::Parallel(g) => NodeRecord::group(
                &g.id,
                &g.name,
                NodeKind::Parallel,
                g.children.iter().map(Node::to_record).collect(),
            ),
        }
    }

    /// Execute this node and all of its descendants against `ctx`.
    ///
    /// Nothing applied to the context before a failure is rolled back.
    pub async fn execute(&self, ctx: &Context) -> Result<(), ExecutionError> {
        self.execute_inner(ctx, None).await
    }

    /// Like [`Node::execute`], reporting node boundaries to `events`
    pub async fn execute_observed(
        &self,
        ctx: &Context,
        events: &EventEmitter,
    ) -> Result<(), ExecutionError> {
        self.execute_inner(ctx, Some(events)).await
    }

    fn execute_inner<'a>(
        &'a self,
        ctx: &'a Context,
        events: Option<&'a EventEmitter>,
    ) -> BoxFuture<'a, Result<(), ExecutionError>> {
        Box::pin(async move {
            let start = Instant::now();
            tracing::debug!(node_id = %self.id(), node_type = %self.kind(), "Starting node");
            if let Some(events) = events {
                events.node_started(self.id(), self.kind());
            }

            let result = match self {
                Node::Function(n) => n.run(ctx).await,
                Node::Sequential(g) => g.run(ctx, events).await,
                Node::Parallel(g) => g.run(ctx, events).await,
            };

            let duration_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(()) => {
                    tracing::debug!(node_id = %self.id(), duration_ms, "Node completed");
                    if let Some(events) = events {
                        events.node_completed(self.id(), duration_ms);
                    }
                }
                Err(e) => {
                    tracing::debug!(node_id = %self.id(), error = %e, "Node failed");
                    if let Some(events) = events {
                        events.node_failed(self.id(), e.to_string());
                    }
                }
            }
            result
        })
    }
}

impl FunctionNode {
    async fn run(&self, ctx: &Context) -> Result<(), ExecutionError> {
        self.function
            .call(ctx.clone())
            .await
            .map_err(|source| ExecutionError::Node {
                id: self.id.clone(),
                name: self.name.clone(),
                source,
            })
    }
}

impl SequentialGroup {
    async fn run(&self, ctx: &Context, events: Option<&EventEmitter>) -> Result<(), ExecutionError> {
        for child in &self.children {
            child.execute_inner(ctx, events).await?;
        }
        Ok(())
    }
}

impl ParallelGroup {
    async fn run(&self, ctx: &Context, events: Option<&EventEmitter>) -> Result<(), ExecutionError> {
        let mut running: FuturesUnordered<_> = self
            .children
            .iter()
            .map(|child| child.execute_inner(ctx, events))
            .collect();

        // Drain every branch; a failure never cancels its siblings.
        let mut failures = Vec::new();
        while let Some(result) = running.next().await {
            if let Err(e) = result {
                failures.push(e);
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ExecutionError::Parallel {
                id: self.id.clone(),
                failures,
            })
        }
    }
}
