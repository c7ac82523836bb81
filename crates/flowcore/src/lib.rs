//! Core abstractions for the flow engine
//! 
//! A workflow is a tree of nodes sharing one [`Context`]. Function nodes run
//! registered functions; sequential and parallel groups compose children.
//! Trees serialize to a stable JSON record and load back through a
//! [`FunctionRegistry`] that maps function keys to compiled callables.

mod context;
mod error;
pub mod events;
mod function;
mod node;
pub mod record;
mod workflow;

pub use context::Context;
pub use error::{DeserializationError, ExecutionError, FlowError, NodeError};
pub use events::{EventBus, EventEmitter, ExecutionEvent, ExecutionId};
pub use function::{FunctionRegistry, NamedFunction, NodeFunction};
pub use node::{FunctionNode, Node, ParallelGroup, SequentialGroup};
pub use record::{NodeKind, NodeRecord};
pub use workflow::Workflow;

/// Result type for flow operations
pub type Result<T> = std::result::Result<T, FlowError>;
