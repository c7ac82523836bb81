//! Named functions executed by function nodes.
//!
//! A function node never serializes code. It serializes the key under which
//! its callable was registered, and loading resolves that key against a
//! [`FunctionRegistry`]. Only functions compiled into the process and
//! registered before `load` can be reconstructed, so a workflow document can
//! select among known behaviours but can never introduce new ones.

use crate::{Context, NodeError};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, RwLock};

/// A unit of work over the shared context
#[async_trait]
pub trait NodeFunction: Send + Sync {
    async fn call(&self, ctx: Context) -> Result<(), NodeError>;
}

#[async_trait]
impl<F, Fut> NodeFunction for F
where
    F: Fn(Context) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), NodeError>> + Send + 'static,
{
    async fn call(&self, ctx: Context) -> Result<(), NodeError> {
        (self)(ctx).await
    }
}

/// A callable paired with the registry key it serializes as.
#[derive(Clone)]
pub struct NamedFunction {
    key: String,
    func: Arc<dyn NodeFunction>,
}

impl NamedFunction {
    pub fn new(key: impl Into<String>, func: impl NodeFunction + 'static) -> Self {
        Self {
            key: key.into(),
            func: Arc::new(func),
        }
    }

    pub fn from_arc(key: impl Into<String>, func: Arc<dyn NodeFunction>) -> Self {
        Self {
            key: key.into(),
            func,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn call(&self, ctx: Context) -> Result<(), NodeError> {
        self.func.call(ctx).await
    }
}

impl fmt::Debug for NamedFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedFunction").field("key", &self.key).finish()
    }
}

/// Registry of functions that function nodes may reference
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Arc<dyn NodeFunction>>,
}

static GLOBAL: Lazy<RwLock<FunctionRegistry>> = Lazy::new(|| RwLock::new(FunctionRegistry::new()));

impl FunctionRegistry {
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Register a function, replacing any previous one under the same key
    pub fn register(&mut self, key: impl Into<String>, func: impl NodeFunction + 'static) -> NamedFunction {
        self.register_named(NamedFunction::new(key, func))
    }

    pub fn register_named(&mut self, function: NamedFunction) -> NamedFunction {
        tracing::debug!("Registering function: {}", function.key);
        self.functions
            .insert(function.key.clone(), Arc::clone(&function.func));
        function
    }

    pub fn resolve(&self, key: &str) -> Option<NamedFunction> {
        self.functions
            .get(key)
            .map(|func| NamedFunction::from_arc(key, Arc::clone(func)))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.functions.contains_key(key)
    }

    /// Registered keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.functions.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Copy every entry of `other` into this registry; `other` wins on conflicts
    pub fn merge(&mut self, other: &FunctionRegistry) {
        for (key, func) in &other.functions {
            self.functions.insert(key.clone(), Arc::clone(func));
        }
    }

    /// Snapshot of the process-wide registry
    pub fn global() -> FunctionRegistry {
        GLOBAL
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Register a function in the process-wide registry used by `Workflow::load`
    pub fn register_global(key: impl Into<String>, func: impl NodeFunction + 'static) -> NamedFunction {
        GLOBAL
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .register(key, func)
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.keys())
            .finish()
    }
}
