use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Shared key/value state threaded through one workflow run.
///
/// Cloning a `Context` clones the handle, not the data: every clone observes
/// the same map. Concurrent writers to the same key race; the engine does not
/// arbitrate between them.
#[derive(Clone, Default, Debug)]
pub struct Context {
    data: Arc<RwLock<Map<String, Value>>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self {
            data: Arc::new(RwLock::new(map)),
        }
    }

    /// Get a copy of the value stored under `key`
    pub async fn get(&self, key: &str) -> Option<Value> {
        self.data.read().await.get(key).cloned()
    }

    /// Store `value` under `key`, returning the previous value
    pub async fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.data.write().await.insert(key.into(), value.into())
    }

    pub async fn remove(&self, key: &str) -> Option<Value> {
        self.data.write().await.remove(key)
    }

    pub async fn contains_key(&self, key: &str) -> bool {
        self.data.read().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }

    /// Run `f` with exclusive access to the map.
    ///
    /// Use this for read-modify-write sequences (appending to a list,
    /// incrementing a counter) that must not interleave with other writers.
    pub async fn update<R>(&self, f: impl FnOnce(&mut Map<String, Value>) -> R) -> R {
        let mut guard = self.data.write().await;
        f(&mut guard)
    }

    /// Copy of the current contents
    pub async fn snapshot(&self) -> Map<String, Value> {
        self.data.read().await.clone()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Map<String, Value>> {
        self.data.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Map<String, Value>> {
        self.data.write().await
    }
}

impl From<Map<String, Value>> for Context {
    fn from(map: Map<String, Value>) -> Self {
        Self::from_map(map)
    }
}

impl TryFrom<Value> for Context {
    type Error = Value;

    /// Only JSON objects convert; anything else is handed back unchanged.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            other => Err(other),
        }
    }
}
