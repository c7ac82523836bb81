use async_trait::async_trait;
use flowcore::{Context, NodeError, NodeFunction};

pub(crate) const KEY: &str = "debug.log";

/// Logs the whole context for debugging
pub struct DebugLog;

#[async_trait]
impl NodeFunction for DebugLog {
    async fn call(&self, ctx: Context) -> Result<(), NodeError> {
        let snapshot = ctx.snapshot().await;

        tracing::info!("DEBUG: {} context entries", snapshot.len());
        for (key, value) in &snapshot {
            tracing::info!("  {}: {}", key, value);
        }

        Ok(())
    }
}
