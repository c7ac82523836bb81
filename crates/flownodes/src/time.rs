use async_trait::async_trait;
use flowcore::{Context, NodeError, NodeFunction};
use tokio::time::{sleep, Duration};

pub(crate) const KEY: &str = "time.delay";

const DEFAULT_DELAY_MS: u64 = 1000;

/// Delay execution for the duration stored under `delay_ms`
pub struct Delay;

#[async_trait]
impl NodeFunction for Delay {
    async fn call(&self, ctx: Context) -> Result<(), NodeError> {
        let delay_ms = match ctx.get("delay_ms").await {
            None => DEFAULT_DELAY_MS,
            Some(value) => value.as_u64().ok_or_else(|| NodeError::InvalidValue {
                key: "delay_ms".to_string(),
                expected: "non-negative integer".to_string(),
                actual: value.to_string(),
            })?,
        };

        tracing::debug!("Delaying for {}ms", delay_ms);
        sleep(Duration::from_millis(delay_ms)).await;

        Ok(())
    }
}
