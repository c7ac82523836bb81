use async_trait::async_trait;
use flowcore::{Context, NodeError, NodeFunction};
use serde_json::Value;

pub(crate) const PARSE_KEY: &str = "transform.json_parse";
pub(crate) const STRINGIFY_KEY: &str = "transform.json_stringify";

/// Parse the JSON string under `json` into `parsed`
pub struct JsonParse;

#[async_trait]
impl NodeFunction for JsonParse {
    async fn call(&self, ctx: Context) -> Result<(), NodeError> {
        let input = ctx
            .get("json")
            .await
            .ok_or_else(|| NodeError::MissingKey("json".to_string()))?;

        let text = input.as_str().ok_or_else(|| NodeError::InvalidValue {
            key: "json".to_string(),
            expected: "string".to_string(),
            actual: type_name(&input).to_string(),
        })?;

        let parsed: Value = serde_json::from_str(text)
            .map_err(|e| NodeError::Failed(format!("JSON parse error: {}", e)))?;

        ctx.insert("parsed", parsed).await;
        Ok(())
    }
}

/// Render `value` as pretty JSON into `json`
pub struct JsonStringify;

#[async_trait]
impl NodeFunction for JsonStringify {
    async fn call(&self, ctx: Context) -> Result<(), NodeError> {
        let value = ctx
            .get("value")
            .await
            .ok_or_else(|| NodeError::MissingKey("value".to_string()))?;

        let json_str = serde_json::to_string_pretty(&value)
            .map_err(|e| NodeError::Failed(format!("JSON stringify error: {}", e)))?;

        ctx.insert("json", json_str).await;
        Ok(())
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
