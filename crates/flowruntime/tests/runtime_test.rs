// crates/flowruntime/tests/runtime_test.rs

use flowcore::{Context, DeserializationError, ExecutionEvent, FlowError, FunctionRegistry};
use flowruntime::{FlowRuntime, RuntimeConfig};
use serde_json::json;

fn runtime() -> FlowRuntime {
    let mut registry = FunctionRegistry::new();
    flownodes::register_all(&mut registry);
    FlowRuntime::with_registry(registry, RuntimeConfig::default())
}

#[tokio::test]
async fn test_run_reports_and_emits_events() {
    let runtime = runtime();
    let mut events = runtime.subscribe_events();

    let workflow = runtime
        .load(r#"{"id":"root","name":"r","type":"SequentialGroup","children":[
            {"id":"parse","name":"parse","type":"FunctionNode","func":"transform.json_parse"}
        ]}"#)
        .unwrap();

    let ctx = Context::try_from(json!({ "json": "{\"ok\": true}" })).unwrap();
    let report = runtime.run(&workflow, &ctx).await.unwrap();

    assert_eq!(report.node_count, 2);
    assert_eq!(ctx.get("parsed").await, Some(json!({ "ok": true })));

    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        assert_eq!(event.execution_id(), report.execution_id);
        seen.push(event);
    }
    assert_eq!(seen.len(), 6);
    assert!(matches!(seen.first(), Some(ExecutionEvent::RunStarted { root_id, .. }) if root_id == "root"));
    assert!(matches!(seen.last(), Some(ExecutionEvent::RunCompleted { success: true, .. })));
}

#[tokio::test]
async fn test_failed_run_surfaces_execution_error() {
    let runtime = runtime();
    let mut events = runtime.subscribe_events();

    let workflow = runtime
        .load(r#"{"id":"p","name":"parse","type":"FunctionNode","func":"transform.json_parse"}"#)
        .unwrap();

    let err = runtime.run(&workflow, &Context::new()).await.unwrap_err();
    assert!(matches!(err, FlowError::Execution(_)));

    let mut last = None;
    while let Ok(event) = events.try_recv() {
        last = Some(event);
    }
    assert!(matches!(last, Some(ExecutionEvent::RunCompleted { success: false, .. })));
}

#[test]
fn test_load_only_resolves_registered_functions() {
    let runtime = FlowRuntime::new();
    assert!(runtime.registry().is_empty());

    let err = runtime
        .load(r#"{"id":"d","name":"delay","type":"FunctionNode","func":"time.delay"}"#)
        .unwrap_err();

    assert!(matches!(
        err,
        FlowError::Deserialization(DeserializationError::Reconstruction { ref function, .. })
            if function == "time.delay"
    ));
}
