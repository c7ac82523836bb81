use flowcore::{
    Context, EventBus, ExecutionEvent, ExecutionId, FlowError, FunctionRegistry, Workflow,
};
use std::sync::Arc;
use std::time::Instant;

/// Main runtime for executing workflows
pub struct FlowRuntime {
    registry: Arc<FunctionRegistry>,
    event_bus: Arc<EventBus>,
    config: RuntimeConfig,
}

impl FlowRuntime {
    /// Create a new runtime with default settings and an empty registry
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    /// Create a new runtime with custom configuration
    pub fn with_config(config: RuntimeConfig) -> Self {
        Self::with_registry(FunctionRegistry::new(), config)
    }

    /// Create a new runtime with a pre-configured registry
    pub fn with_registry(registry: FunctionRegistry, config: RuntimeConfig) -> Self {
        let event_bus = Arc::new(EventBus::new(config.event_buffer_size));

        Self {
            registry: Arc::new(registry),
            event_bus,
            config,
        }
    }

    /// Functions that workflows loaded by this runtime may reference
    pub fn registry(&self) -> &Arc<FunctionRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Parse a serialized workflow against this runtime's registry
    pub fn load(&self, text: &str) -> Result<Workflow, FlowError> {
        Ok(Workflow::load_with(text, &self.registry)?)
    }

    /// Run a workflow, publishing run and node events on the event bus
    pub async fn run(&self, workflow: &Workflow, ctx: &Context) -> Result<RunReport, FlowError> {
        let execution_id = ExecutionId::new_v4();
        let emitter = self.event_bus.create_emitter(execution_id);
        let start = Instant::now();

        tracing::info!("Starting workflow execution: {} ({})", workflow.root().id(), execution_id);
        emitter.run_started(workflow.root().id());

        let result = workflow.run_observed(ctx, &emitter).await;

        let duration_ms = start.elapsed().as_millis() as u64;
        emitter.run_completed(result.is_ok(), duration_ms);

        match result {
            Ok(()) => {
                tracing::info!("Workflow {} completed in {}ms", execution_id, duration_ms);
                Ok(RunReport {
                    execution_id,
                    node_count: workflow.root().node_count(),
                    duration_ms,
                })
            }
            Err(e) => {
                tracing::error!("Workflow {} failed: {}", execution_id, e);
                Err(e.into())
            }
        }
    }

    /// Subscribe to execution events
    pub fn subscribe_events(&self) -> tokio::sync::broadcast::Receiver<ExecutionEvent> {
        self.event_bus.subscribe()
    }

    /// Get the event bus for direct access
    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }
}

impl Default for FlowRuntime {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for the runtime
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub event_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 1000,
        }
    }
}

/// Summary of a successful run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub execution_id: ExecutionId,
    pub node_count: usize,
    pub duration_ms: u64,
}
