// crates/flowcli/src/main.rs

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use flowcore::{Context, ExecutionEvent, FunctionRegistry, Node, Workflow};
use flowruntime::{FlowRuntime, RuntimeConfig};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flow")]
#[command(about = "Flow Engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a workflow file
    Run {
        /// Path to workflow JSON file
        #[arg(short, long)]
        file: PathBuf,

        /// Initial context as a JSON object
        #[arg(short, long)]
        context: Option<String>,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,

        /// Capacity of the execution event buffer
        #[arg(long, default_value_t = RuntimeConfig::default().event_buffer_size)]
        event_buffer: usize,
    },

    /// Validate a workflow file
    Validate {
        /// Path to workflow JSON file
        file: PathBuf,
    },

    /// List available functions
    Functions,

    /// Create a new example workflow
    Init {
        /// Output file path
        #[arg(short, long, default_value = "workflow.json")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            file,
            context,
            verbose,
            event_buffer,
        } => {
            init_logging(verbose);
            let config = RuntimeConfig {
                event_buffer_size: event_buffer,
            };
            run_workflow(file, context, config).await?;
        }

        Commands::Validate { file } => {
            init_logging(false);
            validate_workflow(file)?;
        }

        Commands::Functions => {
            list_functions();
        }

        Commands::Init { output } => {
            create_example_workflow(output)?;
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise info, or debug with `--verbose`
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

fn standard_registry() -> FunctionRegistry {
    let mut registry = FunctionRegistry::new();
    flownodes::register_all(&mut registry);
    registry
}

fn read_workflow(file: &Path, registry: &FunctionRegistry) -> Result<Workflow> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    Workflow::load_with(&text, registry).with_context(|| format!("loading {}", file.display()))
}

async fn run_workflow(file: PathBuf, context: Option<String>, config: RuntimeConfig) -> Result<()> {
    println!("🚀 Loading workflow from: {}", file.display());

    let runtime = FlowRuntime::with_registry(standard_registry(), config);
    let workflow = read_workflow(&file, runtime.registry())?;

    println!("📋 Workflow: {} ({})", workflow.root().name(), workflow.root().id());
    println!("   Nodes: {}", workflow.root().node_count());
    println!();

    let ctx = match context {
        Some(raw) => {
            let json: serde_json::Value = serde_json::from_str(&raw)?;
            Context::try_from(json).map_err(|_| anyhow::anyhow!("Context must be a JSON object"))?
        }
        None => Context::new(),
    };

    // Subscribe to events for real-time output
    let mut events = runtime.subscribe_events();
    let event_task = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                ExecutionEvent::RunStarted { .. } => {
                    println!("▶️  Workflow started");
                }
                ExecutionEvent::NodeStarted { node_id, node_type, .. } => {
                    println!("  ⚡ Starting node: {} ({})", node_id, node_type);
                }
                ExecutionEvent::NodeCompleted { node_id, duration_ms, .. } => {
                    println!("  ✅ Node {} completed in {}ms", node_id, duration_ms);
                }
                ExecutionEvent::NodeFailed { node_id, error, .. } => {
                    println!("  ❌ Node {} failed: {}", node_id, error);
                }
                ExecutionEvent::RunCompleted { success, duration_ms, .. } => {
                    if success {
                        println!("✨ Workflow completed successfully in {}ms", duration_ms);
                    } else {
                        println!("💥 Workflow failed after {}ms", duration_ms);
                    }
                    break;
                }
            }
        }
    });

    let result = runtime.run(&workflow, &ctx).await;
    let _ = event_task.await;
    let report = result?;

    println!();
    println!("📊 Execution Summary:");
    println!("   Execution ID: {}", report.execution_id);
    println!("   Nodes: {}", report.node_count);
    println!();
    println!("📤 Context:");
    println!("{}", serde_json::to_string_pretty(&ctx.snapshot().await)?);

    Ok(())
}

fn validate_workflow(file: PathBuf) -> Result<()> {
    println!("🔍 Validating workflow: {}", file.display());

    let workflow = read_workflow(&file, &standard_registry())?;
    let root = workflow.root();

    println!("✅ Workflow is valid:");
    println!("   Root: {} ({}, {})", root.name(), root.id(), root.kind());
    println!("   Nodes: {}", root.node_count());
    println!("   Depth: {}", root.depth());

    Ok(())
}

fn list_functions() {
    println!("📦 Available Functions:");
    println!();

    for info in flownodes::list() {
        println!("  • {}", info.key);
        println!("    {}", info.description);
    }
}

fn create_example_workflow(output: PathBuf) -> Result<()> {
    let registry = standard_registry();
    let function = |key: &str| {
        registry
            .resolve(key)
            .ok_or_else(|| anyhow::anyhow!("standard function '{}' is not registered", key))
    };

    let workflow = Workflow::new(Node::sequential(
        "root",
        "Example JSON Workflow",
        vec![
            Node::function("parse", "Parse Input", function("transform.json_parse")?),
            Node::parallel(
                "fan_out",
                "Wait And Log",
                vec![
                    Node::function("delay", "Delay", function("time.delay")?),
                    Node::function("log", "Log Context", function("debug.log")?),
                ],
            ),
            Node::function("render", "Render Value", function("transform.json_stringify")?),
        ],
    ));

    std::fs::write(&output, workflow.serialize_pretty()?)?;

    println!("✨ Created example workflow: {}", output.display());
    println!();
    println!("Run it with:");
    println!(
        "  flow run --file {} --context '{{\"json\": \"[1, 2, 3]\", \"value\": \"hi\", \"delay_ms\": 100}}'",
        output.display()
    );

    Ok(())
}
