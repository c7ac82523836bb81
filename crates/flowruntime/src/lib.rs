//! Workflow execution runtime
//! 
//! This crate ties a function registry, an event bus and runtime settings
//! together so callers can load and run workflows with run-level reporting.

mod runtime;

pub use runtime::{FlowRuntime, RunReport, RuntimeConfig};
