//! Standard function library
//! 
//! Collection of built-in functions that function nodes can reference by key

mod debug;
mod time;
mod transform;

pub use debug::DebugLog;
pub use time::Delay;
pub use transform::{JsonParse, JsonStringify};
use flowcore::FunctionRegistry;

/// Key and description of a standard function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionInfo {
    pub key: &'static str,
    pub description: &'static str,
}

/// Describe every standard function, in registration order
pub fn list() -> Vec<FunctionInfo> {
    vec![
        FunctionInfo {
            key: debug::KEY,
            description: "Logs every context entry",
        },
        FunctionInfo {
            key: time::KEY,
            description: "Sleeps for `delay_ms` milliseconds (default 1000)",
        },
        FunctionInfo {
            key: transform::PARSE_KEY,
            description: "Parses the string in `json` into `parsed`",
        },
        FunctionInfo {
            key: transform::STRINGIFY_KEY,
            description: "Renders `value` as a pretty JSON string into `json`",
        },
    ]
}

/// Register all standard functions with a registry
pub fn register_all(registry: &mut FunctionRegistry) {
    registry.register(debug::KEY, DebugLog);
    registry.register(time::KEY, Delay);
    registry.register(transform::PARSE_KEY, JsonParse);
    registry.register(transform::STRINGIFY_KEY, JsonStringify);
}
