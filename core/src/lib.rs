//! # toolsmith Core
//!
//! Core library for toolsmith - an agent runtime that grows its own toolbox.
//!
//! This library provides the building blocks for a self-extending assistant:
//! a uniform tool invocation envelope, a manifest-based tool registry, a
//! synthesis loop that asks a model to mint new tools at runtime, a query
//! router with a deterministic math specialist, and a small JSON-RPC
//! calculator server with a matching client.

// Core modules
pub mod agent;
pub mod config;
pub mod error;
pub mod llm;
pub mod mcp;
pub mod router;
pub mod synthesis;
pub mod tools;

// Re-export commonly used types
pub use agent::{build_client, Agent};
pub use config::{ModelParams, Protocol, ResolvedLlmConfig};
pub use error::{Error, Result};
pub use mcp::McpClient;
pub use router::{Router, RoutingLabel};
pub use synthesis::{SynthesisOutcome, ToolSynthesizer};
pub use tools::{ToolRegistry, ToolResult, ToolUse};

/// Current version of the toolsmith-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing for the library
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

/// Initialize tracing with a specific debug mode
pub fn init_tracing_with_debug(debug: bool) {
    let filter = if debug { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
