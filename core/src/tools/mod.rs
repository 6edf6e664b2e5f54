//! Tool system: invocation envelope, registry, manifest loader, builtins

pub mod builtin;
pub mod envelope;
pub mod loader;
pub mod registry;

pub use envelope::{
    invoke_checked, ContentBlock, ParamSpec, Tool, ToolResult, ToolSpec, ToolStatus, ToolUse,
};
pub use loader::{HandlerDescriptor, LoadedTool, ToolManifest};
pub use registry::{ToolRegistry, KNOWN_GOOD_TOOL_NAME, TOOL_EXT};
