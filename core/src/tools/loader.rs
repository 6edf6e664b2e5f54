//! Tool manifest loading
//!
//! A generated tool file is a JSON manifest: a [`ToolSpec`] plus a handler
//! descriptor. The descriptor either references a statically registered
//! builtin handler or describes a subprocess. This replaces import-by-name
//! reflection with a typed loading boundary.

use crate::error::{Result, ToolError};
use crate::tools::envelope::{Tool, ToolResult, ToolSpec, ToolUse};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

/// Default wall-clock limit for command-kind tools
const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 30;

/// On-disk tool manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolManifest {
    #[serde(flatten)]
    pub spec: ToolSpec,

    /// How invocations are executed
    pub handler: HandlerDescriptor,
}

/// Typed handler descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum HandlerDescriptor {
    /// Delegate to a statically registered builtin handler
    Builtin { builtin: String },

    /// Run a subprocess: invocation input as JSON on stdin, result text on
    /// stdout
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default)]
        timeout_secs: Option<u64>,
    },
}

/// A tool loaded from a manifest, ready to invoke
pub struct LoadedTool {
    spec: ToolSpec,
    handler: LoadedHandler,
}

enum LoadedHandler {
    Builtin(Arc<dyn Tool>),
    Command {
        program: String,
        args: Vec<String>,
        timeout_secs: u64,
    },
}

impl std::fmt::Debug for LoadedTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.handler {
            LoadedHandler::Builtin(_) => "builtin",
            LoadedHandler::Command { .. } => "command",
        };
        f.debug_struct("LoadedTool")
            .field("name", &self.spec.name)
            .field("handler", &kind)
            .finish()
    }
}

impl LoadedTool {
    pub(crate) fn builtin(spec: ToolSpec, tool: Arc<dyn Tool>) -> Self {
        Self {
            spec,
            handler: LoadedHandler::Builtin(tool),
        }
    }

    pub(crate) fn command(
        spec: ToolSpec,
        program: String,
        args: Vec<String>,
        timeout_secs: Option<u64>,
    ) -> Self {
        Self {
            spec,
            handler: LoadedHandler::Command {
                program,
                args,
                timeout_secs: timeout_secs.unwrap_or(DEFAULT_COMMAND_TIMEOUT_SECS),
            },
        }
    }

    async fn run_command(
        &self,
        program: &str,
        args: &[String],
        timeout_secs: u64,
        req: &ToolUse,
    ) -> Result<ToolResult> {
        let resolved = which::which(program).map_err(|_| ToolError::ExecutionFailed {
            name: self.spec.name.clone(),
            message: format!("program not found: {}", program),
        })?;

        let mut child = Command::new(resolved)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ToolError::ExecutionFailed {
                name: self.spec.name.clone(),
                message: e.to_string(),
            })?;

        if let Some(stdin) = child.stdin.as_mut() {
            let payload = serde_json::to_vec(req)?;
            stdin.write_all(&payload).await?;
        }
        drop(child.stdin.take());

        let output = timeout(Duration::from_secs(timeout_secs), child.wait_with_output())
            .await
            .map_err(|_| ToolError::Timeout {
                name: self.spec.name.clone(),
            })?
            .map_err(|e| ToolError::ExecutionFailed {
                name: self.spec.name.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Ok(ToolResult::error(
                req.tool_use_id.clone(),
                format!(
                    "{} exited with {}: {}",
                    program,
                    output.status,
                    stderr.trim()
                ),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(ToolResult::success(
            req.tool_use_id.clone(),
            stdout.trim_end().to_string(),
        ))
    }
}

#[async_trait]
impl Tool for LoadedTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn invoke(&self, req: &ToolUse) -> Result<ToolResult> {
        match &self.handler {
            LoadedHandler::Builtin(tool) => tool.invoke(req).await,
            LoadedHandler::Command {
                program,
                args,
                timeout_secs,
            } => self.run_command(program, args, *timeout_secs, req).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_parses_builtin_descriptor() {
        let manifest: ToolManifest = serde_json::from_str(
            r#"{
                "name": "list_files_with_sizes",
                "description": "List files",
                "input_schema": {
                    "path": {"type": "string", "description": "dir", "required": false}
                },
                "handler": {"kind": "builtin", "builtin": "list_files_with_sizes"}
            }"#,
        )
        .unwrap();
        assert_eq!(manifest.spec.name, "list_files_with_sizes");
        assert!(matches!(
            manifest.handler,
            HandlerDescriptor::Builtin { ref builtin } if builtin == "list_files_with_sizes"
        ));
    }

    #[test]
    fn manifest_parses_command_descriptor() {
        let manifest: ToolManifest = serde_json::from_str(
            r#"{
                "name": "shout",
                "description": "Uppercase stdin",
                "handler": {"kind": "command", "program": "tr", "args": ["a-z", "A-Z"]}
            }"#,
        )
        .unwrap();
        assert!(matches!(manifest.handler, HandlerDescriptor::Command { .. }));
        assert!(manifest.spec.input_schema.is_empty());
    }
}
