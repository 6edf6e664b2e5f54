//! Tool invocation envelope
//!
//! Every tool, builtin or generated, is invoked through the same
//! request/response shape: a [`ToolUse`] in, a [`ToolResult`] out. The
//! result envelope is the only channel for both success payloads and error
//! messages.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Static metadata describing a tool
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolSpec {
    /// Tool name; must equal the manifest file's base name
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// Parameter name to parameter description
    #[serde(default)]
    pub input_schema: BTreeMap<String, ParamSpec>,
}

/// Description of a single tool parameter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParamSpec {
    /// JSON type name ("string", "boolean", "number", ...)
    #[serde(rename = "type")]
    pub param_type: String,

    /// What the parameter means
    pub description: String,

    /// Whether the parameter must be present
    #[serde(default)]
    pub required: bool,
}

/// A tool invocation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolUse {
    /// Unique identifier for this invocation
    #[serde(rename = "toolUseId")]
    pub tool_use_id: String,

    /// Invocation input
    #[serde(default)]
    pub input: Value,
}

/// Status of a tool invocation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Success,
    Error,
}

/// A block of result content
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentBlock {
    pub text: String,
}

/// Result of a tool invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// ID of the invocation this is a result for
    #[serde(rename = "toolUseId")]
    pub tool_use_id: String,

    /// Whether the invocation succeeded
    pub status: ToolStatus,

    /// Ordered result content
    pub content: Vec<ContentBlock>,
}

impl ToolUse {
    /// Create an invocation with structured input
    pub fn new(input: Value) -> Self {
        Self {
            tool_use_id: Uuid::new_v4().to_string(),
            input,
        }
    }

    /// Create an invocation with an explicit id
    pub fn with_id<S: Into<String>>(tool_use_id: S, input: Value) -> Self {
        Self {
            tool_use_id: tool_use_id.into(),
            input,
        }
    }

    /// Create an invocation carrying a single free-text value under
    /// `input.path`, the shape the command-line surface produces
    pub fn from_text<S: Into<String>>(tool_use_id: S, text: &str) -> Self {
        Self::with_id(tool_use_id, serde_json::json!({ "path": text }))
    }

    /// The raw free-text value, if any
    pub fn text(&self) -> Option<&str> {
        self.input.get("path").and_then(Value::as_str)
    }

    /// Structured parameters, resolved by the legacy dual-path policy:
    ///
    /// 1. a nested `input.json` object wins;
    /// 2. else a brace-delimited `input.path` string that parses as a JSON
    ///    object is opportunistically decoded (decode failure falls back to
    ///    treating it as plain text);
    /// 3. else the flat `input` object itself.
    ///
    /// Kept for backward compatibility with a CLI that only passes one
    /// positional string; new callers should put an object in `input.json`.
    pub fn params(&self) -> Map<String, Value> {
        if let Some(Value::Object(map)) = self.input.get("json") {
            return map.clone();
        }

        if let Some(path) = self.text() {
            let trimmed = path.trim();
            if trimmed.starts_with('{') && trimmed.ends_with('}') {
                if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
                    return map;
                }
            }
        }

        match &self.input {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        }
    }
}

impl ToolResult {
    /// Create a successful result with a single text block
    pub fn success<S: Into<String>>(tool_use_id: S, text: S) -> Self {
        Self {
            tool_use_id: tool_use_id.into(),
            status: ToolStatus::Success,
            content: vec![ContentBlock { text: text.into() }],
        }
    }

    /// Create an error result with a single text block
    pub fn error<S: Into<String>>(tool_use_id: S, text: S) -> Self {
        Self {
            tool_use_id: tool_use_id.into(),
            status: ToolStatus::Error,
            content: vec![ContentBlock { text: text.into() }],
        }
    }

    /// Concatenated text of all content blocks
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Trait for all invokable tools
#[async_trait]
pub trait Tool: Send + Sync {
    /// Static metadata for this tool
    fn spec(&self) -> &ToolSpec;

    /// Execute the tool
    async fn invoke(&self, req: &ToolUse) -> Result<ToolResult>;

    /// Tool name shortcut
    fn name(&self) -> &str {
        &self.spec().name
    }
}

/// Invoke a tool, guaranteeing the envelope contract: any internal failure
/// is converted into an error result instead of propagating.
pub async fn invoke_checked(tool: &dyn Tool, req: &ToolUse) -> ToolResult {
    match tool.invoke(req).await {
        Ok(result) => result,
        Err(e) => ToolResult::error(req.tool_use_id.clone(), e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_wire_names() {
        let result = ToolResult::success("tu-1", "ok");
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["toolUseId"], "tu-1");
        assert_eq!(value["status"], "success");
        assert_eq!(value["content"][0]["text"], "ok");
    }

    #[test]
    fn params_prefers_nested_json() {
        let req = ToolUse::new(json!({
            "path": "/tmp",
            "json": { "path": "/var", "include_dirs": true }
        }));
        let params = req.params();
        assert_eq!(params["path"], "/var");
        assert_eq!(params["include_dirs"], true);
    }

    #[test]
    fn params_decodes_brace_delimited_path() {
        let req = ToolUse::new(json!({ "path": "{\"text\": \"hello\"}" }));
        assert_eq!(req.params()["text"], "hello");
    }

    #[test]
    fn malformed_brace_path_falls_back_to_text() {
        let req = ToolUse::new(json!({ "path": "{not json}" }));
        // Falls through to the flat input object
        assert_eq!(req.params()["path"], "{not json}");
        assert_eq!(req.text(), Some("{not json}"));
    }

    #[test]
    fn flat_input_object_is_accepted() {
        let req = ToolUse::new(json!({ "path": ".", "include_dirs": false }));
        let params = req.params();
        assert_eq!(params["path"], ".");
        assert_eq!(params["include_dirs"], false);
    }
}
