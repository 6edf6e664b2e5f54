//! HTTP client for the calculator tool server

use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::protocol::{
    CallToolParams, CallToolResult, JsonRpcRequest, JsonRpcResponse, ListToolsResult,
    RemoteToolInfo, PROTOCOL_VERSION,
};
use crate::error::{Error, Result, TransportError};
use crate::tools::ToolResult;

/// Client for a JSON-RPC tool server reachable over HTTP
pub struct McpClient {
    http: reqwest::Client,
    endpoint: String,
    next_id: AtomicU64,
}

impl McpClient {
    /// `endpoint` is the full URL of the server endpoint,
    /// e.g. `http://127.0.0.1:8000/mcp`.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            next_id: AtomicU64::new(1),
        })
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::new(id, method, params);
        tracing::debug!(%method, id, "rpc request");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                Error::Transport(TransportError::Unreachable {
                    message: format!("{}: {e}", self.endpoint),
                })
            })?;
        let frame: JsonRpcResponse = response.json().await.map_err(|e| {
            Error::Transport(TransportError::MalformedResponse {
                message: e.to_string(),
            })
        })?;

        if let Some(err) = frame.error {
            return Err(Error::Transport(TransportError::Rpc {
                code: err.code,
                message: err.message,
            }));
        }
        frame.result.ok_or_else(|| {
            Error::Transport(TransportError::MalformedResponse {
                message: "response carried neither result nor error".to_string(),
            })
        })
    }

    /// Performs the initialization handshake.
    pub async fn initialize(&self) -> Result<()> {
        let result = self
            .call(
                "initialize",
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {},
                    "clientInfo": {
                        "name": "toolsmith",
                        "version": env!("CARGO_PKG_VERSION"),
                    }
                }),
            )
            .await?;
        let version = result
            .get("protocolVersion")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        tracing::info!(server_version = version, "handshake complete");
        Ok(())
    }

    /// Lists the tools the server exposes.
    pub async fn list_tools(&self) -> Result<Vec<RemoteToolInfo>> {
        let result = self.call("tools/list", Value::Null).await?;
        let listing: ListToolsResult = serde_json::from_value(result).map_err(|e| {
            Error::Transport(TransportError::MalformedResponse {
                message: e.to_string(),
            })
        })?;
        Ok(listing.tools)
    }

    /// Invokes a remote tool and wraps the outcome in a result envelope
    /// carrying `tool_use_id`.
    pub async fn call_tool(
        &self,
        tool_use_id: &str,
        name: &str,
        arguments: Value,
    ) -> Result<ToolResult> {
        let params = CallToolParams {
            name: name.to_string(),
            arguments,
        };
        let result = self.call("tools/call", json!(params)).await?;
        let call: CallToolResult = serde_json::from_value(result).map_err(|e| {
            Error::Transport(TransportError::MalformedResponse {
                message: e.to_string(),
            })
        })?;
        let text = call
            .content
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        if call.is_error {
            Ok(ToolResult::error(tool_use_id.to_string(), text))
        } else {
            Ok(ToolResult::success(tool_use_id.to_string(), text))
        }
    }
}
