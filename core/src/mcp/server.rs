//! Calculator tool server speaking JSON-RPC over a single HTTP endpoint

use axum::extract::Json;
use axum::routing::post;
use axum::Router;
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use super::protocol::{
    error_codes, CallContent, CallToolParams, CallToolResult, InitializeResult, JsonRpcRequest,
    JsonRpcResponse, ListToolsResult, RemoteToolInfo, ServerInfo, ENDPOINT_PATH, PROTOCOL_VERSION,
};
use crate::error::Result;

const SERVER_NAME: &str = "toolsmith-calculator";

fn tool_listing() -> ListToolsResult {
    let number_args = json!({
        "type": "object",
        "properties": {
            "x": { "type": "integer", "description": "First operand" },
            "y": { "type": "integer", "description": "Second operand" }
        },
        "required": ["x", "y"]
    });
    ListToolsResult {
        tools: vec![
            RemoteToolInfo {
                name: "add".to_string(),
                description: "Add two integers".to_string(),
                input_schema: number_args.clone(),
            },
            RemoteToolInfo {
                name: "multiply".to_string(),
                description: "Multiply two integers".to_string(),
                input_schema: number_args,
            },
        ],
    }
}

fn operand(arguments: &Value, key: &str) -> Option<i64> {
    arguments.get(key).and_then(Value::as_i64)
}

fn call_tool(params: CallToolParams) -> CallToolResult {
    let x = operand(&params.arguments, "x");
    let y = operand(&params.arguments, "y");
    let (Some(x), Some(y)) = (x, y) else {
        return CallToolResult {
            content: vec![CallContent::text(
                "arguments must contain integer fields 'x' and 'y'",
            )],
            is_error: true,
        };
    };
    let outcome = match params.name.as_str() {
        "add" => x.checked_add(y),
        "multiply" => x.checked_mul(y),
        other => {
            return CallToolResult {
                content: vec![CallContent::text(format!("unknown tool: {other}"))],
                is_error: true,
            };
        }
    };
    match outcome {
        Some(value) => CallToolResult {
            content: vec![CallContent::text(value.to_string())],
            is_error: false,
        },
        None => CallToolResult {
            content: vec![CallContent::text("integer overflow")],
            is_error: true,
        },
    }
}

/// Single-request dispatch used by the HTTP handler
pub(crate) fn dispatch(req: JsonRpcRequest) -> JsonRpcResponse {
    match req.method.as_str() {
        "initialize" => {
            let result = InitializeResult {
                protocol_version: PROTOCOL_VERSION.to_string(),
                server_info: ServerInfo {
                    name: SERVER_NAME.to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                },
                capabilities: json!({ "tools": {} }),
            };
            JsonRpcResponse::result(req.id, json!(result))
        }
        "tools/list" => JsonRpcResponse::result(req.id, json!(tool_listing())),
        "tools/call" => match serde_json::from_value::<CallToolParams>(req.params) {
            Ok(params) => {
                tracing::debug!(tool = %params.name, "tool call received");
                JsonRpcResponse::result(req.id, json!(call_tool(params)))
            }
            Err(e) => JsonRpcResponse::error(
                req.id,
                error_codes::INVALID_PARAMS,
                format!("invalid tools/call params: {e}"),
            ),
        },
        other => JsonRpcResponse::error(
            req.id,
            error_codes::METHOD_NOT_FOUND,
            format!("method not found: {other}"),
        ),
    }
}

async fn handle(Json(req): Json<JsonRpcRequest>) -> Json<JsonRpcResponse> {
    Json(dispatch(req))
}

/// Builds the axum router for the calculator endpoint
pub fn app() -> Router {
    Router::new().route(ENDPOINT_PATH, post(handle))
}

/// A server bound to a local address but not yet serving
pub struct BoundServer {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl BoundServer {
    /// Address the listener actually bound, useful with port 0
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serves requests until the task is aborted
    pub async fn serve(self) -> Result<()> {
        tracing::info!(addr = %self.local_addr, "calculator server listening");
        axum::serve(self.listener, app())
            .await
            .map_err(crate::error::Error::Io)?;
        Ok(())
    }
}

/// Binds the calculator server to `addr`
pub async fn bind(addr: &str) -> Result<BoundServer> {
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    Ok(BoundServer {
        listener,
        local_addr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(id: u64, method: &str, params: Value) -> JsonRpcResponse {
        dispatch(JsonRpcRequest::new(id, method, params))
    }

    #[test]
    fn initialize_reports_protocol_version() {
        let resp = call(1, "initialize", Value::Null);
        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
    }

    #[test]
    fn listing_contains_both_tools() {
        let resp = call(2, "tools/list", Value::Null);
        let tools = resp.result.unwrap()["tools"].as_array().unwrap().clone();
        let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["add", "multiply"]);
    }

    #[test]
    fn add_and_multiply_compute() {
        let resp = call(3, "tools/call", json!({"name": "add", "arguments": {"x": 16, "y": 16}}));
        let result = resp.result.unwrap();
        assert_eq!(result["content"][0]["text"], "32");
        assert_eq!(result["isError"], false);

        let resp = call(
            4,
            "tools/call",
            json!({"name": "multiply", "arguments": {"x": 16, "y": 16}}),
        );
        assert_eq!(resp.result.unwrap()["content"][0]["text"], "256");
    }

    #[test]
    fn unknown_tool_is_in_band_error() {
        let resp = call(5, "tools/call", json!({"name": "divide", "arguments": {"x": 1, "y": 2}}));
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], true);
        assert!(result["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("unknown tool"));
    }

    #[test]
    fn missing_operands_is_in_band_error() {
        let resp = call(6, "tools/call", json!({"name": "add", "arguments": {"x": 1}}));
        assert_eq!(resp.result.unwrap()["isError"], true);
    }

    #[test]
    fn unknown_method_is_rpc_error() {
        let resp = call(7, "tools/delete", Value::Null);
        assert_eq!(resp.error.unwrap().code, error_codes::METHOD_NOT_FOUND);
    }

    #[test]
    fn overflow_reported_not_wrapped() {
        let resp = call(
            8,
            "tools/call",
            json!({"name": "multiply", "arguments": {"x": i64::MAX, "y": 2}}),
        );
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(result["content"][0]["text"], "integer overflow");
    }
}
