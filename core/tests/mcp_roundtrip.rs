//! End-to-end exercise of the calculator server and its client.

use serde_json::json;
use toolsmith_core::mcp::{self, McpClient, ENDPOINT_PATH};
use toolsmith_core::tools::ToolStatus;

async fn start_server() -> String {
    let server = mcp::bind("127.0.0.1:0").await.expect("bind");
    let addr = server.local_addr();
    tokio::spawn(async move {
        let _ = server.serve().await;
    });
    format!("http://{addr}{ENDPOINT_PATH}")
}

#[tokio::test]
async fn handshake_listing_and_arithmetic() {
    let endpoint = start_server().await;
    let client = McpClient::new(&endpoint).expect("client");

    client.initialize().await.expect("initialize");

    let tools = client.list_tools().await.expect("list_tools");
    let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["add", "multiply"]);

    let sum = client
        .call_tool("call-1", "add", json!({"x": 16, "y": 16}))
        .await
        .expect("add");
    assert_eq!(sum.tool_use_id, "call-1");
    assert_eq!(sum.status, ToolStatus::Success);
    assert_eq!(sum.text(), "32");

    let product = client
        .call_tool("call-2", "multiply", json!({"x": 16, "y": 16}))
        .await
        .expect("multiply");
    assert_eq!(product.text(), "256");
}

#[tokio::test]
async fn unknown_tool_surfaces_error_envelope() {
    let endpoint = start_server().await;
    let client = McpClient::new(&endpoint).expect("client");

    let result = client
        .call_tool("call-3", "subtract", json!({"x": 1, "y": 2}))
        .await
        .expect("call completes at transport level");
    assert_eq!(result.status, ToolStatus::Error);
    assert!(result.text().contains("unknown tool"));
}
