//! Self-contained client/server proof run
//!
//! Spawns the calculator server in-process, waits a fixed beat for it to
//! come up, then drives a scripted add/multiply session against it. The
//! fixed sleep is the startup handshake; there is no readiness probe.

use anyhow::Result;
use serde_json::json;
use std::time::Duration;
use toolsmith_core::mcp::{self, McpClient, ENDPOINT_PATH};
use uuid::Uuid;

/// Run the scripted proof session on `port`
pub async fn proof_command(port: u16) -> Result<()> {
    let server = mcp::bind(&format!("127.0.0.1:{port}")).await?;
    let addr = server.local_addr();
    let handle = tokio::spawn(async move {
        let _ = server.serve().await;
    });

    // Give the listener a moment before the first request
    tokio::time::sleep(Duration::from_secs(1)).await;

    let client = McpClient::new(format!("http://{addr}{ENDPOINT_PATH}"))?;
    client.initialize().await?;

    let tools = client.list_tools().await?;
    println!("server exposes {} tools:", tools.len());
    for tool in &tools {
        println!("  {} - {}", tool.name, tool.description);
    }

    let sum = client
        .call_tool(&Uuid::new_v4().to_string(), "add", json!({"x": 16, "y": 16}))
        .await?;
    println!("add(16, 16) = {}", sum.text());

    let product = client
        .call_tool(
            &Uuid::new_v4().to_string(),
            "multiply",
            json!({"x": 16, "y": 16}),
        )
        .await?;
    println!("multiply(16, 16) = {}", product.text());

    handle.abort();
    println!("DONE");
    Ok(())
}
