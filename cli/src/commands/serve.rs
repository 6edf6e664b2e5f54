//! Long-running calculator server command

use anyhow::Result;
use toolsmith_core::mcp;
use tracing::info;

/// Serve the calculator endpoint until interrupted
pub async fn serve_command(host: String, port: u16) -> Result<()> {
    let server = mcp::bind(&format!("{host}:{port}")).await?;
    info!(addr = %server.local_addr(), "serving calculator tools");
    println!("calculator server on http://{}{}", server.local_addr(), mcp::ENDPOINT_PATH);
    server.serve().await?;
    Ok(())
}
