// Binary entry point for aitta_mcp
// This is a thin wrapper that delegates to the library implementation

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = aitta_mcp::shell::run().await {
        eprintln!("aitta_mcp fatal error: {:#}", e);
        return Err(e);
    }
    Ok(())
}
