//! # Server Mode
//!
//! Runs the aitta_mcp server over stdio, the default mode for MCP
//! integration.

use std::sync::Arc;

use anyhow::Result;
use rmcp::ServiceExt;
use tokio::signal;
use tracing::info;

use crate::guard::AccessGuard;
use crate::mcp_service::AittaMcpService;

/// Run the stdio MCP server until the client disconnects or a shutdown
/// signal arrives.
pub async fn run_server_mode(guard: Arc<AccessGuard>) -> Result<()> {
    info!(
        "Starting {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let service_handler = AittaMcpService::new(guard);
    let service = service_handler.serve(rmcp::transport::stdio()).await?;

    // stdio clients normally just close the pipe, but editors and file
    // watchers send SIGTERM/SIGINT on reload; exit promptly on either.
    tokio::spawn(async move {
        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("Received SIGINT, shutting down");
            }
            _ = async {
                #[cfg(unix)]
                {
                    let mut term_signal =
                        signal::unix::signal(signal::unix::SignalKind::terminate())
                            .expect("Failed to setup SIGTERM handler");
                    term_signal.recv().await;
                }
                #[cfg(not(unix))]
                {
                    std::future::pending::<()>().await;
                }
            } => {
                info!("Received SIGTERM, shutting down");
            }
        }
        std::process::exit(0);
    });

    service.waiting().await?;
    Ok(())
}
