//! MCP server for the realty marketplace.
//!
//! This module provides the MCP protocol server that exposes listing search,
//! favorites, the owner dashboard and account tools to AI assistants.

pub mod handlers;

pub use handlers::RealtyMcpServer;

use anyhow::Result;
use rmcp::transport::io::stdio;
use rmcp::ServiceExt;

/// Run the realty MCP server with stdio transport.
///
/// Communicates via stdin/stdout using the MCP protocol and returns once the
/// client disconnects.
pub async fn run_server(server: RealtyMcpServer) -> Result<()> {
    let service = server.serve(stdio()).await?;

    service.waiting().await?;

    Ok(())
}
