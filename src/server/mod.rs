//! MCP server for contact dispatch.
//!
//! This module provides the MCP protocol server that exposes the dispatch
//! API (email, SMS, WhatsApp, calls, listing inquiries) to MCP clients.

pub mod handlers;

pub use handlers::ContactMcpServer;

use anyhow::Result;
use rmcp::transport::io::stdio;
use rmcp::ServiceExt;

/// Run the contact MCP server with stdio transport.
///
/// Communicates via stdin/stdout using the MCP protocol and runs until the
/// client disconnects.
pub async fn run_server(server: ContactMcpServer) -> Result<()> {
    let service = server.serve(stdio()).await?;

    service.waiting().await?;

    Ok(())
}
