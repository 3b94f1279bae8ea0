//! MCP server command implementation.

use std::net::SocketAddr;

use bastion_core::ExecutorConfig;
use bastion_mcp::BastionMcpServer;

use super::runtime;
use crate::cli::Transport;
use crate::errors::CliError;
use crate::ui;

/// Start the MCP server on the chosen transport.
pub fn serve(
    config: ExecutorConfig,
    transport: Transport,
    bind: SocketAddr,
    path: &str,
) -> Result<(), CliError> {
    if !config.simulate {
        ui::warning("Live mode: tool calls will change the managed systems");
    }

    let rt = runtime()?;

    rt.block_on(async {
        let server = BastionMcpServer::standard(config).map_err(|e| {
            ui::error_with_details("Failed to create MCP server", &e.to_string());
            CliError::CatalogError
        })?;

        let result = match transport {
            // Blocks until the connection closes
            Transport::Stdio => server.serve_stdio().await,
            Transport::Http => {
                ui::info(&format!("Serving MCP on http://{}{}", bind, path));
                server.serve_http(bind, path).await
            }
        };

        result.map_err(|e| {
            ui::error_with_details("MCP server error", &e.to_string());
            CliError::ServerError
        })
    })
}
