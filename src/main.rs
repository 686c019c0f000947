//! Agenda MCP Server - Main entry point
//!
//! This is the main executable for the Agenda MCP Server, which provides a
//! Model Context Protocol (MCP) interface to a SQLite-backed personal
//! contacts-and-calendar store.

use agenda_mcp_server::{AgendaMcpServer, Config, Database};
use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load configuration first so LOG_LEVEL can seed the filter
    let config = Config::from_env()?;

    // Initialize logging (stderr only to avoid polluting stdout/MCP communication)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Configuration loaded successfully");
    info!("Opening database at {}", config.db_path);

    // Open the shared connection; the embedded schema is applied here
    let db = Database::open(&config.db_path)?;

    // Create the MCP server (services are constructed internally)
    let server = AgendaMcpServer::new(db);
    info!("Agenda MCP Server initialized");

    // Run the server (this will block until the server exits)
    info!("Starting MCP server with stdio transport");
    agenda_mcp_server::server::run_server(server).await?;

    info!("Agenda MCP Server shutdown complete");
    Ok(())
}
