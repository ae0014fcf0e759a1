//! Realty MCP Server - Main entry point
//!
//! Serves the listing marketplace tools over the Model Context Protocol on
//! stdin/stdout.

use anyhow::Result;
use realty_mcp_server::client::{AsyncBackendClient, AsyncBackendClientImpl};
use realty_mcp_server::repositories::{
    ProfileRepository, PropertyRepository, RestProfileRepository, RestPropertyRepository,
    RestSavedPropertyRepository, RestSavedSearchRepository, SavedPropertyRepository,
    SavedSearchRepository,
};
use realty_mcp_server::{BackendClient, Config, RealtyMcpServer};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load configuration before logging so LOG_LEVEL can seed the filter
    let config = Config::from_env();

    // Initialize logging (stderr only to avoid polluting stdout/MCP communication)
    let fallback = config
        .as_ref()
        .map(|c| c.log_level.clone())
        .unwrap_or_else(|_| "error".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match config {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    info!("Starting Realty MCP Server with backend: {}", config.backend_url);
    match &config.user_id {
        Some(user) => info!("Signed in as user {}", user),
        None => info!("No user configured; account tools will ask to sign in"),
    }

    let sync_client = BackendClient::new(&config);
    let client = Arc::new(AsyncBackendClientImpl::new(sync_client)) as Arc<dyn AsyncBackendClient>;

    let property_repo =
        Arc::new(RestPropertyRepository::new(client.clone())) as Arc<dyn PropertyRepository>;
    let saved_repo = Arc::new(RestSavedPropertyRepository::new(client.clone()))
        as Arc<dyn SavedPropertyRepository>;
    let profile_repo =
        Arc::new(RestProfileRepository::new(client.clone())) as Arc<dyn ProfileRepository>;
    let search_repo = Arc::new(RestSavedSearchRepository::new(client.clone()))
        as Arc<dyn SavedSearchRepository>;

    let server = RealtyMcpServer::new(
        property_repo,
        saved_repo,
        profile_repo,
        search_repo,
        client,
        &config,
    );
    let metrics = server.metrics();

    info!(
        "Market cache TTL: {} minutes, search cap: {} rows",
        config.market_cache_ttl_minutes, config.max_search_results
    );

    info!("Starting MCP server with stdio transport");
    realty_mcp_server::server::run_server(server).await?;

    let summary = metrics.summary();
    info!(
        "Realty MCP Server shutdown complete: {} requests, {} errors, {:.1}ms avg",
        summary.http_requests_total, summary.http_errors_total, summary.http_duration_avg_ms
    );
    Ok(())
}
