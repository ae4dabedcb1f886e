//! Housing Contact - Main entry point
//!
//! Runs the contact dispatch MCP server over stdio.

use anyhow::Result;
use housing_contact::transport::{AsyncGraphqlClient, AsyncTransport, RetryingTransport};
use housing_contact::{Config, ContactDispatcher, ContactMcpServer, GraphqlClient, TracingLauncher};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load configuration first so LOG_LEVEL can seed the filter
    let config = Config::from_env();

    // Initialize logging (stderr only to avoid polluting stdout/MCP communication)
    let default_level = config
        .as_ref()
        .map(|cfg| cfg.log_level.clone())
        .unwrap_or_else(|_| "error".to_string());
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

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

    info!(
        "Starting Housing Contact server with API URL: {}",
        config.api_base_url
    );
    if config.api_token.is_none() {
        info!("No CONTACT_API_TOKEN set; backend requests are sent unauthenticated");
    }

    // Initialize the backend transport
    let sync_client = GraphqlClient::new(&config);
    let metrics = sync_client.metrics().clone();
    let transport = Arc::new(
        RetryingTransport::new(AsyncGraphqlClient::new(sync_client), config.retry_policy())
            .with_metrics(metrics.clone()),
    ) as Arc<dyn AsyncTransport>;

    let dispatcher = Arc::new(ContactDispatcher::from_config(
        &config,
        transport,
        Arc::new(TracingLauncher),
    ));

    let server = ContactMcpServer::new(dispatcher, metrics, config.whatsapp_use_web);

    info!("Housing Contact server initialized");
    info!(
        "Retry policy: {} attempts, {}ms base delay, {}ms ceiling",
        config.max_retries, config.retry_base_delay_ms, config.retry_max_delay_ms
    );

    // Run the server (this will block until the server exits)
    info!("Starting MCP server with stdio transport");
    housing_contact::server::run_server(server).await?;

    info!("Housing Contact server shutdown complete");
    Ok(())
}
