pub mod api;
pub mod config;
pub mod models;
pub mod pipeline;
pub mod store;

#[cfg(test)]
mod test_support;

use tracing_subscriber::EnvFilter;

/// Process entry point: tracing, configuration, server, then wait for
/// Ctrl-C and drain.
pub async fn run() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let service_config = config::ServiceConfig::from_env();
    tracing::info!(
        ml_service_url = %service_config.ml_service_url,
        port = service_config.port,
        html_engine = %service_config.html_engine,
        request_timeout_secs = service_config.request_timeout.as_secs(),
        "Configuration loaded"
    );

    let ctx = api::ApiContext::from_config(&service_config)
        .map_err(|e| format!("Failed to build HTTP clients: {e}"))?;

    let mut server = api::start_server_on(ctx, service_config.bind_addr()).await?;

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }

    server.shutdown();
    server.stopped().await;
    Ok(())
}
