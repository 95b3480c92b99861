// Main entry point for the lead discovery API server

use anyhow::{Context, Result};
use server_core::{kernel::start_scheduler, kernel::ServerDeps, server::build_app, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,lead_discovery=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Lead Discovery API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        concurrency = config.enrich_concurrency,
        directory = config.directory_listing_url.is_some(),
        search = config.tavily_api_key.is_some(),
        "Configuration loaded"
    );

    // Wire the pipeline
    let server_deps = ServerDeps::from_config(&config).context("Failed to build pipeline")?;

    // Housekeeping: drop finished jobs after the retention window
    let _scheduler = start_scheduler(server_deps.registry.clone(), config.job_retention)
        .await
        .context("Failed to start scheduled tasks")?;

    // Build application
    let app = build_app(server_deps, &config.allowed_origins);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
