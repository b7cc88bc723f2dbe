use cpf_consult_proxy::app::build_router;
use cpf_consult_proxy::config::Config;
use cpf_consult_proxy::handlers::AppState;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// Initializes logging, loads configuration (refusing to start without an
/// `API_TOKEN`), builds the consult client and serves the router.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cpf_consult_proxy=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    let state = AppState::from_config(config.clone())
        .map_err(|e| anyhow::anyhow!("Failed to initialize consult client: {}", e))?;
    tracing::info!("✓ Consult client initialized: {}", config.consult_base_url);

    let app = build_router(Arc::new(state));

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
