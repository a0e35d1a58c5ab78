use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use kindred::config::{ConfigLoader, KindredConfig, LogLevel};
use tokio::net::TcpListener;
use tracing::{info, warn};

use kindred_server::cli::CliArgs;
use kindred_server::config::ServerConfig;
use kindred_server::{AppState, create_app};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli_args = CliArgs::parse();

    // Load configuration from CLI arguments and environment variables
    let server_config = ServerConfig::from_cli_and_env(cli_args.clone())?;

    let mut kindred_config = load_kindred_config(&server_config)?;
    if let Some(level) = cli_args.log_level.as_deref() {
        kindred_config.logging.level = level.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
    }
    if server_config.seed_demo {
        kindred_config.seed.demo = true;
    }

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = kindred::logging::init(&kindred_config.logging)?;

    info!("Starting Kindred server v{}", kindred::VERSION);
    if let Some(path) = &server_config.config_file_path {
        info!("Loaded Kindred configuration from: {}", path.display());
    }

    let family_manager = kindred::init(kindred_config).await?;
    info!(
        max_parents = family_manager.policy().max_parents,
        "Kindred family manager initialized"
    );

    let app_state = Arc::new(AppState::new(family_manager, server_config.clone()));
    let app = create_app(app_state);

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], server_config.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server listening on {}", addr);
    info!("OpenAPI document available at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Library config from the explicit file, or the default search path and environment
fn load_kindred_config(server_config: &ServerConfig) -> Result<KindredConfig> {
    let mut loader = ConfigLoader::new();

    match &server_config.config_file_path {
        Some(path) => {
            loader.load_file(path)?;
        }
        None => {
            loader.load_default_files();
        }
    }
    loader.load_env();

    Ok(loader.extract()?)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
