// src/main.rs
use anyhow::Result;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

use stack_health::{
    config,
    health::HealthAggregator,
    probe::{CacheProbe, DatabaseProbe, FilesProbe},
    server::{handler::RequestHandler, ServerBuilder},
    settings::FileSettings,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stack_health=debug".parse()?)
                .add_directive("hyper=info".parse()?)
                .add_directive("sqlx=warn".parse()?),
        )
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yaml".to_string());

    info!("Loading configuration from: {}", config_path);
    let config = config::load_config(&config_path).await?;
    let probe_timeout = config.probe_timeout();

    // Wire the probes; registration order is report order.
    let settings = Arc::new(FileSettings::new(&config.settings_path));
    let aggregator = Arc::new(
        HealthAggregator::new(probe_timeout)
            .register(DatabaseProbe::new(settings, probe_timeout))
            .register(CacheProbe::from_env(probe_timeout))
            .register(FilesProbe::new(&config.files_dir)),
    );

    let handler = RequestHandler::new(aggregator);

    info!("Starting health endpoint on {}", config.listen_addr);
    let server = ServerBuilder::new(config.listen_addr).with_handler(handler);

    tokio::select! {
        result = server.serve() => result?,
        _ = shutdown_signal() => {}
    }

    Ok(())
}

// Graceful shutdown handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
