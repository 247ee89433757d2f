//! Serve command - runs the partner API server

use std::net::SocketAddr;

use clap::Args;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use crate::api::create_router;
use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::observability::init_metrics;

/// Arguments for the serve command
#[derive(Args, Clone, Debug)]
pub struct ServeArgs {
    /// Port to listen on (overrides config)
    #[arg(long)]
    pub port: Option<u16>,
}

/// Run the API server
pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&logging::LoggingConfig::from(&config.logging));

    let state = crate::create_app_state(&config.partners)?;
    let metrics = init_metrics(&config.metrics);
    let app = create_router(state, metrics);

    let addr = build_socket_addr(&config, args.port)?;
    info!("Starting partner API server on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Partner API server shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

fn build_socket_addr(config: &AppConfig, port: Option<u16>) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        port.unwrap_or(config.server.port),
    )))
}
