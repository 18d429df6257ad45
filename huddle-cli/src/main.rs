mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use huddle_server::{RoomRegistry, SignalingDispatcher, serve};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("huddle=info,huddle_server=info")),
        )
        .init();

    let config = Cli::parse().into_config();
    info!("Starting huddle with {:?}", config);

    let dispatcher = SignalingDispatcher::new(RoomRegistry::new());

    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;

    tokio::select! {
        result = serve(listener, dispatcher, config) => {
            result.context("Signaling server failed")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
