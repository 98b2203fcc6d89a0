//! Multi-room bluff game server.
//!
//! Each room runs as its own actor managed by a `RoomManager`; clients talk
//! to the server over a single WebSocket endpoint.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Error;
use bluff::RoomManager;
use bluff_server::{api, config::ServerConfig, logging, metrics};
use pico_args::Arguments;
use tracing::info;

const HELP: &str = "\
Run a multi-room bluff card game server

USAGE:
  bluff_server [OPTIONS]

OPTIONS:
  --bind          IP:PORT  Server socket bind address      [default: env SERVER_BIND, 0.0.0.0:$PORT or 127.0.0.1:4000]
  --metrics-bind  IP:PORT  Prometheus exporter bind address [default: env METRICS_BIND, disabled if unset]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  PORT                     Port to listen on all interfaces when SERVER_BIND is unset
  METRICS_BIND             Prometheus exporter bind address
  DECK_PRESET              standard (52 cards) or court (A, J, Q, K only)
  ROOM_MAX_PLAYERS         Seats per room [default: 12]
  STRICT_CHALLENGES        Only the last claimant may be challenged [default: false]
  RUST_LOG                 Log filter [default: info,tower_http=warn]
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    let bind: Option<SocketAddr> = pargs.opt_value_from_str("--bind")?;
    let metrics_bind: Option<SocketAddr> = pargs.opt_value_from_str("--metrics-bind")?;

    logging::init();

    let config = ServerConfig::from_env(bind, metrics_bind)?;
    config.validate()?;

    if let Some(addr) = config.metrics_bind {
        metrics::init_metrics(addr).map_err(Error::msg)?;
        info!("Prometheus metrics available at http://{}/metrics", addr);
    }

    info!(
        "Rooms deal {} cards, seat up to {} players, {:?} challenges",
        config.room.deck.size(),
        config.room.max_players,
        config.room.challenge_policy
    );

    let room_manager = Arc::new(RoomManager::new(config.room.clone()));
    let app = api::create_router(api::AppState::new(room_manager));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", config.bind, e))?;

    info!(
        "Server is running at http://{} (WebSocket at /ws). Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
}
