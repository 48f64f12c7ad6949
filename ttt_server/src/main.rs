//! Tic-tac-toe server using the session actor model.
//!
//! Every game runs in its own actor task; the gateway routes WebSocket
//! commands to them through the session registry.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Error};
use log::{error, info, warn};
use pico_args::Arguments;
use tictactoe::{Gateway, SessionRegistry};
use ttt_server::{api, config::ServerConfig, logging, metrics};

const HELP: &str = "\
Run a real-time tic-tac-toe server

USAGE:
  ttt_server [OPTIONS]

OPTIONS:
  --bind          IP:PORT  Server socket bind address     [default: env SERVER_BIND or 127.0.0.1:3001]
  --metrics-bind  IP:PORT  Prometheus exporter address    [default: env METRICS_BIND, disabled if unset]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:3001)
  METRICS_BIND             Prometheus exporter bind address
  SESSION_INBOX_CAPACITY   Commands buffered per session  [default: 64]
  SESSION_CODE_ATTEMPTS    Code draws before overwriting  [default: 8]
  WS_BURST_LIMIT           Messages per second per client [default: 10]
  WS_SUSTAINED_LIMIT       Messages per minute per client [default: 100]
  RUST_LOG                 Log filter                     [default: info]
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let bind: Option<SocketAddr> = pargs
        .opt_value_from_str("--bind")
        .context("Invalid --bind address")?;
    let metrics_bind: Option<SocketAddr> = pargs
        .opt_value_from_str("--metrics-bind")
        .context("Invalid --metrics-bind address")?;

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        anyhow::bail!("Unexpected arguments: {:?}", remaining);
    }

    logging::init();

    let config = ServerConfig::from_env(bind, metrics_bind)?;
    config.validate()?;

    if let Some(addr) = config.metrics_bind {
        match metrics::init_metrics(addr) {
            Ok(()) => info!("Prometheus metrics exposed at http://{}/metrics", addr),
            Err(e) => warn!("{}", e),
        }
    }

    let registry = Arc::new(SessionRegistry::new(config.session.clone()));
    let gateway = Gateway::new(registry);
    let app = api::create_router(api::AppState::new(gateway, config.rate_limits));

    info!("Starting HTTP/WebSocket server on {}", config.bind);
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install CTRL+C signal handler: {}", e);
        std::future::pending::<()>().await;
    }
}
