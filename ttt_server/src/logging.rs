//! Structured logging configuration.
//!
//! The game crate logs through the `log` facade; `init` installs a tracing
//! subscriber that also captures those records.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info,tower_http=warn,hyper=warn";

/// Initialize structured logging
///
/// Levels are configurable via the `RUST_LOG` env var.
///
/// # Example
///
/// ```no_run
/// use ttt_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true);

    if tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("Logging already initialized");
        return;
    }

    tracing::info!("Structured logging initialized");
}

/// Log a WebSocket lifecycle event with the connection it concerns
///
/// # Arguments
///
/// * `event` - Event name (`connected`, `disconnected`, ...)
/// * `connection_id` - Connection the event belongs to
/// * `session` - Session the connection was part of, if any
pub fn log_connection_event(event: &str, connection_id: &str, session: Option<&str>) {
    tracing::info!(
        kind = event,
        connection_id = connection_id,
        session = session,
        "WebSocket {}",
        event
    );
}

/// Log a message dropped by a rate limiter
pub fn log_rate_limited(connection_id: &str, limiter: &str) {
    tracing::warn!(
        connection_id = connection_id,
        limiter = limiter,
        "RATE LIMIT: message dropped"
    );
}

/// Log an inbound frame that could not be decoded as a command
pub fn log_malformed_message(connection_id: &str, error: &str) {
    tracing::debug!(
        connection_id = connection_id,
        error = error,
        "Malformed client message"
    );
}
