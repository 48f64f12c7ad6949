//! Prometheus metrics.
//!
//! Recorded through the `metrics` facade, so every call is a no-op until
//! [`init_metrics`] installs the exporter.
//!
//! ```rust,no_run
//! use ttt_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//! metrics::sessions_live(3);
//! ```

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tictactoe::ServerEvent;

/// Serve metrics at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

/// A socket was accepted; `active` is the count including it.
pub fn connection_opened(active: usize) {
    metrics::counter!("ttt_connections_total").increment(1);
    metrics::gauge!("ttt_connections_active").set(active as f64);
}

/// A socket closed; `active` is the count without it.
pub fn connection_closed(active: usize) {
    metrics::gauge!("ttt_connections_active").set(active as f64);
}

pub fn frame_received() {
    metrics::counter!("ttt_frames_received_total").increment(1);
}

/// An event was written to a socket.
pub fn event_sent(event: &ServerEvent) {
    metrics::counter!("ttt_events_sent_total", "type" => event_type(event)).increment(1);

    if let ServerEvent::Error { code, .. } = event {
        metrics::counter!("ttt_commands_rejected_total", "code" => code.to_string())
            .increment(1);
    }
}

pub fn sessions_live(count: usize) {
    metrics::gauge!("ttt_sessions_live").set(count as f64);
}

/// A frame was dropped by the named limiter.
pub fn rate_limited(limiter: &'static str) {
    metrics::counter!("ttt_rate_limited_total", "limiter" => limiter).increment(1);
}

fn event_type(event: &ServerEvent) -> &'static str {
    match event {
        ServerEvent::GameCreated { .. } => "GameCreated",
        ServerEvent::GameStarted { .. } => "GameStarted",
        ServerEvent::GameUpdated { .. } => "GameUpdated",
        ServerEvent::GameOver { .. } => "GameOver",
        ServerEvent::PlayerLeft => "PlayerLeft",
        ServerEvent::Error { .. } => "Error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tictactoe::{Board, GameError};

    #[test]
    fn test_event_type_matches_wire_tag() {
        let events = [
            ServerEvent::PlayerLeft,
            ServerEvent::rejected(&GameError::CellTaken),
            ServerEvent::GameUpdated {
                board: Board::new(),
                current_turn: 1,
            },
        ];
        for event in events {
            let wire = serde_json::to_value(&event).unwrap();
            assert_eq!(wire["type"], event_type(&event));
        }
    }

    #[test]
    fn test_recording_without_exporter_is_noop() {
        connection_opened(1);
        frame_received();
        event_sent(&ServerEvent::rejected(&GameError::NotFound));
        sessions_live(0);
        rate_limited("burst");
        connection_closed(0);
    }
}
