//! WebSocket transport for game commands and events.
//!
//! # Connection Flow
//!
//! 1. Client connects via `GET /ws`
//! 2. The gateway registers the connection and hands back its outbound queue
//! 3. A send task drains the queue into the socket as JSON text frames
//! 4. The receive loop rate-limits, decodes and dispatches client commands;
//!    binary frames are answered with an `INVALID_INPUT` error
//! 5. On disconnect the reaper retires the connection's session
//!
//! # Example
//!
//! ```javascript
//! const ws = new WebSocket('ws://localhost:3001/ws');
//!
//! ws.onmessage = (event) => {
//!   const data = JSON.parse(event.data);
//!   if (data.type === 'GameCreated') {
//!     shareCode(data.gameId);
//!   }
//! };
//!
//! ws.send(JSON.stringify({ type: 'CreateGame' }));
//! ```

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use log::{error, warn};
use std::sync::atomic::Ordering;
use tictactoe::{ClientCommand, GameError, ServerEvent};
use tokio::sync::mpsc;

use super::{AppState, rate_limiter::MessageLimits};
use crate::{logging, metrics};

/// Upgrade an HTTP connection to a game WebSocket.
pub async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Serve one WebSocket connection until it closes.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<ServerEvent>();
    let mut connection = state.gateway.connect(outbound_tx);
    let connection_id = connection.id().to_string();

    let active = state.connections.fetch_add(1, Ordering::Relaxed) + 1;
    metrics::connection_opened(active);
    logging::log_connection_event("connected", &connection_id, None);

    let mut limits = MessageLimits::new(&state.rate_limits);

    // Events are written in the order the sessions queued them.
    let send_task = tokio::spawn(async move {
        while let Some(event) = outbound_rx.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(j) => j,
                Err(e) => {
                    error!("Failed to serialize event: {}", e);
                    continue;
                }
            };

            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
            metrics::event_sent(&event);
        }
    });

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(frame @ (Message::Text(_) | Message::Binary(_))) => {
                metrics::frame_received();

                if let Err(limiter) = limits.admit() {
                    logging::log_rate_limited(&connection_id, limiter);
                    metrics::rate_limited(limiter);
                    connection.reject(&GameError::RateLimited);
                    continue;
                }

                let Message::Text(text) = frame else {
                    logging::log_malformed_message(&connection_id, "binary frame");
                    connection.reject(&invalid_format());
                    continue;
                };

                match serde_json::from_str::<ClientCommand>(&text) {
                    Ok(command) => {
                        state.gateway.dispatch(&mut connection, command).await;
                        metrics::sessions_live(state.gateway.registry().len().await);
                    }
                    Err(e) => {
                        logging::log_malformed_message(&connection_id, &e.to_string());
                        connection.reject(&invalid_format());
                    }
                }
            }
            Ok(Message::Close(_)) => break,
            Err(e) => {
                warn!("WebSocket error on {}: {}", connection_id, e);
                break;
            }
            _ => {}
        }
    }

    let session = state.gateway.disconnect(connection).await;
    send_task.abort();

    let active = state.connections.fetch_sub(1, Ordering::Relaxed) - 1;
    metrics::connection_closed(active);
    metrics::sessions_live(state.gateway.registry().len().await);
    logging::log_connection_event(
        "disconnected",
        &connection_id,
        session.as_ref().map(|code| code.as_str()),
    );
}

fn invalid_format() -> GameError {
    GameError::InvalidInput("Invalid message format".to_string())
}
