//! HTTP/WebSocket API for the tic-tac-toe server.
//!
//! # Endpoints
//!
//! - `GET /health` - Server health status
//! - `GET /ws` - Game WebSocket (see [`websocket`])
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tictactoe::{Gateway, SessionRegistry};
//! use ttt_server::api::{AppState, create_router};
//! use ttt_server::config::RateLimitConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = Gateway::new(Arc::new(SessionRegistry::default()));
//! let app = create_router(AppState::new(gateway, RateLimitConfig::default()));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3001").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively so browser clients on any origin can
//! open the socket.

pub mod rate_limiter;
pub mod websocket;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
};
use serde_json::json;
use std::sync::{Arc, atomic::AtomicUsize, atomic::Ordering};
use tictactoe::Gateway;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::config::RateLimitConfig;

/// Application state shared across all HTTP handlers and WebSocket connections.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
    pub rate_limits: RateLimitConfig,
    /// Currently open WebSocket connections
    pub connections: Arc<AtomicUsize>,
}

impl AppState {
    pub fn new(gateway: Gateway, rate_limits: RateLimitConfig) -> Self {
        Self {
            gateway: Arc::new(gateway),
            rate_limits,
            connections: Arc::new(AtomicUsize::new(0)),
        }
    }
}

/// Create the API router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ws", get(websocket::websocket_handler))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(state)
}

/// Health check endpoint for monitoring and load balancers.
///
/// ```bash
/// curl http://localhost:3001/health
/// # {"status":"healthy","version":"0.1.0","sessions":2,"connections":3,"timestamp":"..."}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let sessions = state.gateway.registry().len().await;

    let response = json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": sessions,
        "connections": state.connections.load(Ordering::Relaxed),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(response))
}
