//! Real-time tic-tac-toe server.
//!
//! Serves the [`tictactoe`] session engine over WebSockets with axum.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
