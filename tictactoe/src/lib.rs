//! # Tic-Tac-Toe
//!
//! A real-time, two-player tic-tac-toe session engine.
//!
//! Clients create sessions identified by short codes, a second client joins
//! with the code, and the two alternate moves until a line is completed or
//! the board fills up. Every state change is fanned out to both
//! participants.
//!
//! ## Core Modules
//!
//! - [`game`]: Board rules and the session state machine
//! - [`session`]: Session actors and the registry that owns them
//! - [`gateway`]: Command dispatch and disconnect cleanup
//! - [`net`]: Wire protocol types
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use tictactoe::{ClientCommand, Gateway, ServerEvent, SessionRegistry};
//! use tokio::sync::mpsc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let gateway = Gateway::new(Arc::new(SessionRegistry::default()));
//!
//! let (tx, mut rx) = mpsc::unbounded_channel();
//! let mut connection = gateway.connect(tx);
//! gateway.dispatch(&mut connection, ClientCommand::CreateGame).await;
//!
//! assert!(matches!(rx.recv().await, Some(ServerEvent::GameCreated { .. })));
//! # }
//! ```

/// Board rules and the per-match state machine.
pub mod game;

/// Command dispatch and disconnect cleanup.
pub mod gateway;

/// Wire protocol between clients and the engine.
pub mod net;

/// Session actors and registry.
pub mod session;

pub use game::{
    Board, Cell, GameError, Mark, SessionCode, SessionStatus, WINNING_LINES, WinResult,
};
pub use gateway::{Connection, Gateway, Reaper};
pub use net::{ClientCommand, ConnectionId, ErrorCode, Outbound, ServerEvent};
pub use session::{SessionConfig, SessionHandle, SessionRegistry, SessionSnapshot};
