//! Tic-tac-toe rules and the per-match state machine.

pub mod board;
pub mod errors;
pub mod session;

pub use board::{Board, Cell, Mark, ParticipantIndex, WINNING_LINES, WinResult};
pub use errors::GameError;
pub use session::{Session, SessionCode, SessionEvent, SessionStatus};
