//! Session actor message types.

use tokio::sync::oneshot;

use crate::game::{
    board::{Board, ParticipantIndex},
    errors::GameError,
    session::{SessionCode, SessionStatus},
};
use crate::net::connection::{ConnectionId, Outbound};

/// Result of a command handled by a session actor.
pub type SessionResponse = Result<(), GameError>;

/// A connection as seen by a session: its identity and where to deliver
/// broadcasts.
#[derive(Debug, Clone)]
pub struct Participant {
    pub connection_id: ConnectionId,
    pub outbound: Outbound,
}

/// Messages that can be sent to a SessionActor
#[derive(Debug)]
pub enum SessionMessage {
    /// Take a seat
    Join {
        participant: Participant,
        response: oneshot::Sender<SessionResponse>,
    },

    /// Place a mark
    MakeMove {
        connection_id: ConnectionId,
        cell: usize,
        response: oneshot::Sender<SessionResponse>,
    },

    /// Clear the board and start over
    Restart {
        connection_id: ConnectionId,
        response: oneshot::Sender<SessionResponse>,
    },

    /// Connection lost or moved on.
    ///
    /// Responds `true` if the connection was a participant, in which case
    /// the remaining participants were told and the actor has shut down.
    Abandon {
        connection_id: ConnectionId,
        response: oneshot::Sender<bool>,
    },

    /// Read-only view of the session
    Snapshot {
        response: oneshot::Sender<SessionSnapshot>,
    },
}

/// Point-in-time copy of a session's state.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SessionSnapshot {
    pub code: SessionCode,
    pub board: Board,
    pub current_turn: ParticipantIndex,
    pub status: SessionStatus,
    pub players: Vec<ConnectionId>,
}
