//! Wire messages exchanged with clients.
//!
//! Both directions are JSON objects tagged by a `type` field with camelCase
//! payload fields. Session transitions are rendered into [`ServerEvent`]s
//! here so the actor never builds wire shapes by hand.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::connection::ConnectionId;
use crate::game::{
    board::{Board, ParticipantIndex, WinResult},
    errors::GameError,
    session::{Session, SessionCode, SessionEvent},
};

/// Rejection code carried by [`ServerEvent::Error`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    GameFull,
    NotYourTurn,
    CellTaken,
    InvalidInput,
    /// Only emitted by the transport layer.
    RateLimited,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::NotFound => "NOT_FOUND",
            Self::GameFull => "GAME_FULL",
            Self::NotYourTurn => "NOT_YOUR_TURN",
            Self::CellTaken => "CELL_TAKEN",
            Self::InvalidInput => "INVALID_INPUT",
            Self::RateLimited => "RATE_LIMITED",
        };
        write!(f, "{repr}")
    }
}

/// A command sent by a client.
///
/// Game ids and cell indices arrive unvalidated; the gateway checks them
/// before any session is touched.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum ClientCommand {
    /// Open a new session and take the first seat.
    CreateGame,
    /// Take the second seat of an existing session.
    JoinGame { game_id: String },
    /// Place a mark on a cell (0-8, row-major).
    MakeMove {
        game_id: String,
        #[serde(alias = "cellIndex")]
        index: i64,
    },
    /// Clear the board and start over with the same participants.
    RestartGame { game_id: String },
}

/// An event delivered to one or more connections.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// Unicast to the creator.
    GameCreated { game_id: SessionCode },
    GameStarted {
        game_id: SessionCode,
        board: Board,
        current_turn: ParticipantIndex,
        players: Vec<ConnectionId>,
    },
    GameUpdated {
        board: Board,
        current_turn: ParticipantIndex,
    },
    /// `winner` is the winning participant index, or -1 for a draw.
    GameOver {
        winner: i8,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        winning_line: Option<[usize; 3]>,
        board: Board,
    },
    /// The other participant disconnected; the session is gone.
    PlayerLeft,
    /// Unicast rejection of the originating command.
    Error { code: ErrorCode, message: String },
}

impl ServerEvent {
    pub fn rejected(error: &GameError) -> Self {
        Self::Error {
            code: error.code(),
            message: error.to_string(),
        }
    }

    pub fn started(session: &Session) -> Self {
        Self::GameStarted {
            game_id: session.code().clone(),
            board: *session.board(),
            current_turn: session.turn(),
            players: session.participants().to_vec(),
        }
    }

    /// Render a session transition as the event broadcast to its members.
    ///
    /// Returns `None` for transitions nobody is told about.
    pub fn for_transition(session: &Session, event: SessionEvent) -> Option<Self> {
        let rendered = match event {
            SessionEvent::Joined { .. } => return None,
            SessionEvent::Started => Self::started(session),
            SessionEvent::Finished(WinResult::Win { winner, line }) => Self::GameOver {
                winner: winner as i8,
                winning_line: Some(line),
                board: *session.board(),
            },
            SessionEvent::Finished(WinResult::Draw) => Self::GameOver {
                winner: -1,
                winning_line: None,
                board: *session.board(),
            },
            SessionEvent::Updated | SessionEvent::Finished(WinResult::None) => Self::GameUpdated {
                board: *session.board(),
                current_turn: session.turn(),
            },
        };
        Some(rendered)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_commands() {
        let create: ClientCommand = serde_json::from_str(r#"{"type":"CreateGame"}"#).unwrap();
        assert_eq!(create, ClientCommand::CreateGame);

        let join: ClientCommand =
            serde_json::from_str(r#"{"type":"JoinGame","gameId":"abc123"}"#).unwrap();
        assert_eq!(
            join,
            ClientCommand::JoinGame {
                game_id: "abc123".to_string()
            }
        );

        let mv: ClientCommand =
            serde_json::from_str(r#"{"type":"MakeMove","gameId":"ABC123","index":4}"#).unwrap();
        assert_eq!(
            mv,
            ClientCommand::MakeMove {
                game_id: "ABC123".to_string(),
                index: 4
            }
        );

        let aliased: ClientCommand =
            serde_json::from_str(r#"{"type":"MakeMove","gameId":"ABC123","cellIndex":-1}"#)
                .unwrap();
        assert_eq!(
            aliased,
            ClientCommand::MakeMove {
                game_id: "ABC123".to_string(),
                index: -1
            }
        );
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        assert!(serde_json::from_str::<ClientCommand>(r#"{"type":"Resign"}"#).is_err());
        assert!(serde_json::from_str::<ClientCommand>(r#"{"type":"JoinGame"}"#).is_err());
    }

    #[test]
    fn test_game_over_draw_omits_line() {
        let event = ServerEvent::GameOver {
            winner: -1,
            winning_line: None,
            board: Board::new(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "GameOver");
        assert_eq!(value["winner"], -1);
        assert!(value.get("winningLine").is_none());
    }

    #[test]
    fn test_error_event_shape() {
        let event = ServerEvent::rejected(&GameError::CellTaken);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({"type": "Error", "code": "CELL_TAKEN", "message": "Cell already taken"})
        );
    }

    #[test]
    fn test_player_left_shape() {
        let value = serde_json::to_value(ServerEvent::PlayerLeft).unwrap();
        assert_eq!(value, json!({"type": "PlayerLeft"}));
    }

    #[test]
    fn test_started_event_uses_camel_case() {
        let mut session = Session::new(SessionCode::parse("QWE789").unwrap());
        let a = ConnectionId::new();
        let b = ConnectionId::new();
        session.join(a).unwrap();
        let event = session.join(b).unwrap();

        let rendered = ServerEvent::for_transition(&session, event).unwrap();
        let value = serde_json::to_value(&rendered).unwrap();
        assert_eq!(value["type"], "GameStarted");
        assert_eq!(value["gameId"], "QWE789");
        assert_eq!(value["currentTurn"], 0);
        assert_eq!(value["players"], json!([a.to_string(), b.to_string()]));
        assert_eq!(value["board"], json!(["", "", "", "", "", "", "", "", ""]));
    }

    #[test]
    fn test_joined_is_not_broadcast() {
        let mut session = Session::new(SessionCode::parse("QWE789").unwrap());
        let event = session.join(ConnectionId::new()).unwrap();
        assert_eq!(ServerEvent::for_transition(&session, event), None);
    }

    #[test]
    fn test_error_code_display_matches_wire() {
        for code in [
            ErrorCode::NotFound,
            ErrorCode::GameFull,
            ErrorCode::NotYourTurn,
            ErrorCode::CellTaken,
            ErrorCode::InvalidInput,
            ErrorCode::RateLimited,
        ] {
            let wire = serde_json::to_value(code).unwrap();
            assert_eq!(wire, json!(code.to_string()));
        }
    }
}
