//! Session state machine for a single match.
//!
//! A session moves through three states:
//!
//! - **Waiting**: fewer than two participants, no board activity
//! - **Playing**: two participants, moves accepted in strict alternation
//! - **Finished**: a line was completed or the board filled up; only a
//!   restart leaves this state
//!
//! The state machine is synchronous and owns no I/O. Delivery of the
//! resulting events is handled by the session actor.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    board::{BOARD_SIZE, Board, Mark, ParticipantIndex, WinResult},
    errors::GameError,
};
use crate::net::connection::ConnectionId;

/// Length of a session code.
pub const CODE_LENGTH: usize = 6;

/// Maximum number of participants in one session.
pub const MAX_PARTICIPANTS: usize = 2;

const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Short human-typeable session identifier, always upper-case.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct SessionCode(String);

impl SessionCode {
    /// Draw a fresh random code. Uniqueness is the registry's concern.
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let code = (0..CODE_LENGTH)
            .map(|_| CODE_CHARSET[rng.random_range(0..CODE_CHARSET.len())] as char)
            .collect();
        Self(code)
    }

    /// Normalize user input into a code.
    ///
    /// Codes are case-insensitive; surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Result<Self, GameError> {
        let code = input.trim().to_ascii_uppercase();
        if code.len() != CODE_LENGTH || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(GameError::InvalidInput(format!(
                "game id must be {CODE_LENGTH} letters or digits"
            )));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Waiting,
    Playing,
    Finished,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Waiting => "waiting",
            Self::Playing => "playing",
            Self::Finished => "finished",
        };
        write!(f, "{repr}")
    }
}

/// State transition produced by an accepted command.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SessionEvent {
    /// A participant was admitted but the session is still waiting.
    Joined { index: ParticipantIndex },
    /// Both seats are filled and a fresh board is in play.
    Started,
    /// A move was accepted and the turn passed to the other participant.
    Updated,
    /// A move ended the game.
    Finished(WinResult),
}

/// One match between (at most) two connections.
#[derive(Clone, Debug)]
pub struct Session {
    code: SessionCode,
    board: Board,
    participants: Vec<ConnectionId>,
    turn: ParticipantIndex,
    status: SessionStatus,
}

impl Session {
    pub fn new(code: SessionCode) -> Self {
        Self {
            code,
            board: Board::new(),
            participants: Vec::with_capacity(MAX_PARTICIPANTS),
            turn: 0,
            status: SessionStatus::Waiting,
        }
    }

    pub fn code(&self) -> &SessionCode {
        &self.code
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Index of the participant expected to move next.
    pub fn turn(&self) -> ParticipantIndex {
        self.turn
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn participants(&self) -> &[ConnectionId] {
        &self.participants
    }

    pub fn participant_index(&self, connection_id: ConnectionId) -> Option<ParticipantIndex> {
        self.participants.iter().position(|id| *id == connection_id)
    }

    pub fn contains(&self, connection_id: ConnectionId) -> bool {
        self.participant_index(connection_id).is_some()
    }

    /// Admit a connection.
    ///
    /// Only legal while waiting with a free seat. Filling the second seat
    /// starts the game. A full or started session answers `GameFull` even to
    /// its own participants.
    pub fn join(&mut self, connection_id: ConnectionId) -> Result<SessionEvent, GameError> {
        if self.status != SessionStatus::Waiting || self.participants.len() >= MAX_PARTICIPANTS {
            return Err(GameError::GameFull);
        }
        if self.contains(connection_id) {
            return Err(GameError::InvalidInput(
                "already joined this game".to_string(),
            ));
        }

        self.participants.push(connection_id);
        if self.participants.len() == MAX_PARTICIPANTS {
            self.status = SessionStatus::Playing;
            Ok(SessionEvent::Started)
        } else {
            Ok(SessionEvent::Joined {
                index: self.participants.len() - 1,
            })
        }
    }

    /// Place the acting participant's mark on `cell`.
    ///
    /// Rejections leave the session untouched.
    pub fn make_move(
        &mut self,
        connection_id: ConnectionId,
        cell: usize,
    ) -> Result<SessionEvent, GameError> {
        if cell >= BOARD_SIZE {
            return Err(GameError::InvalidInput(format!(
                "cell index {cell} out of range"
            )));
        }
        if self.status != SessionStatus::Playing {
            return Err(GameError::NotInProgress);
        }

        let index = self
            .participant_index(connection_id)
            .filter(|index| *index == self.turn)
            .ok_or(GameError::NotYourTurn)?;

        if !self.board.is_cell_empty(cell) {
            return Err(GameError::CellTaken);
        }

        self.board.apply_move(cell, Mark::for_participant(index));

        match self.board.evaluate() {
            WinResult::None => {
                self.turn = 1 - self.turn;
                Ok(SessionEvent::Updated)
            }
            result => {
                self.status = SessionStatus::Finished;
                Ok(SessionEvent::Finished(result))
            }
        }
    }

    /// Clear the board and hand the first move back to participant 0.
    ///
    /// Legal from any status; the participant list is preserved.
    pub fn restart(&mut self) -> SessionEvent {
        self.board.reset();
        self.turn = 0;
        self.status = SessionStatus::Playing;
        SessionEvent::Started
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::Cell;

    fn code() -> SessionCode {
        SessionCode::parse("ABC123").unwrap()
    }

    fn playing_session() -> (Session, ConnectionId, ConnectionId) {
        let mut session = Session::new(code());
        let x = ConnectionId::new();
        let o = ConnectionId::new();
        session.join(x).unwrap();
        session.join(o).unwrap();
        (session, x, o)
    }

    #[test]
    fn test_code_parse_normalizes_case() {
        let code = SessionCode::parse("  ab12cd ").unwrap();
        assert_eq!(code.as_str(), "AB12CD");
    }

    #[test]
    fn test_code_parse_rejects_malformed() {
        for input in ["", "ABC12", "ABC1234", "AB-12C", "ÅBC123"] {
            assert!(
                matches!(SessionCode::parse(input), Err(GameError::InvalidInput(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_generated_code_is_valid() {
        let mut rng = rand::rng();
        for _ in 0..100 {
            let code = SessionCode::generate(&mut rng);
            assert_eq!(code.as_str().len(), CODE_LENGTH);
            assert!(
                code.as_str()
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
            );
            assert_eq!(SessionCode::parse(code.as_str()).unwrap(), code);
        }
    }

    #[test]
    fn test_join_flow() {
        let mut session = Session::new(code());
        assert_eq!(session.status(), SessionStatus::Waiting);

        let first = ConnectionId::new();
        assert_eq!(
            session.join(first).unwrap(),
            SessionEvent::Joined { index: 0 }
        );
        assert_eq!(session.status(), SessionStatus::Waiting);

        let second = ConnectionId::new();
        assert_eq!(session.join(second).unwrap(), SessionEvent::Started);
        assert_eq!(session.status(), SessionStatus::Playing);
        assert_eq!(session.participants(), &[first, second]);

        let third = ConnectionId::new();
        assert_eq!(session.join(third), Err(GameError::GameFull));
        assert_eq!(session.participants().len(), 2);
    }

    #[test]
    fn test_join_twice_is_rejected() {
        let mut session = Session::new(code());
        let id = ConnectionId::new();
        session.join(id).unwrap();
        assert!(matches!(session.join(id), Err(GameError::InvalidInput(_))));
        assert_eq!(session.participants().len(), 1);
    }

    #[test]
    fn test_rejoining_full_game_is_game_full() {
        let (mut session, x, o) = playing_session();
        assert_eq!(session.join(x), Err(GameError::GameFull));
        assert_eq!(session.join(o), Err(GameError::GameFull));
        assert_eq!(session.participants(), &[x, o]);
        assert_eq!(session.status(), SessionStatus::Playing);
    }

    #[test]
    fn test_move_rejected_while_waiting() {
        let mut session = Session::new(code());
        let id = ConnectionId::new();
        session.join(id).unwrap();
        assert_eq!(session.make_move(id, 0), Err(GameError::NotInProgress));
        assert_eq!(session.board(), &Board::new());
    }

    #[test]
    fn test_turns_alternate() {
        let (mut session, x, o) = playing_session();

        assert_eq!(session.turn(), 0);
        assert_eq!(session.make_move(o, 0), Err(GameError::NotYourTurn));

        assert_eq!(session.make_move(x, 4).unwrap(), SessionEvent::Updated);
        assert_eq!(session.turn(), 1);
        assert_eq!(session.make_move(x, 0), Err(GameError::NotYourTurn));

        assert_eq!(session.make_move(o, 0).unwrap(), SessionEvent::Updated);
        assert_eq!(session.turn(), 0);
        assert_eq!(session.board().get(4), Some(Cell::X));
        assert_eq!(session.board().get(0), Some(Cell::O));
    }

    #[test]
    fn test_non_participant_cannot_move() {
        let (mut session, _, _) = playing_session();
        let stranger = ConnectionId::new();
        assert_eq!(session.make_move(stranger, 0), Err(GameError::NotYourTurn));
    }

    #[test]
    fn test_cell_taken_leaves_board_unchanged() {
        let (mut session, x, o) = playing_session();
        session.make_move(x, 4).unwrap();
        session.make_move(o, 0).unwrap();

        let before = *session.board();
        assert_eq!(session.make_move(x, 0), Err(GameError::CellTaken));
        assert_eq!(session.board(), &before);
        assert_eq!(session.turn(), 0);
    }

    #[test]
    fn test_out_of_range_cell() {
        let (mut session, x, _) = playing_session();
        assert!(matches!(
            session.make_move(x, 9),
            Err(GameError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_top_row_win() {
        let (mut session, x, o) = playing_session();
        session.make_move(x, 0).unwrap();
        session.make_move(o, 3).unwrap();
        session.make_move(x, 1).unwrap();
        session.make_move(o, 4).unwrap();

        let event = session.make_move(x, 2).unwrap();
        assert_eq!(
            event,
            SessionEvent::Finished(WinResult::Win {
                winner: 0,
                line: [0, 1, 2]
            })
        );
        assert_eq!(session.status(), SessionStatus::Finished);
        // The winner does not get to keep playing.
        assert_eq!(session.make_move(o, 8), Err(GameError::NotInProgress));
    }

    #[test]
    fn test_draw() {
        let (mut session, x, o) = playing_session();
        // X O X
        // X O O
        // O X X
        let moves = [(x, 0), (o, 1), (x, 2), (o, 4), (x, 3), (o, 5), (x, 7), (o, 6)];
        for (id, cell) in moves {
            assert_eq!(session.make_move(id, cell).unwrap(), SessionEvent::Updated);
        }
        assert_eq!(
            session.make_move(x, 8).unwrap(),
            SessionEvent::Finished(WinResult::Draw)
        );
        assert_eq!(session.status(), SessionStatus::Finished);
    }

    #[test]
    fn test_restart_from_finished() {
        let (mut session, x, o) = playing_session();
        for (id, cell) in [(x, 0), (o, 3), (x, 1), (o, 4), (x, 2)] {
            session.make_move(id, cell).unwrap();
        }
        assert_eq!(session.status(), SessionStatus::Finished);

        assert_eq!(session.restart(), SessionEvent::Started);
        assert_eq!(session.board(), &Board::new());
        assert_eq!(session.turn(), 0);
        assert_eq!(session.status(), SessionStatus::Playing);
        assert_eq!(session.participants(), &[x, o]);
    }

    #[test]
    fn test_restart_mid_game_resets_turn() {
        let (mut session, x, o) = playing_session();
        session.make_move(x, 0).unwrap();
        assert_eq!(session.turn(), 1);

        session.restart();
        assert_eq!(session.turn(), 0);
        assert_eq!(session.make_move(o, 0), Err(GameError::NotYourTurn));
        assert_eq!(session.make_move(x, 0).unwrap(), SessionEvent::Updated);
    }

    #[test]
    fn test_restart_while_waiting_starts_with_one_seat() {
        let mut session = Session::new(code());
        let host = ConnectionId::new();
        session.join(host).unwrap();

        assert_eq!(session.restart(), SessionEvent::Started);
        assert_eq!(session.board(), &Board::new());
        assert_eq!(session.turn(), 0);
        assert_eq!(session.status(), SessionStatus::Playing);
        assert_eq!(session.participants(), &[host]);

        // The free seat can no longer be taken.
        assert_eq!(session.join(ConnectionId::new()), Err(GameError::GameFull));
        assert_eq!(session.participants(), &[host]);
    }
}
