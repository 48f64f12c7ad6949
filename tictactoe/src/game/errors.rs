//! Command rejection reasons.

use thiserror::Error;

use crate::net::messages::ErrorCode;

/// Why a command was rejected.
///
/// Every variant is recoverable and scoped to the command that produced it:
/// session state is left untouched and the connection stays open.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GameError {
    #[error("Game not found")]
    NotFound,
    #[error("Game is full")]
    GameFull,
    #[error("Not your turn")]
    NotYourTurn,
    #[error("Game is not in progress")]
    NotInProgress,
    #[error("Cell already taken")]
    CellTaken,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Raised by the transport's per-connection limiter, never by a session.
    #[error("Rate limit exceeded. Please slow down.")]
    RateLimited,
}

impl GameError {
    /// Wire code reported to the client.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound => ErrorCode::NotFound,
            Self::GameFull => ErrorCode::GameFull,
            // Nobody has the turn outside of PLAYING.
            Self::NotYourTurn | Self::NotInProgress => ErrorCode::NotYourTurn,
            Self::CellTaken => ErrorCode::CellTaken,
            Self::InvalidInput(_) => ErrorCode::InvalidInput,
            Self::RateLimited => ErrorCode::RateLimited,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(GameError::NotFound.code(), ErrorCode::NotFound);
        assert_eq!(GameError::GameFull.code(), ErrorCode::GameFull);
        assert_eq!(GameError::NotInProgress.code(), ErrorCode::NotYourTurn);
        assert_eq!(
            GameError::InvalidInput("bad".to_string()).code(),
            ErrorCode::InvalidInput
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(GameError::CellTaken.to_string(), "Cell already taken");
        assert_eq!(
            GameError::InvalidInput("cell index 9 out of range".to_string()).to_string(),
            "Invalid input: cell index 9 out of range"
        );
    }
}
