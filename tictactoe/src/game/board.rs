//! Board representation and pure game rules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of cells on the board.
pub const BOARD_SIZE: usize = 9;

/// Position of a participant in a session's participant list.
///
/// Doubles as the turn pointer value and as the owner of a mark.
pub type ParticipantIndex = usize;

/// The 8 winning triples, scanned in this order: rows, columns, diagonals.
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// Participant 0 plays X, participant 1 plays O.
    pub fn for_participant(index: ParticipantIndex) -> Self {
        if index == 0 { Self::X } else { Self::O }
    }

    pub fn owner(self) -> ParticipantIndex {
        match self {
            Self::X => 0,
            Self::O => 1,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::X => "X",
            Self::O => "O",
        };
        write!(f, "{repr}")
    }
}

/// A single board cell. Serialized as `""`, `"X"` or `"O"`.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Cell {
    #[default]
    #[serde(rename = "")]
    Empty,
    X,
    O,
}

impl Cell {
    pub fn mark(self) -> Option<Mark> {
        match self {
            Self::Empty => None,
            Self::X => Some(Mark::X),
            Self::O => Some(Mark::O),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Self::Empty
    }
}

impl From<Mark> for Cell {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Self::X,
            Mark::O => Self::O,
        }
    }
}

/// Outcome of scanning a board.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WinResult {
    /// Game still in progress.
    None,
    Win {
        winner: ParticipantIndex,
        line: [usize; 3],
    },
    Draw,
}

/// Nine cells in row-major order.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Board([Cell; BOARD_SIZE]);

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &[Cell; BOARD_SIZE] {
        &self.0
    }

    /// Returns `None` when `index` is off the board.
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.0.get(index).copied()
    }

    pub fn is_cell_empty(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Cell::Empty))
    }

    pub fn is_full(&self) -> bool {
        self.0.iter().all(|cell| !cell.is_empty())
    }

    /// Place `mark` on `index`.
    ///
    /// The caller must have checked that `index` is on the board and empty.
    /// Legality is a session concern; this function only records the move.
    pub fn apply_move(&mut self, index: usize, mark: Mark) {
        debug_assert!(self.is_cell_empty(index), "illegal move on cell {index}");
        self.0[index] = Cell::from(mark);
    }

    /// Scan the winning lines in order and report the first complete one.
    ///
    /// A board with no complete line and no empty cell is a draw.
    pub fn evaluate(&self) -> WinResult {
        for line in WINNING_LINES {
            let [a, b, c] = line;
            if let Some(mark) = self.0[a].mark()
                && self.0[a] == self.0[b]
                && self.0[a] == self.0[c]
            {
                return WinResult::Win {
                    winner: mark.owner(),
                    line,
                };
            }
        }

        if self.is_full() {
            WinResult::Draw
        } else {
            WinResult::None
        }
    }

    /// Clear every cell.
    pub fn reset(&mut self) {
        self.0 = [Cell::Empty; BOARD_SIZE];
    }
}

impl From<[Cell; BOARD_SIZE]> for Board {
    fn from(cells: [Cell; BOARD_SIZE]) -> Self {
        Self(cells)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row_idx, row) in self.0.chunks(3).enumerate() {
            if row_idx > 0 {
                writeln!(f)?;
            }
            for cell in row {
                let repr = match cell.mark() {
                    Some(mark) => mark.to_string(),
                    None => ".".to_string(),
                };
                write!(f, "{repr}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from(layout: &str) -> Board {
        let mut cells = [Cell::Empty; BOARD_SIZE];
        for (i, ch) in layout.chars().filter(|c| !c.is_whitespace()).enumerate() {
            cells[i] = match ch {
                'X' => Cell::X,
                'O' => Cell::O,
                _ => Cell::Empty,
            };
        }
        Board::from(cells)
    }

    #[test]
    fn test_empty_board_is_in_progress() {
        assert_eq!(Board::new().evaluate(), WinResult::None);
    }

    #[test]
    fn test_every_line_is_detected() {
        for line in WINNING_LINES {
            let mut board = Board::new();
            for index in line {
                board.apply_move(index, Mark::O);
            }
            assert_eq!(
                board.evaluate(),
                WinResult::Win { winner: 1, line },
                "line {line:?} should win for O"
            );
        }
    }

    #[test]
    fn test_scan_order_breaks_ties() {
        // Top row and left column both complete; the row is scanned first.
        let board = board_from("XXX X.. X..");
        assert_eq!(
            board.evaluate(),
            WinResult::Win {
                winner: 0,
                line: [0, 1, 2]
            }
        );
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        let board = board_from("XOX XOO OXX");
        assert_eq!(board.evaluate(), WinResult::Draw);
    }

    #[test]
    fn test_win_on_last_cell_beats_draw() {
        let board = board_from("XOX OXO OXX");
        assert!(board.is_full());
        assert_eq!(
            board.evaluate(),
            WinResult::Win {
                winner: 0,
                line: [0, 4, 8]
            }
        );
    }

    #[test]
    fn test_apply_move_sets_only_target_cell() {
        let mut board = Board::new();
        board.apply_move(4, Mark::X);

        for (i, cell) in board.cells().iter().enumerate() {
            if i == 4 {
                assert_eq!(*cell, Cell::X);
            } else {
                assert!(cell.is_empty());
            }
        }
    }

    #[test]
    fn test_get_out_of_range() {
        let board = Board::new();
        assert_eq!(board.get(9), None);
        assert!(!board.is_cell_empty(9));
    }

    #[test]
    fn test_board_serializes_as_strings() {
        let board = board_from("X.. .O. ...");
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(json, r#"["X","","","","O","","","",""]"#);
    }

    #[test]
    fn test_mark_participant_mapping() {
        assert_eq!(Mark::for_participant(0), Mark::X);
        assert_eq!(Mark::for_participant(1), Mark::O);
        assert_eq!(Mark::X.owner(), 0);
        assert_eq!(Mark::O.owner(), 1);
    }

    #[test]
    fn test_board_display() {
        let board = board_from("X.. .O. ..X");
        assert_eq!(board.to_string(), "X..\n.O.\n..X");
    }
}
