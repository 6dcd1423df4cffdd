/// Board model: pure data plus the win/draw predicate
use serde::{Deserialize, Serialize};

/// Number of cells on the board
pub const CELLS: usize = 9;

/// The 8 winning lines: three rows, three columns, two diagonals
const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Player symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    /// First joiner's symbol
    X,
    /// Second joiner's symbol
    O,
}

impl Mark {
    /// Returns the other player's symbol
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Numeric wire code for this symbol
    pub fn code(self) -> u8 {
        match self {
            Mark::X => 1,
            Mark::O => 2,
        }
    }

    /// Symbol for a numeric wire code
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Mark::X),
            2 => Some(Mark::O),
            _ => None,
        }
    }
}

/// Result of evaluating a board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Outcome {
    /// Game still going
    #[default]
    InProgress,
    /// Three in a row for the given symbol
    Won(Mark),
    /// Board full with no line completed
    Draw,
}

impl Outcome {
    /// Whether the game has ended
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::InProgress)
    }
}

/// 3x3 board in row-major order
///
/// A cell is written at most once; it never reverts to empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Mark>; CELLS],
}

impl Board {
    /// Creates an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Symbol at the given cell, if any
    pub fn cell(&self, index: usize) -> Option<Mark> {
        self.cells[index]
    }

    /// Whether the given cell is unoccupied
    pub fn is_vacant(&self, index: usize) -> bool {
        self.cells[index].is_none()
    }

    /// Whether every cell is occupied
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    /// Indices of all unoccupied cells
    pub fn vacant_cells(&self) -> Vec<usize> {
        (0..CELLS).filter(|&i| self.is_vacant(i)).collect()
    }

    /// Place a symbol on a vacant cell
    ///
    /// The caller must have validated the move: `index` in range and
    /// the cell vacant. Calling speculatively is a bug.
    pub fn apply(&mut self, index: usize, mark: Mark) {
        debug_assert!(index < CELLS, "cell index {} out of range", index);
        debug_assert!(self.cells[index].is_none(), "cell {} already occupied", index);
        self.cells[index] = Some(mark);
    }

    /// Evaluate the board against the 8 winning lines
    ///
    /// A line completed by both symbols at once cannot arise from
    /// single-move updates; the assertion guards that invariant.
    pub fn evaluate(&self) -> Outcome {
        let mut winner: Option<Mark> = None;
        for [a, b, c] in WIN_LINES {
            let mark = self.cells[a];
            if mark.is_some() && mark == self.cells[b] && mark == self.cells[c] {
                debug_assert!(
                    winner.is_none() || winner == mark,
                    "both symbols hold a completed line"
                );
                winner = mark;
            }
        }
        if let Some(mark) = winner {
            return Outcome::Won(mark);
        }
        if self.is_full() {
            return Outcome::Draw;
        }
        Outcome::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from(moves: &[(usize, Mark)]) -> Board {
        let mut board = Board::new();
        for &(index, mark) in moves {
            board.apply(index, mark);
        }
        board
    }

    #[test]
    fn test_empty_board_in_progress() {
        assert_eq!(Board::new().evaluate(), Outcome::InProgress);
    }

    #[test]
    fn test_every_line_wins_for_either_mark() {
        for line in WIN_LINES {
            for mark in [Mark::X, Mark::O] {
                let mut board = Board::new();
                for index in line {
                    board.apply(index, mark);
                }
                assert_eq!(
                    board.evaluate(),
                    Outcome::Won(mark),
                    "line {:?} should win for {:?}",
                    line,
                    mark
                );
            }
        }
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        // X O X / O X O / O X O - no line for either symbol
        let board = board_from(&[
            (0, Mark::X),
            (1, Mark::O),
            (2, Mark::X),
            (3, Mark::O),
            (4, Mark::X),
            (5, Mark::O),
            (6, Mark::O),
            (7, Mark::X),
            (8, Mark::O),
        ]);
        assert_eq!(board.evaluate(), Outcome::Draw);
    }

    #[test]
    fn test_partial_board_without_line_in_progress() {
        let board = board_from(&[(0, Mark::X), (4, Mark::O), (8, Mark::X)]);
        assert_eq!(board.evaluate(), Outcome::InProgress);
    }

    #[test]
    fn test_win_beats_draw_on_full_board() {
        // Bottom row completed by O on a full board
        let board = board_from(&[
            (0, Mark::X),
            (1, Mark::O),
            (2, Mark::X),
            (3, Mark::X),
            (4, Mark::O),
            (5, Mark::X),
            (6, Mark::O),
            (7, Mark::O),
            (8, Mark::O),
        ]);
        assert_eq!(board.evaluate(), Outcome::Won(Mark::O));
    }

    #[test]
    fn test_top_row_scenario() {
        // X at 0, O at 4, X at 1, O at 5, X at 2 -> X wins the top row
        let board = board_from(&[
            (0, Mark::X),
            (4, Mark::O),
            (1, Mark::X),
            (5, Mark::O),
            (2, Mark::X),
        ]);
        assert_eq!(board.evaluate(), Outcome::Won(Mark::X));
    }

    #[test]
    fn test_mark_codes_round_trip() {
        assert_eq!(Mark::from_code(Mark::X.code()), Some(Mark::X));
        assert_eq!(Mark::from_code(Mark::O.code()), Some(Mark::O));
        assert_eq!(Mark::from_code(0), None);
        assert_eq!(Mark::from_code(3), None);
    }

    #[test]
    fn test_opponent() {
        assert_eq!(Mark::X.opponent(), Mark::O);
        assert_eq!(Mark::O.opponent(), Mark::X);
    }

    #[test]
    fn test_vacant_cells() {
        let board = board_from(&[(0, Mark::X), (4, Mark::O)]);
        assert_eq!(board.vacant_cells(), vec![1, 2, 3, 5, 6, 7, 8]);
        assert!(!board.is_full());
        assert!(board.is_vacant(1));
        assert!(!board.is_vacant(4));
    }
}
