//! Board state representation and basic operations

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    game::Outcome,
    lines::{self, Line},
};
use crate::types::{BOARD_SIZE, CELL_COUNT, Coord, StateKey};

/// A cell on the Tic-Tac-Toe board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    /// Character used in state keys.
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    /// Inverse of [`Cell::to_char`].
    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' => Some(Cell::Empty),
            'X' => Some(Cell::X),
            'O' => Some(Cell::O),
            _ => None,
        }
    }

    /// Character used when rendering the board for humans.
    pub fn icon(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn to_mark(self) -> Option<Mark> {
        match self {
            Cell::X => Some(Mark::X),
            Cell::O => Some(Mark::O),
            Cell::Empty => None,
        }
    }
}

/// A player's mark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// Get the opponent's mark
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Convert mark to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Mark::X => Cell::X,
            Mark::O => Cell::O,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cell().to_char())
    }
}

/// The 3x3 grid of cells.
///
/// This type implements `Copy` since it's only 9 bytes; exploiting agents
/// clone it freely to look at hypothetical successor positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Rebuild a board from its state key.
    pub fn from_key(key: &StateKey) -> Self {
        let mut board = Board::new();
        for (index, c) in key.as_str().chars().enumerate().take(CELL_COUNT) {
            if let (Some(coord), Some(cell)) = (Coord::from_index(index), Cell::from_char(c)) {
                board.cells[coord.row()][coord.col()] = cell;
            }
        }
        board
    }

    /// Read-only view of the grid, rows top to bottom.
    pub fn cells(&self) -> &[[Cell; BOARD_SIZE]; BOARD_SIZE] {
        &self.cells
    }

    /// Get the cell at a coordinate
    pub fn get(&self, coord: Coord) -> Cell {
        self.cells[coord.row()][coord.col()]
    }

    /// Check if a cell is empty
    pub fn is_empty_at(&self, coord: Coord) -> bool {
        self.get(coord) == Cell::Empty
    }

    /// Put `mark` on an empty cell.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidMove`] if the cell is already occupied.
    pub fn place(&mut self, mark: Mark, coord: Coord) -> Result<(), crate::Error> {
        if !self.is_empty_at(coord) {
            return Err(crate::Error::InvalidMove { coord });
        }
        self.cells[coord.row()][coord.col()] = mark.to_cell();
        Ok(())
    }

    /// Put `mark` at raw `(row, col)` values, validating the range first.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidCoordinate`] when off the board and
    /// [`crate::Error::InvalidMove`] when the cell is occupied.
    pub fn place_at(&mut self, mark: Mark, row: usize, col: usize) -> Result<(), crate::Error> {
        self.place(mark, Coord::new(row, col)?)
    }

    /// The board that would result from placing `mark` at `coord`.
    #[must_use = "with_mark returns a new board; the original is unchanged"]
    pub fn with_mark(&self, mark: Mark, coord: Coord) -> Result<Board, crate::Error> {
        let mut next = *self;
        next.place(mark, coord)?;
        Ok(next)
    }

    /// All empty cells in row-major order
    pub fn empty_cells(&self) -> Vec<Coord> {
        (0..CELL_COUNT)
            .filter_map(Coord::from_index)
            .filter(|&coord| self.is_empty_at(coord))
            .collect()
    }

    /// Number of marks placed by both players together.
    pub fn mark_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell != Cell::Empty)
            .count()
    }

    pub fn is_full(&self) -> bool {
        self.mark_count() == CELL_COUNT
    }

    /// Lines of the board in the fixed scan order.
    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        lines::all_lines(self)
    }

    /// Terminal status of the board.
    ///
    /// A board with winning lines for both marks cannot arise from legal
    /// play; debug builds assert on it and [`Board::checked_outcome`]
    /// reports it as an error.
    pub fn outcome(&self) -> Outcome {
        let mut winners = self.lines().filter_map(|line| line.winner());
        match winners.next() {
            Some(mark) => {
                debug_assert!(
                    winners.all(|other| other == mark),
                    "board {} has winning lines for both marks",
                    self.state_key()
                );
                Outcome::Win(mark)
            }
            None if self.is_full() => Outcome::Tie,
            None => Outcome::Ongoing,
        }
    }

    /// Like [`Board::outcome`] but refuses to name a winner for a board
    /// where both marks completed a line.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::AmbiguousOutcome`] for such boards.
    pub fn checked_outcome(&self) -> Result<Outcome, crate::Error> {
        let mut winner = None;
        for mark in self.lines().filter_map(|line| line.winner()) {
            match winner {
                Some(previous) if previous != mark => {
                    return Err(crate::Error::AmbiguousOutcome {
                        key: self.state_key().into_string(),
                    });
                }
                _ => winner = Some(mark),
            }
        }

        Ok(match winner {
            Some(mark) => Outcome::Win(mark),
            None if self.is_full() => Outcome::Tie,
            None => Outcome::Ongoing,
        })
    }

    /// Canonical key of the full grid contents
    pub fn state_key(&self) -> StateKey {
        StateKey::from_encoding(self.cells.iter().flatten().map(|c| c.to_char()).collect())
    }

    /// Human-readable grid: cells joined by `" | "`, rows separated by dashes.
    pub fn render(&self) -> String {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.icon().to_string())
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect::<Vec<_>>()
            .join("\n---------\n")
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            for cell in row {
                write!(f, "{}", cell.to_char())?;
            }
            if i + 1 < BOARD_SIZE {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(key: &str) -> Board {
        Board::from_key(&StateKey::parse(key).unwrap())
    }

    #[test]
    fn test_new_board() {
        let board = Board::new();
        assert_eq!(board.mark_count(), 0);
        assert_eq!(board.empty_cells().len(), 9);
        assert_eq!(board.outcome(), Outcome::Ongoing);
    }

    #[test]
    fn test_place() {
        let mut board = Board::new();
        board.place(Mark::X, Coord::CENTER).unwrap();
        assert_eq!(board.get(Coord::CENTER), Cell::X);
        assert_eq!(board.mark_count(), 1);

        let err = board.place(Mark::O, Coord::CENTER).unwrap_err();
        assert!(err.to_string().contains("occupied"));
        assert_eq!(board.get(Coord::CENTER), Cell::X);
    }

    #[test]
    fn test_place_at_out_of_range() {
        let mut board = Board::new();
        let err = board.place_at(Mark::X, 3, 1).unwrap_err();
        assert!(matches!(err, crate::Error::InvalidCoordinate { .. }));
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_with_mark_leaves_original() {
        let board = Board::new();
        let next = board.with_mark(Mark::O, Coord::new(0, 2).unwrap()).unwrap();
        assert_eq!(board.mark_count(), 0);
        assert_eq!(next.get(Coord::new(0, 2).unwrap()), Cell::O);
    }

    #[test]
    fn test_empty_cells_row_major() {
        let board = board("X...O...X");
        let empty: Vec<usize> = board.empty_cells().iter().map(Coord::index).collect();
        assert_eq!(empty, vec![1, 2, 3, 5, 6, 7]);
    }

    #[test]
    fn test_state_key_identity() {
        let mut a = Board::new();
        a.place(Mark::X, Coord::new(0, 0).unwrap()).unwrap();
        a.place(Mark::O, Coord::new(2, 1).unwrap()).unwrap();

        let mut b = Board::new();
        b.place(Mark::O, Coord::new(2, 1).unwrap()).unwrap();
        b.place(Mark::X, Coord::new(0, 0).unwrap()).unwrap();

        assert_eq!(a.state_key(), b.state_key());
        assert_eq!(a.state_key().as_str(), "X......O.");
        assert_eq!(Board::from_key(&a.state_key()), a);
    }

    #[test]
    fn test_cell_chars_round_trip() {
        for cell in [Cell::Empty, Cell::X, Cell::O] {
            assert_eq!(Cell::from_char(cell.to_char()), Some(cell));
        }
        for other in [' ', 'x', 'o', '0'] {
            assert_eq!(Cell::from_char(other), None);
        }
    }

    #[test]
    fn test_mirror_images_are_distinct_states() {
        assert_ne!(board("X........").state_key(), board("..X......").state_key());
    }

    #[test]
    fn test_checked_outcome_rejects_double_winner() {
        let board = board("XXXOOO...");
        assert!(matches!(
            board.checked_outcome(),
            Err(crate::Error::AmbiguousOutcome { .. })
        ));
    }

    #[test]
    fn test_checked_outcome_matches_outcome() {
        for key in ["XXXOO....", "XOXXOOOXX", "X...O....", "O..XO.X.O"] {
            let board = board(key);
            assert_eq!(board.checked_outcome().unwrap(), board.outcome());
        }
    }

    #[test]
    fn test_render() {
        let board = board("XO..X...O");
        assert_eq!(
            board.render(),
            "X | O |  \n---------\n  | X |  \n---------\n  |   | O"
        );
    }

    #[test]
    fn test_display() {
        let board = board("XOX.O.X..");
        assert_eq!(format!("{board}"), "XOX\n.O.\nX..");
    }
}
