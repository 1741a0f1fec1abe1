//! Line extraction for Tic-Tac-Toe
//!
//! Every row, column and both diagonals of the board, produced in one fixed
//! order: rows top to bottom, columns left to right, the main diagonal, then
//! the anti-diagonal. Win detection and the expert policy both depend on this
//! order; the expert always acts on the first eligible line it meets.

use super::board::{Board, Cell, Mark};
use crate::types::{BOARD_SIZE, Coord};

/// Number of lines on the board (`2N + 2`).
pub const LINE_COUNT: usize = 2 * BOARD_SIZE + 2;

/// Which part of the board a line was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Row(usize),
    Column(usize),
    Diagonal,
    AntiDiagonal,
}

impl LineKind {
    /// All line kinds in scan order.
    pub fn all() -> impl Iterator<Item = LineKind> {
        (0..BOARD_SIZE)
            .map(LineKind::Row)
            .chain((0..BOARD_SIZE).map(LineKind::Column))
            .chain([LineKind::Diagonal, LineKind::AntiDiagonal])
    }

    /// Coordinates covered by this line, in order along the line.
    pub fn coords(self) -> [Coord; BOARD_SIZE] {
        std::array::from_fn(|i| match self {
            LineKind::Row(row) => Coord::at(row, i),
            LineKind::Column(col) => Coord::at(i, col),
            LineKind::Diagonal => Coord::at(i, i),
            LineKind::AntiDiagonal => Coord::at(i, BOARD_SIZE - 1 - i),
        })
    }
}

/// One row, column or diagonal of a board, with the cells it held when extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    pub kind: LineKind,
    pub coords: [Coord; BOARD_SIZE],
    pub cells: [Cell; BOARD_SIZE],
}

impl Line {
    fn extract(board: &Board, kind: LineKind) -> Self {
        let coords = kind.coords();
        let cells = coords.map(|coord| board.get(coord));
        Line {
            kind,
            coords,
            cells,
        }
    }

    /// Number of cells holding `mark`.
    pub fn count(&self, mark: Mark) -> usize {
        let target = mark.to_cell();
        self.cells.iter().filter(|&&cell| cell == target).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&cell| cell != Cell::Empty)
    }

    /// First empty coordinate along the line, if any.
    pub fn free_cell(&self) -> Option<Coord> {
        self.coords
            .iter()
            .zip(self.cells.iter())
            .find(|(_, cell)| **cell == Cell::Empty)
            .map(|(coord, _)| *coord)
    }

    /// The mark owning every cell of the line, if there is one.
    pub fn winner(&self) -> Option<Mark> {
        let first = self.cells[0];
        if self.cells.iter().all(|&cell| cell == first) {
            first.to_mark()
        } else {
            None
        }
    }

    /// The single free cell of a line where `mark` holds all the others.
    ///
    /// Full lines never qualify.
    pub fn completing_cell(&self, mark: Mark) -> Option<Coord> {
        if self.is_full() || self.count(mark) != BOARD_SIZE - 1 {
            return None;
        }
        self.free_cell()
    }
}

/// All lines of `board` in the fixed scan order, extracted lazily.
pub fn all_lines(board: &Board) -> impl Iterator<Item = Line> + '_ {
    LineKind::all().map(move |kind| Line::extract(board, kind))
}

/// Utility for analyzing lines in Tic-Tac-Toe
pub struct LineAnalyzer;

impl LineAnalyzer {
    /// Check if a mark owns a complete line
    pub fn has_won(board: &Board, mark: Mark) -> bool {
        all_lines(board).any(|line| line.winner() == Some(mark))
    }

    /// The first cell (in line scan order) that completes a line for `mark`
    pub fn first_completing_cell(board: &Board, mark: Mark) -> Option<Coord> {
        all_lines(board).find_map(|line| line.completing_cell(mark))
    }

    /// Check if a mark has an immediate winning move available
    pub fn has_immediate_win(board: &Board, mark: Mark) -> bool {
        Self::first_completing_cell(board, mark).is_some()
    }
}
