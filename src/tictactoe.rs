//! Tic-Tac-Toe game implementation

pub mod board;
pub mod game;
pub mod lines;

pub use board::{Board, Cell, Mark};
pub use game::{Game, Move, Outcome};
pub use lines::{Line, LineAnalyzer, LineKind, all_lines};

pub use crate::types::{BOARD_SIZE, Coord, StateKey};
