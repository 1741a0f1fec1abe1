//! High-level game management

use std::fmt;

use serde::{Deserialize, Serialize};

use super::board::{Board, Mark};
use crate::types::{Coord, reward};

/// A move in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub coord: Coord,
    pub mark: Mark,
}

/// Terminal status of a board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Ongoing,
    Win(Mark),
    Tie,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::Ongoing)
    }

    /// Terminal reward seen by the player holding `mark`.
    ///
    /// Returns `None` while the game is still running.
    pub fn reward_for(self, mark: Mark) -> Option<f64> {
        match self {
            Outcome::Ongoing => None,
            Outcome::Win(winner) if winner == mark => Some(reward::WIN),
            Outcome::Win(_) => Some(reward::LOSS),
            Outcome::Tie => Some(reward::TIE),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Ongoing => write!(f, "ongoing"),
            Outcome::Win(mark) => write!(f, "{mark} wins"),
            Outcome::Tie => write!(f, "tie"),
        }
    }
}

/// A game in progress: the shared board plus turn order and history.
///
/// Players only propose coordinates; every mutation of the board goes
/// through [`Game::play`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    first: Mark,
    to_move: Mark,
    moves: Vec<Move>,
}

impl Game {
    /// Create a new game where `first` opens
    pub fn new(first: Mark) -> Self {
        Game {
            board: Board::new(),
            first,
            to_move: first,
            moves: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Current outcome.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::AmbiguousOutcome`] if the board somehow holds
    /// winning lines for both marks.
    pub fn outcome(&self) -> Result<Outcome, crate::Error> {
        self.board.checked_outcome()
    }

    /// Apply a move for `mark` and report the resulting outcome.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::GameOver`] after a terminal outcome,
    /// [`crate::Error::OutOfTurn`] when `mark` is not the player to move, and
    /// [`crate::Error::InvalidMove`] for an occupied cell.
    pub fn play(&mut self, mark: Mark, coord: Coord) -> Result<Outcome, crate::Error> {
        if self.outcome()?.is_terminal() {
            return Err(crate::Error::GameOver);
        }
        if mark != self.to_move {
            return Err(crate::Error::OutOfTurn {
                expected: self.to_move,
                got: mark,
            });
        }

        self.board.place(mark, coord)?;
        self.moves.push(Move { coord, mark });
        self.to_move = mark.opponent();
        self.outcome()
    }

    /// Clear the board for the next episode, keeping the opening player.
    pub fn reset(&mut self) {
        *self = Game::new(self.first);
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Mark::X)
    }
}
