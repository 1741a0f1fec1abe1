//! Rule-based expert used as the training adversary
//!
//! The expert is a greedy one-ply policy:
//! 1. Open in the center
//! 2. Answer a single mark with the center, or the first free corner
//! 3. Complete its own line if it can
//! 4. Optionally block the opponent's line
//! 5. Otherwise play a uniformly random empty cell
//!
//! Lines are scanned in the fixed order of [`crate::tictactoe::all_lines`], so
//! the first eligible line always wins the tie-break.

use rand::{SeedableRng, random, rngs::StdRng, seq::IndexedRandom};
use tracing::trace;

use crate::{
    Error, Result,
    ports::Learner,
    tictactoe::{Board, Coord, LineAnalyzer, Mark},
};

/// Heuristic expert player
#[derive(Debug, Clone)]
pub struct ExpertPlayer {
    name: String,
    blocking: bool,
    rng: StdRng,
}

impl ExpertPlayer {
    /// Create an expert with a random seed
    pub fn new(blocking: bool) -> Self {
        Self {
            name: Self::default_name(blocking),
            blocking,
            rng: StdRng::seed_from_u64(random()),
        }
    }

    /// Create an expert with a deterministic seed for its random fallback
    pub fn with_seed(blocking: bool, seed: u64) -> Self {
        Self {
            name: Self::default_name(blocking),
            blocking,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn default_name(blocking: bool) -> String {
        if blocking {
            "Expert (blocking)".to_string()
        } else {
            "Expert".to_string()
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.blocking
    }

    /// Pick a cell for `mark`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoValidMoves`] on a full board.
    pub fn choose_move(
        &mut self,
        mark: Mark,
        opponent_mark: Mark,
        board: &Board,
    ) -> Result<Coord> {
        let empty = board.empty_cells();
        if empty.is_empty() {
            return Err(Error::NoValidMoves);
        }

        match board.mark_count() {
            0 => return Ok(Coord::CENTER),
            1 => {
                if let Some(coord) = Self::opening_reply(board) {
                    return Ok(coord);
                }
            }
            _ => {
                if let Some(coord) = LineAnalyzer::first_completing_cell(board, mark) {
                    trace!(%coord, "completing line");
                    return Ok(coord);
                }
                if self.blocking
                    && let Some(coord) = LineAnalyzer::first_completing_cell(board, opponent_mark)
                {
                    trace!(%coord, "blocking line");
                    return Ok(coord);
                }
            }
        }

        empty.choose(&mut self.rng).copied().ok_or(Error::NoValidMoves)
    }

    fn opening_reply(board: &Board) -> Option<Coord> {
        if board.is_empty_at(Coord::CENTER) {
            return Some(Coord::CENTER);
        }
        Coord::CORNERS
            .into_iter()
            .find(|&corner| board.is_empty_at(corner))
    }
}

impl Learner for ExpertPlayer {
    fn select_move(&mut self, board: &Board, mark: Mark) -> Result<Coord> {
        self.choose_move(mark, mark.opponent(), board)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}
