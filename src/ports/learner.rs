//! Learner port - abstraction over anything that can take a turn
//!
//! The driving loop only talks to players through this trait, so the
//! heuristic expert and the TD agent are interchangeable seats at the board.

use crate::{
    Result,
    tictactoe::{Board, Coord, Mark, Outcome},
};

/// Learner trait - unified interface for every player in an episode
///
/// # Design Philosophy
///
/// This trait represents a **port** in hexagonal architecture. Players never
/// mutate the shared board; they propose a coordinate and the driving loop
/// applies it.
///
/// # Examples
///
/// ```no_run
/// use tictactoe_td::{
///     ports::Learner,
///     tictactoe::{Board, Mark},
/// };
///
/// fn opening<L: Learner>(player: &mut L) -> tictactoe_td::Result<()> {
///     let coord = player.select_move(&Board::new(), Mark::X)?;
///     println!("{} opens at {coord}", player.name());
///     Ok(())
/// }
/// ```
pub trait Learner: Send {
    /// Select a move for `mark` on the given board.
    ///
    /// # Errors
    ///
    /// Returns an error if no empty cell is left.
    fn select_move(&mut self, board: &Board, mark: Mark) -> Result<Coord>;

    /// Called once the episode reached a terminal outcome.
    ///
    /// Adaptive learners perform their final backup here. The default
    /// implementation does nothing, suitable for fixed policies.
    fn finish_episode(&mut self, _outcome: Outcome, _mark: Mark) -> Result<()> {
        Ok(())
    }

    /// Get the learner's name.
    fn name(&self) -> &str;

    /// Seed the learner's internal random number generator.
    ///
    /// Training pipelines call this when supplied with a deterministic seed.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }

    /// Number of entries in the learner's value table, if it has one.
    fn value_map_size(&self) -> Option<usize> {
        None
    }
}
