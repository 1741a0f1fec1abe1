//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing training events, so the
//! driving loop never depends on progress bars, files or plotting tools.

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    tictactoe::{Board, Mark, Move, Outcome},
};

/// Per-episode result handed to observers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    /// Index of the episode (0-based)
    pub episode: usize,
    /// Terminal outcome
    pub outcome: Outcome,
    /// Mark played by the learning agent
    pub agent_mark: Mark,
    /// Number of moves in the episode
    pub moves: usize,
    /// Size of the agent's value table after the final backup
    pub value_map_size: usize,
}

/// Which side an episode went to, from the agent's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeResult {
    AgentWin,
    OpponentWin,
    Tie,
}

impl EpisodeReport {
    pub fn result(&self) -> EpisodeResult {
        match self.outcome {
            Outcome::Win(mark) if mark == self.agent_mark => EpisodeResult::AgentWin,
            Outcome::Win(_) => EpisodeResult::OpponentWin,
            Outcome::Tie | Outcome::Ongoing => EpisodeResult::Tie,
        }
    }
}

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - once
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_move(...)` - for each move
///    - `on_episode_end(report)`
/// 3. `on_training_end()` - once
///
/// Every method defaults to a no-op.
///
/// # Examples
///
/// ```no_run
/// use tictactoe_td::ports::{EpisodeReport, Observer};
///
/// struct Counter {
///     episodes: usize,
/// }
///
/// impl Observer for Counter {
///     fn on_episode_end(&mut self, _report: &EpisodeReport) -> tictactoe_td::Result<()> {
///         self.episodes += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each move has been applied.
    ///
    /// # Parameters
    ///
    /// * `episode` - Index of the current episode
    /// * `step` - Move number within the episode (0-based)
    /// * `before` - Board before the move
    /// * `applied` - The move that was played
    fn on_move(
        &mut self,
        _episode: usize,
        _step: usize,
        _before: &Board,
        _applied: Move,
    ) -> Result<()> {
        Ok(())
    }

    /// Called after the terminal backup of an episode.
    fn on_episode_end(&mut self, _report: &EpisodeReport) -> Result<()> {
        Ok(())
    }

    /// Called when training completes; flush files and print summaries here.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
