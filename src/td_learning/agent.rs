//! TD(0) afterstate agent
//!
//! The agent scores every legal move by the value of the board it would
//! leave behind, plays the best one (or a random one when exploring) and
//! backs the value of its previous afterstate up toward the value it just
//! achieved.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    Error, Result,
    ports::Learner,
    td_learning::value_map::ValueMap,
    tictactoe::{Board, Coord, Mark, Outcome},
    types::{DEFAULT_EXPLORATION_RATE, StateKey, reward},
};

/// When the agent ignores its value estimates and plays a random move
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "value")]
pub enum Exploration {
    /// Explore on each move with the given probability
    Probability(f64),
    /// Explore deterministically on every Kth move
    Period(u64),
}

impl Exploration {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for a probability outside
    /// [0, 1] or a zero period.
    pub fn validate(self) -> Result<Self> {
        match self {
            Exploration::Probability(p) if !(0.0..=1.0).contains(&p) => {
                Err(Error::InvalidConfiguration {
                    message: format!("exploration probability {p} must lie in [0, 1]"),
                })
            }
            Exploration::Period(0) => Err(Error::InvalidConfiguration {
                message: "exploration period must be at least 1".to_string(),
            }),
            valid => Ok(valid),
        }
    }
}

impl Default for Exploration {
    fn default() -> Self {
        Exploration::Probability(DEFAULT_EXPLORATION_RATE)
    }
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Tabular TD(0) learner over full-board afterstates
#[derive(Debug, Clone)]
pub struct TdAgent {
    value_map: ValueMap,
    exploration: Exploration,
    /// Afterstate the agent left on its last move (empty board at episode start)
    previous: StateKey,
    steps: u64,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl TdAgent {
    /// Create an agent around an existing (possibly empty) value table
    pub fn new(value_map: ValueMap, exploration: Exploration) -> Self {
        Self {
            value_map,
            exploration,
            previous: Board::new().state_key(),
            steps: 0,
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    pub fn value_map(&self) -> &ValueMap {
        &self.value_map
    }

    pub fn into_value_map(self) -> ValueMap {
        self.value_map
    }

    pub fn exploration(&self) -> Exploration {
        self.exploration
    }

    /// Moves chosen since construction
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn previous_state(&self) -> &StateKey {
        &self.previous
    }

    /// Choose a move for `mark` and back up the previous afterstate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoValidMoves`] on a full board and
    /// [`Error::AmbiguousOutcome`] if a successor board is not a legal
    /// tic-tac-toe position.
    pub fn choose_move(
        &mut self,
        mark: Mark,
        opponent_mark: Mark,
        board: &Board,
    ) -> Result<Coord> {
        debug_assert_eq!(opponent_mark, mark.opponent());

        let empty = board.empty_cells();
        if empty.is_empty() {
            return Err(Error::NoValidMoves);
        }

        self.steps += 1;
        let (coord, next, value) = if self.should_explore() {
            let coord = *empty.choose(&mut self.rng).ok_or(Error::NoValidMoves)?;
            let (next, value) = self.afterstate_value(board, mark, coord)?;
            trace!(step = self.steps, %coord, value, "exploring");
            (coord, next, value)
        } else {
            self.exploit(board, mark, &empty)?
        };

        let backed_up = self.value_map.update(&self.previous, value);
        trace!(previous = %self.previous, observed = value, backed_up, "td backup");
        self.previous = next;

        Ok(coord)
    }

    /// Back the last afterstate up toward the terminal reward and start over
    /// from the empty board.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EpisodeInProgress`] if `outcome` is not terminal.
    pub fn finish_episode(&mut self, outcome: Outcome, mark: Mark) -> Result<()> {
        let reward = outcome.reward_for(mark).ok_or(Error::EpisodeInProgress)?;
        let backed_up = self.value_map.update(&self.previous, reward);
        debug!(
            %outcome,
            reward,
            backed_up,
            states = self.value_map.len(),
            "episode finished"
        );
        self.reset_episode();
        Ok(())
    }

    /// Forget the previous afterstate without a backup.
    pub fn reset_episode(&mut self) {
        self.previous = Board::new().state_key();
    }

    fn should_explore(&mut self) -> bool {
        match self.exploration {
            Exploration::Probability(p) => self.rng.random::<f64>() < p,
            Exploration::Period(k) => self.steps.is_multiple_of(k),
        }
    }

    /// Value of the board left after playing `coord`.
    ///
    /// Terminal afterstates enter the table at their reward instead of the
    /// starting value.
    fn afterstate_value(
        &mut self,
        board: &Board,
        mark: Mark,
        coord: Coord,
    ) -> Result<(StateKey, f64)> {
        let next = board.with_mark(mark, coord)?;
        let key = next.state_key();
        let value = match next.checked_outcome()?.reward_for(mark) {
            Some(reward) => self.value_map.get_value_or_else(&key, || reward),
            None => self.value_map.get_value(&key),
        };
        Ok((key, value))
    }

    /// Greedy choice with a uniform tie-break among the best moves.
    fn exploit(
        &mut self,
        board: &Board,
        mark: Mark,
        empty: &[Coord],
    ) -> Result<(Coord, StateKey, f64)> {
        let mut best_value = f64::NEG_INFINITY;
        let mut best: Vec<(Coord, StateKey)> = Vec::with_capacity(empty.len());

        for &coord in empty {
            let (key, value) = self.afterstate_value(board, mark, coord)?;
            // Nothing beats a known win.
            if value >= reward::WIN {
                return Ok((coord, key, value));
            }
            if value > best_value {
                best_value = value;
                best.clear();
                best.push((coord, key));
            } else if value == best_value {
                best.push((coord, key));
            }
        }

        let (coord, key) = best
            .choose(&mut self.rng)
            .cloned()
            .ok_or(Error::NoValidMoves)?;
        Ok((coord, key, best_value))
    }
}

impl Default for TdAgent {
    fn default() -> Self {
        Self::new(ValueMap::default(), Exploration::default())
    }
}

impl Learner for TdAgent {
    fn select_move(&mut self, board: &Board, mark: Mark) -> Result<Coord> {
        self.choose_move(mark, mark.opponent(), board)
    }

    fn finish_episode(&mut self, outcome: Outcome, mark: Mark) -> Result<()> {
        TdAgent::finish_episode(self, outcome, mark)
    }

    fn name(&self) -> &str {
        "TD(0)"
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        Ok(())
    }

    fn value_map_size(&self) -> Option<usize> {
        Some(self.value_map.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn greedy(seed: u64) -> TdAgent {
        TdAgent::new(ValueMap::default(), Exploration::Probability(0.0)).with_seed(seed)
    }

    fn board(key: &str) -> Board {
        Board::from_key(&StateKey::parse(key).unwrap())
    }

    #[test]
    fn test_exploration_validation() {
        assert!(Exploration::Probability(0.0).validate().is_ok());
        assert!(Exploration::Probability(1.0).validate().is_ok());
        assert!(Exploration::Probability(1.5).validate().is_err());
        assert!(Exploration::Probability(-0.1).validate().is_err());
        assert!(Exploration::Period(1).validate().is_ok());
        assert!(Exploration::Period(0).validate().is_err());
    }

    #[test]
    fn test_takes_immediate_win() {
        // O to move with . O O on the bottom row; X threatens twice
        let position = board("XX.X...OO");
        let mut agent = greedy(3);
        let coord = agent.choose_move(Mark::O, Mark::X, &position).unwrap();
        assert_eq!(coord, Coord::new(2, 0).unwrap());

        let winning_key = position.with_mark(Mark::O, coord).unwrap().state_key();
        assert_eq!(agent.value_map().peek(&winning_key), Some(1.0));
    }

    #[test]
    fn test_backup_targets_previous_afterstate() {
        let mut agent = greedy(5);
        let mut position = Board::new();
        position.place(Mark::X, Coord::CENTER).unwrap();

        let coord = agent.choose_move(Mark::O, Mark::X, &position).unwrap();
        position.place(Mark::O, coord).unwrap();

        // Empty board backed up toward 0.5 stays at 0.5
        assert_eq!(agent.value_map().peek(&Board::new().state_key()), Some(0.5));
        assert_eq!(agent.previous_state(), &position.state_key());
        assert_eq!(agent.steps(), 1);
    }

    #[test]
    fn test_finish_episode_backs_up_reward_and_resets() {
        let mut agent = greedy(9);
        let mut position = Board::new();
        position.place(Mark::X, Coord::CENTER).unwrap();
        let coord = agent.choose_move(Mark::O, Mark::X, &position).unwrap();
        position.place(Mark::O, coord).unwrap();
        let afterstate = position.state_key();

        agent.finish_episode(Outcome::Win(Mark::X), Mark::O).unwrap();

        // 0.5 + 0.5 * (0.0 - 0.5)
        assert_eq!(agent.value_map().peek(&afterstate), Some(0.25));
        assert_eq!(agent.previous_state(), &Board::new().state_key());
    }

    #[test]
    fn test_finish_episode_rejects_ongoing() {
        let mut agent = greedy(1);
        assert!(matches!(
            agent.finish_episode(Outcome::Ongoing, Mark::O),
            Err(Error::EpisodeInProgress)
        ));
    }

    #[test]
    fn test_period_exploration_counts_steps() {
        let mut agent = TdAgent::new(ValueMap::default(), Exploration::Period(2)).with_seed(4);
        agent.steps = 1;
        assert!(!agent.should_explore());
        agent.steps = 2;
        assert!(agent.should_explore());
        agent.steps = 0;

        agent.choose_move(Mark::X, Mark::O, &Board::new()).unwrap();
        assert_eq!(agent.steps(), 1);
    }

    #[test]
    fn test_full_board_has_no_moves() {
        let mut agent = greedy(2);
        let full = board("XOXXOOOXX");
        assert!(matches!(
            agent.choose_move(Mark::O, Mark::X, &full),
            Err(Error::NoValidMoves)
        ));
        assert_eq!(agent.steps(), 0);
    }
}
