//! Configuration types for agent creation.

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    td_learning::Exploration,
    types::{BOARD_SIZE, DEFAULT_LEARNING_RATE, STARTING_VALUE},
};

/// Configuration for creating a TD agent.
///
/// Everything the learner needs is passed in here at construction; there is
/// no global state.
///
/// # Examples
///
/// ```
/// use tictactoe_td::app::AgentConfig;
/// use tictactoe_td::td_learning::Exploration;
///
/// let config = AgentConfig::default()
///     .with_seed(42)
///     .with_learning_rate(0.3)
///     .with_exploration(Exploration::Period(50));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Side length of the board; only 3 is supported
    pub board_size: usize,
    /// TD step size α in (0, 1]
    pub learning_rate: f64,
    /// Exploration trigger
    pub exploration: Exploration,
    /// Value of unseen states in [0, 1]
    pub starting_value: f64,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl AgentConfig {
    /// Set the learning rate α.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the exploration trigger.
    pub fn with_exploration(mut self, exploration: Exploration) -> Self {
        self.exploration = exploration;
        self
    }

    /// Set the value assumed for unseen states.
    pub fn with_starting_value(mut self, starting_value: f64) -> Self {
        self.starting_value = starting_value;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every parameter range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first offending
    /// parameter.
    pub fn validate(&self) -> Result<()> {
        if self.board_size != BOARD_SIZE {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "board size {} is not supported (only {BOARD_SIZE})",
                    self.board_size
                ),
            });
        }
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(Error::InvalidConfiguration {
                message: format!("learning rate {} must lie in (0, 1]", self.learning_rate),
            });
        }
        if !(0.0..=1.0).contains(&self.starting_value) {
            return Err(Error::InvalidConfiguration {
                message: format!("starting value {} must lie in [0, 1]", self.starting_value),
            });
        }
        self.exploration.validate()?;
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            board_size: BOARD_SIZE,
            learning_rate: DEFAULT_LEARNING_RATE,
            exploration: Exploration::default(),
            starting_value: STARTING_VALUE,
            seed: None,
        }
    }
}
