//! Training pipeline: the driving loop between the learner and its opponent

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Result,
    ports::{EpisodeReport, EpisodeResult, Learner, Observer},
    tictactoe::{Game, Mark, Move, Outcome},
};

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of training episodes
    pub episodes: usize,

    /// Random seed for both players
    pub seed: Option<u64>,

    /// Mark played by the learning agent
    pub agent_mark: Mark,

    /// Mark that opens every episode
    pub first_mark: Mark,

    /// Whether the expert blocks the agent's open lines
    pub blocking_expert: bool,

    /// Episodes per win-rate window
    pub window: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 10_000,
            seed: None,
            agent_mark: Mark::O,
            first_mark: Mark::X,
            blocking_expert: false,
            window: 500,
        }
    }
}

/// Result of a training run, counted from the agent's point of view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Total episodes played
    pub total_episodes: usize,

    pub agent_wins: usize,

    pub opponent_wins: usize,

    pub ties: usize,

    /// Size of the agent's value table at the end, if it has one
    pub value_map_size: Option<usize>,
}

impl TrainingResult {
    /// Create a new training result
    pub fn new(
        total_episodes: usize,
        agent_wins: usize,
        opponent_wins: usize,
        ties: usize,
        value_map_size: Option<usize>,
    ) -> Self {
        Self {
            total_episodes,
            agent_wins,
            opponent_wins,
            ties,
            value_map_size,
        }
    }

    fn rate(&self, count: usize) -> f64 {
        if self.total_episodes > 0 {
            count as f64 / self.total_episodes as f64
        } else {
            0.0
        }
    }

    pub fn agent_win_rate(&self) -> f64 {
        self.rate(self.agent_wins)
    }

    pub fn opponent_win_rate(&self) -> f64 {
        self.rate(self.opponent_wins)
    }

    pub fn tie_rate(&self) -> f64 {
        self.rate(self.ties)
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Training pipeline for a single learner against an opponent
///
/// One [`Game`] is owned by the pipeline and reset between episodes; players
/// only propose coordinates.
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run training with the given agent and opponent
    ///
    /// # Errors
    ///
    /// Any player or observer error aborts the run. An illegal move proposed
    /// by a player surfaces as [`crate::Error::InvalidMove`].
    pub fn run(
        &mut self,
        agent: &mut dyn Learner,
        opponent: &mut dyn Learner,
    ) -> Result<TrainingResult> {
        self.seed_pair(agent, opponent)?;

        info!(
            episodes = self.config.episodes,
            agent = agent.name(),
            opponent = opponent.name(),
            agent_mark = %self.config.agent_mark,
            "training started"
        );

        for observer in &mut self.observers {
            observer.on_training_start(self.config.episodes)?;
        }

        let mut game = Game::new(self.config.first_mark);
        let (mut agent_wins, mut opponent_wins, mut ties) = (0, 0, 0);

        for episode in 0..self.config.episodes {
            let report = self.play_episode(episode, &mut game, agent, opponent)?;

            match report.result() {
                EpisodeResult::AgentWin => agent_wins += 1,
                EpisodeResult::OpponentWin => opponent_wins += 1,
                EpisodeResult::Tie => ties += 1,
            }

            for observer in &mut self.observers {
                observer.on_episode_end(&report)?;
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let result = TrainingResult::new(
            self.config.episodes,
            agent_wins,
            opponent_wins,
            ties,
            agent.value_map_size(),
        );
        info!(
            agent_wins,
            opponent_wins,
            ties,
            states = result.value_map_size,
            "training finished"
        );
        Ok(result)
    }

    fn seed_pair(&self, agent: &mut dyn Learner, opponent: &mut dyn Learner) -> Result<()> {
        if let Some(seed) = self.config.seed {
            agent.set_rng_seed(seed)?;
            opponent.set_rng_seed(seed.wrapping_add(1))?;
        }
        Ok(())
    }

    fn play_episode(
        &mut self,
        episode: usize,
        game: &mut Game,
        agent: &mut dyn Learner,
        opponent: &mut dyn Learner,
    ) -> Result<EpisodeReport> {
        for observer in &mut self.observers {
            observer.on_episode_start(episode)?;
        }

        game.reset();
        let agent_mark = self.config.agent_mark;
        let mut step = 0;

        let outcome = loop {
            let mark = game.to_move();
            let player: &mut dyn Learner = if mark == agent_mark {
                &mut *agent
            } else {
                &mut *opponent
            };

            let before = *game.board();
            let coord = player.select_move(&before, mark)?;
            let outcome = game.play(mark, coord)?;

            for observer in &mut self.observers {
                observer.on_move(episode, step, &before, Move { coord, mark })?;
            }
            step += 1;

            if outcome != Outcome::Ongoing {
                break outcome;
            }
        };

        agent.finish_episode(outcome, agent_mark)?;
        opponent.finish_episode(outcome, agent_mark.opponent())?;

        let report = EpisodeReport {
            episode,
            outcome,
            agent_mark,
            moves: game.moves().len(),
            value_map_size: agent.value_map_size().unwrap_or(0),
        };
        debug!(
            episode,
            %outcome,
            moves = report.moves,
            states = report.value_map_size,
            "episode finished"
        );
        Ok(report)
    }
}
