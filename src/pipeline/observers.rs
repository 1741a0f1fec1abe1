//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! training logic to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    Result,
    ports::{EpisodeReport, EpisodeResult, Observer},
    tictactoe::{Board, Move},
};

/// Observation of a single move during an episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepObservation {
    /// Move number within the episode
    pub step: usize,
    /// State key of the board before the move
    pub before: String,
    /// Move played
    pub applied: Move,
}

/// Complete observation of a training episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub episode: usize,
    pub outcome: String,
    pub result: EpisodeResult,
    pub value_map_size: usize,
    pub steps: Vec<StepObservation>,
}

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    agent_wins: usize,
    ties: usize,
    opponent_wins: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            agent_wins: 0,
            ties: 0,
            opponent_wins: 0,
        }
    }

    fn message(&self) -> String {
        format!("{} T:{} L:{}", self.agent_wins, self.ties, self.opponent_wins)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes (W:{msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, report: &EpisodeReport) -> Result<()> {
        match report.result() {
            EpisodeResult::AgentWin => self.agent_wins += 1,
            EpisodeResult::Tie => self.ties += 1,
            EpisodeResult::OpponentWin => self.opponent_wins += 1,
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(report.episode as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Fractions of each result over one window of consecutive episodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSummary {
    /// Index of the window (0-based)
    pub window: usize,
    /// First episode in the window
    pub first_episode: usize,
    /// Episodes in the window
    pub episodes: usize,
    pub tie_rate: f64,
    pub opponent_win_rate: f64,
    pub agent_win_rate: f64,
    /// Value table size after the last episode of the window
    pub value_map_size: usize,
}

/// Splits the episode stream into fixed-size windows
///
/// Only complete windows are reported; a trailing partial window is dropped.
#[derive(Debug, Clone)]
pub struct WindowTracker {
    size: usize,
    counts: [usize; 3],
    seen: usize,
    completed: Vec<WindowSummary>,
}

impl WindowTracker {
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] for a zero window size.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(crate::Error::InvalidConfiguration {
                message: "window size must be at least 1".to_string(),
            });
        }
        Ok(Self {
            size,
            counts: [0; 3],
            seen: 0,
            completed: Vec::new(),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Record one episode; returns the window it completed, if any.
    pub fn record(&mut self, report: &EpisodeReport) -> Option<&WindowSummary> {
        let slot = match report.result() {
            EpisodeResult::Tie => 0,
            EpisodeResult::OpponentWin => 1,
            EpisodeResult::AgentWin => 2,
        };
        self.counts[slot] += 1;
        self.seen += 1;

        if !self.seen.is_multiple_of(self.size) {
            return None;
        }

        let window = self.completed.len();
        let rate = |count: usize| count as f64 / self.size as f64;
        self.completed.push(WindowSummary {
            window,
            first_episode: window * self.size,
            episodes: self.size,
            tie_rate: rate(self.counts[0]),
            opponent_win_rate: rate(self.counts[1]),
            agent_win_rate: rate(self.counts[2]),
            value_map_size: report.value_map_size,
        });
        self.counts = [0; 3];
        self.completed.last()
    }

    pub fn windows(&self) -> &[WindowSummary] {
        &self.completed
    }
}

/// Metrics observer - Tracks totals and per-window result fractions
pub struct MetricsObserver {
    agent_wins: usize,
    ties: usize,
    opponent_wins: usize,
    total_episodes: usize,
    move_counts: Vec<usize>,
    windows: WindowTracker,
}

impl MetricsObserver {
    /// Create a new metrics observer with the given window size
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] for a zero window size.
    pub fn new(window: usize) -> Result<Self> {
        Ok(Self {
            agent_wins: 0,
            ties: 0,
            opponent_wins: 0,
            total_episodes: 0,
            move_counts: Vec::new(),
            windows: WindowTracker::new(window)?,
        })
    }

    fn rate(&self, count: usize) -> f64 {
        if self.total_episodes == 0 {
            0.0
        } else {
            count as f64 / self.total_episodes as f64
        }
    }

    pub fn agent_win_rate(&self) -> f64 {
        self.rate(self.agent_wins)
    }

    pub fn tie_rate(&self) -> f64 {
        self.rate(self.ties)
    }

    pub fn opponent_win_rate(&self) -> f64 {
        self.rate(self.opponent_wins)
    }

    /// Get average episode length in moves
    pub fn avg_episode_length(&self) -> f64 {
        if self.move_counts.is_empty() {
            0.0
        } else {
            self.move_counts.iter().sum::<usize>() as f64 / self.move_counts.len() as f64
        }
    }

    pub fn windows(&self) -> &[WindowSummary] {
        self.windows.windows()
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_episodes: self.total_episodes,
            agent_wins: self.agent_wins,
            ties: self.ties,
            opponent_wins: self.opponent_wins,
            agent_win_rate: self.agent_win_rate(),
            tie_rate: self.tie_rate(),
            opponent_win_rate: self.opponent_win_rate(),
            avg_episode_length: self.avg_episode_length(),
            windows: self.windows().to_vec(),
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_episodes: usize,
    pub agent_wins: usize,
    pub ties: usize,
    pub opponent_wins: usize,
    pub agent_win_rate: f64,
    pub tie_rate: f64,
    pub opponent_win_rate: f64,
    pub avg_episode_length: f64,
    pub windows: Vec<WindowSummary>,
}

impl Observer for MetricsObserver {
    fn on_episode_end(&mut self, report: &EpisodeReport) -> Result<()> {
        self.total_episodes += 1;
        self.move_counts.push(report.moves);
        match report.result() {
            EpisodeResult::AgentWin => self.agent_wins += 1,
            EpisodeResult::Tie => self.ties += 1,
            EpisodeResult::OpponentWin => self.opponent_wins += 1,
        }
        self.windows.record(report);
        Ok(())
    }
}

/// JSONL observer - Exports one JSON object per episode
pub struct JsonlObserver {
    writer: BufWriter<File>,
    current_steps: Vec<StepObservation>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self {
            writer,
            current_steps: Vec::new(),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        self.current_steps.clear();
        Ok(())
    }

    fn on_move(
        &mut self,
        _episode: usize,
        step: usize,
        before: &Board,
        applied: Move,
    ) -> Result<()> {
        self.current_steps.push(StepObservation {
            step,
            before: before.state_key().into_string(),
            applied,
        });
        Ok(())
    }

    fn on_episode_end(&mut self, report: &EpisodeReport) -> Result<()> {
        let observation = Observation {
            episode: report.episode,
            outcome: report.outcome.to_string(),
            result: report.result(),
            value_map_size: report.value_map_size,
            steps: std::mem::take(&mut self.current_steps),
        };

        // Write as JSONL (one JSON object per line)
        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// CSV observer - Writes one row of result fractions per completed window
///
/// These rows are the data behind a win-rate trend plot.
pub struct CsvTrendObserver {
    writer: csv::Writer<File>,
    windows: WindowTracker,
}

impl CsvTrendObserver {
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or the window size is
    /// zero.
    pub fn new<P: AsRef<Path>>(path: P, window: usize) -> Result<Self> {
        Ok(Self {
            writer: csv::Writer::from_path(path)?,
            windows: WindowTracker::new(window)?,
        })
    }
}

impl Observer for CsvTrendObserver {
    fn on_episode_end(&mut self, report: &EpisodeReport) -> Result<()> {
        if let Some(summary) = self.windows.record(report) {
            self.writer.serialize(summary)?;
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        info!(windows = self.windows.windows().len(), "wrote win-rate trend");
        Ok(())
    }
}

/// Shares an observer with the caller so its data can be read after the run
///
/// The pipeline owns its observers; wrap one in `SharedObserver` and keep a
/// clone to inspect it once training is done.
pub struct SharedObserver<O> {
    inner: Arc<Mutex<O>>,
}

impl<O> SharedObserver<O> {
    pub fn new(observer: O) -> Self {
        Self {
            inner: Arc::new(Mutex::new(observer)),
        }
    }

    /// Lock the wrapped observer
    pub fn lock(&self) -> MutexGuard<'_, O> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<O> Clone for SharedObserver<O> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<O: Observer> Observer for SharedObserver<O> {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        self.lock().on_training_start(total_episodes)
    }

    fn on_episode_start(&mut self, episode: usize) -> Result<()> {
        self.lock().on_episode_start(episode)
    }

    fn on_move(
        &mut self,
        episode: usize,
        step: usize,
        before: &Board,
        applied: Move,
    ) -> Result<()> {
        self.lock().on_move(episode, step, before, applied)
    }

    fn on_episode_end(&mut self, report: &EpisodeReport) -> Result<()> {
        self.lock().on_episode_end(report)
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.lock().on_training_end()
    }
}

/// Milestone observer - Tracks key learning achievements
///
/// Records the first tie the agent reached and the last episode it lost, a
/// rough indicator of when the agent stopped being beaten by the expert.
pub struct MilestoneObserver {
    first_tie: Option<usize>,
    last_loss: Option<usize>,
    episodes: usize,
}

impl MilestoneObserver {
    pub fn new() -> Self {
        Self {
            first_tie: None,
            last_loss: None,
            episodes: 0,
        }
    }

    pub fn first_tie(&self) -> Option<usize> {
        self.first_tie
    }

    pub fn last_loss(&self) -> Option<usize> {
        self.last_loss
    }

    pub fn episodes(&self) -> usize {
        self.episodes
    }
}

impl Default for MilestoneObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for MilestoneObserver {
    fn on_episode_end(&mut self, report: &EpisodeReport) -> Result<()> {
        self.episodes += 1;
        match report.result() {
            EpisodeResult::Tie if self.first_tie.is_none() => {
                self.first_tie = Some(report.episode);
            }
            EpisodeResult::OpponentWin => self.last_loss = Some(report.episode),
            _ => {}
        }
        Ok(())
    }
}
