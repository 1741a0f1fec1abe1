//! Train command - Train the TD agent against the heuristic expert

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;
use tracing::info;

use crate::{
    app::{AgentConfig, App},
    cli::{
        config::{TableFormat, TrainFileConfig, app_for},
        output::{format_count_share, format_number, print_section, print_stats_table},
    },
    pipeline::{
        CsvTrendObserver, JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver,
        SharedObserver, TrainingConfig, TrainingPipeline, TrainingResult,
    },
    ports::Learner,
    td_learning::{Exploration, TdAgent, TrainingMetadata},
    tictactoe::Mark,
};

pub(crate) fn parse_mark_token(value: &str, flag: &str) -> Result<Mark> {
    match value.trim().to_ascii_lowercase().as_str() {
        "x" | "first" | "player1" | "p1" => Ok(Mark::X),
        "o" | "second" | "player2" | "p2" => Ok(Mark::O),
        other => bail!("Invalid value '{other}' for {flag} (expected 'x' or 'o')"),
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train the TD agent against the expert")]
pub struct TrainArgs {
    /// Number of training episodes
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    /// JSON file with `agent` and `training` sections
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Resume from this value table (starts fresh if it does not exist)
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,

    /// Write the trained value table here
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// Value table format (defaults to the file extension, then msgpack)
    #[arg(long, value_enum)]
    pub format: Option<TableFormat>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// TD step size α in (0, 1]
    #[arg(long)]
    pub learning_rate: Option<f64>,

    /// Probability of an exploratory move
    #[arg(long, conflicts_with = "exploration_period")]
    pub exploration_rate: Option<f64>,

    /// Explore deterministically on every Kth move instead
    #[arg(long)]
    pub exploration_period: Option<u64>,

    /// Value of states the agent has never seen
    #[arg(long)]
    pub starting_value: Option<f64>,

    /// Let the expert block the agent's open lines
    #[arg(long)]
    pub blocking: bool,

    /// Which mark the agent plays (`x` or `o`)
    #[arg(long)]
    pub agent_mark: Option<String>,

    /// Which mark opens every episode (`x` or `o`)
    #[arg(long)]
    pub first_mark: Option<String>,

    /// Episodes per win-rate window
    #[arg(long)]
    pub window: Option<usize>,

    /// Optional file for JSONL observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Optional CSV file of per-window result fractions
    #[arg(long)]
    pub trend: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Print every value table entry after training
    #[arg(long)]
    pub dump: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    result: &'a TrainingResult,
    metrics: MetricsSummary,
    agent: &'a AgentConfig,
    training: &'a TrainingConfig,
    episodes_trained: usize,
}

impl TrainArgs {
    /// Merge the optional config file with command-line overrides
    fn resolve(&self) -> Result<(AgentConfig, TrainingConfig)> {
        let file = match &self.config {
            Some(path) => TrainFileConfig::load(path)?,
            None => TrainFileConfig::default(),
        };
        let TrainFileConfig {
            mut agent,
            mut training,
        } = file;

        if let Some(learning_rate) = self.learning_rate {
            agent.learning_rate = learning_rate;
        }
        if let Some(rate) = self.exploration_rate {
            agent.exploration = Exploration::Probability(rate);
        }
        if let Some(period) = self.exploration_period {
            agent.exploration = Exploration::Period(period);
        }
        if let Some(starting_value) = self.starting_value {
            agent.starting_value = starting_value;
        }
        if let Some(seed) = self.seed {
            agent.seed = Some(seed);
            training.seed = Some(seed);
        }

        if let Some(episodes) = self.episodes {
            training.episodes = episodes;
        }
        if self.blocking {
            training.blocking_expert = true;
        }
        if let Some(value) = &self.agent_mark {
            training.agent_mark = parse_mark_token(value, "--agent-mark")?;
        }
        if let Some(value) = &self.first_mark {
            training.first_mark = parse_mark_token(value, "--first-mark")?;
        }
        if let Some(window) = self.window {
            training.window = window;
        }

        agent.validate()?;
        if training.window == 0 {
            bail!("--window must be at least 1");
        }
        Ok((agent, training))
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let (agent_config, training_config) = args.resolve()?;

    let app = App::new();
    let (mut agent, previous) = match &args.input {
        Some(path) => app_for(path, args.format)
            .load_or_create_agent(path, agent_config.clone())
            .with_context(|| format!("Failed to load value table: {}", path.display()))?,
        None => (
            app.create_agent(agent_config.clone())?,
            TrainingMetadata::default(),
        ),
    };
    let mut expert = app.create_expert(
        training_config.blocking_expert,
        training_config.seed.map(|seed| seed.wrapping_add(1)),
    );

    print_section("Training TD(0) agent");
    print_stats_table(&[
        ("Opponent", expert.name()),
        ("Agent plays", &training_config.agent_mark.to_string()),
        ("First move", &training_config.first_mark.to_string()),
        ("Episodes", &format_number(training_config.episodes)),
        ("Learning rate", &agent_config.learning_rate.to_string()),
        ("Exploration", &format!("{:?}", agent_config.exploration)),
        ("Starting states", &format_number(agent.value_map().len())),
    ]);

    let mut pipeline = TrainingPipeline::new(training_config.clone());
    if !args.no_progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        pipeline = pipeline.with_observer(Box::new(JsonlObserver::new(path)?));
    }
    if let Some(path) = &args.trend {
        pipeline = pipeline.with_observer(Box::new(CsvTrendObserver::new(
            path,
            training_config.window,
        )?));
    }

    let metrics = SharedObserver::new(MetricsObserver::new(training_config.window)?);
    pipeline = pipeline.with_observer(Box::new(metrics.clone()));
    let result = pipeline.run(&mut agent, &mut expert)?;
    let metrics = metrics.lock();

    let episodes_trained = previous.episodes_trained + result.total_episodes;
    print_report(&agent, &result, &metrics, args.dump);

    if let Some(path) = &args.summary {
        let summary = TrainingSummaryFile {
            result: &result,
            metrics: metrics.summary(),
            agent: &agent_config,
            training: &training_config,
            episodes_trained,
        };
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create summary file: {}", path.display()))?;
        serde_json::to_writer_pretty(file, &summary)?;
        println!("\nSummary written to {}", path.display());
    }

    if let Some(path) = &args.output {
        let metadata = TrainingMetadata {
            episodes_trained,
            opponent: Some(expert.name().to_string()),
            blocking_expert: Some(training_config.blocking_expert),
            seed: training_config.seed,
            saved_at: None,
        };
        app_for(path, args.format)
            .save_agent(&agent, metadata, path)
            .with_context(|| format!("Failed to save value table: {}", path.display()))?;
        info!(path = %path.display(), episodes_trained, "value table saved");
        println!("\nValue table saved to {}", path.display());
    }

    Ok(())
}

fn print_report(
    agent: &TdAgent,
    result: &TrainingResult,
    metrics: &MetricsObserver,
    dump: bool,
) {
    println!();
    println!("---------------------------");
    println!(" End of training reporting");
    println!("---------------------------");
    println!(" Value map had {} entries.", agent.value_map().len());
    if dump {
        println!(" Entries are:");
        for (key, value) in agent.value_map().sorted_entries() {
            println!("{key}: {value}");
        }
    }

    let total = result.total_episodes;
    println!(" Overall results were:");
    println!("  Draw    : {}", format_count_share(result.ties, total));
    println!("  Expert  : {}", format_count_share(result.opponent_wins, total));
    println!("  Agent   : {}", format_count_share(result.agent_wins, total));

    let windows = metrics.windows();
    if !windows.is_empty() {
        println!(" Per {} episodes (draw / expert / agent):", windows[0].episodes);
        for window in windows {
            println!(
                "  {:>6}: {:.3} / {:.3} / {:.3}",
                window.first_episode,
                window.tie_rate,
                window.opponent_win_rate,
                window.agent_win_rate
            );
        }
    }
}
