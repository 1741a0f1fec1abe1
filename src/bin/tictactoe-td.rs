//! tictactoe-td CLI - Train, play against and inspect a TD(0) tic-tac-toe agent
//!
//! - `train` runs episodes against the heuristic expert and reports results
//! - `play` lets a human play X against the agent
//! - `inspect` summarizes a saved value table

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tictactoe-td")]
#[command(version, about = "TD(0) tic-tac-toe agent trained against a heuristic expert", long_about = None)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the agent against the expert
    Train(Box<tictactoe_td::cli::commands::train::TrainArgs>),

    /// Play against a trained agent
    Play(tictactoe_td::cli::commands::play::PlayArgs),

    /// Summarize a saved value table
    Inspect(tictactoe_td::cli::commands::inspect::InspectArgs),
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Train(args) => tictactoe_td::cli::commands::train::execute(*args),
        Commands::Play(args) => tictactoe_td::cli::commands::play::execute(args),
        Commands::Inspect(args) => tictactoe_td::cli::commands::inspect::execute(args),
    }
}
