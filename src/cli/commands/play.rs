//! Play command - A human plays X against the trained agent on stdin

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    app::AgentConfig,
    cli::config::{TableFormat, app_for},
    td_learning::{Exploration, TdAgent},
    tictactoe::{Coord, Game, Mark, Outcome},
};

#[derive(Parser, Debug)]
#[command(about = "Play against the trained agent")]
pub struct PlayArgs {
    /// Value table to play against (starts fresh if it does not exist)
    pub table: PathBuf,

    /// Value table format (defaults to the file extension, then msgpack)
    #[arg(long, value_enum)]
    pub format: Option<TableFormat>,

    /// Probability of an exploratory move by the agent
    #[arg(long, default_value_t = 0.0)]
    pub exploration_rate: f64,

    /// TD step size α used while playing
    #[arg(long, default_value_t = crate::types::DEFAULT_LEARNING_RATE)]
    pub learning_rate: f64,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write what the agent learned during play back to the table
    #[arg(long)]
    pub save: bool,
}

/// Results of an interactive session, from the human's point of view
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub games: usize,
    pub human_wins: usize,
    pub agent_wins: usize,
    pub ties: usize,
}

const HUMAN: Mark = Mark::X;
const AGENT: Mark = Mark::O;

pub fn execute(args: PlayArgs) -> Result<()> {
    let mut config = AgentConfig::default()
        .with_learning_rate(args.learning_rate)
        .with_exploration(Exploration::Probability(args.exploration_rate));
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let app = app_for(&args.table, args.format);
    let (mut agent, metadata) = app
        .load_or_create_agent(&args.table, config)
        .with_context(|| format!("Failed to load value table: {}", args.table.display()))?;

    println!(
        "Agent knows {} states ({} training episodes).",
        agent.value_map().len(),
        metadata.episodes_trained
    );
    println!("You are {HUMAN}. Enter moves as 'row,col' (0-2), 'q' to quit.");

    let stdin = io::stdin();
    let summary = play_session(&mut agent, stdin.lock(), io::stdout().lock())?;

    println!(
        "\nGames: {}  You: {}  Agent: {}  Ties: {}",
        summary.games, summary.human_wins, summary.agent_wins, summary.ties
    );

    if args.save {
        app.save_agent(&agent, metadata, &args.table)
            .with_context(|| format!("Failed to save value table: {}", args.table.display()))?;
        println!("Value table saved to {}", args.table.display());
    }
    Ok(())
}

/// Run games until the input ends or the human quits.
///
/// The human always opens. The agent keeps learning from every finished game.
pub fn play_session<R: BufRead, W: Write>(
    agent: &mut TdAgent,
    mut input: R,
    mut output: W,
) -> Result<SessionSummary> {
    let mut summary = SessionSummary::default();
    let mut game = Game::new(HUMAN);

    'games: loop {
        game.reset();
        agent.reset_episode();
        writeln!(output, "\n{}", game.board().render())?;

        let outcome = loop {
            let outcome = if game.to_move() == HUMAN {
                let Some(coord) = read_move(&game, &mut input, &mut output)? else {
                    break 'games;
                };
                game.play(HUMAN, coord)?
            } else {
                let coord = agent.choose_move(AGENT, HUMAN, game.board())?;
                writeln!(output, "Agent plays {coord}")?;
                game.play(AGENT, coord)?
            };
            writeln!(output, "\n{}", game.board().render())?;

            if outcome != Outcome::Ongoing {
                break outcome;
            }
        };

        agent.finish_episode(outcome, AGENT)?;
        summary.games += 1;
        match outcome {
            Outcome::Win(HUMAN) => {
                summary.human_wins += 1;
                writeln!(output, "You win!")?;
            }
            Outcome::Win(_) => {
                summary.agent_wins += 1;
                writeln!(output, "Agent wins.")?;
            }
            _ => {
                summary.ties += 1;
                writeln!(output, "Tie.")?;
            }
        }
    }

    Ok(summary)
}

/// Prompt until a legal coordinate is entered; `None` on quit or end of input
fn read_move<R: BufRead, W: Write>(
    game: &Game,
    input: &mut R,
    output: &mut W,
) -> Result<Option<Coord>> {
    loop {
        write!(output, "Your move> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
            return Ok(None);
        }

        match Coord::parse(line) {
            Ok(coord) if game.board().is_empty_at(coord) => return Ok(Some(coord)),
            Ok(coord) => writeln!(output, "Cell {coord} is taken.")?,
            Err(err) => writeln!(output, "{err}")?,
        }
    }
}
