//! Inspect command - Summarize a saved value table

use std::{cmp::Ordering, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::{
        config::{TableFormat, app_for},
        output::{format_number, indent_board, print_section, print_stats_table, print_subsection},
    },
    td_learning::{TrainingMetadata, ValueMap},
    tictactoe::Board,
    types::StateKey,
};

#[derive(Parser, Debug)]
#[command(about = "Show what a saved value table has learned")]
pub struct InspectArgs {
    /// Value table to inspect
    pub table: PathBuf,

    /// Value table format (defaults to the file extension, then msgpack)
    #[arg(long, value_enum)]
    pub format: Option<TableFormat>,

    /// Number of best and worst states to show
    #[arg(long, short = 'n', default_value_t = 5)]
    pub top: usize,

    /// Look up a single state, e.g. `X...O....`
    #[arg(long)]
    pub state: Option<String>,
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let app = app_for(&args.table, args.format);
    let saved = app
        .value_map_repository()
        .load(&args.table)
        .with_context(|| format!("Failed to load value table: {}", args.table.display()))?;
    let metadata = saved.metadata.clone();
    let value_map = saved.into_value_map()?;

    print_section(&format!("Value table: {}", args.table.display()));
    print_stats_table(&[
        ("States", &format_number(value_map.len())),
        ("Learning rate", &value_map.learning_rate().to_string()),
        ("Starting value", &value_map.starting_value().to_string()),
    ]);
    print_metadata(&metadata);

    if let Some(state) = &args.state {
        let key = StateKey::parse(state)?;
        print_subsection(&format!("State {key}"));
        println!("{}", indent_board(&Board::from_key(&key), "    "));
        match value_map.peek(&key) {
            Some(value) => println!("  value: {value:.4}"),
            None => println!(
                "  not visited (would start at {})",
                value_map.starting_value()
            ),
        }
    }

    if args.top > 0 && !value_map.is_empty() {
        print_subsection("Highest valued states");
        print_entries(&ranked_entries(&value_map, args.top, true));
        print_subsection("Lowest valued states");
        print_entries(&ranked_entries(&value_map, args.top, false));
    }

    Ok(())
}

fn print_metadata(metadata: &TrainingMetadata) {
    let episodes = format_number(metadata.episodes_trained);
    let opponent = metadata.opponent.clone().unwrap_or_else(|| "-".to_string());
    let blocking = metadata
        .blocking_expert
        .map_or_else(|| "-".to_string(), |b| b.to_string());
    let seed = metadata
        .seed
        .map_or_else(|| "-".to_string(), |s| s.to_string());
    let saved_at = metadata
        .saved_at
        .map_or_else(|| "-".to_string(), |t| format!("{t} (unix seconds)"));

    print_stats_table(&[
        ("Episodes trained", &episodes),
        ("Opponent", &opponent),
        ("Blocking expert", &blocking),
        ("Seed", &seed),
        ("Saved at", &saved_at),
    ]);
}

fn print_entries(entries: &[(StateKey, f64)]) {
    for (key, value) in entries {
        println!("\n  {key}  value {value:.4}");
        println!("{}", indent_board(&Board::from_key(key), "    "));
    }
}

/// The `n` highest (or lowest) valued entries, ties broken by key
pub(crate) fn ranked_entries(
    value_map: &ValueMap,
    n: usize,
    highest: bool,
) -> Vec<(StateKey, f64)> {
    let mut entries: Vec<(StateKey, f64)> = value_map
        .iter()
        .map(|(key, value)| (key.clone(), value))
        .collect();
    entries.sort_by(|(key_a, a), (key_b, b)| {
        let by_value = if highest {
            b.partial_cmp(a)
        } else {
            a.partial_cmp(b)
        };
        by_value.unwrap_or(Ordering::Equal).then_with(|| key_a.cmp(key_b))
    });
    entries.truncate(n);
    entries
}
