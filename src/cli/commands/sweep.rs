//! Sweep command - Win probability across table sizes

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;

use crate::{
    cli::{
        config::SolverArgs,
        output::{create_progress, print_section},
    },
    config::GameConfig,
    solver::WinProbabilitySolver,
    types::Probability,
};

#[derive(Parser, Debug)]
#[command(about = "Tabulate win probabilities over a range of town counts")]
pub struct SweepArgs {
    /// Unrevealed mafia members
    #[arg(long, short = 'm', default_value_t = 3)]
    pub mafia: i64,

    /// Whether a sheriff is in play (true or false)
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub sheriff: bool,

    /// Smallest town count (defaults to the smallest valid table)
    #[arg(long)]
    pub min_town: Option<i64>,

    /// Largest town count
    #[arg(long, default_value_t = 12)]
    pub max_town: i64,

    #[command(flatten)]
    pub solver: SolverArgs,

    /// Fractional digits in the decimal column
    #[arg(long, default_value_t = 6)]
    pub digits: usize,

    /// Also write the table as CSV
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SweepRow {
    town: i64,
    mafia: i64,
    sheriff: bool,
    probability: Probability,
    decimal: String,
}

pub fn execute(args: SweepArgs) -> Result<()> {
    let smallest = (args.mafia - i64::from(args.sheriff)).max(0);
    let min_town = args.min_town.unwrap_or(smallest);
    if min_town > args.max_town {
        bail!("--min-town {min_town} exceeds --max-town {}", args.max_town);
    }

    let towns: Vec<i64> = (min_town..=args.max_town).collect();
    let progress = create_progress(towns.len() as u64, "tables")?;

    // One solver for the whole sweep: larger tables reuse smaller ones' states.
    let mut solver = WinProbabilitySolver::new(args.solver.solver_config());
    let mut rows = Vec::with_capacity(towns.len());
    for town in towns {
        let config = GameConfig::new(town, args.mafia).with_sheriff(args.sheriff);
        let initial = config.initial_state()?;
        progress.set_message(format!("town {town}"));
        let probability = solver.win_probability(&initial)?;
        rows.push(SweepRow {
            town,
            mafia: args.mafia,
            sheriff: args.sheriff,
            decimal: probability.to_decimal(args.digits),
            probability,
        });
        progress.inc(1);
    }
    progress.finish_and_clear();

    print_section(&format!(
        "Town win probability, {} mafia, {}",
        args.mafia,
        if args.sheriff { "with sheriff" } else { "no sheriff" }
    ));
    println!("  {:>6}  {:>14}  {}", "town", "decimal", "exact");
    for row in &rows {
        println!("  {:>6}  {:>14}  {}", row.town, row.decimal, row.probability);
    }

    if let Some(path) = &args.export {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        for row in &rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        println!("\n✓ Sweep exported to: {}", path.display());
    }

    Ok(())
}
