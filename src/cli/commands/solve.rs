//! Solve command - Compute the exact town win probability

use anyhow::Result;
use clap::Parser;
use serde::Serialize;

use crate::{
    cli::{
        config::{GameArgs, SolverArgs},
        output::{format_number, print_kv, print_section},
    },
    config::GameConfig,
    game::GameState,
    solver::{WinProbabilitySolver, win_probability_naive},
    types::Probability,
};

#[derive(Parser, Debug)]
#[command(about = "Compute the exact town win probability")]
pub struct SolveArgs {
    #[command(flatten)]
    pub game: GameArgs,

    #[command(flatten)]
    pub solver: SolverArgs,

    /// Fractional digits in the decimal rendering
    #[arg(long, default_value_t = 6)]
    pub digits: usize,

    /// Use unmemoized recursion (exponential; for cross-checking small tables)
    #[arg(long)]
    pub naive: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct SolveOutput {
    config: GameConfig,
    initial_state: GameState,
    probability: Probability,
    decimal: String,
    distinct_states: Option<usize>,
}

pub fn execute(args: SolveArgs) -> Result<()> {
    let config = args.game.resolve()?;
    let initial = config.initial_state()?;

    let (probability, distinct_states) = if args.naive {
        (win_probability_naive(&initial)?, None)
    } else {
        let mut solver = WinProbabilitySolver::new(args.solver.solver_config());
        let probability = solver.win_probability(&initial)?;
        (probability, Some(solver.distinct_states()))
    };

    let output = SolveOutput {
        decimal: probability.to_decimal(args.digits),
        config,
        initial_state: initial,
        probability,
        distinct_states,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_section("Town win probability");
    print_kv("Initial state", &output.initial_state.to_string());
    print_kv("Exact", &output.probability.to_string());
    print_kv("Decimal", &output.decimal);
    match output.distinct_states {
        Some(count) => print_kv("Distinct states", &format_number(count)),
        None => print_kv("Method", "naive recursion"),
    }

    Ok(())
}
