//! Verify command - Check the rule set and solver on every reachable state

use anyhow::{Result, bail};
use clap::Parser;

use crate::{
    cli::{
        config::{GameArgs, SolverArgs},
        output::{create_spinner, format_number, print_kv, print_section},
    },
    game::StateGraph,
    solver::WinProbabilitySolver,
    verification::verify_graph,
};

#[derive(Parser, Debug)]
#[command(about = "Verify probability conservation and solver consistency")]
pub struct VerifyArgs {
    #[command(flatten)]
    pub game: GameArgs,

    #[command(flatten)]
    pub solver: SolverArgs,

    /// Recompute states with at most this many players without memoization
    #[arg(long, default_value_t = 8)]
    pub naive_limit: u32,

    /// Skip the unmemoized cross-check
    #[arg(long)]
    pub no_naive: bool,
}

pub fn execute(args: VerifyArgs) -> Result<()> {
    let config = args.game.resolve()?;
    let initial = config.initial_state()?;

    let spinner = create_spinner("Building state graph...")?;
    let mut solver = WinProbabilitySolver::new(args.solver.solver_config());
    let graph = StateGraph::build(initial, &mut solver)?;
    spinner.set_message("Verifying states...");
    let limit = (!args.no_naive).then_some(args.naive_limit);
    let report = verify_graph(&graph, limit)?;
    spinner.finish_and_clear();

    print_section("Verification");
    print_kv("States checked", &format_number(report.states_checked));
    print_kv("Naive recomputations", &format_number(report.naive_checked));

    let failures = [
        ("Conservation", &report.conservation_failures),
        ("Bounds", &report.bound_failures),
        ("Consistency", &report.consistency_failures),
        ("Naive mismatch", &report.naive_mismatches),
    ];
    for (name, lines) in failures {
        print_kv(name, &format!("{} failures", lines.len()));
        for line in lines.iter().take(10) {
            println!("    {line}");
        }
    }

    if !report.is_clean() {
        bail!("verification found {} failures", report.failure_count());
    }
    println!("\n✓ All checks passed");
    Ok(())
}
