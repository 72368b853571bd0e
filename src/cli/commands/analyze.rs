//! Analyze command - Statistics of the reachable state graph

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::{
        config::{GameArgs, SolverArgs},
        output::{create_spinner, format_number, print_kv, print_section, print_subsection},
    },
    game::{Phase, StateGraph},
    solver::WinProbabilitySolver,
};

#[derive(Parser, Debug)]
#[command(about = "Analyze the reachable state graph")]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub game: GameArgs,

    #[command(flatten)]
    pub solver: SolverArgs,

    /// Print statistics as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: AnalyzeArgs) -> Result<()> {
    let config = args.game.resolve()?;
    let initial = config.initial_state()?;

    let spinner = create_spinner("Building state graph...")?;
    let mut solver = WinProbabilitySolver::new(args.solver.solver_config());
    let graph = StateGraph::build(initial, &mut solver)?;
    spinner.finish_and_clear();

    let stats = graph.stats();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    print_section("State graph");
    print_kv("Initial state", &initial.to_string());
    print_kv("Town win probability", &graph.root().win_probability.to_string());
    print_kv("Distinct states", &format_number(stats.nodes));
    print_kv("Transitions", &format_number(stats.edges));
    print_kv("Unshared tree paths", &format_number(&stats.paths));
    print_kv("Longest game", &format!("{} transitions", stats.max_depth));

    print_subsection("Terminal states");
    print_kv("Town wins", &format_number(stats.town_wins));
    print_kv("Mafia wins", &format_number(stats.mafia_wins));

    print_subsection("Ongoing states by phase");
    for phase in Phase::ALL {
        print_kv(&phase.to_string(), &format_number(stats.ongoing_in(phase)));
    }

    Ok(())
}
