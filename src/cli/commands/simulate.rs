//! Simulate command - Monte Carlo estimate next to the exact value

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::{
        config::{GameArgs, SolverArgs},
        output::{create_progress, format_number, print_kv, print_section},
    },
    simulation::{SimulationConfig, Simulator},
    solver::WinProbabilitySolver,
};

#[derive(Parser, Debug)]
#[command(about = "Estimate the win probability by sampling games")]
pub struct SimulateArgs {
    #[command(flatten)]
    pub game: GameArgs,

    #[command(flatten)]
    pub solver: SolverArgs,

    /// Number of games to sample
    #[arg(long, short = 'g', default_value_t = 10_000)]
    pub games: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Confidence level of the reported interval
    #[arg(long, default_value_t = 0.95)]
    pub confidence: f64,

    /// Skip the exact computation
    #[arg(long)]
    pub no_exact: bool,
}

pub fn execute(args: SimulateArgs) -> Result<()> {
    let config = args.game.resolve()?;
    let initial = config.initial_state()?;

    let mut sim_config = SimulationConfig::default()
        .with_games(args.games)
        .with_confidence(args.confidence);
    if let Some(seed) = args.seed {
        sim_config = sim_config.with_seed(seed);
    }

    let mut simulator = Simulator::new(sim_config)?;
    let progress = create_progress(args.games as u64, "games")?;
    progress.set_message("sampling");
    let report = simulator.run_with_progress(&initial, Some(&progress))?;
    progress.finish_and_clear();

    print_section("Monte Carlo estimate");
    print_kv("Initial state", &initial.to_string());
    print_kv("Games", &format_number(report.games));
    print_kv("Town wins", &format_number(report.town_wins));
    print_kv("Win rate", &format!("{:.4}", report.win_rate));
    print_kv(
        &format!("{:.0}% interval", report.confidence * 100.0),
        &format!("[{:.4}, {:.4}]", report.confidence_low, report.confidence_high),
    );
    print_kv("Mean events per game", &format!("{:.2}", report.mean_events));

    if !args.no_exact {
        let exact = WinProbabilitySolver::new(args.solver.solver_config()).win_probability(&initial)?;
        print_kv("Exact", &format!("{} ({})", exact, exact.to_decimal(4)));
        let verdict = if report.covers(&exact) {
            "inside interval"
        } else {
            "outside interval"
        };
        print_kv("Exact vs estimate", verdict);
    }

    Ok(())
}
