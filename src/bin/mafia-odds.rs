//! mafia-odds CLI - Exact win probabilities for the game of Mafia
//!
//! This CLI provides a unified interface for:
//! - Solving the town win probability of a table exactly
//! - Analyzing and exporting the reachable state graph
//! - Verifying the rule set on every reachable state
//! - Sweeping table sizes and sampling games for comparison

use anyhow::Result;
use clap::{Parser, Subcommand};
use mafia_odds::cli::{commands, logging::init_tracing};

#[derive(Parser)]
#[command(name = "mafia-odds")]
#[command(version, about = "Exact town win probabilities for Mafia", long_about = None)]
struct Cli {
    /// Log solver progress to stderr (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the exact town win probability
    Solve(commands::solve::SolveArgs),

    /// Summarize the reachable state graph
    Analyze(commands::analyze::AnalyzeArgs),

    /// Export the state graph as DOT, GraphML, JSON or CSV
    Export(commands::export::ExportArgs),

    /// Check probability conservation and solver consistency
    Verify(commands::verify::VerifyArgs),

    /// Tabulate win probabilities across town counts
    Sweep(commands::sweep::SweepArgs),

    /// Estimate the win probability by sampling games
    Simulate(commands::simulate::SimulateArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Solve(args) => commands::solve::execute(args),
        Commands::Analyze(args) => commands::analyze::execute(args),
        Commands::Export(args) => commands::export::execute(args),
        Commands::Verify(args) => commands::verify::execute(args),
        Commands::Sweep(args) => commands::sweep::execute(args),
        Commands::Simulate(args) => commands::simulate::execute(args),
    }
}
