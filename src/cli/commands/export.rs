//! Export command - Write the state graph for visualization

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::{
        config::{GameArgs, SolverArgs},
        output::create_spinner,
    },
    export::{ExportFormat, export_to_file},
    game::StateGraph,
    solver::WinProbabilitySolver,
};

#[derive(Parser, Debug)]
#[command(about = "Export the state graph in various formats")]
pub struct ExportArgs {
    #[command(flatten)]
    pub game: GameArgs,

    #[command(flatten)]
    pub solver: SolverArgs,

    /// Output file path
    #[arg(long, short = 'o')]
    pub output: PathBuf,

    /// Export format: dot, graphml, json or csv (guessed from the extension when omitted)
    #[arg(long, short = 'f')]
    pub format: Option<ExportFormat>,
}

pub fn execute(args: ExportArgs) -> Result<()> {
    let format = args
        .format
        .or_else(|| ExportFormat::from_path(&args.output))
        .unwrap_or(ExportFormat::Dot);

    let config = args.game.resolve()?;
    let initial = config.initial_state()?;

    let spinner = create_spinner("Building state graph...")?;
    let mut solver = WinProbabilitySolver::new(args.solver.solver_config());
    let graph = StateGraph::build(initial, &mut solver)?;
    spinner.finish_and_clear();

    export_to_file(&graph, format, &args.output)
        .with_context(|| format!("Failed to export graph to {}", args.output.display()))?;

    println!(
        "✓ Exported {} states and {} transitions as {format} to: {}",
        graph.nodes().len(),
        graph.edges().len(),
        args.output.display()
    );
    Ok(())
}
