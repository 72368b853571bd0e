use std::fs;

use anyhow::Result;
use mafia_odds::{
    GameState, StateGraph, WinProbabilitySolver,
    export::{ExportFormat, export_to_file},
};
use tempfile::tempdir;

fn small_graph() -> Result<StateGraph> {
    let initial = GameState::initial(3, 0, 1, 0, false);
    Ok(StateGraph::build(initial, &mut WinProbabilitySolver::default())?)
}

#[test]
fn every_format_writes_a_file() -> Result<()> {
    let graph = small_graph()?;
    let dir = tempdir()?;

    for format in [
        ExportFormat::Dot,
        ExportFormat::Graphml,
        ExportFormat::Json,
        ExportFormat::Csv,
    ] {
        let path = dir.path().join(format!("graph.{}", format.extension()));
        export_to_file(&graph, format, &path)?;
        let contents = fs::read_to_string(&path)?;
        assert!(!contents.is_empty(), "{format} export is empty");
        assert_eq!(ExportFormat::from_path(&path), Some(format));
    }
    Ok(())
}

#[test]
fn dot_export_colors_terminals() -> Result<()> {
    let graph = small_graph()?;
    let dir = tempdir()?;
    let path = dir.path().join("graph.dot");
    export_to_file(&graph, ExportFormat::Dot, &path)?;

    let dot = fs::read_to_string(&path)?;
    assert!(dot.starts_with("digraph"));
    assert!(dot.contains("#ff0000"));
    assert!(dot.contains("#000000"));
    assert_eq!(dot.matches("->").count(), graph.edges().len());
    Ok(())
}

#[test]
fn json_export_round_trips_through_serde() -> Result<()> {
    let graph = small_graph()?;
    let dir = tempdir()?;
    let path = dir.path().join("graph.json");
    export_to_file(&graph, ExportFormat::Json, &path)?;

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
    assert_eq!(value["win_probability"], "1/3");
    assert_eq!(value["nodes"].as_array().map(Vec::len), Some(5));
    assert_eq!(value["edges"].as_array().map(Vec::len), Some(4));
    Ok(())
}

#[test]
fn csv_export_has_a_row_per_state() -> Result<()> {
    let graph = small_graph()?;
    let dir = tempdir()?;
    let path = dir.path().join("graph.csv");
    export_to_file(&graph, ExportFormat::Csv, &path)?;

    let mut reader = csv::Reader::from_path(&path)?;
    let rows = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;
    assert_eq!(rows.len(), graph.nodes().len());
    assert_eq!(&rows[0][0], "0");
    Ok(())
}
