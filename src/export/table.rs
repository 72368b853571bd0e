//! Tabular and document exports

use std::io::Write;

use serde::Serialize;

use crate::{
    Result,
    game::{GameState, GraphStats, Phase, StateEdge, StateGraph, StateNode, TerminalStatus},
    types::Probability,
};

const DECIMAL_DIGITS: usize = 12;

/// One CSV row per distinct state.
#[derive(Debug, Clone, Serialize)]
pub struct NodeRecord {
    pub id: usize,
    pub unrevealed_town: u32,
    pub revealed_town: u32,
    pub unrevealed_mafia: u32,
    pub revealed_mafia: u32,
    pub has_sheriff: bool,
    pub sheriff_revealed: bool,
    pub phase: Phase,
    pub outcome: String,
    pub win_probability: Probability,
    pub win_decimal: String,
    pub out_degree: usize,
}

impl NodeRecord {
    fn from_node(graph: &StateGraph, node: &StateNode) -> Self {
        let state = node.state;
        let outcome = match node.status.winner() {
            Some(faction) => faction.to_string(),
            None => "ongoing".to_string(),
        };
        Self {
            id: node.id,
            unrevealed_town: state.unrevealed_town,
            revealed_town: state.revealed_town,
            unrevealed_mafia: state.unrevealed_mafia,
            revealed_mafia: state.revealed_mafia,
            has_sheriff: state.has_sheriff,
            sheriff_revealed: state.sheriff_revealed,
            phase: state.phase,
            outcome,
            win_probability: node.win_probability.clone(),
            win_decimal: node.win_probability.to_decimal(DECIMAL_DIGITS),
            out_degree: graph.outgoing(node.id).count(),
        }
    }
}

/// Write one row per node, in node id order.
pub fn write_csv<W: Write>(graph: &StateGraph, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for node in graph.nodes() {
        csv.serialize(NodeRecord::from_node(graph, node))?;
    }
    csv.flush()?;
    Ok(())
}

/// The full graph as a single serializable document.
#[derive(Debug, Serialize)]
pub struct GraphDocument<'a> {
    pub root: GameState,
    pub root_status: TerminalStatus,
    pub win_probability: &'a Probability,
    pub stats: GraphStats,
    pub nodes: &'a [StateNode],
    pub edges: &'a [StateEdge],
}

impl<'a> GraphDocument<'a> {
    pub fn new(graph: &'a StateGraph) -> Self {
        let root = graph.root();
        Self {
            root: root.state,
            root_status: root.status,
            win_probability: &root.win_probability,
            stats: graph.stats(),
            nodes: graph.nodes(),
            edges: graph.edges(),
        }
    }
}

pub fn write_json<W: Write>(graph: &StateGraph, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, &GraphDocument::new(graph))?;
    Ok(())
}
