//! Graph export for visualization and further analysis
//!
//! Exporters consume a finished [`StateGraph`] read-only: probabilities come
//! from the solver's memo table and are never recomputed here.

mod dot;
mod graphml;
mod table;

use std::{
    collections::HashMap,
    fmt,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

pub use dot::write_dot;
pub use graphml::write_graphml;
pub use table::{GraphDocument, NodeRecord, write_csv, write_json};

use crate::{
    Error, Result,
    game::{Faction, StateEdge, StateGraph, StateNode, TerminalStatus},
};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Graphviz DOT
    Dot,
    /// GraphML with yEd shape styling
    Graphml,
    /// Nodes, edges and statistics as one JSON document
    Json,
    /// One row per node
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Dot => "dot",
            ExportFormat::Graphml => "graphml",
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dot" | "gv" => Ok(ExportFormat::Dot),
            "graphml" | "yed" => Ok(ExportFormat::Graphml),
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(Error::InvalidConfiguration {
                message: format!("unknown export format '{s}'. Expected one of: dot, graphml, json, csv"),
            }),
        }
    }
}

/// Write `graph` in `format` to any writer.
pub fn export_graph<W: Write>(graph: &StateGraph, format: ExportFormat, writer: W) -> Result<()> {
    match format {
        ExportFormat::Dot => write_dot(graph, writer),
        ExportFormat::Graphml => write_graphml(graph, writer),
        ExportFormat::Json => write_json(graph, writer),
        ExportFormat::Csv => write_csv(graph, writer),
    }
}

/// Write `graph` in `format` to a new file at `path`.
pub fn export_to_file<P: AsRef<Path>>(graph: &StateGraph, format: ExportFormat, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| Error::Io {
        operation: format!("create {}", path.display()),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    export_graph(graph, format, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Assigns sequential names to nodes in the order an export visits them.
///
/// Each export owns its own namer, so names restart at zero per file.
#[derive(Debug)]
pub struct NodeNamer {
    prefix: &'static str,
    next: usize,
    names: HashMap<usize, String>,
}

impl NodeNamer {
    pub fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            next: 0,
            names: HashMap::new(),
        }
    }

    /// Name for node `id`, allocating the next one on first sight.
    pub fn name(&mut self, id: usize) -> String {
        if let Some(name) = self.names.get(&id) {
            return name.clone();
        }
        let name = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        self.names.insert(id, name.clone());
        name
    }

    pub fn len(&self) -> usize {
        self.next
    }

    pub fn is_empty(&self) -> bool {
        self.next == 0
    }
}

/// Depth-first preorder from the root, children in rule order.
pub(crate) fn traversal_order(graph: &StateGraph) -> Vec<usize> {
    let mut order = Vec::with_capacity(graph.nodes().len());
    let mut visited = vec![false; graph.nodes().len()];
    let mut stack = vec![0usize];

    while let Some(id) = stack.pop() {
        if visited[id] {
            continue;
        }
        visited[id] = true;
        order.push(id);
        let children: Vec<usize> = graph.outgoing(id).map(|edge| edge.to).collect();
        stack.extend(children.into_iter().rev());
    }

    order
}

/// Fill colour: red for town wins, black for mafia wins, and a red shade
/// growing with the town's odds for undecided states.
pub fn node_fill(node: &StateNode) -> String {
    match node.status {
        TerminalStatus::Over(Faction::Town) => "#ff0000".to_string(),
        TerminalStatus::Over(Faction::Mafia) => "#000000".to_string(),
        TerminalStatus::Ongoing => {
            let p = node.win_probability.to_f64();
            let sigmoid = 1.0 / (1.0 + (-p).exp());
            let red = (255.0 * 1.5 * sigmoid).min(255.0) as u8;
            format!("#{red:02x}0000")
        }
    }
}

pub fn node_label(node: &StateNode) -> String {
    node.win_probability.to_string()
}

pub fn edge_label(edge: &StateEdge) -> String {
    format!("{} ({})", edge.event, edge.probability)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{game::GameState, solver::WinProbabilitySolver};

    fn graph(root: GameState) -> StateGraph {
        StateGraph::build(root, &mut WinProbabilitySolver::default()).unwrap()
    }

    #[test]
    fn formats_parse_case_insensitively() {
        assert_eq!("DOT".parse::<ExportFormat>().unwrap(), ExportFormat::Dot);
        assert_eq!("yed".parse::<ExportFormat>().unwrap(), ExportFormat::Graphml);
        assert!("png".parse::<ExportFormat>().is_err());
        assert_eq!(
            ExportFormat::from_path(Path::new("out/graph.graphml")),
            Some(ExportFormat::Graphml)
        );
        assert_eq!(ExportFormat::from_path(Path::new("graph")), None);
    }

    #[test]
    fn namer_is_stable_per_node() {
        let mut namer = NodeNamer::new("n");
        assert!(namer.is_empty());
        assert_eq!(namer.name(7), "n0");
        assert_eq!(namer.name(3), "n1");
        assert_eq!(namer.name(7), "n0");
        assert_eq!(namer.len(), 2);
    }

    #[test]
    fn traversal_visits_every_node_once_root_first() {
        let graph = graph(GameState::initial(5, 0, 2, 0, true));
        let order = traversal_order(&graph);
        assert_eq!(order[0], 0);
        assert_eq!(order.len(), graph.nodes().len());
        let unique: std::collections::HashSet<_> = order.iter().collect();
        assert_eq!(unique.len(), order.len());
    }

    #[test]
    fn fills_follow_outcome() {
        let graph = graph(GameState::initial(3, 0, 1, 0, false));
        for node in graph.nodes() {
            let fill = node_fill(node);
            assert_eq!(fill.len(), 7);
            match node.status {
                TerminalStatus::Over(Faction::Town) => assert_eq!(fill, "#ff0000"),
                TerminalStatus::Over(Faction::Mafia) => assert_eq!(fill, "#000000"),
                TerminalStatus::Ongoing => assert!(fill.ends_with("0000")),
            }
        }
    }

    #[test]
    fn edge_labels_carry_event_and_probability() {
        let graph = graph(GameState::initial(3, 0, 1, 0, false));
        let labels: Vec<String> = graph.edges().iter().map(edge_label).collect();
        assert!(labels.contains(&"Check phase skipped (1)".to_string()));
        assert!(labels.contains(&"Vote: mafia (1/3)".to_string()));
    }
}
