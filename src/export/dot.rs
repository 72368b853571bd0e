//! Graphviz DOT writer

use std::io::Write;

use super::{NodeNamer, edge_label, node_fill, node_label, traversal_order};
use crate::{Result, game::StateGraph};

fn quote(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Write the graph as a directed DOT graph.
pub fn write_dot<W: Write>(graph: &StateGraph, mut writer: W) -> Result<()> {
    let mut namer = NodeNamer::new("n");

    writeln!(writer, "digraph mafia {{")?;
    writeln!(writer, "  rankdir=TB;")?;
    writeln!(
        writer,
        "  node [shape=box, style=filled, fontcolor=white, fontname=\"Helvetica\"];"
    )?;
    writeln!(writer, "  edge [fontname=\"Helvetica\", fontsize=10];")?;

    let order = traversal_order(graph);
    for &id in &order {
        let node = &graph.nodes()[id];
        writeln!(
            writer,
            "  {} [label={}, fillcolor={}, tooltip={}];",
            namer.name(id),
            quote(&node_label(node)),
            quote(&node_fill(node)),
            quote(&node.state.to_string())
        )?;
    }

    for &id in &order {
        for edge in graph.outgoing(id) {
            let from = namer.name(edge.from);
            let to = namer.name(edge.to);
            writeln!(writer, "  {from} -> {to} [label={}];", quote(&edge_label(edge)))?;
        }
    }

    writeln!(writer, "}}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{game::GameState, solver::WinProbabilitySolver};

    #[test]
    fn quotes_are_escaped() {
        assert_eq!(quote(r#"say "hi""#), r#""say \"hi\"""#);
    }

    #[test]
    fn small_graph_renders_every_node_and_edge() {
        let graph = StateGraph::build(
            GameState::initial(3, 0, 1, 0, false),
            &mut WinProbabilitySolver::default(),
        )
        .unwrap();
        let mut out = Vec::new();
        write_dot(&graph, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("digraph mafia {"));
        assert!(text.trim_end().ends_with('}'));
        assert!(text.contains("n0 [label=\"1/3\""));
        assert_eq!(text.matches(" -> ").count(), graph.edges().len());
        assert!(text.contains("label=\"Vote: town member (2/3)\""));
    }
}
