//! GraphML writer with yEd node and edge graphics

use std::io::Write;

use super::{NodeNamer, edge_label, node_fill, node_label, traversal_order};
use crate::{Result, game::StateGraph};

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Write the graph as GraphML that yEd renders with fills and edge labels.
pub fn write_graphml<W: Write>(graph: &StateGraph, mut writer: W) -> Result<()> {
    let mut nodes = NodeNamer::new("n");
    let mut edge_count = 0usize;

    writeln!(writer, r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#)?;
    writeln!(
        writer,
        r#"<graphml xmlns="http://graphml.graphdrawing.org/xmlns" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:y="http://www.yworks.com/xml/graphml" xsi:schemaLocation="http://graphml.graphdrawing.org/xmlns http://www.yworks.com/xml/schema/graphml/1.1/ygraphml.xsd">"#
    )?;
    writeln!(writer, r#"  <key for="node" id="d0" yfiles.type="nodegraphics"/>"#)?;
    writeln!(writer, r#"  <key for="edge" id="d1" yfiles.type="edgegraphics"/>"#)?;
    writeln!(
        writer,
        r#"  <key attr.name="description" attr.type="string" for="node" id="d2"/>"#
    )?;
    writeln!(writer, r#"  <graph edgedefault="directed" id="G">"#)?;

    let order = traversal_order(graph);
    for &id in &order {
        let node = &graph.nodes()[id];
        writeln!(writer, r#"    <node id="{}">"#, nodes.name(id))?;
        writeln!(
            writer,
            r#"      <data key="d2">{}</data>"#,
            escape(&node.state.to_string())
        )?;
        writeln!(writer, r#"      <data key="d0">"#)?;
        writeln!(writer, r#"        <y:ShapeNode>"#)?;
        writeln!(
            writer,
            r##"          <y:Fill color="{}" transparent="false"/>"##,
            node_fill(node)
        )?;
        writeln!(
            writer,
            r##"          <y:NodeLabel textColor="#ffffff">{}</y:NodeLabel>"##,
            escape(&node_label(node))
        )?;
        writeln!(writer, r#"          <y:Shape type="rectangle"/>"#)?;
        writeln!(writer, r#"        </y:ShapeNode>"#)?;
        writeln!(writer, r#"      </data>"#)?;
        writeln!(writer, r#"    </node>"#)?;
    }

    for &id in &order {
        for edge in graph.outgoing(id) {
            let edge_id = format!("e{edge_count}");
            edge_count += 1;
            writeln!(
                writer,
                r#"    <edge id="{edge_id}" source="{}" target="{}">"#,
                nodes.name(edge.from),
                nodes.name(edge.to)
            )?;
            writeln!(writer, r#"      <data key="d1">"#)?;
            writeln!(writer, r#"        <y:PolyLineEdge>"#)?;
            writeln!(writer, r#"          <y:Arrows source="none" target="standard"/>"#)?;
            writeln!(
                writer,
                r#"          <y:EdgeLabel>{}</y:EdgeLabel>"#,
                escape(&edge_label(edge))
            )?;
            writeln!(writer, r#"        </y:PolyLineEdge>"#)?;
            writeln!(writer, r#"      </data>"#)?;
            writeln!(writer, r#"    </edge>"#)?;
        }
    }

    writeln!(writer, "  </graph>")?;
    writeln!(writer, "</graphml>")?;
    Ok(())
}
