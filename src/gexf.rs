//! GEXF 1.2 export for opening the network in Gephi.

use crate::config::DataPaths;
use crate::graph::CoauthorGraph;
use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::info;

const GEXF_NAMESPACE: &str = "http://www.gexf.net/1.2draft";

pub fn write_gexf<W: Write>(graph: &CoauthorGraph, out: W) -> Result<W> {
    let mut writer = Writer::new_with_indent(out, b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("gexf").with_attributes([("xmlns", GEXF_NAMESPACE), ("version", "1.2")]),
    ))?;
    writer.write_event(Event::Start(
        BytesStart::new("graph")
            .with_attributes([("mode", "static"), ("defaultedgetype", "undirected")]),
    ))?;

    writer.write_event(Event::Start(BytesStart::new("nodes")))?;
    for id in graph.nodes() {
        writer.write_event(Event::Empty(
            BytesStart::new("node").with_attributes([("id", id.as_str()), ("label", id.as_str())]),
        ))?;
    }
    writer.write_event(Event::End(BytesEnd::new("nodes")))?;

    writer.write_event(Event::Start(BytesStart::new("edges")))?;
    for (n, (a, b)) in graph.edges().enumerate() {
        let edge_id = n.to_string();
        writer.write_event(Event::Empty(BytesStart::new("edge").with_attributes([
            ("id", edge_id.as_str()),
            ("source", graph.node_id(a)),
            ("target", graph.node_id(b)),
        ])))?;
    }
    writer.write_event(Event::End(BytesEnd::new("edges")))?;

    writer.write_event(Event::End(BytesEnd::new("graph")))?;
    writer.write_event(Event::End(BytesEnd::new("gexf")))?;

    Ok(writer.into_inner())
}

pub fn save_gexf(paths: &DataPaths, graph: &CoauthorGraph) -> Result<()> {
    let path = paths.gexf();
    let file =
        File::create(&path).with_context(|| format!("Failed to create GEXF file: {:?}", path))?;

    let mut out = write_gexf(graph, BufWriter::new(file))
        .with_context(|| format!("Failed to write GEXF file: {:?}", path))?;
    out.flush()?;

    info!(path = ?path, "GEXF export written");
    Ok(())
}
