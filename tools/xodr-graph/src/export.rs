//! Writers for the lane graph and the row tables
//!
//! All writers are read-only views; they emit joints and segments in
//! allocation order.

use std::io::{self, Write};

use petgraph::visit::EdgeRef;

use crate::graph::LaneGraph;
use crate::tables::{JunctionRow, LaneSectionRow, RowTables};

/// GraphViz color of a lane type; unmapped types are drawn black
pub fn lane_type_color(lane_type: &str) -> &'static str {
    match lane_type {
        "biking" => "gold",
        "border" | "curb" => "darkgreen",
        "bus" | "rail" | "tram" => "peru",
        "connectingRamp" => "",
        "driving" | "entry" | "exit" | "median" | "mwyEntry" | "mwyExit" | "offRamp"
        | "onRamp" | "shared" => "indigo",
        "parking" => "dodgerblue",
        "restricted" => "orangered",
        "roadWorks" | "slipLane" | "special1" | "special2" | "special3" | "stop" | "taxi" => {
            "yellow"
        }
        "shoulder" | "sidewalk" => "green",
        "walking" => "lightseagreen",
        _ => "black",
    }
}

/// Plain-text dump: a `v` block of joints, then an `e` block of segments
pub fn write_text<W: Write>(graph: &LaneGraph, mut out: W) -> io::Result<()> {
    let inner = graph.inner();

    writeln!(out, "v")?;
    for joint in inner.node_weights() {
        writeln!(out, "(no) := ({})", joint.id)?;
    }

    writeln!(out, "e")?;
    for edge in inner.edge_references() {
        let segment = edge.weight();
        writeln!(
            out,
            "{} {}  (road, lane, sct) := ({}, {}, {})  {:<5} {:<5} {:<4} {:<12.6} {}",
            edge.source().index(),
            edge.target().index(),
            segment.road(),
            segment.lane(),
            segment.section(),
            format!("#{}", segment.id),
            format!("r{}", segment.row_id),
            segment.section_count,
            segment.length,
            segment.lane_type,
        )?;
    }
    Ok(())
}

/// GraphViz `digraph` with one colored, labelled arrow per segment
pub fn write_graphviz<W: Write>(graph: &LaneGraph, mut out: W) -> io::Result<()> {
    let inner = graph.inner();

    writeln!(out, "digraph G {{")?;
    for joint in inner.node_weights() {
        writeln!(out, "{0}[label={0}];", joint.id)?;
    }
    for edge in inner.edge_references() {
        let segment = edge.weight();
        writeln!(
            out,
            "{}->{}[label=\"({},{},{})\\n{:.6}\",color=\"{}\"];",
            edge.source().index(),
            edge.target().index(),
            segment.road(),
            segment.lane(),
            segment.section(),
            segment.length,
            lane_type_color(&segment.lane_type),
        )?;
    }
    writeln!(out, "}}")?;
    Ok(())
}

/// GraphML document carrying `weight` (section length) and `Text` (label) per edge
pub fn write_graphml<W: Write>(graph: &LaneGraph, mut out: W) -> io::Result<()> {
    let inner = graph.inner();

    writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        out,
        r#"<graphml xmlns="http://graphml.graphdrawing.org/xmlns" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://graphml.graphdrawing.org/xmlns http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd">"#
    )?;
    writeln!(
        out,
        r#"  <key id="key0" for="edge" attr.name="Text" attr.type="string" />"#
    )?;
    writeln!(
        out,
        r#"  <key id="key1" for="edge" attr.name="weight" attr.type="double" />"#
    )?;
    writeln!(
        out,
        r#"  <graph id="G" edgedefault="directed" parse.nodeids="canonical" parse.edgeids="canonical" parse.order="nodesfirst">"#
    )?;
    for node in inner.node_indices() {
        writeln!(out, r#"    <node id="n{}">"#, node.index())?;
        writeln!(out, "    </node>")?;
    }
    for (index, edge) in inner.edge_references().enumerate() {
        let segment = edge.weight();
        writeln!(
            out,
            r#"    <edge id="e{}" source="n{}" target="n{}">"#,
            index,
            edge.source().index(),
            edge.target().index()
        )?;
        writeln!(
            out,
            r#"      <data key="key0">{}</data>"#,
            escape_xml(&segment.label)
        )?;
        writeln!(out, r#"      <data key="key1">{}</data>"#, segment.length)?;
        writeln!(out, "    </edge>")?;
    }
    writeln!(out, "  </graph>")?;
    writeln!(out, "</graphml>")?;
    Ok(())
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Fixed-width listing of both row tables
pub fn write_tables<W: Write>(tables: &RowTables, mut out: W) -> io::Result<()> {
    writeln!(
        out,
        "{:<2}{:<4}{:<5}{:<5}{:<5}{:<9}{:<11}{:<7}{:<14}{:<13}{:<7}{:<14}{:<13}{:<14}{:<9}{:<14}{:<9}{:<16}{:<10}",
        "? ",
        "#",
        "Road",
        "Lane",
        "Sct",
        "Junction",
        "Length",
        "SuccId",
        "SuccContactPt",
        "SuccLinkType",
        "PredId",
        "PredContactPt",
        "PredLinkType",
        "PredLaneValid",
        "PredLane",
        "SuccLaneValid",
        "SuccLane",
        "LaneType",
        "NoLaneSec"
    )?;
    for row in tables.lanes.iter() {
        write_lane_row(row, &mut out)?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "{:<11}{:<13}{:<17}{:<15}{:<15}{:<11}{:<9}{:<13}{}",
        "JunctionId",
        "ConnectionId",
        "ConnectingRoadId",
        "IncomingRoadId",
        "LinkedRoadId",
        "FromLaneId",
        "ToLaneId",
        "ContactPoint",
        "Type"
    )?;
    for row in tables.junctions.iter() {
        write_junction_row(row, &mut out)?;
    }
    Ok(())
}

fn write_lane_row<W: Write>(row: &LaneSectionRow, out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "{:<2}{:<4}{:<5}{:<5}{:<5}{:<9}{:<11.3}{:<7}{:<14}{:<13}{:<7}{:<14}{:<13}{:<14}{:<9}{:<14}{:<9}{:<16}{:<10}",
        row.processed.marker(),
        row.row_id,
        row.key.road,
        row.key.lane,
        row.key.section,
        row.junction,
        row.length,
        row.successor.target,
        row.successor.contact.as_str(),
        row.successor.kind.as_str(),
        row.predecessor.target,
        row.predecessor.contact.as_str(),
        row.predecessor.kind.as_str(),
        row.predecessor.lane.is_some(),
        row.predecessor.lane.unwrap_or(0),
        row.successor.lane.is_some(),
        row.successor.lane.unwrap_or(0),
        row.lane_type,
        row.section_count
    )
}

fn write_junction_row<W: Write>(row: &JunctionRow, out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "{:<11}{:<13}{:<17}{:<15}{:<15}{:<11}{:<9}{:<13}{}",
        row.junction,
        row.connection,
        row.connecting_road,
        row.incoming_road,
        row.linked_road,
        row.from_lane,
        row.to_lane,
        row.contact.as_str(),
        row.junction_type
    )
}
