//! Row extraction from an OpenDRIVE document
//!
//! Walks the element tree once and fills the lane-section and junction tables.
//! Every attribute is optional: missing or malformed values fall back to a
//! default and never abort the walk.

use std::path::Path;
use std::str::FromStr;

use log::{debug, info, trace};
use roxmltree::{Document, Node};
use xodr_common::{Error, Result};

use crate::tables::{
    ContactPoint, JunctionRow, JunctionType, LaneKey, LaneSectionRow, Link, LinkKind, RowTables,
    Side,
};

/// Read an `.xodr` file into memory
pub fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Parse `xml` and append its rows to `tables`
///
/// `document` names the source in error messages.
pub fn extract_str(xml: &str, document: &str, tables: &mut RowTables) -> Result<()> {
    let doc = Document::parse(xml).map_err(|e| Error::Parse {
        document: document.to_string(),
        message: e.to_string(),
    })?;
    extract(&doc, tables);
    Ok(())
}

/// Append the rows of an already parsed document to `tables`
pub fn extract(doc: &Document, tables: &mut RowTables) {
    let root = doc.root_element();

    for junction in children(root, "junction") {
        extract_junction(junction, tables);
    }
    for road in children(root, "road") {
        extract_road(road, tables);
    }

    info!(
        "Extracted {} lane-section rows and {} junction rows",
        tables.lanes.len(),
        tables.junctions.len()
    );
}

fn extract_junction(junction: Node, tables: &mut RowTables) {
    let id = attr(junction, "id", -1);
    let junction_type = junction
        .attribute("type")
        .map(JunctionType::from_attr)
        .unwrap_or_default();

    for connection in children(junction, "connection") {
        let template = JunctionRow {
            junction: id,
            junction_type,
            connection: attr(connection, "id", -1),
            connecting_road: attr(connection, "connectingRoad", -1),
            incoming_road: attr(connection, "incomingRoad", -1),
            linked_road: attr(connection, "linkedRoad", -1),
            contact: connection
                .attribute("contactPoint")
                .map(ContactPoint::from_attr)
                .unwrap_or_default(),
            ..JunctionRow::default()
        };

        for lane_link in children(connection, "laneLink") {
            let from_lane = attr(lane_link, "from", 0);
            let row = JunctionRow {
                from_lane,
                to_lane: attr(lane_link, "to", 0),
                ..template.clone()
            };
            if tables.junctions.insert(row).is_none() {
                debug!(
                    "Duplicate connection {} lane {from_lane} in junction {id}, keeping the first",
                    template.connecting_road
                );
            }
        }
    }
}

fn extract_road(road: Node, tables: &mut RowTables) {
    let id = attr(road, "id", -1);
    let junction = attr(road, "junction", -1);
    let length: f64 = attr(road, "length", 0.0);

    let link = child(road, "link");
    let predecessor = link.and_then(|l| child(l, "predecessor")).map(road_link);
    let successor = link.and_then(|l| child(l, "successor")).map(road_link);

    let sections: Vec<Node> = child(road, "lanes")
        .map(|lanes| children(lanes, "laneSection").collect())
        .unwrap_or_default();

    // Every section ends where the next begins; the last one at the road length
    let mut boundaries: Vec<f64> = sections.iter().map(|s| attr(*s, "s", 0.0)).collect();
    boundaries.push(length);

    let section_count = sections.len() as i32;
    for (index, section) in sections.iter().enumerate() {
        let section_index = index as i32;
        let section_length = boundaries[index + 1] - boundaries[index];

        for side in Side::BOTH {
            let Some(side_node) = child(*section, side.as_str()) else {
                continue;
            };

            for lane in children(side_node, "lane") {
                let mut row =
                    LaneSectionRow::new(LaneKey::new(id, attr(lane, "id", 0), section_index), side);
                row.junction = junction;
                row.section_count = section_count;
                row.length = section_length;
                row.lane_type = lane.attribute("type").unwrap_or_default().to_string();

                if section_index == 0 {
                    if let Some(link) = predecessor {
                        row.predecessor = link;
                    }
                }
                if section_index == section_count - 1 {
                    if let Some(link) = successor {
                        row.successor = link;
                    }
                }

                if let Some(lane_link) = child(lane, "link") {
                    row.predecessor.lane =
                        child(lane_link, "predecessor").map(|n| attr(n, "id", 0));
                    row.successor.lane = child(lane_link, "successor").map(|n| attr(n, "id", 0));
                }

                let key = row.key;
                if tables.lanes.insert(row).is_none() {
                    debug!("Duplicate lane section row {key}, keeping the first");
                } else {
                    trace!("Row {key} in junction {junction}");
                }
            }
        }
    }
}

/// Road-level `<predecessor>`/`<successor>`; the lane target is filled in per lane
fn road_link(node: Node) -> Link {
    Link {
        kind: node
            .attribute("elementType")
            .map(LinkKind::from_attr)
            .unwrap_or_default(),
        contact: node
            .attribute("contactPoint")
            .map(ContactPoint::from_attr)
            .unwrap_or_default(),
        target: attr(node, "elementId", -1),
        lane: None,
    }
}

fn attr<T: FromStr>(node: Node, name: &str, default: T) -> T {
    node.attribute(name)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.tag_name().name() == tag)
}

fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |n| n.tag_name().name() == tag)
}
