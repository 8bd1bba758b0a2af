//! Lane-segment graph
//!
//! Edges are traversable lane segments, one per accepted lane-section row.
//! Vertices are the joints where segments meet. Both are append-only.

use std::fmt;

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::tables::{LaneKey, LaneSectionRow};

/// Topological joint between lane segments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Joint {
    pub id: usize,
}

/// One lane of one lane section
#[derive(Debug, Clone, PartialEq)]
pub struct LaneSegment {
    pub id: usize,
    pub row_id: i32,
    pub key: LaneKey,
    pub section_count: i32,
    pub length: f64,
    pub lane_type: String,
    pub label: String,
}

impl LaneSegment {
    pub fn from_row(id: usize, row: &LaneSectionRow) -> Self {
        Self {
            id,
            row_id: row.row_id,
            key: row.key,
            section_count: row.section_count,
            length: row.length,
            lane_type: row.lane_type.clone(),
            label: format!(
                "({}, {}, {}, {:.6})",
                row.key.road, row.key.lane, row.key.section, row.length
            ),
        }
    }

    pub fn road(&self) -> i32 {
        self.key.road
    }

    pub fn lane(&self) -> i32 {
        self.key.lane
    }

    pub fn section(&self) -> i32 {
        self.key.section
    }
}

impl fmt::Display for LaneSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

#[derive(Debug, Default, Clone)]
pub struct LaneGraph {
    inner: DiGraph<Joint, LaneSegment>,
}

impl LaneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a joint; its id equals its node index
    pub fn add_joint(&mut self) -> NodeIndex {
        let id = self.inner.node_count();
        self.inner.add_node(Joint { id })
    }

    /// Add the segment for `row`; edge ids start at 1
    pub fn add_segment(
        &mut self,
        tail: NodeIndex,
        head: NodeIndex,
        row: &LaneSectionRow,
    ) -> EdgeIndex {
        let segment = LaneSegment::from_row(self.inner.edge_count() + 1, row);
        self.inner.add_edge(tail, head, segment)
    }

    /// First edge for (road, lane, section); scans every edge
    pub fn find_edge(&self, key: LaneKey) -> Option<EdgeIndex> {
        self.inner
            .edge_references()
            .find(|edge| edge.weight().key == key)
            .map(|edge| edge.id())
    }

    pub fn source(&self, edge: EdgeIndex) -> Option<NodeIndex> {
        self.inner.edge_endpoints(edge).map(|(source, _)| source)
    }

    pub fn target(&self, edge: EdgeIndex) -> Option<NodeIndex> {
        self.inner.edge_endpoints(edge).map(|(_, target)| target)
    }

    pub fn segment(&self, edge: EdgeIndex) -> Option<&LaneSegment> {
        self.inner.edge_weight(edge)
    }

    /// Segment of the edge for `key` together with its endpoints
    pub fn lookup(&self, key: LaneKey) -> Option<(NodeIndex, NodeIndex, &LaneSegment)> {
        let edge = self.find_edge(key)?;
        let (source, target) = self.inner.edge_endpoints(edge)?;
        Some((source, target, self.inner.edge_weight(edge)?))
    }

    pub fn joint_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn segment_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.node_count() == 0
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Underlying petgraph graph
    pub fn inner(&self) -> &DiGraph<Joint, LaneSegment> {
        &self.inner
    }
}
