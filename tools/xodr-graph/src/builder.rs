//! Graph construction from lane-section rows
//!
//! Every row that passes the lane filter becomes exactly one edge. Its two
//! endpoints are taken from edges already in the graph when the row continues
//! a neighbouring lane section or road; otherwise a fresh joint is allocated.
//!
//! Ordinary roads are processed first so that junction-internal connecting
//! roads can attach to them.

use std::collections::HashSet;

use log::{debug, info, trace, warn};
use petgraph::graph::NodeIndex;
use xodr_common::suggest_correction;

use crate::filter::{LaneCategory, LaneFilter, KNOWN_LANE_TYPES};
use crate::graph::LaneGraph;
use crate::tables::{ContactPoint, LaneKey, LaneSectionRow, LaneSectionTable, Pass, RowHandle};

/// Outcome of a build, for logging and tests
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildStats {
    pub accepted: usize,
    pub rejected: usize,
}

pub struct GraphBuilder<'a> {
    filter: &'a LaneFilter,
    graph: LaneGraph,
    stats: BuildStats,
    reported_types: HashSet<String>,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(filter: &'a LaneFilter) -> Self {
        Self {
            filter,
            graph: LaneGraph::new(),
            stats: BuildStats::default(),
            reported_types: HashSet::new(),
        }
    }

    /// Run both passes over `table`, marking every visited row
    pub fn build(mut self, table: &mut LaneSectionTable) -> (LaneGraph, BuildStats) {
        debug!("Processing ordinary roads");
        let ordinary = table.ordinary_roads();
        self.run_pass(table, ordinary, Pass::OrdinaryRoad);

        debug!("Processing junction roads");
        let connecting = table.junction_roads();
        self.run_pass(table, connecting, Pass::JunctionRoad);

        info!(
            "Built lane graph: {} joints, {} segments ({} rows filtered out)",
            self.graph.joint_count(),
            self.graph.segment_count(),
            self.stats.rejected
        );
        (self.graph, self.stats)
    }

    fn run_pass(&mut self, table: &mut LaneSectionTable, handles: Vec<RowHandle>, pass: Pass) {
        for handle in handles {
            if let Some(row) = table.get(handle) {
                if self.filter.enabled(&row.lane_type) {
                    self.add_segment(row);
                    self.stats.accepted += 1;
                } else {
                    self.reject(row);
                    self.stats.rejected += 1;
                }
            }
            table.mark_processed(handle, pass);
        }
    }

    fn reject(&mut self, row: &LaneSectionRow) {
        if LaneCategory::of_lane_type(&row.lane_type).is_some() {
            trace!("Row {} ({}) filtered out", row.key, row.lane_type);
            return;
        }
        if !self.reported_types.insert(row.lane_type.clone()) {
            return;
        }
        match suggest_correction(&row.lane_type, KNOWN_LANE_TYPES) {
            Some(suggestion) => warn!(
                "Unknown lane type '{}' on road {}, did you mean '{suggestion}'? Skipping",
                row.lane_type, row.key.road
            ),
            None => warn!(
                "Unknown lane type '{}' on road {}, skipping",
                row.lane_type, row.key.road
            ),
        }
    }

    fn add_segment(&mut self, row: &LaneSectionRow) {
        let (tail, head) = self.resolve(row);
        let tail = tail.unwrap_or_else(|| self.graph.add_joint());
        let head = head.unwrap_or_else(|| self.graph.add_joint());
        debug!(
            "Row #{} {} -> {} -> {}",
            row.row_id,
            row.key,
            tail.index(),
            head.index()
        );
        self.graph.add_segment(tail, head, row);
    }

    /// Endpoints shared with existing edges, if any
    fn resolve(&self, row: &LaneSectionRow) -> (Option<NodeIndex>, Option<NodeIndex>) {
        let key = row.key;
        let mut tail = None;
        let mut head = None;

        // Continuation within the road. Lane ids are stable across the sections
        // of one road, so both neighbours are looked up by the predecessor lane.
        let section_lane = row.predecessor.lane.unwrap_or(0);
        if row.has_pred_section() {
            tail = self
                .graph
                .lookup(LaneKey::new(key.road, section_lane, key.section - 1))
                .map(|(_, target, _)| target);
        }
        if row.has_succ_section() {
            head = self
                .graph
                .lookup(LaneKey::new(key.road, section_lane, key.section + 1))
                .map(|(source, _, _)| source);
        }

        if row.has_pred_road() {
            let pred_lane = row.predecessor.lane.unwrap_or(0);
            tail = self
                .road_boundary(row.predecessor.target, pred_lane)
                .map(|(source, target)| attach(row.predecessor.contact, source, target));
        }
        if row.has_succ_road() {
            let succ_lane = row.successor.lane.unwrap_or(0);
            head = self
                .graph
                .lookup(LaneKey::new(row.successor.target, succ_lane, 0))
                .map(|(source, target, _)| attach(row.successor.contact, source, target));
        }

        trace!("Row {key}: tail {tail:?}, head {head:?}");
        (tail, head)
    }

    /// Endpoints of the predecessor road's edge for `lane`: its only section,
    /// or its last one when the road has several
    fn road_boundary(&self, road: i32, lane: i32) -> Option<(NodeIndex, NodeIndex)> {
        let (source, target, first) = self.graph.lookup(LaneKey::new(road, lane, 0))?;
        if first.section_count <= 1 {
            return Some((source, target));
        }
        self.graph
            .lookup(LaneKey::new(road, lane, first.section_count - 1))
            .map(|(source, target, _)| (source, target))
    }
}

/// Joint of a neighbouring edge that a link with this contact point meets
fn attach(contact: ContactPoint, source: NodeIndex, target: NodeIndex) -> NodeIndex {
    match contact {
        ContactPoint::Start => source,
        ContactPoint::End | ContactPoint::Unknown => target,
    }
}

/// Build the lane graph for `table` under `filter`
pub fn build(table: &mut LaneSectionTable, filter: &LaneFilter) -> (LaneGraph, BuildStats) {
    GraphBuilder::new(filter).build(table)
}
