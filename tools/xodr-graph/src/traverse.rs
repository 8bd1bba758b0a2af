//! Depth-first diagnostic walk over the lane graph
//!
//! Every joint is entered at most once. A path is recorded whenever the walk
//! reaches a joint it cannot leave through an unvisited joint, so the result
//! is the set of root-to-leaf paths of the depth-first tree.

use std::io::{self, Write};

use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::graph::LaneGraph;
use crate::tables::LaneKey;

/// Lane segments from the start joint to one leaf
pub type LanePath = Vec<LaneKey>;

struct Frame {
    pending: Vec<EdgeIndex>,
    has_child: bool,
}

/// Root-to-leaf paths reachable from `start`, in depth-first order
pub fn traverse(graph: &LaneGraph, start: NodeIndex) -> Vec<LanePath> {
    let inner = graph.inner();
    let mut paths = Vec::new();
    if start.index() >= inner.node_count() {
        return paths;
    }

    let outgoing = |node: NodeIndex| -> Vec<EdgeIndex> {
        let mut edges: Vec<EdgeIndex> = inner.edges(node).map(|e| e.id()).collect();
        // lowest edge index is explored first
        edges.sort_unstable_by(|a, b| b.cmp(a));
        edges
    };

    let mut visited = vec![false; inner.node_count()];
    let mut path: Vec<EdgeIndex> = Vec::new();
    let mut stack = vec![Frame {
        pending: outgoing(start),
        has_child: false,
    }];
    visited[start.index()] = true;

    while let Some(frame) = stack.last_mut() {
        if let Some(edge) = frame.pending.pop() {
            let Some((_, next)) = inner.edge_endpoints(edge) else {
                continue;
            };
            if visited[next.index()] {
                continue;
            }
            visited[next.index()] = true;
            frame.has_child = true;
            path.push(edge);
            stack.push(Frame {
                pending: outgoing(next),
                has_child: false,
            });
            continue;
        }

        let leaf = !frame.has_child;
        stack.pop();
        if leaf && !path.is_empty() {
            paths.push(
                path.iter()
                    .filter_map(|e| inner.edge_weight(*e))
                    .map(|segment| segment.key)
                    .collect(),
            );
        }
        path.pop();
    }

    paths
}

/// Print paths the way the diagnostic walk reports them: a separator line,
/// then one `road, lane, section` line per segment
pub fn write_paths<W: Write>(paths: &[LanePath], mut out: W) -> io::Result<()> {
    for path in paths {
        writeln!(out, "++++++++++++++++++++++++++++++++")?;
        for key in path {
            writeln!(out, " {}, {}, {}", key.road, key.lane, key.section)?;
        }
    }
    Ok(())
}
