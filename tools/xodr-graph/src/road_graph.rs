//! `RoadGraph`: the extract, reconcile, build pipeline and its exports

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{error, info};
use petgraph::graph::EdgeIndex;
use xodr_common::{Error, Result};

use crate::builder::{self, BuildStats};
use crate::export;
use crate::extract;
use crate::filter::LaneFilter;
use crate::graph::LaneGraph;
use crate::reconcile;
use crate::tables::{LaneKey, RowTables};
use crate::traverse::{self, LanePath};

/// Lane graph of one OpenDRIVE road network
///
/// ```no_run
/// use xodr_graph::{LaneCategory, LaneFilter, RoadGraph};
///
/// let mut net = RoadGraph::new();
/// net.set_lane_filter(LaneFilter::only([LaneCategory::Driving]));
/// net.initialize("town.xodr");
/// net.dump_graphviz("town.dot").unwrap();
/// ```
#[derive(Debug, Default)]
pub struct RoadGraph {
    filter: LaneFilter,
    tables: RowTables,
    graph: LaneGraph,
    stats: BuildStats,
}

impl RoadGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the lane filter; only affects later initialisation
    pub fn set_lane_filter(&mut self, filter: LaneFilter) {
        self.filter = filter;
    }

    /// Build the graph for the document at `path`
    ///
    /// A document that cannot be read or parsed is logged and treated as empty,
    /// so this always returns `true`. Use [`RoadGraph::try_initialize`] to see
    /// the failure instead.
    pub fn initialize(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        if let Err(e) = self.try_initialize(path) {
            error!("{e}; continuing with an empty road network");
            self.rebuild();
        }
        true
    }

    /// Build the graph for the document at `path`, failing on unreadable or
    /// malformed input
    pub fn try_initialize(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        info!("Loading {}", path.display());
        self.clear();
        let xml = extract::read_document(path)?;
        self.load(&xml, &path.display().to_string())
    }

    /// Same as [`RoadGraph::initialize`] for a document held in memory
    pub fn initialize_from_str(&mut self, xml: &str) -> bool {
        self.clear();
        if let Err(e) = self.load(xml, "<memory>") {
            error!("{e}; continuing with an empty road network");
            self.rebuild();
        }
        true
    }

    fn load(&mut self, xml: &str, document: &str) -> Result<()> {
        extract::extract_str(xml, document, &mut self.tables)?;
        self.rebuild();
        Ok(())
    }

    /// Reconcile direct junctions and build the graph from the current tables
    fn rebuild(&mut self) {
        reconcile::reconcile(&mut self.tables);
        let (graph, stats) = builder::build(&mut self.tables.lanes, &self.filter);
        self.graph = graph;
        self.stats = stats;
    }

    fn clear(&mut self) {
        self.tables.clear();
        self.graph.clear();
        self.stats = BuildStats::default();
    }

    pub fn graph(&self) -> &LaneGraph {
        &self.graph
    }

    pub fn tables(&self) -> &RowTables {
        &self.tables
    }

    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    /// Edge of the lane segment (road, lane, section)
    pub fn find_edge(&self, road: i32, lane: i32, section: i32) -> Option<EdgeIndex> {
        self.graph.find_edge(LaneKey::new(road, lane, section))
    }

    /// Row tables as fixed-width text
    pub fn dump_tables<W: Write>(&self, out: W) -> std::io::Result<()> {
        export::write_tables(&self.tables, out)
    }

    pub fn dump_text<W: Write>(&self, out: W) -> std::io::Result<()> {
        export::write_text(&self.graph, out)
    }

    pub fn write_graphviz<W: Write>(&self, out: W) -> std::io::Result<()> {
        export::write_graphviz(&self.graph, out)
    }

    pub fn write_graphml<W: Write>(&self, out: W) -> std::io::Result<()> {
        export::write_graphml(&self.graph, out)
    }

    pub fn dump_graphviz(&self, path: impl AsRef<Path>) -> Result<()> {
        write_file(path.as_ref(), |out| self.write_graphviz(out))
    }

    pub fn dump_graphml(&self, path: impl AsRef<Path>) -> Result<()> {
        write_file(path.as_ref(), |out| self.write_graphml(out))
    }

    /// Depth-first paths starting at the source joint of (road, lane, section),
    /// or at its target joint when `from_source` is false
    pub fn traverse(
        &self,
        road: i32,
        lane: i32,
        section: i32,
        from_source: bool,
    ) -> Result<Vec<LanePath>> {
        let key = LaneKey::new(road, lane, section);
        let start = self
            .graph
            .find_edge(key)
            .and_then(|edge| {
                if from_source {
                    self.graph.source(edge)
                } else {
                    self.graph.target(edge)
                }
            })
            .ok_or_else(|| Error::InvalidInput(format!("no lane segment {key} in the graph")))?;

        Ok(traverse::traverse(&self.graph, start))
    }

    /// Run [`RoadGraph::traverse`] and write its paths to `out`
    pub fn print_traversal<W: Write>(
        &self,
        road: i32,
        lane: i32,
        section: i32,
        from_source: bool,
        out: W,
    ) -> Result<()> {
        let paths = self.traverse(road, lane, section, from_source)?;
        traverse::write_paths(&paths, out).map_err(|e| Error::io("-", e))
    }
}

fn write_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut out = BufWriter::new(file);
    write(&mut out)
        .and_then(|_| out.flush())
        .map_err(|e| Error::io(path, e))?;
    info!("Wrote {}", path.display());
    Ok(())
}
