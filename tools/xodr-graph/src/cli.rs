//! Command-line interface of the `xodr-graph` binary

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::{info, LevelFilter};

use crate::config::Config;
use crate::filter::LaneFilter;
use crate::road_graph::RoadGraph;
use crate::tables::LaneKey;

#[derive(Parser, Debug)]
#[command(name = "xodr-graph")]
#[command(version)]
#[command(about = "Resolve an OpenDRIVE road network into a directed lane-segment graph")]
#[command(long_about = "Reads an OpenDRIVE (.xodr) file and writes its lane graph:
  xodr-graph town.xodr                          # GraphViz file town.dot next to the input
  xodr-graph town.xodr --graphml town.graphml   # GraphML instead
  xodr-graph town.xodr --text --lanes driving   # text dump of the driving lanes only
  xodr-graph town.xodr --traverse 1,-1,0        # depth-first paths from lane segment (1,-1,0)

Lane categories: driving, boundary, public_transport, civilian, prohibited, other")]
pub struct Cli {
    /// OpenDRIVE file to read
    pub input: PathBuf,

    /// Write the graph as GraphViz to this file
    #[arg(long, value_name = "FILE")]
    pub dot: Option<PathBuf>,

    /// Write the graph as GraphML to this file
    #[arg(long, value_name = "FILE")]
    pub graphml: Option<PathBuf>,

    /// Print the graph as text to stdout
    #[arg(long)]
    pub text: bool,

    /// Print the extracted row tables to stdout
    #[arg(long)]
    pub tables: bool,

    /// Comma-separated lane categories to keep (default: all)
    #[arg(long, value_name = "CATEGORIES")]
    pub lanes: Option<String>,

    /// Print depth-first paths starting at this lane segment
    #[arg(long, value_name = "ROAD,LANE,SECTION", value_parser = parse_lane_key)]
    pub traverse: Option<LaneKey>,

    /// Start the traversal at the end of the segment instead of its start
    #[arg(long, requires = "traverse")]
    pub from_target: bool,

    /// TOML configuration file; command-line flags take precedence
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Treat an unreadable or malformed input as an empty road network
    #[arg(long)]
    pub lenient: bool,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Level requested on the command line; `None` leaves `RUST_LOG` in charge
    pub fn log_level(&self) -> Option<LevelFilter> {
        if self.quiet {
            return Some(LevelFilter::Error);
        }
        match self.verbose {
            0 => None,
            1 => Some(LevelFilter::Info),
            2 => Some(LevelFilter::Debug),
            _ => Some(LevelFilter::Trace),
        }
    }
}

fn parse_lane_key(s: &str) -> std::result::Result<LaneKey, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<i32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| format!("'{s}': {e}"))?;
    match parts.as_slice() {
        [road, lane, section] => Ok(LaneKey::new(*road, *lane, *section)),
        _ => Err(format!("'{s}': expected ROAD,LANE,SECTION")),
    }
}

/// What to produce, after merging the config file under the command line
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub filter: LaneFilter,
    pub dot: Option<PathBuf>,
    pub graphml: Option<PathBuf>,
    pub text: bool,
    pub tables: bool,
    pub traverse: Option<(LaneKey, bool)>,
}

impl Settings {
    pub fn resolve(cli: &Cli, config: &Config) -> Result<Self> {
        let filter = match &cli.lanes {
            Some(list) => LaneFilter::parse_list(list)?,
            None => config.lane_filter()?.unwrap_or_default(),
        };

        let mut settings = Self {
            filter,
            dot: cli.dot.clone().or_else(|| config.output.dot.clone()),
            graphml: cli.graphml.clone().or_else(|| config.output.graphml.clone()),
            text: cli.text || config.output.text,
            tables: cli.tables || config.output.tables,
            traverse: cli.traverse.map(|key| (key, !cli.from_target)),
        };

        if !settings.requests_output() {
            settings.dot = Some(default_dot_path(&cli.input));
        }
        Ok(settings)
    }

    fn requests_output(&self) -> bool {
        self.dot.is_some()
            || self.graphml.is_some()
            || self.text
            || self.tables
            || self.traverse.is_some()
    }
}

/// `town.xodr` -> `town.dot`
pub fn default_dot_path(input: &Path) -> PathBuf {
    input.with_extension("dot")
}

/// Run the tool for parsed arguments
pub fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    let settings = Settings::resolve(cli, &config)?;
    info!("Lane filter {}", settings.filter);

    let mut net = RoadGraph::new();
    net.set_lane_filter(settings.filter);
    if cli.lenient {
        net.initialize(&cli.input);
    } else {
        net.try_initialize(&cli.input)
            .with_context(|| format!("Failed to read road network {}", cli.input.display()))?;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if settings.tables {
        net.dump_tables(&mut out).context("Failed to print row tables")?;
        writeln!(out)?;
    }
    if settings.text {
        net.dump_text(&mut out).context("Failed to print graph")?;
    }
    if let Some(path) = &settings.dot {
        net.dump_graphviz(path)?;
    }
    if let Some(path) = &settings.graphml {
        net.dump_graphml(path)?;
    }
    if let Some((key, from_source)) = settings.traverse {
        net.print_traversal(key.road, key.lane, key.section, from_source, &mut out)?;
    }
    out.flush()?;
    Ok(())
}
