//! # xodr-graph
//!
//! Resolves an OpenDRIVE road network into a directed graph whose edges are
//! lane segments (one lane of one lane section) and whose vertices are the
//! joints where segments meet.
//!
//! The pipeline runs strictly in order:
//! [`extract`] fills the row [`tables`], [`reconcile`] folds direct junctions
//! into plain road links, and [`builder`] turns accepted rows into the
//! [`graph`]. [`RoadGraph`] wraps the whole thing.

pub mod builder;
pub mod cli;
pub mod config;
pub mod export;
pub mod extract;
pub mod filter;
pub mod graph;
pub mod reconcile;
pub mod road_graph;
pub mod tables;
pub mod traverse;

pub use filter::{LaneCategory, LaneFilter};
pub use graph::{Joint, LaneGraph, LaneSegment};
pub use road_graph::RoadGraph;
pub use tables::LaneKey;
pub use traverse::LanePath;
pub use xodr_common::{Error, Result};
