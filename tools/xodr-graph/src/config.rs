//! Optional TOML configuration for the `xodr-graph` binary
//!
//! ```toml
//! lanes = ["driving", "public_transport"]
//!
//! [output]
//! dot = "net.dot"
//! graphml = "net.graphml"
//! text = false
//! tables = false
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use xodr_common::{Error, Result};

use crate::filter::{LaneCategory, LaneFilter};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Lane categories that become graph edges; all of them when absent
    pub lanes: Option<Vec<String>>,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub dot: Option<PathBuf>,
    pub graphml: Option<PathBuf>,
    pub text: bool,
    pub tables: bool,
}

impl OutputConfig {
    /// Whether any output has been requested
    pub fn any(&self) -> bool {
        self.dot.is_some() || self.graphml.is_some() || self.text || self.tables
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse(&content).map_err(|e| match e {
            Error::Config(message) => Error::Config(format!("{}: {message}", path.display())),
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.message().to_string()))
    }

    /// Lane filter described by `lanes`, if any
    pub fn lane_filter(&self) -> Result<Option<LaneFilter>> {
        let Some(names) = &self.lanes else {
            return Ok(None);
        };
        let categories = names
            .iter()
            .map(|name| name.parse::<LaneCategory>())
            .collect::<Result<Vec<_>>>()?;
        Ok(Some(LaneFilter::only(categories)))
    }
}
