//! Indexed row tables
//!
//! Rows live in an append-only arena and are addressed by stable handles.
//! Secondary indices map composite keys to handles. After insertion only
//! non-key fields can be changed, so the indices never need rebuilding.

pub mod junction;
pub mod lane_section;

use std::fmt;

pub use junction::{JunctionHandle, JunctionRow, JunctionTable, JunctionType};
pub use lane_section::{
    LaneKey, LaneSectionRow, LaneSectionTable, Link, LinkKind, Pass, RowHandle, Side,
};

/// End of a road a link attaches to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContactPoint {
    #[default]
    Unknown,
    Start,
    End,
}

impl ContactPoint {
    /// Map a `contactPoint` attribute value; anything unrecognised is `Unknown`
    pub fn from_attr(value: &str) -> Self {
        match value {
            "start" => ContactPoint::Start,
            "end" => ContactPoint::End,
            _ => ContactPoint::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContactPoint::Unknown => "unknown",
            ContactPoint::Start => "start",
            ContactPoint::End => "end",
        }
    }
}

impl fmt::Display for ContactPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Both tables produced by extraction
#[derive(Debug, Default)]
pub struct RowTables {
    pub lanes: LaneSectionTable,
    pub junctions: JunctionTable,
}

impl RowTables {
    pub fn clear(&mut self) {
        self.lanes.clear();
        self.junctions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_point_from_attr() {
        assert_eq!(ContactPoint::from_attr("start"), ContactPoint::Start);
        assert_eq!(ContactPoint::from_attr("end"), ContactPoint::End);
        assert_eq!(ContactPoint::from_attr(""), ContactPoint::Unknown);
        assert_eq!(ContactPoint::from_attr("End"), ContactPoint::Unknown);
        assert_eq!(ContactPoint::End.to_string(), "end");
    }
}
