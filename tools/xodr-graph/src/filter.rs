//! Lane type filter
//!
//! Every OpenDRIVE lane type maps to one coarse category. The filter is an
//! 8-bit mask over those categories; a lane type that is not in the dictionary
//! never passes, whatever the mask.

use std::fmt;
use std::str::FromStr;

use xodr_common::{suggest_correction, Error, Result};

/// Lane types the dictionary knows about
pub const KNOWN_LANE_TYPES: &[&str] = &[
    "driving",
    "entry",
    "exit",
    "onRamp",
    "offRamp",
    "connectingRamp",
    "mwyEntry",
    "mwyExit",
    "sidewalk",
    "walking",
    "biking",
    "bus",
    "rail",
    "tram",
    "taxi",
    "border",
    "curb",
    "shoulder",
    "median",
    "restricted",
    "roadWorks",
    "none",
    "parking",
    "shared",
    "slipLane",
    "stop",
    "HOV",
    "bidirectional",
    "special1",
    "special2",
    "special3",
];

/// Coarse lane category; the discriminant is the bit position in the filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LaneCategory {
    Driving = 0,
    Boundary = 1,
    PublicTransport = 2,
    Civilian = 3,
    Prohibited = 5,
    Other = 6,
}

impl LaneCategory {
    pub const ALL: [LaneCategory; 6] = [
        LaneCategory::Driving,
        LaneCategory::Boundary,
        LaneCategory::PublicTransport,
        LaneCategory::Civilian,
        LaneCategory::Prohibited,
        LaneCategory::Other,
    ];

    pub const NAMES: [&'static str; 6] = [
        "driving",
        "boundary",
        "public_transport",
        "civilian",
        "prohibited",
        "other",
    ];

    /// Filter bit of this category
    pub fn bit(self) -> u8 {
        1 << (self as u8)
    }

    pub fn name(self) -> &'static str {
        match self {
            LaneCategory::Driving => "driving",
            LaneCategory::Boundary => "boundary",
            LaneCategory::PublicTransport => "public_transport",
            LaneCategory::Civilian => "civilian",
            LaneCategory::Prohibited => "prohibited",
            LaneCategory::Other => "other",
        }
    }

    /// Category of an OpenDRIVE lane type, `None` if the type is unknown
    pub fn of_lane_type(lane_type: &str) -> Option<Self> {
        let category = match lane_type {
            "driving" | "entry" | "exit" | "onRamp" | "offRamp" | "connectingRamp" | "mwyEntry"
            | "mwyExit" => LaneCategory::Driving,
            "sidewalk" | "walking" | "biking" => LaneCategory::Civilian,
            "bus" | "rail" | "tram" | "taxi" => LaneCategory::PublicTransport,
            "border" | "curb" | "shoulder" => LaneCategory::Boundary,
            "median" | "restricted" | "roadWorks" => LaneCategory::Prohibited,
            "none" | "parking" | "shared" | "slipLane" | "stop" | "HOV" | "bidirectional"
            | "special1" | "special2" | "special3" => LaneCategory::Other,
            _ => return None,
        };
        Some(category)
    }
}

impl fmt::Display for LaneCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LaneCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        if let Some(category) = LaneCategory::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
        {
            return Ok(category);
        }

        let mut msg = format!("unknown lane category '{name}'");
        if let Some(suggestion) = suggest_correction(name, &LaneCategory::NAMES) {
            msg.push_str(&format!(", did you mean '{suggestion}'?"));
        }
        Err(Error::InvalidInput(msg))
    }
}

/// Bit-vector over [`LaneCategory`]; every category is enabled by default
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneFilter {
    flags: u8,
}

impl Default for LaneFilter {
    fn default() -> Self {
        Self { flags: u8::MAX }
    }
}

impl LaneFilter {
    /// Filter that lets only the given categories through
    pub fn only<I>(categories: I) -> Self
    where
        I: IntoIterator<Item = LaneCategory>,
    {
        let mut filter = Self::default();
        filter.clear();
        for category in categories {
            filter.set(category);
        }
        filter
    }

    /// Parse a comma-separated category list, e.g. `driving,public_transport`
    pub fn parse_list(list: &str) -> Result<Self> {
        let categories = list
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<LaneCategory>>>()?;
        Ok(Self::only(categories))
    }

    pub fn set(&mut self, category: LaneCategory) -> &mut Self {
        self.flags |= category.bit();
        self
    }

    pub fn unset(&mut self, category: LaneCategory) -> &mut Self {
        self.flags &= !category.bit();
        self
    }

    pub fn clear(&mut self) -> &mut Self {
        self.flags = 0;
        self
    }

    pub fn test(&self, category: LaneCategory) -> bool {
        self.flags & category.bit() != 0
    }

    /// Whether a lane of this type becomes a graph edge
    pub fn enabled(&self, lane_type: &str) -> bool {
        LaneCategory::of_lane_type(lane_type).is_some_and(|c| self.test(c))
    }
}

impl fmt::Display for LaneFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08b}", self.flags)
    }
}
