//! Junction-connection rows: one per (connection, laneLink) pair

use std::collections::BTreeMap;
use std::fmt;

use super::ContactPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum JunctionType {
    #[default]
    Normal,
    Direct,
    Virtual,
    Crossing,
}

impl JunctionType {
    /// Map a junction `type` attribute; absent or unrecognised means `Normal`
    pub fn from_attr(value: &str) -> Self {
        match value {
            "direct" => JunctionType::Direct,
            "virtual" => JunctionType::Virtual,
            "crossing" => JunctionType::Crossing,
            _ => JunctionType::Normal,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JunctionType::Normal => "default",
            JunctionType::Direct => "direct",
            JunctionType::Virtual => "virtual",
            JunctionType::Crossing => "crossing",
        }
    }
}

impl fmt::Display for JunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JunctionRow {
    pub row_id: i32,
    pub junction: i32,
    pub junction_type: JunctionType,
    pub connection: i32,
    /// -1 for direct junctions, which have no connecting road
    pub connecting_road: i32,
    pub incoming_road: i32,
    /// -1 before OpenDRIVE 1.7
    pub linked_road: i32,
    pub from_lane: i32,
    pub to_lane: i32,
    pub contact: ContactPoint,
}

impl Default for JunctionRow {
    fn default() -> Self {
        Self {
            row_id: -1,
            junction: -1,
            junction_type: JunctionType::Normal,
            connection: -1,
            connecting_road: -1,
            incoming_road: -1,
            linked_road: -1,
            from_lane: 0,
            to_lane: 0,
            contact: ContactPoint::Unknown,
        }
    }
}

/// Stable handle into a [`JunctionTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JunctionHandle(usize);

/// Connection rows indexed by junction type and by (connecting road, from lane)
#[derive(Debug)]
pub struct JunctionTable {
    rows: Vec<JunctionRow>,
    by_type: BTreeMap<JunctionType, Vec<JunctionHandle>>,
    by_connection: BTreeMap<(i32, i32), JunctionHandle>,
    next_id: i32,
}

impl Default for JunctionTable {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            by_type: BTreeMap::new(),
            by_connection: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl JunctionTable {
    /// Insert a connection row, assigning its row id
    ///
    /// Rows with a connecting road are unique on (connecting road, from lane);
    /// a duplicate is discarded and `None` returned. Direct-junction rows have
    /// no connecting road and are only indexed by type.
    pub fn insert(&mut self, mut row: JunctionRow) -> Option<JunctionHandle> {
        let connection_key = (row.connecting_road, row.from_lane);
        let keyed = row.connecting_road >= 0;
        if keyed && self.by_connection.contains_key(&connection_key) {
            return None;
        }

        let handle = JunctionHandle(self.rows.len());
        row.row_id = self.next_id;
        self.next_id += 1;

        if keyed {
            self.by_connection.insert(connection_key, handle);
        }
        self.by_type.entry(row.junction_type).or_default().push(handle);
        self.rows.push(row);
        Some(handle)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn get(&self, handle: JunctionHandle) -> Option<&JunctionRow> {
        self.rows.get(handle.0)
    }

    /// Rows of one junction type in insertion order
    pub fn of_type(&self, junction_type: JunctionType) -> impl Iterator<Item = &JunctionRow> {
        self.by_type
            .get(&junction_type)
            .into_iter()
            .flatten()
            .filter_map(|handle| self.get(*handle))
    }

    pub fn find_connection(&self, connecting_road: i32, from_lane: i32) -> Option<&JunctionRow> {
        self.by_connection
            .get(&(connecting_road, from_lane))
            .and_then(|handle| self.get(*handle))
    }

    /// All rows in row-id order
    pub fn iter(&self) -> impl Iterator<Item = &JunctionRow> {
        self.rows.iter()
    }
}
