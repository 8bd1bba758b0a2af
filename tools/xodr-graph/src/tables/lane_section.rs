//! Lane-section rows: one per (road, lane, lane section)

use std::collections::BTreeMap;
use std::fmt;

use super::ContactPoint;

/// Row id, assigned on first successful insertion (starting at 1)
pub type RowId = i32;

/// Composite key of a lane-section row; ordered road, lane, section
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LaneKey {
    pub road: i32,
    pub lane: i32,
    pub section: i32,
}

impl LaneKey {
    pub fn new(road: i32, lane: i32, section: i32) -> Self {
        Self {
            road,
            lane,
            section,
        }
    }
}

impl fmt::Display for LaneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.road, self.lane, self.section)
    }
}

/// What a road-level link points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LinkKind {
    #[default]
    Unknown,
    Road,
    Junction,
}

impl LinkKind {
    /// Map an `elementType` attribute value
    pub fn from_attr(value: &str) -> Self {
        match value {
            "road" => LinkKind::Road,
            "junction" => LinkKind::Junction,
            _ => LinkKind::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LinkKind::Unknown => "unknown",
            LinkKind::Road => "road",
            LinkKind::Junction => "junction",
        }
    }
}

/// Which side of the reference line a lane lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// Element name of this side inside `<laneSection>`
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// Builder pass that visited a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pass {
    #[default]
    Pending,
    OrdinaryRoad,
    JunctionRoad,
}

impl Pass {
    pub fn marker(self) -> u8 {
        match self {
            Pass::Pending => 0,
            Pass::OrdinaryRoad => 1,
            Pass::JunctionRoad => 2,
        }
    }
}

/// One end of a row's topology
///
/// `kind`, `contact` and `target` come from the road-level `<link>`; `lane`
/// from the lane-level `<link>` and is `None` when that element is absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub kind: LinkKind,
    pub contact: ContactPoint,
    pub target: i32,
    pub lane: Option<i32>,
}

impl Default for Link {
    fn default() -> Self {
        Self {
            kind: LinkKind::Unknown,
            contact: ContactPoint::Unknown,
            target: -1,
            lane: None,
        }
    }
}

impl Link {
    /// Point this link straight at a lane of another road
    pub fn retarget(&mut self, road: i32, contact: ContactPoint, lane: i32) {
        self.point_at(road, contact);
        self.lane = Some(lane);
    }

    /// Point this link at another road, leaving the lane link untouched
    pub fn point_at(&mut self, road: i32, contact: ContactPoint) {
        self.kind = LinkKind::Road;
        self.target = road;
        self.contact = contact;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaneSectionRow {
    pub row_id: RowId,
    pub key: LaneKey,
    /// Junction this road belongs to, -1 for ordinary roads
    pub junction: i32,
    pub section_count: i32,
    pub length: f64,
    pub predecessor: Link,
    pub successor: Link,
    pub lane_type: String,
    pub side: Side,
    pub processed: Pass,
}

impl LaneSectionRow {
    pub fn new(key: LaneKey, side: Side) -> Self {
        Self {
            row_id: -1,
            key,
            junction: -1,
            section_count: 1,
            length: 0.0,
            predecessor: Link::default(),
            successor: Link::default(),
            lane_type: String::new(),
            side,
            processed: Pass::Pending,
        }
    }

    pub fn is_first_section(&self) -> bool {
        self.key.section == 0
    }

    pub fn is_last_section(&self) -> bool {
        self.key.section == self.section_count - 1
    }

    pub fn in_junction(&self) -> bool {
        self.junction >= 0
    }

    /// Continues an earlier lane section of the same road
    pub fn has_pred_section(&self) -> bool {
        self.key.section > 0 && self.predecessor.lane.is_some()
    }

    /// Continues into a later lane section of the same road
    pub fn has_succ_section(&self) -> bool {
        self.key.section < self.section_count - 1 && self.successor.lane.is_some()
    }

    pub fn has_pred_road(&self) -> bool {
        self.predecessor.kind == LinkKind::Road && self.is_first_section()
    }

    pub fn has_succ_road(&self) -> bool {
        self.successor.kind == LinkKind::Road && self.is_last_section()
    }

    pub fn has_pred_junction(&self) -> bool {
        self.predecessor.kind == LinkKind::Junction && self.is_first_section()
    }

    pub fn has_succ_junction(&self) -> bool {
        self.successor.kind == LinkKind::Junction && self.is_last_section()
    }
}

/// Stable handle into a [`LaneSectionTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowHandle(usize);

/// Lane-section rows indexed by (road, lane, section) and by junction
#[derive(Debug)]
pub struct LaneSectionTable {
    rows: Vec<LaneSectionRow>,
    by_key: BTreeMap<LaneKey, RowHandle>,
    /// Junction id, then row id: rows of one junction stay in insertion order
    by_junction: BTreeMap<(i32, RowId), RowHandle>,
    next_id: RowId,
}

impl Default for LaneSectionTable {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            by_key: BTreeMap::new(),
            by_junction: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl LaneSectionTable {
    /// Insert a row, assigning its row id
    ///
    /// Returns `None` and leaves the table untouched when a row with the same
    /// key already exists (first occurrence wins).
    pub fn insert(&mut self, mut row: LaneSectionRow) -> Option<RowHandle> {
        if self.by_key.contains_key(&row.key) {
            return None;
        }

        let handle = RowHandle(self.rows.len());
        row.row_id = self.next_id;
        self.next_id += 1;

        self.by_key.insert(row.key, handle);
        self.by_junction.insert((row.junction, row.row_id), handle);
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

    pub fn get(&self, handle: RowHandle) -> Option<&LaneSectionRow> {
        self.rows.get(handle.0)
    }

    pub fn find(&self, key: LaneKey) -> Option<RowHandle> {
        self.by_key.get(&key).copied()
    }

    pub fn row(&self, key: LaneKey) -> Option<&LaneSectionRow> {
        self.find(key).and_then(|h| self.get(h))
    }

    /// Row with the greatest section index for (road, lane)
    pub fn last_section(&self, road: i32, lane: i32) -> Option<RowHandle> {
        self.by_key
            .range(..=LaneKey::new(road, lane, i32::MAX))
            .next_back()
            .filter(|(key, _)| key.road == road && key.lane == lane)
            .map(|(_, handle)| *handle)
    }

    /// All rows in row-id order
    pub fn iter(&self) -> impl Iterator<Item = &LaneSectionRow> {
        self.rows.iter()
    }

    /// Handles of rows outside any junction (junction id -1)
    pub fn ordinary_roads(&self) -> Vec<RowHandle> {
        self.by_junction
            .range((-1, RowId::MIN)..=(-1, RowId::MAX))
            .map(|(_, handle)| *handle)
            .collect()
    }

    /// Handles of junction-internal rows, ordered by junction id
    pub fn junction_roads(&self) -> Vec<RowHandle> {
        self.by_junction
            .range((0, RowId::MIN)..)
            .map(|(_, handle)| *handle)
            .collect()
    }

    pub fn predecessor_mut(&mut self, handle: RowHandle) -> Option<&mut Link> {
        self.rows.get_mut(handle.0).map(|row| &mut row.predecessor)
    }

    pub fn successor_mut(&mut self, handle: RowHandle) -> Option<&mut Link> {
        self.rows.get_mut(handle.0).map(|row| &mut row.successor)
    }

    pub fn mark_processed(&mut self, handle: RowHandle, pass: Pass) {
        if let Some(row) = self.rows.get_mut(handle.0) {
            row.processed = pass;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(road: i32, lane: i32, section: i32) -> LaneSectionRow {
        LaneSectionRow::new(LaneKey::new(road, lane, section), Side::Right)
    }

    #[test]
    fn test_default_row_has_no_links() {
        let row = row(1, 1, 0);

        assert!(!row.has_pred_road());
        assert!(!row.has_succ_road());
        assert!(!row.has_pred_junction());
        assert!(!row.has_succ_junction());
        assert!(!row.has_pred_section());
        assert!(!row.has_succ_section());
        assert!(!row.in_junction());
    }

    #[test]
    fn test_pred_road() {
        let mut row = row(1, 1, 0);
        row.predecessor.kind = LinkKind::Road;

        assert!(row.has_pred_road());
        assert!(!row.has_succ_road());
        assert!(!row.has_pred_junction());
        assert!(!row.has_pred_section());
    }

    #[test]
    fn test_succ_junction() {
        let mut row = row(1, 1, 0);
        row.successor.kind = LinkKind::Junction;

        assert!(row.has_succ_junction());
        assert!(!row.has_succ_road());
        assert!(!row.has_pred_junction());
    }

    #[test]
    fn test_road_links_only_apply_at_boundaries() {
        let mut row = row(1, 1, 1);
        row.section_count = 3;
        row.predecessor.kind = LinkKind::Road;
        row.successor.kind = LinkKind::Road;

        assert!(!row.has_pred_road());
        assert!(!row.has_succ_road());
    }

    #[test]
    fn test_three_sections() {
        let mut first = row(1, 1, 0);
        first.section_count = 3;
        first.successor.lane = Some(1);
        assert!(!first.has_pred_section());
        assert!(first.has_succ_section());

        let mut middle = row(1, 1, 1);
        middle.section_count = 3;
        middle.predecessor.lane = Some(1);
        middle.successor.lane = Some(1);
        assert!(middle.has_pred_section());
        assert!(middle.has_succ_section());

        let mut last = row(1, 1, 2);
        last.section_count = 3;
        last.predecessor.lane = Some(1);
        assert!(last.has_pred_section());
        assert!(!last.has_succ_section());
        assert!(last.is_last_section());
    }

    #[test]
    fn test_duplicate_key_is_discarded() {
        let mut table = LaneSectionTable::default();
        let mut first = row(1, -1, 0);
        first.lane_type = "driving".to_string();
        let mut second = row(1, -1, 0);
        second.lane_type = "sidewalk".to_string();

        assert!(table.insert(first).is_some());
        assert!(table.insert(second).is_none());
        let third = table.insert(row(1, -2, 0)).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.row(LaneKey::new(1, -1, 0)).unwrap().lane_type, "driving");
        // the discarded row did not consume an id
        assert_eq!(table.get(third).unwrap().row_id, 2);
    }

    #[test]
    fn test_last_section() {
        let mut table = LaneSectionTable::default();
        table.insert(row(1, -1, 0));
        table.insert(row(1, -1, 1));
        let last = table.insert(row(1, -1, 2)).unwrap();
        table.insert(row(1, -2, 0));
        table.insert(row(2, -1, 0));

        assert_eq!(table.last_section(1, -1), Some(last));
        assert_eq!(
            table.get(table.last_section(1, -2).unwrap()).unwrap().key,
            LaneKey::new(1, -2, 0)
        );
        assert_eq!(table.last_section(1, -3), None);
        assert_eq!(table.last_section(3, -1), None);
    }

    #[test]
    fn test_junction_order() {
        let mut table = LaneSectionTable::default();
        let mut in_j7 = row(100, 1, 0);
        in_j7.junction = 7;
        let mut in_j2 = row(101, 1, 0);
        in_j2.junction = 2;

        let a = table.insert(row(5, 1, 0)).unwrap();
        let j7 = table.insert(in_j7).unwrap();
        let b = table.insert(row(1, 1, 0)).unwrap();
        let j2 = table.insert(in_j2).unwrap();

        assert_eq!(table.ordinary_roads(), vec![a, b]);
        assert_eq!(table.junction_roads(), vec![j2, j7]);
    }

    #[test]
    fn test_link_mutation_keeps_key() {
        let mut table = LaneSectionTable::default();
        let handle = table.insert(row(1, -1, 0)).unwrap();

        table
            .successor_mut(handle)
            .unwrap()
            .retarget(2, ContactPoint::Start, -1);
        table.mark_processed(handle, Pass::OrdinaryRoad);

        let row = table.row(LaneKey::new(1, -1, 0)).unwrap();
        assert_eq!(row.successor.kind, LinkKind::Road);
        assert_eq!(row.successor.target, 2);
        assert_eq!(row.successor.lane, Some(-1));
        assert_eq!(row.processed.marker(), 1);
    }

    #[test]
    fn test_point_at_keeps_lane_link() {
        let mut link = Link {
            kind: LinkKind::Junction,
            lane: Some(1),
            ..Link::default()
        };
        link.point_at(4, ContactPoint::End);

        assert_eq!(link.kind, LinkKind::Road);
        assert_eq!(link.target, 4);
        assert_eq!(link.contact, ContactPoint::End);
        assert_eq!(link.lane, Some(1));
    }
}
