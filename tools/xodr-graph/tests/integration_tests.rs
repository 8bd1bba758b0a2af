use std::collections::BTreeMap;
use std::path::PathBuf;

use xodr_graph::tables::Pass;
use xodr_graph::{LaneCategory, LaneFilter, LaneKey, RoadGraph};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

fn load(name: &str) -> RoadGraph {
    let mut net = RoadGraph::new();
    net.try_initialize(fixture(name))
        .unwrap_or_else(|e| panic!("{name}: {e}"));
    net
}

fn load_with(name: &str, filter: LaneFilter) -> RoadGraph {
    let mut net = RoadGraph::new();
    net.set_lane_filter(filter);
    net.try_initialize(fixture(name))
        .unwrap_or_else(|e| panic!("{name}: {e}"));
    net
}

fn text(net: &RoadGraph) -> String {
    let mut buf = Vec::new();
    net.dump_text(&mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

/// (source, target) joint ids of the segment (road, lane, section)
fn ends(net: &RoadGraph, road: i32, lane: i32, section: i32) -> (usize, usize) {
    let (source, target, _) = net
        .graph()
        .lookup(LaneKey::new(road, lane, section))
        .unwrap_or_else(|| panic!("no segment ({road}, {lane}, {section})"));
    (source.index(), target.index())
}

#[test]
fn test_end_to_start() {
    let net = load("end_to_start.xodr");
    let result = text(&net);

    assert!(result.contains("0 1  (road, lane, sct) := (1, 1, 0)"));
    assert!(result.contains("1 4  (road, lane, sct) := (2, 1, 0)"));
    assert!(result.contains("2 3  (road, lane, sct) := (1, -1, 0)"));
    assert!(result.contains("3 5  (road, lane, sct) := (2, -1, 0)"));
    assert_eq!(net.graph().segment_count(), 4);
    assert_eq!(net.graph().joint_count(), 6);
}

#[test]
fn test_end_to_end() {
    // (0) --> (1) <-- (5)
    // (2) --> (3) <-- (4)
    let net = load("end_to_end.xodr");
    let result = text(&net);

    assert!(result.contains("0 1  (road, lane, sct) := (1, 1, 0)"));
    assert!(result.contains("5 1  (road, lane, sct) := (2, -1, 0)"));
    assert!(result.contains("2 3  (road, lane, sct) := (1, -1, 0)"));
    assert!(result.contains("4 3  (road, lane, sct) := (2, 1, 0)"));
}

#[test]
fn test_start_to_start() {
    // (1) <-- (0) --> (5)
    // (3) <-- (2) --> (4)
    let net = load("start_to_start.xodr");
    let result = text(&net);

    assert!(result.contains("0 1  (road, lane, sct) := (1, 1, 0)"));
    assert!(result.contains("2 3  (road, lane, sct) := (1, -1, 0)"));
    assert!(result.contains("2 4  (road, lane, sct) := (2, 1, 0)"));
    assert!(result.contains("0 5  (road, lane, sct) := (2, -1, 0)"));
}

#[test]
fn test_three_sections_lane_ends() {
    let net = load("sections_3_3_2.xodr");

    assert_eq!(ends(&net, 1, -1, 0), (0, 1));
    assert_eq!(ends(&net, 1, -1, 1), (1, 6));
    assert_eq!(ends(&net, 1, -1, 2), (6, 9));

    assert_eq!(ends(&net, 1, -2, 0), (2, 3));
    assert_eq!(ends(&net, 1, -2, 1), (3, 7));
    assert_eq!(ends(&net, 1, -2, 2), (7, 10));

    // lane -3 stops after the second section
    assert_eq!(ends(&net, 1, -3, 0), (4, 5));
    assert_eq!(ends(&net, 1, -3, 1), (5, 8));
    assert!(net.find_edge(1, -3, 2).is_none());
    assert_eq!(net.graph().segment_count(), 8);

    let lengths: Vec<f64> = (0..3)
        .map(|s| {
            let edge = net.find_edge(1, -1, s).unwrap();
            net.graph().segment(edge).unwrap().length
        })
        .collect();
    assert_eq!(lengths, vec![70.0, 100.0, 200.0]);
}

#[test]
fn test_three_sections_lane_jump() {
    let net = load("sections_3_3_2_jump.xodr");

    assert_eq!(ends(&net, 1, -1, 1), (1, 6));
    assert_eq!(ends(&net, 1, -2, 1), (3, 7));
    assert_eq!(ends(&net, 1, -3, 1), (5, 8));
    assert_eq!(ends(&net, 1, -1, 2), (7, 9));
    assert_eq!(ends(&net, 1, -2, 2), (8, 10));
}

#[test]
fn test_interrupted_lane_starts_fresh() {
    let net = load("sections_3_2_3.xodr");

    assert_eq!(ends(&net, 1, -1, 2), (6, 8));
    assert_eq!(ends(&net, 1, -2, 2), (7, 9));
    assert_eq!(ends(&net, 1, -3, 2), (10, 11));
    assert!(net.find_edge(1, -3, 1).is_none());
}

#[test]
fn test_predecessor_road_with_several_sections() {
    let net = load("two_section_road_to_road.xodr");

    assert_eq!(ends(&net, 1, -1, 0), (0, 1));
    assert_eq!(ends(&net, 1, -1, 1), (1, 2));
    // attaches to the last section of road 1, not the first
    assert_eq!(ends(&net, 2, -1, 0), (2, 3));
}

#[test]
fn test_three_arm_junction() {
    let net = load("three_arm_junction.xodr");

    assert_eq!(ends(&net, 0, 1, 0), (0, 1));
    assert_eq!(ends(&net, 0, -1, 0), (2, 3));
    assert_eq!(ends(&net, 1, 1, 0), (4, 5));
    assert_eq!(ends(&net, 1, -1, 0), (6, 7));
    assert_eq!(ends(&net, 2, 1, 0), (8, 9));
    assert_eq!(ends(&net, 2, -1, 0), (10, 11));

    assert_eq!(ends(&net, 100, 1, 0), (1, 7));
    assert_eq!(ends(&net, 100, -1, 0), (3, 5));
    assert_eq!(ends(&net, 101, 1, 0), (1, 11));
    assert_eq!(ends(&net, 101, -1, 0), (3, 9));
    assert_eq!(ends(&net, 102, 1, 0), (5, 11));
    assert_eq!(ends(&net, 102, -1, 0), (7, 9));

    // connecting roads reuse the joints of the roads they join
    assert_eq!(net.graph().joint_count(), 12);
}

#[test]
fn test_three_arm_junction_driving_only() {
    let with_borders = load("three_arm_junction_border.xodr");
    assert_eq!(with_borders.graph().segment_count(), 18);

    let net = load_with(
        "three_arm_junction_border.xodr",
        LaneFilter::only([LaneCategory::Driving]),
    );
    assert_eq!(net.graph().segment_count(), 12);
    assert_eq!(net.stats().rejected, 6);
    assert!(net.find_edge(0, 2, 0).is_none());

    assert_eq!(ends(&net, 100, 1, 0), (1, 7));
    assert_eq!(ends(&net, 100, -1, 0), (3, 5));
    assert_eq!(ends(&net, 101, 1, 0), (1, 11));
    assert_eq!(ends(&net, 101, -1, 0), (3, 9));
    assert_eq!(ends(&net, 102, 1, 0), (5, 11));
    assert_eq!(ends(&net, 102, -1, 0), (7, 9));
}

#[test]
fn test_direct_junction_is_elided() {
    let net = load("direct_junction.xodr");

    assert_eq!(ends(&net, 1, 1, 0), (0, 1));
    assert_eq!(ends(&net, 1, -1, 0), (2, 3));
    assert_eq!(ends(&net, 2, 1, 0), (1, 4));
    assert_eq!(ends(&net, 2, -1, 0), (3, 5));
    assert_eq!(net.graph().segment_count(), 4);
}

#[test]
fn test_direct_junction_end_contact() {
    let net = load("direct_junction_end.xodr");

    // the two sections of road 2 still share their joint
    assert_eq!(ends(&net, 2, 1, 0), (2, 3));
    assert_eq!(ends(&net, 2, 1, 1), (3, 4));

    // road 4 runs into the end of single-section road 3
    assert_eq!(ends(&net, 3, 1, 0), (5, 6));
    assert_eq!(ends(&net, 4, -1, 0), (7, 6));

    assert_eq!(ends(&net, 1, -1, 0), (0, 1));
    assert_eq!(net.graph().segment_count(), 5);
    assert_eq!(net.graph().joint_count(), 8);
}

#[test]
fn test_direct_junction_without_contact_point_stays_apart() {
    let xml = std::fs::read_to_string(fixture("direct_junction.xodr"))
        .unwrap()
        .replace(r#" contactPoint="start""#, "");

    let mut net = RoadGraph::new();
    assert!(net.initialize_from_str(&xml));
    assert_eq!(net.graph().segment_count(), 4);
    assert_eq!(net.graph().joint_count(), 8);
}

#[test]
fn test_one_edge_per_accepted_row() {
    for name in [
        "end_to_start.xodr",
        "sections_3_2_3.xodr",
        "three_arm_junction_border.xodr",
    ] {
        for filter in [
            LaneFilter::default(),
            LaneFilter::only([LaneCategory::Driving]),
            LaneFilter::only([LaneCategory::Boundary]),
        ] {
            let net = load_with(name, filter);
            let accepted = net
                .tables()
                .lanes
                .iter()
                .filter(|row| filter.enabled(&row.lane_type))
                .count();
            assert_eq!(net.graph().segment_count(), accepted, "{name} {filter}");
        }
    }
}

#[test]
fn test_rows_marked_by_pass() {
    let net = load("three_arm_junction.xodr");
    for row in net.tables().lanes.iter() {
        let expected = if row.in_junction() {
            Pass::JunctionRoad
        } else {
            Pass::OrdinaryRoad
        };
        assert_eq!(row.processed, expected, "{}", row.key);
    }
}

#[test]
fn test_rebuild_is_isomorphic() {
    let shape = |net: &RoadGraph| -> BTreeMap<LaneKey, (usize, usize)> {
        net.graph()
            .inner()
            .edge_weights()
            .map(|segment| {
                let k = segment.key;
                (k, ends(net, k.road, k.lane, k.section))
            })
            .collect()
    };

    let first = load("three_arm_junction.xodr");
    let mut second = load("end_to_start.xodr");
    second.initialize(fixture("three_arm_junction.xodr"));

    assert_eq!(shape(&first), shape(&second));
}

#[test]
fn test_missing_file() {
    let mut net = RoadGraph::new();
    assert!(net.initialize(fixture("does_not_exist.xodr")));
    assert!(net.graph().is_empty());

    let err = net.try_initialize(fixture("does_not_exist.xodr")).unwrap_err();
    assert!(matches!(err, xodr_graph::Error::Io { .. }));
}

#[test]
fn test_exports_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let net = load("end_to_start.xodr");

    let dot = dir.path().join("net.dot");
    net.dump_graphviz(&dot).unwrap();
    let dot = std::fs::read_to_string(dot).unwrap();
    assert!(dot.starts_with("digraph G {"));
    assert!(dot.contains("1->4[label=\"(2,1,0)\\n100.000000\",color=\"indigo\"];"));

    let graphml = dir.path().join("net.graphml");
    net.dump_graphml(&graphml).unwrap();
    let graphml = std::fs::read_to_string(graphml).unwrap();
    assert!(graphml.contains(r#"attr.name="weight""#));
    assert!(graphml.contains(r#"<edge id="e3" source="n3" target="n5">"#));
    assert!(graphml.contains("(2, -1, 0, 100.000000)"));

    let err = net
        .dump_graphviz(dir.path().join("missing").join("net.dot"))
        .unwrap_err();
    assert!(matches!(err, xodr_graph::Error::Io { .. }));
}

#[test]
fn test_table_dump() {
    let net = load("direct_junction.xodr");
    let mut buf = Vec::new();
    net.dump_tables(&mut buf).unwrap();
    let dump = String::from_utf8(buf).unwrap();

    assert!(dump.contains("PredLaneValid"));
    assert!(dump.contains("ConnectingRoadId"));
    assert!(dump.contains("direct"));
    assert_eq!(dump.lines().filter(|l| l.starts_with("1 ")).count(), 4);
}

#[test]
fn test_traversal_through_junction() {
    let net = load("three_arm_junction.xodr");

    // 2 -> 3, then either 3 -> 5 -> 11 over roads 100 and 102, or 3 -> 9 over road 101
    let paths = net.traverse(0, -1, 0, true).unwrap();
    assert_eq!(
        paths,
        vec![
            vec![
                LaneKey::new(0, -1, 0),
                LaneKey::new(100, -1, 0),
                LaneKey::new(102, 1, 0),
            ],
            vec![LaneKey::new(0, -1, 0), LaneKey::new(101, -1, 0)],
        ]
    );

    let mut buf = Vec::new();
    net.print_traversal(0, -1, 0, true, &mut buf).unwrap();
    let out = String::from_utf8(buf).unwrap();
    assert_eq!(out.lines().filter(|l| l.starts_with('+')).count(), 2);
    assert!(out.contains(" 0, -1, 0\n"));
}
