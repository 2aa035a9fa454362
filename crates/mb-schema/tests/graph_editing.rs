//! Editing invariants exercised through the public API

use mb_schema::prelude::*;
use mb_schema::SchemaFingerprint;
use proptest::prelude::*;

fn field_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}"
}

proptest! {
    #[test]
    fn prop_at_most_one_primary_key(ops in prop::collection::vec((field_name(), any::<bool>()), 0..20)) {
        let mut graph = SchemaGraph::new();
        graph.add_master(MasterSpec::new("items", "Items")).unwrap();

        for (name, primary) in ops {
            let mut field = Field::new(name, FieldType::Text);
            if primary {
                field = field.primary();
            }
            let _ = graph.add_field("items", field);
        }

        let node = graph.node("items").unwrap();
        let primaries = node.fields().iter().filter(|f| f.is_primary).count();
        prop_assert_eq!(primaries, 1);

        let mut names: Vec<_> = node.fields().iter().map(|f| f.name.clone()).collect();
        let len = names.len();
        names.sort();
        names.dedup();
        prop_assert_eq!(names.len(), len);
    }

    #[test]
    fn prop_failed_edit_leaves_graph_unchanged(name in field_name()) {
        let mut graph = SchemaGraph::sample();
        let before = graph.fingerprint();

        // `id` already exists and is primary on every sample master.
        let _ = graph.add_field("employees", Field::new("id", FieldType::Text));
        let _ = graph.add_field("employees", Field::new(name.clone(), FieldType::Text).primary());
        let _ = graph.remove_field("employees", "id");
        let _ = graph.add_field("missing", Field::new(name, FieldType::Text));

        prop_assert_eq!(graph.fingerprint(), before);
    }

    #[test]
    fn prop_default_placement_never_overlaps(count in 1usize..30) {
        let mut graph = SchemaGraph::new();
        for i in 0..count {
            graph.add_master(MasterSpec::new(format!("m{i}"), format!("M{i}"))).unwrap();
        }
        let positions: Vec<Position> = graph.nodes().iter().map(|n| n.position).collect();
        for (i, p) in positions.iter().enumerate() {
            prop_assert!(p.x >= 0.0 && p.y >= 0.0);
            prop_assert!(!positions[..i].contains(p), "{:?} placed twice", p);
        }
    }
}

#[test]
fn default_placed_masters_get_distinct_grid_slots() {
    let mut graph = SchemaGraph::new();
    let a = graph.add_master(MasterSpec::new("a", "A")).unwrap().position;
    let b = graph.add_master(MasterSpec::new("b", "B")).unwrap().position;
    assert_ne!(a, b);
    assert_eq!(a, Position::new(100.0, 100.0));
    assert_eq!(b, Position::new(500.0, 100.0));
    assert!(b.x >= 0.0 && b.y >= 0.0);
}

#[test]
fn default_placement_avoids_explicit_positions() {
    let mut graph = SchemaGraph::new();
    graph
        .add_master(MasterSpec::new("pinned", "Pinned").at(Position::new(100.0, 100.0)))
        .unwrap();
    let next = graph.add_master(MasterSpec::new("next", "Next")).unwrap().position;
    assert_ne!(next, Position::new(100.0, 100.0));
}

#[test]
fn no_dangling_edges_after_removals() {
    let mut graph = SchemaGraph::sample();
    graph.duplicate_master("employees").unwrap();
    graph
        .connect(
            Connection::new("employees_copy", "dept_id", "departments", "id"),
            Relationship::new("dept_id", "departments", "id"),
        )
        .unwrap();
    assert_eq!(graph.relationship_count(), 2);

    graph.remove_master("departments").unwrap();
    for edge in graph.edges() {
        assert!(graph.node(&edge.source).is_some());
        assert!(graph.node(&edge.target).is_some());
    }
    assert_eq!(graph.relationship_count(), 0);
}

#[test]
fn fingerprint_tracks_content() {
    let a = SchemaGraph::sample();
    let mut b = SchemaGraph::sample();
    assert_eq!(a.fingerprint(), b.fingerprint());

    b.update_master(
        "departments",
        MasterSettings::new("Teams").with_description("renamed"),
    )
    .unwrap();
    assert_ne!(a.fingerprint(), b.fingerprint());

    let hex = b.fingerprint().to_string();
    assert_eq!(hex.parse::<SchemaFingerprint>().unwrap(), b.fingerprint());
}

#[test]
fn session_dirty_flow() {
    let mut session = EditorSession::new(SchemaGraph::sample());
    session
        .graph_mut()
        .add_field("departments", Field::new("budget", FieldType::Number))
        .unwrap();
    assert!(session.is_dirty());
    session.graph_mut().remove_field("departments", "budget").unwrap();
    assert!(!session.is_dirty());
}
