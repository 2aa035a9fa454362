//! Conversion of a validated import document into a diagram graph

use super::raw::{flag, number, scalar, small_uint, text};
use mb_schema::{
    auto_layout_position, Field, FieldType, MasterNode, MasterSettings, ReferentialAction,
    Relationship, RelationshipEdge, RelationshipKind, SchemaGraph, DEFAULT_ICON,
};
use serde_json::Value;
use std::collections::HashSet;

/// Build nodes and edges from a document that passed validation
///
/// Master names are unique after validation; duplicate fields keep their
/// first occurrence. Relationships referencing unknown masters still produce
/// edges.
pub(super) fn build_graph(doc: &Value) -> SchemaGraph {
    let masters = doc
        .get("masters")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let kept: Vec<&Value> = masters.iter().filter(|&m| text(m, "name").is_some()).collect();

    let total = kept.len();
    let nodes: Vec<MasterNode> = kept
        .iter()
        .enumerate()
        .map(|(i, m)| build_master(m, i, total))
        .collect();

    let batch = ulid::Ulid::new().to_string().to_lowercase();
    let edges: Vec<RelationshipEdge> = doc
        .get("relationships")
        .and_then(Value::as_array)
        .map(|rels| {
            rels.iter()
                .enumerate()
                .map(|(i, rel)| build_edge(rel, &format!("imported_{batch}_{i}")))
                .collect()
        })
        .unwrap_or_default();

    SchemaGraph::from_parts(nodes, edges)
}

fn build_master(master: &Value, index: usize, total: usize) -> MasterNode {
    let name = text(master, "name").unwrap_or_default();
    let settings_doc = master.get("settings").unwrap_or(&Value::Null);

    let settings = MasterSettings {
        display_name: text(master, "display_name").unwrap_or(name).to_string(),
        icon: text(master, "icon").unwrap_or(DEFAULT_ICON).to_string(),
        description: text(master, "description").unwrap_or_default().to_string(),
        searchable: flag(settings_doc, "searchable").unwrap_or(true),
        exportable: flag(settings_doc, "exportable").unwrap_or(true),
        soft_delete: flag(settings_doc, "soft_delete").unwrap_or(false),
    };

    let raw_fields = master
        .get("fields")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut names = HashSet::new();
    let unique: Vec<&Value> = raw_fields
        .iter()
        .filter(|&f| text(f, "name").is_some_and(|n| names.insert(n)))
        .collect();

    let primary = unique
        .iter()
        .position(|f| flag(f, "isPrimary") == Some(true))
        .unwrap_or(0);

    let fields: Vec<Field> = unique
        .iter()
        .enumerate()
        .map(|(i, f)| build_field(f, i == primary))
        .collect();

    MasterNode::new(name, settings, fields, auto_layout_position(index, total))
}

fn build_field(raw: &Value, is_primary: bool) -> Field {
    let name = text(raw, "name").unwrap_or_default();
    let field_type: FieldType = text(raw, "type")
        .and_then(|t| t.parse().ok())
        .unwrap_or_default();

    let mut field = Field::new(name, field_type);
    if let Some(label) = text(raw, "label") {
        field.label = label.to_string();
    }
    field.is_primary = is_primary;
    field.required = flag(raw, "required").unwrap_or(is_primary);
    field.unique = flag(raw, "unique").unwrap_or(is_primary);
    field.is_foreign = flag(raw, "isForeign").unwrap_or(false);
    field.default_value = scalar(raw, "defaultValue");
    field.help_text = text(raw, "helpText").map(str::to_string);
    field.placeholder = text(raw, "placeholder").map(str::to_string);
    field.min_length = small_uint(raw, "minLength");
    field.max_length = small_uint(raw, "maxLength");
    field.min_value = number(raw, "minValue");
    field.max_value = number(raw, "maxValue");
    field
}

fn build_edge(rel: &Value, id: &str) -> RelationshipEdge {
    let kind: RelationshipKind = text(rel, "type")
        .or_else(|| text(rel, "relationship_type"))
        .and_then(|k| k.parse().ok())
        .unwrap_or_default();
    let action = |key: &str| -> ReferentialAction {
        text(rel, key).and_then(|a| a.parse().ok()).unwrap_or_default()
    };

    let relationship = Relationship::new(
        text(rel, "source_field").unwrap_or_default(),
        text(rel, "target_master").unwrap_or_default(),
        text(rel, "target_field").unwrap_or_default(),
    )
    .with_kind(kind)
    .on_delete(action("on_delete"))
    .on_update(action("on_update"))
    .with_related_name(text(rel, "related_name").unwrap_or_default());

    RelationshipEdge::new(id, text(rel, "source_master").unwrap_or_default(), relationship)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mb_schema::Position;
    use serde_json::json;

    #[test]
    fn first_field_becomes_primary_when_none_marked() {
        let graph = build_graph(&json!({
            "masters": [{"name": "tags", "fields": [{"name": "slug"}, {"name": "title"}]}]
        }));
        let node = graph.node("tags").unwrap();
        let slug = node.field("slug").unwrap();
        assert!(slug.is_primary && slug.required && slug.unique);
        assert_eq!(slug.label, "slug");
        assert_eq!(slug.field_type, FieldType::Text);
        assert!(!node.field("title").unwrap().required);
    }

    #[test]
    fn explicit_flags_override_primary_defaults() {
        let graph = build_graph(&json!({
            "masters": [{"name": "a", "fields": [
                {"name": "id", "type": "uuid", "isPrimary": true, "required": false}
            ]}]
        }));
        let id = graph.node("a").unwrap().field("id").unwrap();
        assert!(!id.required);
        assert!(id.unique);
    }

    #[test]
    fn master_settings_and_layout() {
        let graph = build_graph(&json!({
            "masters": [
                {"name": "a", "display_name": "Alpha", "icon": "🅰", "fields": [{"name": "id"}],
                 "settings": {"searchable": false, "soft_delete": true}},
                {"name": "b", "fields": [{"name": "id"}]}
            ]
        }));
        let a = graph.node("a").unwrap();
        assert_eq!(a.label(), "Alpha");
        assert!(!a.data.searchable && a.data.exportable && a.data.soft_delete);
        let b = graph.node("b").unwrap();
        assert_eq!(b.label(), "b");
        assert_eq!(b.data.icon, DEFAULT_ICON);
        assert_eq!(b.position, Position::new(500.0, 100.0));
    }

    #[test]
    fn relationships_become_edges() {
        let graph = build_graph(&json!({
            "masters": [{"name": "employees", "fields": [{"name": "id"}, {"name": "dept_id"}]}],
            "relationships": [{
                "source_master": "employees", "source_field": "dept_id",
                "target_master": "departments", "target_field": "id",
                "relationship_type": "1-to-1", "on_delete": "SET NULL", "related_name": "staff"
            }]
        }));
        let edge = &graph.edges()[0];
        assert!(edge.id.starts_with("imported_") && edge.id.ends_with("_0"));
        assert_eq!(edge.target, "departments");
        assert_eq!(edge.source_handle.as_deref(), Some("dept_id-source"));
        assert_eq!(edge.label.as_deref(), Some("1-to-1"));
        assert_eq!(edge.relationship_kind(), RelationshipKind::OneToOne);
        assert_eq!(edge.on_delete(), ReferentialAction::SetNull);
        assert_eq!(edge.on_update(), ReferentialAction::Cascade);
        assert_eq!(edge.related_name(), Some("staff"));
    }

    #[test]
    fn duplicates_keep_first_occurrence() {
        let graph = build_graph(&json!({
            "masters": [
                {"name": "a", "display_name": "First", "fields": [{"name": "id"}, {"name": "id", "type": "email"}]},
                {"name": "a", "display_name": "Second", "fields": [{"name": "id"}]}
            ]
        }));
        assert_eq!(graph.master_count(), 1);
        let a = graph.node("a").unwrap();
        assert_eq!(a.label(), "First");
        assert_eq!(a.fields().len(), 1);
        assert_eq!(a.fields()[0].field_type, FieldType::Text);
    }
}
