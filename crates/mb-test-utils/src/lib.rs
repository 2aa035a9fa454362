//! Testing utilities for the Master Builder workspace
//!
//! Shared documents, graph builders and proptest strategies.

#![allow(missing_docs)]

use mb_schema::{
    Connection, Field, FieldType, MasterSettings, MasterSpec, Position, ReferentialAction,
    Relationship, SchemaGraph,
};
use proptest::prelude::*;

/// Smallest valid import document
pub const MINIMAL_JSON: &str =
    r#"{"masters":[{"name":"employees","fields":[{"name":"id","isPrimary":true}]}]}"#;

/// Three masters and two relationships, one to a master outside the document
pub const HR_DOCUMENT_JSON: &str = r#"{
  "masters": [
    {
      "name": "departments",
      "display_name": "Departments",
      "icon": "🏢",
      "description": "Organisational units",
      "fields": [
        {"name": "id", "label": "ID", "type": "uuid", "isPrimary": true},
        {"name": "name", "label": "Name", "type": "text", "required": true},
        {"name": "code", "label": "Code", "type": "text", "required": true, "unique": true}
      ],
      "settings": {"searchable": true, "exportable": true, "soft_delete": false}
    },
    {
      "name": "employees",
      "display_name": "Employees",
      "fields": [
        {"name": "id", "type": "uuid", "isPrimary": true},
        {"name": "email", "type": "email", "required": true, "unique": true},
        {"name": "dept_id", "type": "uuid", "isForeign": true, "required": true},
        {"name": "location_id", "type": "uuid", "isForeign": true}
      ],
      "settings": {"soft_delete": true}
    },
    {
      "name": "leave_types",
      "fields": [
        {"name": "id", "type": "uuid", "isPrimary": true},
        {"name": "title", "type": "text", "maxLength": 80}
      ]
    }
  ],
  "relationships": [
    {
      "source_master": "employees", "source_field": "dept_id",
      "target_master": "departments", "target_field": "id",
      "relationship_type": "1-to-many", "on_delete": "RESTRICT"
    },
    {
      "source_master": "employees", "source_field": "location_id",
      "target_master": "locations", "target_field": "id"
    }
  ]
}"#;

/// Same structure as the first two masters of [`HR_DOCUMENT_JSON`], in YAML
pub const HR_DOCUMENT_YAML: &str = "\
masters:
  - name: departments
    display_name: Departments
    fields:
      - {name: id, type: uuid, isPrimary: true}
      - {name: name, type: text, required: true}
  - name: employees
    fields:
      - {name: id, type: uuid, isPrimary: true}
      - {name: dept_id, type: uuid, isForeign: true}
relationships:
  - source_master: employees
    source_field: dept_id
    target_master: departments
    target_field: id
";

/// A wizard input master exercising every suggestion rule
pub fn wizard_master_json() -> serde_json::Value {
    serde_json::json!({
        "name": "employees",
        "display_name": "Employees",
        "description": "",
        "icon": "👥",
        "fields": [
            {"name": "id", "type": "uuid", "isPrimary": true, "unique": true},
            {"name": "employee_code", "type": "text"},
            {"name": "email", "type": "email"},
            {"name": "department_id", "type": "uuid"},
            {"name": "Manager", "type": "text"},
            {"name": "leave_type", "type": "text"},
            {"name": "joined_on", "type": "date"},
            {"name": "notes", "type": "text"}
        ]
    })
}

/// A master with the default primary key only
pub fn master(graph: &mut SchemaGraph, name: &str, label: &str) {
    graph.add_master(MasterSpec::new(name, label)).unwrap();
}

/// departments ← employees → locations, plus a free-standing projects master
pub fn hr_graph() -> SchemaGraph {
    let mut graph = SchemaGraph::new();
    graph
        .add_master(
            MasterSpec::new("departments", "Departments")
                .with_settings(MasterSettings::new("Departments").with_description("Org units")),
        )
        .unwrap();
    graph
        .add_master(MasterSpec::new("employees", "Employees").at(Position::new(500.0, 100.0)))
        .unwrap();
    graph
        .add_master(MasterSpec::new("locations", "Locations").at(Position::new(100.0, 400.0)))
        .unwrap();
    graph
        .add_master(MasterSpec::new("projects", "Projects").at(Position::new(500.0, 400.0)))
        .unwrap();

    graph
        .add_field("departments", Field::new("name", FieldType::Text).required())
        .unwrap();
    graph
        .add_field("employees", Field::new("email", FieldType::Email).required().unique())
        .unwrap();
    graph
        .add_field("employees", Field::new("dept_id", FieldType::Uuid).foreign().required())
        .unwrap();
    graph
        .add_field("employees", Field::new("location_id", FieldType::Uuid).foreign())
        .unwrap();

    graph
        .connect(
            Connection::new("employees", "dept_id", "departments", "id"),
            Relationship::new("dept_id", "departments", "id").on_delete(ReferentialAction::Restrict),
        )
        .unwrap();
    graph
        .connect(
            Connection::new("employees", "location_id", "locations", "id"),
            Relationship::new("location_id", "locations", "id").on_delete(ReferentialAction::SetNull),
        )
        .unwrap();
    graph
}

/// Lowercase identifier accepted by the graph
pub fn arb_identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,10}"
}

/// Any field type
pub fn arb_field_type() -> impl Strategy<Value = FieldType> {
    prop::sample::select(FieldType::ALL.to_vec())
}

/// Graph of 1..6 masters with 0..5 extra fields each and no relationships
pub fn arb_graph() -> impl Strategy<Value = SchemaGraph> {
    prop::collection::btree_map(
        arb_identifier(),
        prop::collection::btree_map(arb_identifier(), arb_field_type(), 0..5),
        1..6,
    )
    .prop_map(|masters| {
        let mut graph = SchemaGraph::new();
        for (name, fields) in masters {
            graph.add_master(MasterSpec::new(name.clone(), name.to_uppercase())).unwrap();
            for (field, field_type) in fields {
                // Names colliding with the default `id` are skipped.
                let _ = graph.add_field(&name, Field::new(field, field_type));
            }
        }
        graph
    })
}
