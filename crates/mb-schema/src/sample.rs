//! Built-in sample graph (departments and employees)

use crate::graph::{MasterNode, Position, RelationshipEdge, SchemaGraph, RELATIONSHIP_EDGE_TYPE};
use crate::handle::{source_handle, target_handle};
use crate::model::{Field, FieldType, MasterSettings, RelationshipKind};

/// Two masters joined by `employees.dept_id → departments.id`
#[must_use]
pub fn sample_graph() -> SchemaGraph {
    let departments = MasterNode::new(
        "departments",
        MasterSettings::new("Departments").with_icon("🏢"),
        vec![
            Field::primary_id(),
            Field::new("name", FieldType::Text).with_label("Name").required(),
            Field::new("code", FieldType::Text)
                .with_label("Code")
                .required()
                .unique(),
            Field::new("head_name", FieldType::Text).with_label("Head Name"),
        ],
        Position::new(100.0, 100.0),
    );

    let employees = MasterNode::new(
        "employees",
        MasterSettings::new("Employees")
            .with_icon("👥")
            .with_soft_delete(true),
        vec![
            Field::primary_id(),
            Field::new("first_name", FieldType::Text)
                .with_label("First Name")
                .required(),
            Field::new("email", FieldType::Email)
                .with_label("Email")
                .required()
                .unique(),
            Field::new("dept_id", FieldType::Uuid)
                .with_label("Department ID")
                .foreign()
                .required(),
        ],
        Position::new(500.0, 100.0),
    );

    // Sample edge carries no data; consumers resolve it from handles.
    let edge = RelationshipEdge {
        id: "e1".to_string(),
        source: "employees".to_string(),
        target: "departments".to_string(),
        source_handle: Some(source_handle("dept_id")),
        target_handle: Some(target_handle("id")),
        kind: RELATIONSHIP_EDGE_TYPE.to_string(),
        animated: true,
        label: Some(RelationshipKind::OneToMany.to_string()),
        data: None,
    };

    SchemaGraph::from_parts(vec![departments, employees], vec![edge])
}

impl SchemaGraph {
    /// The built-in sample graph
    #[inline]
    #[must_use]
    pub fn sample() -> Self {
        sample_graph()
    }
}
