//! SQLAlchemy declarative models

use super::naming::{py_docstring, to_pascal_case, to_snake_case};
use super::{ExportContext, ExportFormat, TextExporter};
use crate::error::ExportError;
use mb_schema::{Field, FieldType, MasterNode, SchemaGraph};
use std::fmt::Write as _;

const HEADER: &str = "\"\"\"Generated SQLAlchemy Models\"\"\"
from sqlalchemy import Column, Integer, String, Boolean, Numeric
from sqlalchemy import Date, DateTime, ForeignKey, JSON
from sqlalchemy.ext.declarative import declarative_base
from sqlalchemy.orm import relationship

Base = declarative_base()

";

fn column_type(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Text | FieldType::Email => "String(255)",
        FieldType::Url => "String(500)",
        FieldType::Number => "Numeric(10, 2)",
        FieldType::Uuid => "String(36)",
        FieldType::Date => "Date",
        FieldType::Datetime => "DateTime",
        FieldType::Boolean => "Boolean",
        FieldType::Json => "JSON",
    }
}

fn write_column(py: &mut String, field: &Field) {
    let mut constraints = Vec::new();
    if field.is_primary {
        constraints.push("primary_key=True");
    } else {
        if !field.required {
            constraints.push("nullable=True");
        }
        if field.unique {
            constraints.push("unique=True");
        }
    }
    let _ = write!(py, "    {} = Column({}", field.name, column_type(field.field_type));
    for c in constraints {
        let _ = write!(py, ", {c}");
    }
    py.push_str(")\n");
}

fn write_model(py: &mut String, node: &MasterNode, graph: &SchemaGraph) {
    let _ = writeln!(py, "\nclass {}(Base):", to_pascal_case(&node.id));
    if !node.data.description.is_empty() {
        let _ = writeln!(py, "    \"\"\"{}\"\"\"", py_docstring(&node.data.description));
    }
    let _ = writeln!(py, "    __tablename__ = '{}'\n", node.id);

    for field in node.fields() {
        let edge = field
            .is_foreign
            .then(|| graph.edge_for_field(&node.id, &field.name))
            .flatten();
        match edge {
            Some(edge) => {
                let _ = write!(
                    py,
                    "    {} = Column(String(36), ForeignKey('{}.{}')",
                    field.name,
                    edge.target,
                    edge.target_field()
                );
                if !field.required {
                    py.push_str(", nullable=True");
                }
                py.push_str(")\n");
            }
            None => write_column(py, field),
        }
    }

    for edge in graph.outgoing(&node.id) {
        let target = to_pascal_case(&edge.target);
        let name = edge
            .related_name()
            .map_or_else(|| to_snake_case(&format!("{target}_rel")), str::to_string);
        let _ = writeln!(py, "\n    # Relationship to {target}");
        let _ = writeln!(
            py,
            "    {name} = relationship('{target}', back_populates='{}_set')",
            node.id
        );
    }

    py.push('\n');
}

/// Declarative `Base` subclass per master
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlAlchemyExporter;

impl TextExporter for SqlAlchemyExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::SqlAlchemy
    }

    fn render(&self, graph: &SchemaGraph, _ctx: &ExportContext) -> Result<String, ExportError> {
        let mut py = String::from(HEADER);
        for node in graph.nodes() {
            write_model(&mut py, node, graph);
        }
        Ok(py)
    }
}
