//! Django model classes

use super::naming::{py_docstring, py_literal, to_pascal_case};
use super::{ExportContext, ExportFormat, TextExporter};
use crate::error::ExportError;
use mb_schema::{Field, FieldType, MasterNode, ReferentialAction, RelationshipEdge, SchemaGraph};
use std::fmt::Write as _;

const DEFAULT_MAX_LENGTH: u32 = 255;

fn django_field(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Text => "CharField",
        FieldType::Email => "EmailField",
        FieldType::Url => "URLField",
        FieldType::Number => "DecimalField",
        FieldType::Uuid => "UUIDField",
        FieldType::Date => "DateField",
        FieldType::Datetime => "DateTimeField",
        FieldType::Boolean => "BooleanField",
        FieldType::Json => "JSONField",
    }
}

fn on_delete(action: ReferentialAction) -> &'static str {
    match action {
        ReferentialAction::Cascade => "CASCADE",
        ReferentialAction::SetNull => "SET_NULL",
        ReferentialAction::Restrict => "RESTRICT",
        ReferentialAction::NoAction => "DO_NOTHING",
    }
}

fn write_uuid_primary(py: &mut String, field: &Field) {
    let _ = writeln!(py, "    {} = models.UUIDField(", field.name);
    py.push_str("        primary_key=True,\n");
    py.push_str("        default=uuid.uuid4,\n");
    py.push_str("        editable=False\n");
    py.push_str("    )\n");
}

fn write_foreign_key(py: &mut String, field: &Field, edge: &RelationshipEdge) {
    let attr = field.name.replacen("_id", "", 1);
    let _ = writeln!(py, "    {attr} = models.ForeignKey(");
    let _ = writeln!(py, "        '{}',", to_pascal_case(&edge.target));
    let _ = writeln!(py, "        on_delete=models.{},", on_delete(edge.on_delete()));
    if let Some(related) = edge.related_name() {
        let _ = writeln!(py, "        related_name={},", py_literal(related));
    }
    if !field.required {
        py.push_str("        null=True,\n");
        py.push_str("        blank=True,\n");
    }
    py.push_str("    )\n");
}

fn write_plain(py: &mut String, field: &Field) {
    let mut options = Vec::new();
    match field.field_type {
        FieldType::Text => options.push(format!(
            "max_length={}",
            field.max_length.unwrap_or(DEFAULT_MAX_LENGTH)
        )),
        FieldType::Number => {
            options.push("max_digits=10".to_string());
            options.push("decimal_places=2".to_string());
        }
        _ => {}
    }
    if field.is_primary {
        options.push("primary_key=True".to_string());
    } else {
        if !field.required {
            options.push("blank=True".to_string());
            options.push("null=True".to_string());
        }
        if field.unique {
            options.push("unique=True".to_string());
        }
    }
    if let Some(default) = field.default_value.as_deref().filter(|d| !d.is_empty()) {
        options.push(format!("default={}", py_literal(default)));
    }
    if let Some(help) = field.help_text.as_deref().filter(|h| !h.is_empty()) {
        options.push(format!("help_text={}", py_literal(help)));
    }

    let _ = writeln!(
        py,
        "    {} = models.{}({})",
        field.name,
        django_field(field.field_type),
        options.join(", ")
    );
}

fn write_model(py: &mut String, node: &MasterNode, graph: &SchemaGraph) {
    let _ = writeln!(py, "\nclass {}(models.Model):", to_pascal_case(&node.id));
    if !node.data.description.is_empty() {
        let _ = writeln!(py, "    \"\"\"{}\"\"\"", py_docstring(&node.data.description));
    }

    for field in node.fields() {
        let edge = field
            .is_foreign
            .then(|| graph.edge_for_field(&node.id, &field.name))
            .flatten();
        match edge {
            _ if field.is_primary && field.field_type == FieldType::Uuid => {
                write_uuid_primary(py, field);
            }
            Some(edge) => write_foreign_key(py, field, edge),
            None => write_plain(py, field),
        }
    }

    py.push_str("\n    class Meta:\n");
    let _ = writeln!(py, "        db_table = {}", py_literal(&node.id));
    let _ = writeln!(py, "        verbose_name = {}", py_literal(node.label()));
    let _ = writeln!(
        py,
        "        verbose_name_plural = {}",
        py_literal(&format!("{}s", node.label()))
    );

    py.push_str("\n    def __str__(self):\n");
    let display = node
        .fields()
        .iter()
        .find(|f| matches!(f.name.as_str(), "name" | "title" | "email"))
        .map_or("id", |f| f.name.as_str());
    let _ = writeln!(py, "        return str(self.{display})\n");
}

/// `models.Model` subclass per master
#[derive(Debug, Clone, Copy, Default)]
pub struct DjangoExporter;

impl TextExporter for DjangoExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Django
    }

    fn render(&self, graph: &SchemaGraph, _ctx: &ExportContext) -> Result<String, ExportError> {
        let mut py = String::from("\"\"\"Generated Django Models\"\"\"\nimport uuid\nfrom django.db import models\n\n");
        for node in graph.nodes() {
            write_model(&mut py, node, graph);
        }
        Ok(py)
    }
}
