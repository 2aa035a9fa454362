//! Re-importable JSON schema document

use super::{ExportContext, ExportFormat, TextExporter};
use crate::error::ExportError;
use mb_schema::{Field, ReferentialAction, RelationshipKind, SchemaGraph};
use serde::{Deserialize, Serialize};

/// Document format version
pub const SCHEMA_VERSION: &str = "1.0";

/// Top-level export document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub schema_version: String,
    pub generated_at: String,
    pub masters: Vec<DocumentMaster>,
    pub relationships: Vec<DocumentRelationship>,
}

/// A master as written to the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMaster {
    pub name: String,
    pub display_name: String,
    pub icon: String,
    pub description: String,
    pub fields: Vec<Field>,
    pub settings: DocumentSettings,
}

/// Master flags as written to the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSettings {
    pub searchable: bool,
    pub exportable: bool,
    pub soft_delete: bool,
}

/// A relationship as written to the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRelationship {
    pub id: String,
    pub source_master: String,
    pub source_field: String,
    pub target_master: String,
    pub target_field: String,
    pub relationship_type: RelationshipKind,
    pub on_delete: ReferentialAction,
    pub on_update: ReferentialAction,
    pub related_name: String,
}

impl ExportDocument {
    /// Document describing `graph`
    #[must_use]
    pub fn from_graph(graph: &SchemaGraph, ctx: &ExportContext) -> Self {
        let masters = graph
            .nodes()
            .iter()
            .map(|node| DocumentMaster {
                name: node.id.clone(),
                display_name: node.data.label.clone(),
                icon: node.data.icon.clone(),
                description: node.data.description.clone(),
                fields: node.data.fields.clone(),
                settings: DocumentSettings {
                    searchable: node.data.searchable,
                    exportable: node.data.exportable,
                    soft_delete: node.data.soft_delete,
                },
            })
            .collect();

        let relationships = graph
            .edges()
            .iter()
            .map(|edge| {
                let rel = edge.resolved();
                DocumentRelationship {
                    id: edge.id.clone(),
                    source_master: edge.source.clone(),
                    source_field: rel.source_field,
                    target_master: edge.target.clone(),
                    target_field: rel.target_field,
                    relationship_type: rel.kind,
                    on_delete: rel.on_delete,
                    on_update: rel.on_update,
                    related_name: rel.related_name,
                }
            })
            .collect();

        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            generated_at: ctx.timestamp(),
            masters,
            relationships,
        }
    }
}

/// Pretty-printed [`ExportDocument`]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl TextExporter for JsonExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }

    fn render(&self, graph: &SchemaGraph, ctx: &ExportContext) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(&ExportDocument::from_graph(graph, ctx))?)
    }
}
