//! Header-only CSV templates for bulk data entry

use super::{ExportArtifact, ExportContext, ExportFormat, Exporter};
use crate::error::ExportError;
use mb_schema::SchemaGraph;

fn csv_cell(text: &str) -> String {
    if text.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

/// `<master>_template.csv` per master, holding the field names as header row
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvTemplateExporter;

impl Exporter for CsvTemplateExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::CsvTemplate
    }

    fn export(&self, graph: &SchemaGraph, _ctx: &ExportContext) -> Result<Vec<ExportArtifact>, ExportError> {
        Ok(graph
            .nodes()
            .iter()
            .map(|node| {
                let header: Vec<String> = node.fields().iter().map(|f| csv_cell(&f.name)).collect();
                ExportArtifact {
                    file_name: format!("{}_template.csv", node.id),
                    content: format!("{}\n", header.join(",")),
                }
            })
            .collect())
    }
}
