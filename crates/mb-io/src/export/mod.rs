//! One-way export generators
//!
//! Every generator reads a [`SchemaGraph`] and produces text artifacts:
//!
//! | format       | output                               | extension |
//! |--------------|--------------------------------------|-----------|
//! | `json`       | re-importable schema document        | `json`    |
//! | `sql`        | PostgreSQL DDL                       | `sql`     |
//! | `django`     | Django model classes                 | `py`      |
//! | `sqlalchemy` | SQLAlchemy declarative models        | `py`      |
//! | `csv`        | one header-only template per master  | `csv`     |

use crate::error::ExportError;
use chrono::{DateTime, SecondsFormat, Utc};
use mb_schema::SchemaGraph;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

mod csv;
mod django;
mod json;
mod naming;
mod sql;
mod sqlalchemy;

pub use self::csv::CsvTemplateExporter;
pub use django::DjangoExporter;
pub use json::{DocumentMaster, DocumentRelationship, DocumentSettings, ExportDocument, JsonExporter, SCHEMA_VERSION};
pub use naming::{py_literal, sql_literal, to_pascal_case, to_snake_case};
pub use sql::SqlExporter;
pub use sqlalchemy::SqlAlchemyExporter;

/// Base file name used when the schema has no name
pub const DEFAULT_BASE_NAME: &str = "schema";

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Sql,
    Django,
    SqlAlchemy,
    #[serde(rename = "csv", alias = "csv-template")]
    CsvTemplate,
}

impl ExportFormat {
    /// All formats in menu order
    pub const ALL: [Self; 5] = [
        Self::Json,
        Self::Sql,
        Self::Django,
        Self::SqlAlchemy,
        Self::CsvTemplate,
    ];

    /// Format name as accepted by [`FromStr`]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Sql => "sql",
            Self::Django => "django",
            Self::SqlAlchemy => "sqlalchemy",
            Self::CsvTemplate => "csv",
        }
    }

    /// File extension (without dot)
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Sql => "sql",
            Self::Django | Self::SqlAlchemy => "py",
            Self::CsvTemplate => "csv",
        }
    }
}

impl Display for ExportFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "sql" => Ok(Self::Sql),
            "django" => Ok(Self::Django),
            "sqlalchemy" => Ok(Self::SqlAlchemy),
            "csv" | "csv-template" => Ok(Self::CsvTemplate),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Inputs to a generator that do not come from the graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportContext {
    generated_at: DateTime<Utc>,
    base_name: String,
}

impl Default for ExportContext {
    fn default() -> Self {
        Self::now()
    }
}

impl ExportContext {
    /// Context stamped with the current time
    #[must_use]
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    /// Context stamped with a fixed time
    #[must_use]
    pub fn at(generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            base_name: DEFAULT_BASE_NAME.to_string(),
        }
    }

    /// With base file name (empty keeps the default)
    #[must_use]
    pub fn with_base_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.trim().is_empty() {
            self.base_name = name;
        }
        self
    }

    /// Generation time
    #[inline]
    #[must_use]
    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Generation time as ISO-8601 with milliseconds (`2024-01-01T00:00:00.000Z`)
    #[must_use]
    pub fn timestamp(&self) -> String {
        self.generated_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Base file name
    #[inline]
    #[must_use]
    pub fn base_name(&self) -> &str {
        &self.base_name
    }
}

/// A generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub content: String,
}

/// Code generator for one format
pub trait Exporter: Send + Sync {
    /// Format produced
    fn format(&self) -> ExportFormat;

    /// Generate the output files
    ///
    /// # Errors
    /// Serialization failures
    fn export(&self, graph: &SchemaGraph, ctx: &ExportContext) -> Result<Vec<ExportArtifact>, ExportError>;
}

/// Generator for a single-file format
pub trait TextExporter: Send + Sync {
    /// Format produced
    fn format(&self) -> ExportFormat;

    /// Generate the file content
    ///
    /// # Errors
    /// Serialization failures
    fn render(&self, graph: &SchemaGraph, ctx: &ExportContext) -> Result<String, ExportError>;
}

impl<T: TextExporter> Exporter for T {
    fn format(&self) -> ExportFormat {
        TextExporter::format(self)
    }

    fn export(&self, graph: &SchemaGraph, ctx: &ExportContext) -> Result<Vec<ExportArtifact>, ExportError> {
        let format = TextExporter::format(self);
        Ok(vec![ExportArtifact {
            file_name: format!("{}.{}", ctx.base_name(), format.extension()),
            content: self.render(graph, ctx)?,
        }])
    }
}

/// Generator for `format`
#[must_use]
pub fn exporter_for(format: ExportFormat) -> Box<dyn Exporter> {
    match format {
        ExportFormat::Json => Box::new(JsonExporter),
        ExportFormat::Sql => Box::new(SqlExporter),
        ExportFormat::Django => Box::new(DjangoExporter),
        ExportFormat::SqlAlchemy => Box::new(SqlAlchemyExporter),
        ExportFormat::CsvTemplate => Box::new(CsvTemplateExporter),
    }
}

/// Generate every file for `format`
///
/// # Errors
/// Serialization failures
pub fn export(format: ExportFormat, graph: &SchemaGraph, ctx: &ExportContext) -> Result<Vec<ExportArtifact>, ExportError> {
    let artifacts = exporter_for(format).export(graph, ctx)?;
    tracing::debug!(
        format = %format,
        masters = graph.master_count(),
        files = artifacts.len(),
        "export generated"
    );
    Ok(artifacts)
}

/// Generate a single-file format as text
///
/// # Errors
/// [`ExportError::MultiFile`] for the CSV templates, or serialization failures
pub fn generate_export(format: ExportFormat, graph: &SchemaGraph, ctx: &ExportContext) -> Result<String, ExportError> {
    match format {
        ExportFormat::Json => JsonExporter.render(graph, ctx),
        ExportFormat::Sql => SqlExporter.render(graph, ctx),
        ExportFormat::Django => DjangoExporter.render(graph, ctx),
        ExportFormat::SqlAlchemy => SqlAlchemyExporter.render(graph, ctx),
        ExportFormat::CsvTemplate => Err(ExportError::MultiFile(format.as_str())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn format_names_and_extensions() {
        for format in ExportFormat::ALL {
            assert_eq!(format.as_str().parse::<ExportFormat>().unwrap(), format);
        }
        assert_eq!(ExportFormat::Django.extension(), "py");
        assert_eq!(ExportFormat::SqlAlchemy.extension(), "py");
        assert!(matches!(
            "xml".parse::<ExportFormat>(),
            Err(ExportError::UnsupportedFormat(f)) if f == "xml"
        ));
    }

    #[test]
    fn context_timestamp_is_iso_millis() {
        let ctx = ExportContext::at(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
        assert_eq!(ctx.timestamp(), "2024-01-02T03:04:05.000Z");
        assert_eq!(ctx.base_name(), "schema");
        assert_eq!(ctx.clone().with_base_name("  ").base_name(), "schema");
        assert_eq!(ctx.with_base_name("hr").base_name(), "hr");
    }

    #[test]
    fn single_file_names_use_base_name() {
        let ctx = ExportContext::now().with_base_name("hr");
        let files = export(ExportFormat::Sql, &SchemaGraph::sample(), &ctx).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name, "hr.sql");
    }

    #[test]
    fn csv_is_not_single_text() {
        let err = generate_export(ExportFormat::CsvTemplate, &SchemaGraph::sample(), &ExportContext::now())
            .unwrap_err();
        assert!(matches!(err, ExportError::MultiFile("csv")));
    }
}
