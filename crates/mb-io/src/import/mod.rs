//! Schema document import
//!
//! Import never fails on document problems: syntax errors, validation errors
//! and repair warnings are all collected in an [`ImportResult`]. Callers check
//! [`ImportResult::is_importable`] before applying it to an editor graph.
//!
//! ```rust
//! use mb_io::import::import_json;
//!
//! let result = import_json(r#"{"masters":[{"name":"employees","fields":[{"name":"id","isPrimary":true}]}]}"#);
//! assert!(result.is_importable());
//! assert_eq!(result.graph.master_count(), 1);
//! ```

use crate::error::{IoError, Result};
use crate::parsers::{default_parsers, JsonParser, ParserRegistry, SchemaParser, YamlParser};
use mb_schema::{MergeOutcome, MergePolicy, SchemaGraph};
use serde_json::Value;
use std::path::Path;

mod build;
mod raw;
mod validate;

pub use validate::{validate_document, Validation};

/// Graph built from a document plus everything noticed on the way
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportResult {
    pub graph: SchemaGraph,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ImportResult {
    fn rejected(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            graph: SchemaGraph::new(),
            errors,
            warnings,
        }
    }

    /// Check for no blocking errors
    #[inline]
    #[must_use]
    pub fn is_importable(&self) -> bool {
        self.errors.is_empty()
    }

    /// Imported master ids that already exist in `existing`
    #[must_use]
    pub fn duplicates_in(&self, existing: &SchemaGraph) -> Vec<String> {
        check_duplicates(&self.graph, existing)
    }

    /// Apply the imported graph to `target`
    ///
    /// # Errors
    /// [`IoError::ImportRejected`] when the result carries errors; `target` is untouched.
    pub fn apply(self, target: &mut SchemaGraph, mode: ImportMode) -> Result<MergeOutcome> {
        if !self.is_importable() {
            return Err(IoError::ImportRejected(self.errors));
        }
        let outcome = match mode {
            ImportMode::Replace => {
                let outcome = MergeOutcome {
                    added: self.graph.master_names().map(str::to_string).collect(),
                    edges_added: self.graph.relationship_count(),
                    ..MergeOutcome::default()
                };
                *target = self.graph;
                outcome
            }
            ImportMode::Merge(policy) => target.merge(self.graph, policy),
        };
        tracing::info!(
            added = outcome.added.len(),
            replaced = outcome.replaced.len(),
            skipped = outcome.skipped.len(),
            "import applied"
        );
        Ok(outcome)
    }
}

/// How an import is combined with the current graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// Discard the current graph
    #[default]
    Replace,
    /// Append to the current graph
    Merge(MergePolicy),
}

/// Ids of `imported` masters that already exist in `existing`
#[must_use]
pub fn check_duplicates(imported: &SchemaGraph, existing: &SchemaGraph) -> Vec<String> {
    existing.duplicates(imported)
}

/// Validate and convert an already parsed document
#[must_use]
pub fn import_document(doc: &Value) -> ImportResult {
    let validation = validate_document(doc);
    if !validation.is_valid() {
        tracing::debug!(errors = validation.errors.len(), "document rejected");
        return ImportResult::rejected(validation.errors, validation.warnings);
    }

    let graph = build::build_graph(doc);
    tracing::debug!(
        masters = graph.master_count(),
        relationships = graph.relationship_count(),
        warnings = validation.warnings.len(),
        "document imported"
    );
    ImportResult {
        graph,
        errors: Vec::new(),
        warnings: validation.warnings,
    }
}

/// Parse `content` with `parser`, then import it
#[must_use]
pub fn import_with(parser: &dyn SchemaParser, content: &str) -> ImportResult {
    match parser.parse(content) {
        Ok(doc) => import_document(&doc),
        Err(e) => ImportResult::rejected(vec![e.to_string()], Vec::new()),
    }
}

/// Import JSON text
#[must_use]
pub fn import_json(content: &str) -> ImportResult {
    import_with(&JsonParser, content)
}

/// Import YAML text
#[must_use]
pub fn import_yaml(content: &str) -> ImportResult {
    import_with(&YamlParser, content)
}

/// Obtain a graph from any supported document shape
///
/// Accepts a diagram graph (`{nodes, edges}`), a stored record with
/// `schema_data`, or an import document with `masters`.
#[must_use]
pub fn import_any(doc: &Value) -> ImportResult {
    let diagram = doc
        .get("schema_data")
        .filter(|d| d.get("nodes").is_some())
        .or_else(|| doc.get("nodes").map(|_| doc));

    match diagram {
        Some(d) => match serde_json::from_value::<SchemaGraph>(d.clone()) {
            Ok(graph) => ImportResult {
                graph,
                ..ImportResult::default()
            },
            Err(e) => ImportResult::rejected(vec![format!("Invalid diagram graph: {e}")], Vec::new()),
        },
        None => import_document(doc),
    }
}

/// File importer selecting the parser by extension
#[derive(Debug, Default)]
pub struct Importer {
    registry: ParserRegistry,
}

impl Importer {
    /// Importer with the JSON and YAML parsers
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: default_parsers(),
        }
    }

    /// Importer over a custom registry
    #[inline]
    #[must_use]
    pub fn with_registry(registry: ParserRegistry) -> Self {
        Self { registry }
    }

    /// Parse `content` as the format implied by `path`, accepting any document shape
    ///
    /// # Errors
    /// No parser registered for the extension; syntax errors land in the result
    pub fn import_str(&self, path: &Path, content: &str) -> Result<ImportResult> {
        let parser = self.registry.find_for_path(path).ok_or_else(|| {
            crate::error::ParseError::NoParserForExtension(
                path.extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or_default()
                    .to_string(),
            )
        })?;
        Ok(match parser.parse(content) {
            Ok(doc) => import_any(&doc),
            Err(e) => ImportResult::rejected(vec![e.to_string()], Vec::new()),
        })
    }

    /// Read and import a file
    ///
    /// # Errors
    /// Unreadable file or unknown extension
    pub fn import_file(&self, path: &Path) -> Result<ImportResult> {
        let content = std::fs::read_to_string(path).map_err(|e| IoError::read(path, e))?;
        self.import_str(path, &content)
    }
}
