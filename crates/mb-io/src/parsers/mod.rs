//! Document parsers for schema files
//!
//! Each parser turns file text into a [`serde_json::Value`] that the importer
//! validates. Parsers are selected by file extension through a
//! [`ParserRegistry`].

use crate::error::ParseError;
use serde_json::Value;
use std::path::Path;

mod json;
mod yaml;

pub use json::JsonParser;
pub use yaml::YamlParser;

/// Parser trait for converting schema file text into a document value
///
/// Implement this trait to add support for new file formats.
pub trait SchemaParser: Send + Sync + 'static {
    /// Human-readable format name used in syntax errors
    fn format_name(&self) -> &'static str;

    /// Parse content string into a document value
    ///
    /// # Errors
    /// [`ParseError::Syntax`] for malformed input
    fn parse(&self, content: &str) -> Result<Value, ParseError>;

    /// Supported file extensions (without dot)
    fn extensions(&self) -> &[&str];

    /// Check if this parser can handle the given path
    fn can_parse(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.extensions()
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
    }

    /// Parser priority (higher = tried first when multiple parsers match)
    fn priority(&self) -> i32 {
        0
    }
}

/// Extension-keyed collection of parsers
pub struct ParserRegistry {
    parsers: Vec<Box<dyn SchemaParser>>,
}

impl Default for ParserRegistry {
    fn default() -> Self {
        default_parsers()
    }
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("parser_count", &self.parsers.len())
            .field("extensions", &self.all_extensions())
            .finish()
    }
}

impl ParserRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Register a parser
    pub fn register<P: SchemaParser>(&mut self, parser: P) {
        self.parsers.push(Box::new(parser));
        self.parsers
            .sort_by_key(|p| std::cmp::Reverse(p.priority()));
    }

    /// Find parser for path
    #[must_use]
    pub fn find_for_path(&self, path: &Path) -> Option<&dyn SchemaParser> {
        self.parsers.iter().find(|p| p.can_parse(path)).map(|p| &**p)
    }

    /// Parse `content` with the parser registered for `path`'s extension
    ///
    /// # Errors
    /// No matching parser, or a syntax error from the parser
    pub fn parse_for_path(&self, path: &Path, content: &str) -> Result<Value, ParseError> {
        let parser = self.find_for_path(path).ok_or_else(|| {
            ParseError::NoParserForExtension(
                path.extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or_default()
                    .to_string(),
            )
        })?;
        tracing::debug!(path = %path.display(), format = parser.format_name(), "parsing document");
        parser.parse(content)
    }

    /// Get all registered extensions
    #[must_use]
    pub fn all_extensions(&self) -> Vec<&str> {
        self.parsers
            .iter()
            .flat_map(|p| p.extensions())
            .copied()
            .collect()
    }
}

/// Create default parser registry with the JSON and YAML parsers
#[inline]
#[must_use]
pub fn default_parsers() -> ParserRegistry {
    let mut registry = ParserRegistry::new();
    registry.register(JsonParser);
    registry.register(YamlParser);
    registry
}
