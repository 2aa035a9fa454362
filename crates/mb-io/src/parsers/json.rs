//! JSON schema documents via serde_json

use crate::error::ParseError;
use crate::parsers::SchemaParser;
use serde_json::Value;

/// Parser for `.json` documents
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl SchemaParser for JsonParser {
    fn format_name(&self) -> &'static str {
        "JSON"
    }

    fn parse(&self, content: &str) -> Result<Value, ParseError> {
        serde_json::from_str(content).map_err(|e| ParseError::syntax("JSON", e.to_string()))
    }

    fn extensions(&self) -> &[&str] {
        &["json"]
    }
}
