//! YAML schema documents via serde_yaml
//!
//! The document shape is identical to JSON; only the first document of a
//! multi-document stream is read.

use crate::error::ParseError;
use crate::parsers::SchemaParser;
use serde_json::Value;

/// Parser for `.yaml` / `.yml` documents
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlParser;

impl SchemaParser for YamlParser {
    fn format_name(&self) -> &'static str {
        "YAML"
    }

    fn parse(&self, content: &str) -> Result<Value, ParseError> {
        serde_yaml::from_str(content).map_err(|e| ParseError::syntax("YAML", e.to_string()))
    }

    fn extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_maps_to_json_value() {
        let value = YamlParser
            .parse(
                "masters:\n  - name: employees\n    fields:\n      - name: id\n        isPrimary: true\n",
            )
            .unwrap();
        assert_eq!(value["masters"][0]["name"], "employees");
        assert_eq!(value["masters"][0]["fields"][0]["isPrimary"], true);
    }

    #[test]
    fn syntax_error_is_prefixed() {
        let err = YamlParser.parse("masters: [unclosed").unwrap_err();
        assert!(err.to_string().starts_with("Invalid YAML syntax: "));
    }
}
