//! Structural validation of import documents
//!
//! Works on the untyped document so every problem is reported in one pass.
//! Errors block the import; warnings describe how the importer will repair
//! the document.

use super::raw::{flag, has_field, text};
use mb_schema::{FieldType, ReferentialAction, RelationshipKind};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

const RELATIONSHIP_KEYS: [&str; 4] = ["source_master", "target_master", "source_field", "target_field"];

/// Accumulated validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Validation {
    /// Check for no blocking errors
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, message: String) {
        self.errors.push(message);
    }

    fn warn(&mut self, message: String) {
        self.warnings.push(message);
    }
}

/// Validate a parsed import document
#[must_use]
pub fn validate_document(doc: &Value) -> Validation {
    let mut v = Validation::default();

    let Some(masters) = doc.get("masters").and_then(Value::as_array) else {
        v.error(r#"Missing or invalid "masters" array"#.to_string());
        return v;
    };
    if masters.is_empty() {
        v.error("No masters found in JSON".to_string());
        return v;
    }

    let mut by_name: HashMap<&str, &Value> = HashMap::new();
    for (i, master) in masters.iter().enumerate() {
        let name = text(master, "name");
        let label = name.map_or_else(|| (i + 1).to_string(), str::to_string);
        match name {
            None => v.error(format!(r#"Master {}: Missing "name" field"#, i + 1)),
            Some(n) if by_name.contains_key(n) => {
                v.error(format!(r#"Master "{n}": Duplicate master name"#));
            }
            Some(n) => {
                by_name.insert(n, master);
            }
        }
        validate_fields(master, &label, &mut v);
    }

    match doc.get("relationships") {
        Some(Value::Array(rels)) => validate_relationships(rels, &by_name, &mut v),
        Some(Value::Null) | None => {}
        Some(_) => v.warn(r#""relationships" is not an array (ignored)"#.to_string()),
    }

    v
}

fn validate_fields(master: &Value, label: &str, v: &mut Validation) {
    let Some(fields) = master.get("fields").and_then(Value::as_array) else {
        v.error(format!(r#"Master "{label}": Missing or invalid "fields" array"#));
        return;
    };
    if fields.is_empty() {
        v.error(format!(r#"Master "{label}": No fields defined"#));
        return;
    }

    let primaries: Vec<&Value> = fields
        .iter()
        .filter(|f| flag(f, "isPrimary") == Some(true))
        .collect();
    match primaries.as_slice() {
        [] => v.warn(format!(
            r#"Master "{label}": No primary key defined (will use first field)"#
        )),
        [_] => {}
        [first, ..] => v.warn(format!(
            r#"Master "{label}": Multiple primary keys defined (keeping "{}")"#,
            text(first, "name").unwrap_or_default()
        )),
    }

    let mut seen = HashSet::new();
    for (j, field) in fields.iter().enumerate() {
        let Some(name) = text(field, "name") else {
            v.error(format!(r#"Master "{label}", Field {}: Missing "name""#, j + 1));
            continue;
        };
        if !seen.insert(name) {
            v.warn(format!(
                r#"Master "{label}": Duplicate field "{name}" (later one skipped)"#
            ));
            continue;
        }
        match text(field, "type") {
            None => v.warn(format!(
                r#"Master "{label}", Field "{name}": Missing type (will default to "text")"#
            )),
            Some(t) if t.parse::<FieldType>().is_err() => v.warn(format!(
                r#"Master "{label}", Field "{name}": Unknown type "{t}" (will default to "text")"#
            )),
            Some(_) => {}
        }
    }
}

fn validate_relationships(rels: &[Value], masters: &HashMap<&str, &Value>, v: &mut Validation) {
    for (i, rel) in rels.iter().enumerate() {
        let n = i + 1;
        for key in RELATIONSHIP_KEYS {
            if text(rel, key).is_none() {
                v.error(format!(r#"Relationship {n}: Missing "{key}""#));
            }
        }

        check_end(rel, n, "source", masters, v);
        check_end(rel, n, "target", masters, v);

        if let Some(kind) = text(rel, "type").or_else(|| text(rel, "relationship_type")) {
            if kind.parse::<RelationshipKind>().is_err() {
                v.warn(format!(
                    r#"Relationship {n}: Unknown type "{kind}" (will default to "1-to-many")"#
                ));
            }
        }
        for key in ["on_delete", "on_update"] {
            if let Some(action) = text(rel, key) {
                if action.parse::<ReferentialAction>().is_err() {
                    v.warn(format!(
                        r#"Relationship {n}: Unknown {key} action "{action}" (will default to "CASCADE")"#
                    ));
                }
            }
        }
    }
}

// `end` is "source" or "target".
fn check_end(rel: &Value, n: usize, end: &str, masters: &HashMap<&str, &Value>, v: &mut Validation) {
    let Some(master) = text(rel, &format!("{end}_master")) else {
        return;
    };
    let title = if end == "source" { "Source" } else { "Target" };
    match masters.get(master) {
        None => v.warn(format!(
            r#"Relationship: {title} master "{master}" not found in imported masters"#
        )),
        Some(doc) => {
            if let Some(field) = text(rel, &format!("{end}_field")) {
                if !has_field(doc, field) {
                    v.warn(format!(
                        r#"Relationship {n}: {title} field "{field}" not found on master "{master}""#
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_masters_short_circuits() {
        let v = validate_document(&json!({"relationships": []}));
        assert_eq!(v.errors, vec![r#"Missing or invalid "masters" array"#]);
        let v = validate_document(&json!({"masters": {}}));
        assert_eq!(v.errors.len(), 1);
        let v = validate_document(&json!({"masters": []}));
        assert_eq!(v.errors, vec!["No masters found in JSON"]);
    }

    #[test]
    fn master_and_field_errors_accumulate() {
        let v = validate_document(&json!({
            "masters": [
                {"fields": [{"name": "id", "isPrimary": true}]},
                {"name": "teams"},
                {"name": "empty", "fields": []},
                {"name": "people", "fields": [{"type": "text"}, {"name": "id", "isPrimary": true}]}
            ]
        }));
        assert_eq!(
            v.errors,
            vec![
                r#"Master 1: Missing "name" field"#,
                r#"Master "teams": Missing or invalid "fields" array"#,
                r#"Master "empty": No fields defined"#,
                r#"Master "people", Field 1: Missing "name""#,
            ]
        );
    }

    #[test]
    fn repairs_are_warnings() {
        let v = validate_document(&json!({
            "masters": [
                {"name": "a", "fields": [{"name": "code"}, {"name": "kind", "type": "phone"}]},
                {"name": "b", "fields": [
                    {"name": "x", "type": "uuid", "isPrimary": true},
                    {"name": "y", "type": "uuid", "isPrimary": true},
                    {"name": "y", "type": "text"}
                ]}
            ]
        }));
        assert!(v.is_valid());
        assert!(v.warnings.contains(&r#"Master "a": No primary key defined (will use first field)"#.to_string()));
        assert!(v.warnings.contains(&r#"Master "a", Field "code": Missing type (will default to "text")"#.to_string()));
        assert!(v.warnings.contains(&r#"Master "a", Field "kind": Unknown type "phone" (will default to "text")"#.to_string()));
        assert!(v.warnings.contains(&r#"Master "b": Multiple primary keys defined (keeping "x")"#.to_string()));
        assert!(v.warnings.contains(&r#"Master "b": Duplicate field "y" (later one skipped)"#.to_string()));
    }

    #[test]
    fn duplicate_master_name_blocks_import() {
        let v = validate_document(&json!({
            "masters": [
                {"name": "a", "fields": [{"name": "id", "isPrimary": true}]},
                {"name": "a", "fields": [{"name": "id", "isPrimary": true}]}
            ]
        }));
        assert_eq!(v.errors, vec![r#"Master "a": Duplicate master name"#]);
    }

    #[test]
    fn relationship_checks() {
        let v = validate_document(&json!({
            "masters": [
                {"name": "employees", "fields": [{"name": "id", "type": "uuid", "isPrimary": true}]}
            ],
            "relationships": [
                {"source_master": "employees", "source_field": "dept_id",
                 "target_master": "departments", "target_field": "id", "type": "n-to-m"},
                {"source_master": "employees"}
            ]
        }));
        assert_eq!(
            v.errors,
            vec![
                r#"Relationship 2: Missing "target_master""#,
                r#"Relationship 2: Missing "source_field""#,
                r#"Relationship 2: Missing "target_field""#,
            ]
        );
        assert!(v.warnings.contains(&r#"Relationship: Target master "departments" not found in imported masters"#.to_string()));
        assert!(v.warnings.contains(&r#"Relationship 1: Source field "dept_id" not found on master "employees""#.to_string()));
        assert!(v.warnings.contains(&r#"Relationship 1: Unknown type "n-to-m" (will default to "1-to-many")"#.to_string()));
    }
}
