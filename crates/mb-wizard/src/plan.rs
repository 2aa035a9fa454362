//! Editable wizard state for one new master
//!
//! A plan is built from a master document, reviewed (index toggles,
//! relationship edits, target checks) and finalised into the payload sent to
//! `POST masters/`.

use crate::error::WizardError;
use crate::suggest::{IndexSuggestion, RelationshipSuggestion, Suggester, Suggestions, WizardField};
use mb_schema::{FieldType, MasterSummary};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Master document plus the suggestions being reviewed
#[derive(Debug, Clone, PartialEq)]
pub struct WizardPlan {
    master: Map<String, Value>,
    fields: Vec<WizardField>,
    suggestions: Suggestions,
}

fn read_fields(master: &Map<String, Value>) -> Result<Vec<WizardField>, WizardError> {
    let raw = match master.get("fields") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(raw)) => raw,
        Some(_) => return Err(WizardError::FieldsNotArray),
    };
    raw.iter()
        .enumerate()
        .map(|(i, f)| {
            let name = f
                .get("name")
                .and_then(Value::as_str)
                .filter(|n| !n.is_empty())
                .ok_or(WizardError::FieldWithoutName { index: i + 1 })?;
            let field_type = f
                .get("type")
                .and_then(Value::as_str)
                .and_then(|t| t.parse::<FieldType>().ok())
                .unwrap_or_default();
            let unique = f.get("unique").and_then(Value::as_bool).unwrap_or(false);
            Ok(WizardField {
                name: name.to_string(),
                field_type,
                unique,
            })
        })
        .collect()
}

impl WizardPlan {
    /// Plan over the built-in rules
    ///
    /// # Errors
    /// The text is not a JSON object with named fields
    pub fn from_json(text: &str) -> Result<Self, WizardError> {
        Self::from_document(serde_json::from_str(text)?)
    }

    /// # Errors
    /// The value is not an object, or a field has no name
    pub fn from_document(doc: Value) -> Result<Self, WizardError> {
        Self::with_suggester(doc, &Suggester::builtin())
    }

    /// # Errors
    /// The value is not an object, or a field has no name
    pub fn with_suggester(doc: Value, suggester: &Suggester) -> Result<Self, WizardError> {
        let Value::Object(master) = doc else {
            return Err(WizardError::NotAnObject);
        };
        let fields = read_fields(&master)?;
        let suggestions = suggester.suggest(&fields);
        Ok(Self {
            master,
            fields,
            suggestions,
        })
    }

    #[must_use]
    pub fn master_name(&self) -> Option<&str> {
        self.master.get("name").and_then(Value::as_str)
    }

    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[WizardField] {
        &self.fields
    }

    #[inline]
    #[must_use]
    pub fn relationships(&self) -> &[RelationshipSuggestion] {
        &self.suggestions.relationships
    }

    #[inline]
    #[must_use]
    pub fn indexes(&self) -> &[IndexSuggestion] {
        &self.suggestions.indexes
    }

    /// Indexes that will be created
    pub fn accepted_indexes(&self) -> impl Iterator<Item = &IndexSuggestion> {
        self.suggestions.indexes.iter().filter(|i| i.accepted)
    }

    /// Flip acceptance of the `i`-th index, returning the new state
    ///
    /// # Errors
    /// [`WizardError::NoSuchIndex`]
    pub fn toggle_index(&mut self, i: usize) -> Result<bool, WizardError> {
        let index = self
            .suggestions
            .indexes
            .get_mut(i)
            .ok_or(WizardError::NoSuchIndex(i))?;
        index.accepted = !index.accepted;
        Ok(index.accepted)
    }

    /// # Errors
    /// [`WizardError::NoSuchIndex`]
    pub fn set_index_accepted(&mut self, i: usize, accepted: bool) -> Result<(), WizardError> {
        self.suggestions
            .indexes
            .get_mut(i)
            .ok_or(WizardError::NoSuchIndex(i))?
            .accepted = accepted;
        Ok(())
    }

    /// Point the `i`-th relationship at another master and field
    ///
    /// # Errors
    /// [`WizardError::NoSuchRelationship`]
    pub fn retarget_relationship(
        &mut self,
        i: usize,
        master: impl Into<String>,
        field: impl Into<String>,
    ) -> Result<(), WizardError> {
        let rel = self
            .suggestions
            .relationships
            .get_mut(i)
            .ok_or(WizardError::NoSuchRelationship(i))?;
        rel.suggested_master = master.into();
        rel.suggested_field = field.into();
        Ok(())
    }

    /// Drop the `i`-th relationship suggestion
    ///
    /// # Errors
    /// [`WizardError::NoSuchRelationship`]
    pub fn remove_relationship(&mut self, i: usize) -> Result<RelationshipSuggestion, WizardError> {
        if i >= self.suggestions.relationships.len() {
            return Err(WizardError::NoSuchRelationship(i));
        }
        Ok(self.suggestions.relationships.remove(i))
    }

    /// Suggested target masters missing from `available`, deduplicated in order
    #[must_use]
    pub fn unknown_targets(&self, available: &[MasterSummary]) -> Vec<String> {
        let known: HashSet<&str> = available.iter().map(|m| m.name.as_str()).collect();
        let mut seen = HashSet::new();
        self.suggestions
            .relationships
            .iter()
            .map(|r| r.suggested_master.as_str())
            .filter(|m| !known.contains(m) && seen.insert(*m))
            .map(str::to_string)
            .collect()
    }

    /// # Errors
    /// [`WizardError::UnknownTargets`] listing every missing master
    pub fn check_targets(&self, available: &[MasterSummary]) -> Result<(), WizardError> {
        let unknown = self.unknown_targets(available);
        if unknown.is_empty() {
            Ok(())
        } else {
            tracing::warn!(count = unknown.len(), "relationship targets not found on backend");
            Err(WizardError::UnknownTargets(unknown))
        }
    }

    /// Creation payload: the master document with `relationships` and the
    /// accepted `indexes` attached
    ///
    /// # Errors
    /// [`WizardError::Payload`] when a suggestion cannot be encoded
    pub fn finalize(&self) -> Result<Value, WizardError> {
        let relationships =
            serde_json::to_value(&self.suggestions.relationships).map_err(WizardError::Payload)?;
        let accepted: Vec<&IndexSuggestion> = self.accepted_indexes().collect();
        let indexes = serde_json::to_value(accepted).map_err(WizardError::Payload)?;

        let mut payload = self.master.clone();
        payload.insert("relationships".to_string(), relationships);
        payload.insert("indexes".to_string(), indexes);
        Ok(Value::Object(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn malformed_documents_are_rejected() {
        assert!(matches!(WizardPlan::from_json("{oops"), Err(WizardError::InvalidJson(_))));
        assert!(matches!(WizardPlan::from_document(json!([1])), Err(WizardError::NotAnObject)));
        assert!(matches!(
            WizardPlan::from_document(json!({"fields": {}})),
            Err(WizardError::FieldsNotArray)
        ));
        assert!(matches!(
            WizardPlan::from_document(json!({"fields": [{"name": "a"}, {"type": "text"}]})),
            Err(WizardError::FieldWithoutName { index: 2 })
        ));
    }

    #[test]
    fn missing_fields_yield_no_suggestions() {
        let plan = WizardPlan::from_document(json!({"name": "empty"})).unwrap();
        assert!(plan.relationships().is_empty() && plan.indexes().is_empty());
        assert_eq!(plan.master_name(), Some("empty"));
    }

    #[test]
    fn edits_are_bounds_checked() {
        let mut plan = WizardPlan::from_document(json!({"fields": [{"name": "code"}]})).unwrap();
        assert!(!plan.toggle_index(0).unwrap());
        assert!(matches!(plan.toggle_index(1), Err(WizardError::NoSuchIndex(1))));
        assert!(matches!(plan.remove_relationship(0), Err(WizardError::NoSuchRelationship(0))));
        assert!(plan.retarget_relationship(3, "a", "b").is_err());
    }

    #[test]
    fn finalize_keeps_unknown_keys() {
        let plan = WizardPlan::from_document(json!({
            "name": "assets", "table_name": "dm_assets",
            "fields": [{"name": "asset_type"}]
        }))
        .unwrap();
        let payload = plan.finalize().unwrap();
        assert_eq!(payload["table_name"], "dm_assets");
        assert_eq!(payload["relationships"][0]["suggestedMaster"], "assets");
        assert_eq!(payload["indexes"][0]["indexType"], "btree");
    }

    #[test]
    fn finalize_without_suggestions_attaches_empty_lists() {
        let plan = WizardPlan::from_document(json!({"name": "notes", "fields": [{"name": "body"}]})).unwrap();
        let payload = plan.finalize().unwrap();
        assert_eq!(payload["relationships"], json!([]));
        assert_eq!(payload["indexes"], json!([]));
    }
}
