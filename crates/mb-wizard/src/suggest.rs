//! Rule evaluation

use crate::rules::{
    Confidence, IndexCondition, IndexRule, IndexType, Priority, RelationshipRule, INDEX_RULES,
    RELATIONSHIP_RULES,
};
use mb_schema::{Field, FieldType, MasterNode};
use serde::{Deserialize, Serialize};

/// The parts of a field the rules look at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardField {
    pub name: String,
    pub field_type: FieldType,
    pub unique: bool,
}

impl WizardField {
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            unique: false,
        }
    }

    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

impl From<&Field> for WizardField {
    fn from(field: &Field) -> Self {
        Self {
            name: field.name.clone(),
            field_type: field.field_type,
            unique: field.unique,
        }
    }
}

/// Proposed foreign key for one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipSuggestion {
    pub field_index: usize,
    pub field_name: String,
    pub suggested_master: String,
    pub suggested_field: String,
    pub confidence: Confidence,
    pub reason: String,
}

/// Proposed index for one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSuggestion {
    pub field_name: String,
    pub index_type: IndexType,
    pub reason: String,
    pub priority: Priority,
    pub accepted: bool,
}

/// Both suggestion lists for a master
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestions {
    pub relationships: Vec<RelationshipSuggestion>,
    pub indexes: Vec<IndexSuggestion>,
}

/// Ordered rule tables and the first-match engine over them
#[derive(Debug, Clone)]
pub struct Suggester {
    relationship_rules: Vec<RelationshipRule>,
    index_rules: Vec<IndexRule>,
}

impl Default for Suggester {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Suggester {
    /// Engine with no rules
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self {
            relationship_rules: Vec::new(),
            index_rules: Vec::new(),
        }
    }

    /// Engine over the built-in tables
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            relationship_rules: RELATIONSHIP_RULES.to_vec(),
            index_rules: INDEX_RULES.to_vec(),
        }
    }

    /// Append a relationship rule after the existing ones
    #[must_use]
    pub fn with_relationship_rule(mut self, rule: RelationshipRule) -> Self {
        self.relationship_rules.push(rule);
        self
    }

    /// Append an index rule after the existing ones
    #[must_use]
    pub fn with_index_rule(mut self, rule: IndexRule) -> Self {
        self.index_rules.push(rule);
        self
    }

    #[inline]
    #[must_use]
    pub fn relationship_rules(&self) -> &[RelationshipRule] {
        &self.relationship_rules
    }

    #[inline]
    #[must_use]
    pub fn index_rules(&self) -> &[IndexRule] {
        &self.index_rules
    }

    /// At most one relationship suggestion per field, in field order
    #[must_use]
    pub fn suggest_relationships(&self, fields: &[WizardField]) -> Vec<RelationshipSuggestion> {
        fields
            .iter()
            .enumerate()
            .filter_map(|(index, field)| {
                let name = field.name.to_lowercase();
                let rule = self.relationship_rules.iter().find(|r| r.name.matches(&name))?;
                let (suggested_master, suggested_field) = rule.target.resolve(&name);
                Some(RelationshipSuggestion {
                    field_index: index,
                    field_name: field.name.clone(),
                    suggested_master,
                    suggested_field,
                    confidence: rule.confidence,
                    reason: rule.reason.to_string(),
                })
            })
            .collect()
    }

    /// At most one index suggestion per field, in field order
    #[must_use]
    pub fn suggest_indexes(&self, fields: &[WizardField]) -> Vec<IndexSuggestion> {
        fields
            .iter()
            .filter_map(|field| {
                let name = field.name.to_lowercase();
                let rule = self.index_rules.iter().find(|r| match r.condition {
                    IndexCondition::Unique => field.unique,
                    IndexCondition::FieldType(types) => types.contains(&field.field_type),
                    IndexCondition::Name(m) => m.matches(&name),
                })?;
                Some(IndexSuggestion {
                    field_name: field.name.clone(),
                    index_type: rule.index_type,
                    reason: rule.reason.to_string(),
                    priority: rule.priority,
                    accepted: rule.accepted,
                })
            })
            .collect()
    }

    #[must_use]
    pub fn suggest(&self, fields: &[WizardField]) -> Suggestions {
        let suggestions = Suggestions {
            relationships: self.suggest_relationships(fields),
            indexes: self.suggest_indexes(fields),
        };
        tracing::debug!(
            fields = fields.len(),
            relationships = suggestions.relationships.len(),
            indexes = suggestions.indexes.len(),
            "suggestions computed"
        );
        suggestions
    }

    /// Suggestions for a master already on the canvas
    #[must_use]
    pub fn suggest_for_node(&self, node: &MasterNode) -> Suggestions {
        let fields: Vec<WizardField> = node.fields().iter().map(WizardField::from).collect();
        self.suggest(&fields)
    }
}

/// Relationship suggestions from the built-in rules
#[must_use]
pub fn suggest_relationships(fields: &[WizardField]) -> Vec<RelationshipSuggestion> {
    Suggester::builtin().suggest_relationships(fields)
}

/// Index suggestions from the built-in rules
#[must_use]
pub fn suggest_indexes(fields: &[WizardField]) -> Vec<IndexSuggestion> {
    Suggester::builtin().suggest_indexes(fields)
}
