//! Master, field and relationship definitions
//!
//! These types mirror the diagram document stored by the schema backend, so
//! their serde representation is part of the wire contract (camelCase field
//! attributes, dashed relationship kinds, SQL-style referential actions).

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Icon assigned to masters that do not specify one
pub const DEFAULT_ICON: &str = "📋";

/// Field data type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Email,
    Number,
    Uuid,
    Date,
    Datetime,
    Boolean,
    Json,
    Url,
}

impl FieldType {
    /// All supported types, in editor order
    pub const ALL: [FieldType; 9] = [
        Self::Text,
        Self::Email,
        Self::Number,
        Self::Uuid,
        Self::Date,
        Self::Datetime,
        Self::Boolean,
        Self::Json,
        Self::Url,
    ];

    /// Wire name of the type
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Number => "number",
            Self::Uuid => "uuid",
            Self::Date => "date",
            Self::Datetime => "datetime",
            Self::Boolean => "boolean",
            Self::Json => "json",
            Self::Url => "url",
        }
    }

    /// Date-like types (used by index suggestions)
    #[inline]
    #[must_use]
    pub const fn is_temporal(self) -> bool {
        matches!(self, Self::Date | Self::Datetime)
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("field type", s))
    }
}

/// Error returned when parsing an enum from its wire name fails
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: '{value}'")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }

    /// The rejected input
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A typed attribute of a master
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub is_foreign: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
}

impl Field {
    /// Create an optional, non-unique field labelled with its name
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            field_type,
            required: false,
            unique: false,
            is_primary: false,
            is_foreign: false,
            default_value: None,
            help_text: None,
            placeholder: None,
            min_length: None,
            max_length: None,
            min_value: None,
            max_value: None,
        }
    }

    /// The default `id` primary key given to new masters
    #[must_use]
    pub fn primary_id() -> Self {
        Self::new("id", FieldType::Uuid).with_label("ID").primary()
    }

    /// Mark as primary key (implies required and unique)
    #[must_use]
    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self.required = true;
        self.unique = true;
        self
    }

    /// Mark as required
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark as unique
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Mark as foreign key
    #[must_use]
    pub fn foreign(mut self) -> Self {
        self.is_foreign = true;
        self
    }

    /// With display label
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// With default value
    #[must_use]
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// With help text
    #[must_use]
    pub fn with_help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = Some(text.into());
        self
    }

    /// With maximum length
    #[must_use]
    pub fn with_max_length(mut self, max: u32) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Label to show, falling back to the name
    #[must_use]
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}

/// Relationship cardinality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RelationshipKind {
    #[serde(rename = "1-to-1")]
    OneToOne,
    #[default]
    #[serde(rename = "1-to-many")]
    OneToMany,
    #[serde(rename = "many-to-many")]
    ManyToMany,
}

impl RelationshipKind {
    /// Wire name of the kind
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneToOne => "1-to-1",
            Self::OneToMany => "1-to-many",
            Self::ManyToMany => "many-to-many",
        }
    }
}

impl Display for RelationshipKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1-to-1" => Ok(Self::OneToOne),
            "1-to-many" => Ok(Self::OneToMany),
            "many-to-many" => Ok(Self::ManyToMany),
            other => Err(UnknownVariant::new("relationship type", other)),
        }
    }
}

/// Referential action applied on delete/update of the referenced row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReferentialAction {
    #[default]
    #[serde(rename = "CASCADE")]
    Cascade,
    #[serde(rename = "SET NULL")]
    SetNull,
    #[serde(rename = "RESTRICT")]
    Restrict,
    #[serde(rename = "NO ACTION")]
    NoAction,
}

impl ReferentialAction {
    /// SQL spelling of the action
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::Restrict => "RESTRICT",
            Self::NoAction => "NO ACTION",
        }
    }
}

impl Display for ReferentialAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for ReferentialAction {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CASCADE" => Ok(Self::Cascade),
            "SET NULL" => Ok(Self::SetNull),
            "RESTRICT" => Ok(Self::Restrict),
            "NO ACTION" => Ok(Self::NoAction),
            other => Err(UnknownVariant::new("referential action", other)),
        }
    }
}

/// Relationship attributes carried on an edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub source_field: String,
    pub target_master: String,
    pub target_field: String,
    #[serde(rename = "type", default)]
    pub kind: RelationshipKind,
    #[serde(default)]
    pub on_delete: ReferentialAction,
    #[serde(default)]
    pub on_update: ReferentialAction,
    #[serde(default)]
    pub related_name: String,
}

impl Relationship {
    /// One-to-many relationship with cascading actions
    #[must_use]
    pub fn new(
        source_field: impl Into<String>,
        target_master: impl Into<String>,
        target_field: impl Into<String>,
    ) -> Self {
        Self {
            source_field: source_field.into(),
            target_master: target_master.into(),
            target_field: target_field.into(),
            kind: RelationshipKind::default(),
            on_delete: ReferentialAction::default(),
            on_update: ReferentialAction::default(),
            related_name: String::new(),
        }
    }

    /// With cardinality
    #[must_use]
    pub fn with_kind(mut self, kind: RelationshipKind) -> Self {
        self.kind = kind;
        self
    }

    /// With on-delete action
    #[must_use]
    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.on_delete = action;
        self
    }

    /// With on-update action
    #[must_use]
    pub fn on_update(mut self, action: ReferentialAction) -> Self {
        self.on_update = action;
        self
    }

    /// With reverse accessor name
    #[must_use]
    pub fn with_related_name(mut self, name: impl Into<String>) -> Self {
        self.related_name = name.into();
        self
    }
}

/// Editable master attributes (everything except the id and fields)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterSettings {
    pub display_name: String,
    pub icon: String,
    pub description: String,
    pub searchable: bool,
    pub exportable: bool,
    pub soft_delete: bool,
}

impl MasterSettings {
    /// Settings with the editor defaults
    #[must_use]
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            icon: DEFAULT_ICON.to_string(),
            description: String::new(),
            searchable: true,
            exportable: true,
            soft_delete: false,
        }
    }

    /// With icon
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// With description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// With soft-delete flag
    #[must_use]
    pub fn with_soft_delete(mut self, soft_delete: bool) -> Self {
        self.soft_delete = soft_delete;
        self
    }
}

/// Check a machine identifier: lowercase letter, then lowercase letters, digits or `_`
#[must_use]
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => chars
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_type_wire_names() {
        for t in FieldType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
            assert_eq!(t.as_str().parse::<FieldType>().unwrap(), t);
        }
        assert!("phone".parse::<FieldType>().is_err());
    }

    #[test]
    fn field_deserializes_with_defaults() {
        let field: Field = serde_json::from_str(r#"{"name": "code"}"#).unwrap();
        assert_eq!(field.field_type, FieldType::Text);
        assert!(!field.is_primary);
        assert!(field.label.is_empty());
        assert_eq!(field.display_label(), "code");
    }

    #[test]
    fn field_serializes_camel_case() {
        let field = Field::new("dept_id", FieldType::Uuid).foreign().with_max_length(36);
        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(value["isForeign"], true);
        assert_eq!(value["isPrimary"], false);
        assert_eq!(value["maxLength"], 36);
        assert_eq!(value["type"], "uuid");
        assert!(value.get("defaultValue").is_none());
    }

    #[test]
    fn primary_implies_required_and_unique() {
        let field = Field::primary_id();
        assert!(field.is_primary && field.required && field.unique);
        assert_eq!(field.label, "ID");
    }

    #[test]
    fn relationship_wire_format() {
        let rel = Relationship::new("dept_id", "departments", "id")
            .on_delete(ReferentialAction::SetNull)
            .with_kind(RelationshipKind::OneToOne);
        let value = serde_json::to_value(&rel).unwrap();
        assert_eq!(value["sourceField"], "dept_id");
        assert_eq!(value["type"], "1-to-1");
        assert_eq!(value["onDelete"], "SET NULL");
        assert_eq!(value["onUpdate"], "CASCADE");
    }

    #[test]
    fn referential_action_parse() {
        assert_eq!("NO ACTION".parse::<ReferentialAction>().unwrap(), ReferentialAction::NoAction);
        let err = "DROP".parse::<ReferentialAction>().unwrap_err();
        assert_eq!(err.value(), "DROP");
    }

    #[test]
    fn identifier_rules() {
        assert!(is_valid_identifier("employees"));
        assert!(is_valid_identifier("leave_type2"));
        assert!(!is_valid_identifier("Employees"));
        assert!(!is_valid_identifier("2fa"));
        assert!(!is_valid_identifier("first-name"));
        assert!(!is_valid_identifier(""));
    }
}
