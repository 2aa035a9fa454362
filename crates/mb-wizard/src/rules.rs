//! Built-in suggestion rule tables
//!
//! Rules are plain data evaluated by [`Suggester`](crate::Suggester) in table
//! order; the first matching rule wins for each field. Name patterns are
//! matched against the lowercased field name.

use mb_schema::FieldType;
use serde::{Deserialize, Serialize};

/// One test against a lowercased field name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamePattern {
    Contains(&'static str),
    EndsWith(&'static str),
    Exact(&'static str),
}

impl NamePattern {
    #[inline]
    #[must_use]
    pub fn matches(self, name: &str) -> bool {
        match self {
            Self::Contains(s) => name.contains(s),
            Self::EndsWith(s) => name.ends_with(s),
            Self::Exact(s) => name == s,
        }
    }
}

/// Combination of name patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatch {
    /// Every pattern must match
    All(&'static [NamePattern]),
    /// At least one pattern must match
    Any(&'static [NamePattern]),
}

impl NameMatch {
    #[must_use]
    pub fn matches(self, name: &str) -> bool {
        match self {
            Self::All(patterns) => patterns.iter().all(|p| p.matches(name)),
            Self::Any(patterns) => patterns.iter().any(|p| p.matches(name)),
        }
    }
}

/// How sure a relationship rule is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
}

impl Confidence {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
        }
    }
}

/// How much an index is expected to help
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
}

impl Priority {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
        }
    }
}

/// Kind of index to create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexType {
    Unique,
    Btree,
}

impl IndexType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unique => "unique",
            Self::Btree => "btree",
        }
    }
}

/// Where a relationship rule points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A fixed master and field
    Fixed {
        master: &'static str,
        field: &'static str,
    },
    /// Lookup table derived from the field name, keyed by `id`
    Lookup,
}

impl Target {
    /// Resolve the `(master, field)` pair for a lowercased field name
    #[must_use]
    pub fn resolve(self, name: &str) -> (String, String) {
        match self {
            Self::Fixed { master, field } => (master.to_string(), field.to_string()),
            Self::Lookup => (lookup_master(name), "id".to_string()),
        }
    }
}

/// `leave_type` → `leaves`, `asset_category` → `asset_categories`
///
/// Only the first occurrence of each suffix is rewritten.
#[must_use]
pub fn lookup_master(name: &str) -> String {
    name.replacen("_type", "s", 1)
        .replacen("_category", "_categories", 1)
}

/// Field-name rule proposing a foreign key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationshipRule {
    pub name: NameMatch,
    pub target: Target,
    pub confidence: Confidence,
    pub reason: &'static str,
}

/// What an index rule looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexCondition {
    /// Field is marked unique
    Unique,
    /// Field type is one of these
    FieldType(&'static [FieldType]),
    /// Field name matches
    Name(NameMatch),
}

/// Rule proposing an index on a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRule {
    pub condition: IndexCondition,
    pub index_type: IndexType,
    pub priority: Priority,
    pub accepted: bool,
    pub reason: &'static str,
}

use NamePattern::{Contains, EndsWith, Exact};

/// Foreign-key rules for the common HR entities
pub const RELATIONSHIP_RULES: &[RelationshipRule] = &[
    RelationshipRule {
        name: NameMatch::All(&[Contains("department"), Contains("id")]),
        target: Target::Fixed { master: "departments", field: "id" },
        confidence: Confidence::High,
        reason: r#"Field name contains "department_id""#,
    },
    RelationshipRule {
        name: NameMatch::All(&[Contains("location"), Contains("id")]),
        target: Target::Fixed { master: "locations", field: "id" },
        confidence: Confidence::High,
        reason: r#"Field name contains "location_id""#,
    },
    RelationshipRule {
        name: NameMatch::All(&[Contains("employee"), Contains("id")]),
        target: Target::Fixed { master: "members", field: "member_id" },
        confidence: Confidence::High,
        reason: "Field name suggests employee reference",
    },
    RelationshipRule {
        name: NameMatch::Any(&[Contains("manager"), Contains("supervisor")]),
        target: Target::Fixed { master: "members", field: "member_id" },
        confidence: Confidence::Medium,
        reason: "Field name suggests manager/supervisor",
    },
    RelationshipRule {
        name: NameMatch::All(&[Contains("project"), Contains("id")]),
        target: Target::Fixed { master: "projects", field: "project_id" },
        confidence: Confidence::High,
        reason: "Field name suggests project reference",
    },
    RelationshipRule {
        name: NameMatch::Any(&[EndsWith("_type"), EndsWith("_category")]),
        target: Target::Lookup,
        confidence: Confidence::Medium,
        reason: "Field name suggests lookup relationship",
    },
];

/// Index rules for lookup, join and filter columns
pub const INDEX_RULES: &[IndexRule] = &[
    IndexRule {
        condition: IndexCondition::Unique,
        index_type: IndexType::Unique,
        priority: Priority::High,
        accepted: true,
        reason: "Field is marked as unique",
    },
    IndexRule {
        condition: IndexCondition::FieldType(&[FieldType::Email]),
        index_type: IndexType::Btree,
        priority: Priority::High,
        accepted: true,
        reason: "Email fields are frequently used in lookups",
    },
    IndexRule {
        condition: IndexCondition::Name(NameMatch::Any(&[Contains("_id"), EndsWith("id")])),
        index_type: IndexType::Btree,
        priority: Priority::High,
        accepted: true,
        reason: "Foreign key field for JOIN operations",
    },
    IndexRule {
        condition: IndexCondition::Name(NameMatch::Any(&[
            Contains("status"),
            Contains("type"),
            Contains("category"),
        ])),
        index_type: IndexType::Btree,
        priority: Priority::Medium,
        accepted: true,
        reason: "Frequently used in WHERE clauses",
    },
    IndexRule {
        condition: IndexCondition::FieldType(&[FieldType::Date, FieldType::Datetime]),
        index_type: IndexType::Btree,
        priority: Priority::Medium,
        accepted: false,
        reason: "Date fields used in range queries",
    },
    IndexRule {
        condition: IndexCondition::Name(NameMatch::Any(&[Exact("code"), EndsWith("_code")])),
        index_type: IndexType::Btree,
        priority: Priority::High,
        accepted: true,
        reason: "Code fields used for lookups",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_names() {
        assert_eq!(lookup_master("leave_type"), "leaves");
        assert_eq!(lookup_master("asset_category"), "asset_categories");
        assert_eq!(lookup_master("type_of_leave_type"), "type_of_leaves");
    }

    #[test]
    fn name_matching() {
        let fk = NameMatch::All(&[Contains("department"), Contains("id")]);
        assert!(fk.matches("department_id"));
        assert!(fk.matches("iddepartment"));
        assert!(!fk.matches("department"));
        let code = NameMatch::Any(&[Exact("code"), EndsWith("_code")]);
        assert!(code.matches("code") && code.matches("zip_code"));
        assert!(!code.matches("codes"));
    }
}
