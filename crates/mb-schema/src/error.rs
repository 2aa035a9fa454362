//! Error types for graph editing
//!
//! Every editing operation either fully applies or returns one of these
//! without touching the graph.

/// Errors raised by [`SchemaGraph`](crate::SchemaGraph) editing operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// No node with this id
    #[error("master not found: '{0}'")]
    MasterNotFound(String),

    /// A node with this id already exists
    #[error("master already exists: '{0}'")]
    MasterExists(String),

    /// Named field is not defined on the master
    #[error("field '{field}' not found on master '{master}'")]
    FieldNotFound { master: String, field: String },

    /// Field name already used on the master
    #[error("field '{field}' already exists on master '{master}'")]
    FieldExists { master: String, field: String },

    /// A second primary key was requested
    #[error("only one primary key allowed per master: '{master}' already has '{existing}'")]
    DuplicatePrimary { master: String, existing: String },

    /// Primary keys cannot be removed
    #[error("cannot delete primary key field '{field}' of master '{master}'")]
    PrimaryKeyDeletion { master: String, field: String },

    /// No edge with this id
    #[error("relationship not found: '{0}'")]
    RelationshipNotFound(String),

    /// Name violates the identifier rules
    #[error("invalid {kind} name '{name}': must start with a lowercase letter and contain only lowercase letters, numbers, and underscores")]
    InvalidIdentifier { kind: &'static str, name: String },

    /// Required display text is empty
    #[error("{0} is required")]
    MissingLabel(&'static str),
}

impl GraphError {
    /// Create field-not-found error
    pub fn field_not_found(master: impl Into<String>, field: impl Into<String>) -> Self {
        Self::FieldNotFound {
            master: master.into(),
            field: field.into(),
        }
    }
}

/// Result type alias for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = GraphError::PrimaryKeyDeletion {
            master: "employees".into(),
            field: "id".into(),
        };
        assert_eq!(
            err.to_string(),
            "cannot delete primary key field 'id' of master 'employees'"
        );

        let err = GraphError::field_not_found("employees", "dept_id");
        assert!(err.to_string().contains("dept_id"));
    }
}
