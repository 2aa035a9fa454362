//! Wizard error types

/// Errors raised while building or editing a [`WizardPlan`](crate::WizardPlan)
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    /// Input text is not JSON
    #[error("Invalid JSON format: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Input is JSON but not an object
    #[error("master document must be a JSON object")]
    NotAnObject,

    /// `fields` is present but not an array
    #[error(r#"master document "fields" must be an array"#)]
    FieldsNotArray,

    /// A field entry has no usable name
    #[error("field {index} has no name")]
    FieldWithoutName { index: usize },

    /// Index into the relationship suggestions is out of bounds
    #[error("no relationship suggestion at position {0}")]
    NoSuchRelationship(usize),

    /// Index into the index suggestions is out of bounds
    #[error("no index suggestion at position {0}")]
    NoSuchIndex(usize),

    /// Suggestions could not be encoded into the creation payload
    #[error("cannot build creation payload: {0}")]
    Payload(#[source] serde_json::Error),

    /// Suggested targets are not among the existing masters
    #[error("unknown relationship target(s): {}", .0.join(", "))]
    UnknownTargets(Vec<String>),
}

impl WizardError {
    /// Check whether the error concerns the input document
    #[inline]
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidJson(_) | Self::NotAnObject | Self::FieldsNotArray | Self::FieldWithoutName { .. }
        )
    }
}
