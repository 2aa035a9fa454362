//! Master Builder suggestion wizard
//!
//! Proposes foreign keys and indexes for a new master by matching its field
//! names against fixed rule tables:
//!
//! - [`rules`]: the built-in relationship and index tables
//! - [`Suggester`]: first-match evaluation over (possibly extended) tables
//! - [`WizardPlan`]: review state and the final creation payload
//!
//! # Example
//!
//! ```rust
//! use mb_wizard::WizardPlan;
//!
//! let mut plan = WizardPlan::from_json(
//!     r#"{"name": "employees", "fields": [{"name": "department_id", "type": "uuid"}]}"#,
//! ).unwrap();
//! assert_eq!(plan.relationships()[0].suggested_master, "departments");
//! plan.toggle_index(0).unwrap();
//! assert_eq!(plan.finalize().unwrap()["indexes"].as_array().unwrap().len(), 0);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod plan;
pub mod rules;
mod suggest;

pub use error::WizardError;
pub use plan::WizardPlan;
pub use rules::{Confidence, IndexType, Priority};
pub use suggest::{
    suggest_indexes, suggest_relationships, IndexSuggestion, RelationshipSuggestion, Suggester,
    Suggestions, WizardField,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Confidence, Priority, Suggester, WizardError, WizardPlan};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
