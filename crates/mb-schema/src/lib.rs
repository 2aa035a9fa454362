//! Master Builder schema model
//!
//! User-defined tables ("masters"), their typed fields and the relationships
//! between them, held as an ordered node/edge graph whose JSON form is the
//! diagram document stored by the schema backend.
//!
//! # Core Concepts
//!
//! - [`SchemaGraph`]: nodes (masters) and edges (relationships) with editing operations
//! - [`Field`], [`Relationship`]: typed master attributes and foreign-key edges
//! - [`SchemaFingerprint`]: Blake3 digest used for unsaved-change detection
//! - [`EditorSession`]: graph under edit plus its saved baseline
//! - [`SchemaRecord`]: versioned snapshot as returned by the backend
//!
//! # Example
//!
//! ```rust
//! use mb_schema::prelude::*;
//!
//! let mut graph = SchemaGraph::new();
//! graph.add_master(MasterSpec::new("departments", "Departments")).unwrap();
//! graph.add_master(MasterSpec::new("employees", "Employees")).unwrap();
//! graph
//!     .add_field("employees", Field::new("dept_id", FieldType::Uuid).foreign())
//!     .unwrap();
//! graph
//!     .connect(
//!         Connection::new("employees", "dept_id", "departments", "id"),
//!         Relationship::new("dept_id", "departments", "id"),
//!     )
//!     .unwrap();
//! assert_eq!(graph.relationship_count(), 1);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod fingerprint;
mod graph;
mod handle;
mod layout;
mod model;
mod record;
mod sample;
mod session;

pub use error::{GraphError, GraphResult};
pub use fingerprint::{FingerprintError, SchemaFingerprint};
pub use graph::{
    Connection, MasterData, MasterNode, MasterSpec, MergeOutcome, MergePolicy, Position,
    RelationshipEdge, SchemaGraph, MASTER_NODE_TYPE, RELATIONSHIP_EDGE_TYPE,
};
pub use handle::{field_from_handle, source_handle, target_handle, DEFAULT_HANDLE_FIELD};
pub use layout::{auto_layout_position, next_free_slot};
pub use model::{
    is_valid_identifier, Field, FieldType, MasterSettings, ReferentialAction, Relationship,
    RelationshipKind, UnknownVariant, DEFAULT_ICON,
};
pub use record::{
    MasterSummary, SaveSchemaRequest, SchemaData, SchemaId, SchemaMetadata, SchemaOwner,
    SchemaRecord, CREATED_WITH, DOCUMENT_VERSION,
};
pub use sample::sample_graph;
pub use session::EditorSession;

/// Common imports
pub mod prelude {
    pub use crate::{
        Connection, EditorSession, Field, FieldType, GraphError, MasterSettings, MasterSpec,
        MergePolicy, Position, ReferentialAction, Relationship, RelationshipKind, SchemaGraph,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
