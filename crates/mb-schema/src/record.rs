//! Persisted schema records as exchanged with the schema backend

use crate::graph::SchemaGraph;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Backend identifier of a schema record
pub type SchemaId = u64;

/// Tool name stamped into saved documents
pub const CREATED_WITH: &str = "Visual Master Builder";

/// Document format version stamped into saved documents
pub const DOCUMENT_VERSION: &str = "1.0";

/// Provenance attached to a saved graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaMetadata {
    pub created_with: String,
    pub version: String,
}

impl Default for SchemaMetadata {
    fn default() -> Self {
        Self {
            created_with: CREATED_WITH.to_string(),
            version: DOCUMENT_VERSION.to_string(),
        }
    }
}

/// The `schema_data` document: graph plus optional metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaData {
    #[serde(flatten)]
    pub graph: SchemaGraph,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SchemaMetadata>,
}

impl SchemaData {
    /// Wrap a graph with the default metadata
    #[must_use]
    pub fn stamped(graph: SchemaGraph) -> Self {
        Self {
            graph,
            metadata: Some(SchemaMetadata::default()),
        }
    }
}

/// User that created a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaOwner {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// A versioned schema snapshot stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaRecord {
    pub id: SchemaId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub schema_data: SchemaData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<SchemaOwner>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "first_version")]
    pub version: u32,
    #[serde(default = "active")]
    pub is_active: bool,
    #[serde(default)]
    pub master_count: usize,
    #[serde(default)]
    pub relationship_count: usize,
}

const fn first_version() -> u32 {
    1
}

const fn active() -> bool {
    true
}

impl SchemaRecord {
    /// The stored graph
    #[inline]
    #[must_use]
    pub fn graph(&self) -> &SchemaGraph {
        &self.schema_data.graph
    }
}

/// Body of a create or update request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveSchemaRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub schema_data: SchemaData,
}

impl SaveSchemaRequest {
    /// Request carrying `graph` with the default metadata
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, graph: SchemaGraph) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schema_data: SchemaData::stamped(graph),
        }
    }
}

/// A master already defined on the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterSummary {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default = "active")]
    pub is_active: bool,
    #[serde(default)]
    pub record_count: u64,
}
