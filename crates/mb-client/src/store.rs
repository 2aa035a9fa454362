//! Storage abstraction over the schema backend

use crate::error::Result;
use async_trait::async_trait;
use mb_schema::{MasterSummary, SaveSchemaRequest, SchemaGraph, SchemaId, SchemaRecord};
use serde_json::Value;

/// Versioned schema snapshots plus the backend's master list
///
/// Every call hits the store once; nothing is retried.
#[async_trait]
pub trait SchemaStore: Send + Sync {
    /// Active schemas, most recently updated first
    async fn list_schemas(&self) -> Result<Vec<SchemaRecord>>;

    async fn get_schema(&self, id: SchemaId) -> Result<SchemaRecord>;

    async fn create_schema(&self, request: &SaveSchemaRequest) -> Result<SchemaRecord>;

    /// Overwrite a schema; the store bumps its version
    async fn update_schema(&self, id: SchemaId, request: &SaveSchemaRequest) -> Result<SchemaRecord>;

    async fn delete_schema(&self, id: SchemaId) -> Result<()>;

    /// Copy a schema under a fresh `<name>_copy` name
    async fn duplicate_schema(&self, id: SchemaId) -> Result<SchemaRecord>;

    /// Masters already defined on the backend
    async fn list_masters(&self) -> Result<Vec<MasterSummary>>;

    /// Create a master from a finalised wizard payload
    async fn create_master(&self, payload: &Value) -> Result<Value>;

    /// Create when `id` is `None`, update otherwise
    async fn save_schema(
        &self,
        name: &str,
        description: &str,
        graph: SchemaGraph,
        id: Option<SchemaId>,
    ) -> Result<SchemaRecord> {
        let request = SaveSchemaRequest::new(name, description, graph);
        match id {
            Some(id) => self.update_schema(id, &request).await,
            None => self.create_schema(&request).await,
        }
    }
}
