//! In-process [`SchemaStore`] with the backend's bookkeeping rules

use crate::error::{ClientError, Result};
use crate::store::SchemaStore;
use async_trait::async_trait;
use chrono::Utc;
use mb_schema::{MasterSummary, SaveSchemaRequest, SchemaId, SchemaRecord};
use serde_json::Value;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct State {
    last_id: u64,
    last_master_id: u64,
    schemas: BTreeMap<SchemaId, SchemaRecord>,
    masters: Vec<MasterSummary>,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    fn active(&self, id: SchemaId) -> Result<&SchemaRecord> {
        self.schemas
            .get(&id)
            .filter(|r| r.is_active)
            .ok_or_else(ClientError::not_found)
    }

    fn name_taken(&self, name: &str) -> bool {
        self.schemas.values().any(|r| r.is_active && r.name == name)
    }

    fn insert(&mut self, request: &SaveSchemaRequest) -> SchemaRecord {
        let now = Utc::now();
        let id = self.next_id();
        let mut record = SchemaRecord {
            id,
            name: request.name.clone(),
            description: request.description.clone(),
            schema_data: request.schema_data.clone(),
            created_by: None,
            created_at: now,
            updated_at: now,
            version: 1,
            is_active: true,
            master_count: 0,
            relationship_count: 0,
        };
        recount(&mut record);
        self.schemas.insert(id, record.clone());
        record
    }
}

fn recount(record: &mut SchemaRecord) {
    record.master_count = record.schema_data.graph.master_count();
    record.relationship_count = record.schema_data.graph.relationship_count();
}

fn bad_request(detail: &str) -> ClientError {
    ClientError::Http {
        status: 400,
        detail: detail.to_string(),
    }
}

/// Schema store held in memory; deletes are soft, updates bump the version
#[derive(Debug, Default)]
pub struct MemorySchemaStore {
    state: Mutex<State>,
}

impl MemorySchemaStore {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that already knows these backend masters
    #[must_use]
    pub fn with_masters(masters: Vec<MasterSummary>) -> Self {
        Self {
            state: Mutex::new(State {
                last_master_id: masters.iter().map(|m| m.id).max().unwrap_or(0),
                masters,
                ..State::default()
            }),
        }
    }
}

#[async_trait]
impl SchemaStore for MemorySchemaStore {
    async fn list_schemas(&self) -> Result<Vec<SchemaRecord>> {
        let state = self.state.lock().await;
        let mut schemas: Vec<SchemaRecord> =
            state.schemas.values().filter(|r| r.is_active).cloned().collect();
        schemas.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        Ok(schemas)
    }

    async fn get_schema(&self, id: SchemaId) -> Result<SchemaRecord> {
        self.state.lock().await.active(id).cloned()
    }

    async fn create_schema(&self, request: &SaveSchemaRequest) -> Result<SchemaRecord> {
        if request.name.trim().is_empty() {
            return Err(bad_request("name: This field may not be blank."));
        }
        Ok(self.state.lock().await.insert(request))
    }

    async fn update_schema(&self, id: SchemaId, request: &SaveSchemaRequest) -> Result<SchemaRecord> {
        if request.name.trim().is_empty() {
            return Err(bad_request("name: This field may not be blank."));
        }
        let mut state = self.state.lock().await;
        state.active(id)?;
        let record = state.schemas.get_mut(&id).ok_or_else(ClientError::not_found)?;
        record.name = request.name.clone();
        record.description = request.description.clone();
        record.schema_data = request.schema_data.clone();
        record.version += 1;
        record.updated_at = Utc::now();
        recount(record);
        Ok(record.clone())
    }

    async fn delete_schema(&self, id: SchemaId) -> Result<()> {
        let mut state = self.state.lock().await;
        state.active(id)?;
        if let Some(record) = state.schemas.get_mut(&id) {
            record.is_active = false;
        }
        Ok(())
    }

    async fn duplicate_schema(&self, id: SchemaId) -> Result<SchemaRecord> {
        let mut state = self.state.lock().await;
        let original = state.active(id)?.clone();
        let base = format!("{}_copy", original.name);
        let mut name = base.clone();
        let mut counter = 1;
        while state.name_taken(&name) {
            name = format!("{base}_{counter}");
            counter += 1;
        }
        let request = SaveSchemaRequest {
            name,
            description: original.description,
            schema_data: original.schema_data,
        };
        Ok(state.insert(&request))
    }

    async fn list_masters(&self) -> Result<Vec<MasterSummary>> {
        Ok(self.state.lock().await.masters.clone())
    }

    async fn create_master(&self, payload: &Value) -> Result<Value> {
        let name = payload
            .get("name")
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| bad_request("name: This field is required."))?;
        let mut state = self.state.lock().await;
        if state.masters.iter().any(|m| m.name == name) {
            return Err(bad_request("name: master with this name already exists."));
        }
        state.last_master_id += 1;
        let id = state.last_master_id;
        let text = |key: &str| {
            payload
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        state.masters.push(MasterSummary {
            id,
            name: name.to_string(),
            display_name: text("display_name"),
            description: text("description"),
            icon: text("icon"),
            is_active: true,
            record_count: 0,
        });

        let mut created = payload.clone();
        if let Value::Object(map) = &mut created {
            map.insert("id".to_string(), Value::from(id));
        }
        Ok(created)
    }
}
