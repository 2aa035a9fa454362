//! REST implementation of [`SchemaStore`]

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::store::SchemaStore;
use async_trait::async_trait;
use mb_schema::{MasterSummary, SaveSchemaRequest, SchemaId, SchemaRecord};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

/// Extract a readable message from an error response body
///
/// Prefers the `detail` field, then the raw body, then the status reason.
fn error_detail(status: reqwest::StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(Value::as_str).map(str::to_string));
    match detail {
        Some(d) => d,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status.canonical_reason().unwrap_or("request failed").to_string(),
    }
}

async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.map_err(|e| {
        debug!(status = status.as_u16(), error = %e, "error response body unreadable");
        ClientError::from(e)
    })?;
    Err(ClientError::Http {
        status: status.as_u16(),
        detail: error_detail(status, &body),
    })
}

/// Schema store backed by the REST API
#[derive(Debug, Clone)]
pub struct HttpSchemaStore {
    http: Client,
    config: ClientConfig,
}

impl HttpSchemaStore {
    /// # Errors
    /// [`ClientError::Config`] when the HTTP client cannot be built
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("master-builder/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// # Errors
    /// [`ClientError::Config`] when the HTTP client cannot be built
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        check(request.send().await?).await
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        response.json::<T>().await.map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl SchemaStore for HttpSchemaStore {
    async fn list_schemas(&self) -> Result<Vec<SchemaRecord>> {
        let schemas: Vec<SchemaRecord> = self.fetch(self.http.get(self.url("schemas/"))).await?;
        debug!(count = schemas.len(), "listed schemas");
        Ok(schemas)
    }

    async fn get_schema(&self, id: SchemaId) -> Result<SchemaRecord> {
        self.fetch(self.http.get(self.url(&format!("schemas/{id}/")))).await
    }

    async fn create_schema(&self, request: &SaveSchemaRequest) -> Result<SchemaRecord> {
        let record: SchemaRecord = self
            .fetch(self.http.post(self.url("schemas/")).json(request))
            .await?;
        info!(id = record.id, name = %record.name, "schema created");
        Ok(record)
    }

    async fn update_schema(&self, id: SchemaId, request: &SaveSchemaRequest) -> Result<SchemaRecord> {
        let record: SchemaRecord = self
            .fetch(self.http.put(self.url(&format!("schemas/{id}/"))).json(request))
            .await?;
        info!(id, version = record.version, "schema updated");
        Ok(record)
    }

    async fn delete_schema(&self, id: SchemaId) -> Result<()> {
        self.send(self.http.delete(self.url(&format!("schemas/{id}/"))))
            .await?;
        info!(id, "schema deleted");
        Ok(())
    }

    async fn duplicate_schema(&self, id: SchemaId) -> Result<SchemaRecord> {
        let record: SchemaRecord = self
            .fetch(self.http.post(self.url(&format!("schemas/{id}/duplicate/"))))
            .await?;
        info!(from = id, id = record.id, name = %record.name, "schema duplicated");
        Ok(record)
    }

    async fn list_masters(&self) -> Result<Vec<MasterSummary>> {
        self.fetch(self.http.get(self.url("masters/"))).await
    }

    async fn create_master(&self, payload: &Value) -> Result<Value> {
        let created: Value = self
            .fetch(self.http.post(self.url("masters/")).json(payload))
            .await?;
        info!(name = payload.get("name").and_then(serde_json::Value::as_str).unwrap_or_default(), "master created");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn detail_field_is_preferred() {
        assert_eq!(
            error_detail(StatusCode::NOT_FOUND, r#"{"detail": "Not found."}"#),
            "Not found."
        );
        assert_eq!(
            error_detail(StatusCode::BAD_REQUEST, r#"{"name": ["This field is required."]}"#),
            r#"{"name": ["This field is required."]}"#
        );
        assert_eq!(error_detail(StatusCode::BAD_GATEWAY, "  "), "Bad Gateway");
    }
}
