//! Scan history REST client.

use acure_core::scan::{RemoteScanService, ScanRecord, now_iso8601, normalize_scan};
use acure_core::{AcureError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use crate::http::{ApiClient, Auth};

pub struct ScanApiClient {
    api: ApiClient,
}

impl ScanApiClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Body of a save request: the record fields plus `userId`, stamped now.
    fn save_body(user_id: &str, record: &ScanRecord) -> Result<Value> {
        let mut body = serde_json::to_value(record)?;
        if let Value::Object(map) = &mut body {
            map.insert("userId".to_string(), Value::String(user_id.to_string()));
            map.insert("timestamp".to_string(), Value::String(now_iso8601()));
        }
        Ok(body)
    }
}

fn id_field(data: &Value, name: &str) -> Option<String> {
    data.get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl RemoteScanService for ScanApiClient {
    async fn save(&self, user_id: &str, record: &ScanRecord) -> Result<String> {
        let request = self
            .api
            .authorize(self.api.post("/api/scans"))?
            .json(&Self::save_body(user_id, record)?);
        let response = self.api.send(request).await?;
        let envelope = self.api.check(response, Auth::Bearer, "Failed to save scan")?;

        let id = id_field(&envelope.data, "id")
            .or_else(|| id_field(&envelope.data, "scanId"))
            .ok_or_else(|| AcureError::remote(200, "Save response carried no scan id"))?;

        tracing::info!("Scan saved remotely as {}", id);
        Ok(id)
    }

    async fn list(&self, user_id: &str) -> Result<Vec<ScanRecord>> {
        let request = self
            .api
            .authorize(self.api.get("/api/scans").query(&[("userId", user_id)]))?;
        let response = self.api.send(request).await?;

        if response.status == StatusCode::NOT_FOUND {
            tracing::debug!("No scan history for {}", user_id);
            return Ok(Vec::new());
        }
        let envelope = self.api.check(response, Auth::Bearer, "Failed to fetch scans")?;

        let items = match envelope.data {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            other => {
                return Err(AcureError::Serialization {
                    format: "JSON".to_string(),
                    message: format!("expected a scan list, got {}", other),
                });
            }
        };

        let scans: Vec<ScanRecord> = items
            .iter()
            .enumerate()
            .map(|(index, item)| normalize_scan(item, index))
            .collect();
        tracing::debug!("Fetched {} scans for {}", scans.len(), user_id);
        Ok(scans)
    }

    async fn get_by_id(&self, user_id: &str, id: &str) -> Result<ScanRecord> {
        let request = self.api.authorize(
            self.api
                .get(&format!("/api/scans/{}", id))
                .query(&[("userId", user_id)]),
        )?;
        let response = self.api.send(request).await?;

        if response.status == StatusCode::NOT_FOUND {
            return Err(AcureError::not_found("scan", id));
        }
        let envelope = self.api.check(response, Auth::Bearer, "Failed to fetch scan")?;

        let mut data = envelope.data;
        let has_id = id_field(&data, "id").is_some() || id_field(&data, "scanId").is_some();
        if let (false, Value::Object(map)) = (has_id, &mut data) {
            map.insert("id".to_string(), Value::String(id.to_string()));
        }
        Ok(normalize_scan(&data, 0))
    }

    async fn delete(&self, user_id: &str, id: &str) -> Result<bool> {
        let request = self.api.authorize(
            self.api
                .delete(&format!("/api/scans/{}", id))
                .query(&[("userId", user_id)]),
        )?;
        let response = self.api.send(request).await?;

        if !response.status.is_success() {
            return self
                .api
                .check(response, Auth::Bearer, "Failed to delete scan")
                .map(|envelope| envelope.success);
        }

        let success = response.envelope.success;
        if success {
            tracing::info!("Deleted scan {}", id);
        }
        Ok(success)
    }
}
