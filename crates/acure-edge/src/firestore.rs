//! Firestore REST client and typed-field codec.
//!
//! Firestore documents carry every field wrapped in a type tag
//! (`{"stringValue": "x"}`, `{"mapValue": {"fields": {...}}}`, ...).
//! [`decode_value`] and [`encode_value`] convert between that shape and plain
//! JSON. Scan documents live under `users/{uid}/scans/{scanId}`.

use acure_core::scan::{Prediction, Recommendations, ScanRecord, UNKNOWN_LABEL, now_iso8601};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::UpstreamError;

/// Decodes one typed Firestore value into plain JSON.
///
/// Returns `None` for value types this codec does not carry
/// (references, geo points, bytes).
pub fn decode_value(typed: &Value) -> Option<Value> {
    let (kind, inner) = typed.as_object()?.iter().next()?;
    match kind.as_str() {
        "stringValue" | "timestampValue" => inner.as_str().map(|s| Value::String(s.to_string())),
        "doubleValue" => inner.as_f64().map(Value::from),
        "integerValue" => inner
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .or_else(|| inner.as_i64())
            .map(Value::from),
        "booleanValue" => inner.as_bool().map(Value::Bool),
        "nullValue" => Some(Value::Null),
        "arrayValue" => {
            let values = inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().filter_map(decode_value).collect())
                .unwrap_or_default();
            Some(Value::Array(values))
        }
        "mapValue" => {
            let fields = inner
                .get("fields")
                .and_then(Value::as_object)
                .map(decode_fields)
                .unwrap_or_default();
            Some(Value::Object(fields))
        }
        other => {
            tracing::debug!("Skipping unsupported Firestore value type {}", other);
            None
        }
    }
}

/// Decodes a document's `fields` map.
pub fn decode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .filter_map(|(key, typed)| decode_value(typed).map(|v| (key.clone(), v)))
        .collect()
}

/// Encodes plain JSON as a typed Firestore value.
///
/// Integral numbers become `integerValue`, every other number `doubleValue`.
pub fn encode_value(plain: &Value) -> Value {
    match plain {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or_default() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            json!({ "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

pub fn encode_fields(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| (key.clone(), encode_value(value)))
        .collect()
}

fn string_value(s: &str) -> Value {
    json!({ "stringValue": s })
}

fn double_value(f: f64) -> Value {
    json!({ "doubleValue": f })
}

fn timestamp_value(ts: &str) -> Value {
    json!({ "timestampValue": ts })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// Last segment of the resource name.
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or_default()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<Document>,
    next_page_token: Option<String>,
}

/// Who a saved scan belongs to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOwner {
    pub user_id: String,
    pub email: String,
    pub name: String,
}

/// A scan as returned by the edge API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanView {
    #[serde(flatten)]
    pub scan: ScanRecord,
    pub scan_id: String,
    pub user_id: String,
}

/// Typed fields of a new scan document. Timestamps are set to `now`.
pub fn scan_fields(scan_id: &str, scan: &ScanRecord, owner: &ScanOwner, now: &str) -> Map<String, Value> {
    let predictions: Vec<Value> = scan
        .predictions
        .iter()
        .map(|p| {
            json!({ "mapValue": { "fields": {
                "label": string_value(&p.label),
                "confidence": double_value(p.confidence),
            } } })
        })
        .collect();
    let recommendations = serde_json::to_value(&scan.recommendations)
        .map(|v| encode_value(&v))
        .unwrap_or_else(|_| json!({ "mapValue": { "fields": {} } }));

    let mut fields = Map::new();
    fields.insert("scanId".into(), string_value(scan_id));
    fields.insert("dominantAcne".into(), string_value(&scan.dominant_label));
    fields.insert("confidence".into(), double_value(scan.confidence));
    fields.insert("image".into(), string_value(&scan.image_ref));
    fields.insert("timestamp".into(), timestamp_value(now));
    fields.insert("createdAt".into(), timestamp_value(now));
    fields.insert("userEmail".into(), string_value(&owner.email));
    fields.insert("userName".into(), string_value(&owner.name));
    fields.insert("userId".into(), string_value(&owner.user_id));
    fields.insert("isMockResult".into(), json!({ "booleanValue": scan.is_mock_result }));
    fields.insert("predictions".into(), json!({ "arrayValue": { "values": predictions } }));
    fields.insert("recommendations".into(), recommendations);
    fields
}

/// Reads a scan document back into a [`ScanView`], defaulting what is missing.
pub fn decode_scan(document: &Document, user_id: &str) -> ScanView {
    let plain = decode_fields(&document.fields);
    let text = |key: &str| plain.get(key).and_then(Value::as_str).map(str::to_string);

    let id = document.id().to_string();
    let predictions = plain
        .get("predictions")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value::<Prediction>(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default();

    let scan = ScanRecord {
        id: Some(id.clone()),
        dominant_label: text("dominantAcne").unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
        confidence: plain.get("confidence").and_then(Value::as_f64).unwrap_or_default(),
        image_ref: text("image").unwrap_or_default(),
        timestamp: text("timestamp")
            .or_else(|| text("createdAt"))
            .unwrap_or_else(now_iso8601),
        predictions,
        recommendations: plain
            .get("recommendations")
            .and_then(|r| serde_json::from_value::<Recommendations>(r.clone()).ok())
            .unwrap_or_default(),
        is_mock_result: plain.get("isMockResult").and_then(Value::as_bool).unwrap_or_default(),
    };

    ScanView {
        scan,
        scan_id: id,
        user_id: user_id.to_string(),
    }
}

#[derive(Clone)]
pub struct FirestoreClient {
    http: Client,
    base_url: String,
    project_id: String,
}

impl FirestoreClient {
    pub fn new(http: Client, base_url: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            project_id: project_id.into(),
        }
    }

    fn scans_url(&self, user_id: &str) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents/users/{}/scans",
            self.base_url, self.project_id, user_id
        )
    }

    async fn send(&self, request: RequestBuilder, token: &str) -> Result<reqwest::Response, UpstreamError> {
        let response = request.bearer_auth(token).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::debug!("Firestore answered {}: {}", status, body);
        Err(UpstreamError::Rejected {
            status: status.as_u16(),
            message: body,
        })
    }

    /// Every scan document of a user. A missing collection is an empty list.
    pub async fn list_scans(&self, token: &str, user_id: &str) -> Result<Vec<Document>, UpstreamError> {
        let url = self.scans_url(user_id);
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.http.get(&url);
            if let Some(page) = &page_token {
                request = request.query(&[("pageToken", page.as_str())]);
            }

            let page: ListResponse = match self.send(request, token).await {
                Ok(response) => response.json().await?,
                Err(e) if e.is_not_found() => return Ok(documents),
                Err(e) => return Err(e),
            };
            documents.extend(page.documents);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) => page_token = Some(next),
                None => return Ok(documents),
            }
        }
    }

    pub async fn create_scan(
        &self,
        token: &str,
        user_id: &str,
        scan_id: &str,
        fields: Map<String, Value>,
    ) -> Result<Document, UpstreamError> {
        let request = self
            .http
            .post(self.scans_url(user_id))
            .query(&[("documentId", scan_id)])
            .json(&json!({ "fields": fields }));
        Ok(self.send(request, token).await?.json().await?)
    }

    /// `None` when the document does not exist.
    pub async fn get_scan(
        &self,
        token: &str,
        user_id: &str,
        scan_id: &str,
    ) -> Result<Option<Document>, UpstreamError> {
        let request = self
            .http
            .get(format!("{}/{}", self.scans_url(user_id), scan_id));
        match self.send(request, token).await {
            Ok(response) => Ok(Some(response.json().await?)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Fails with a 404 rejection when the document does not exist.
    pub async fn delete_scan(&self, token: &str, user_id: &str, scan_id: &str) -> Result<(), UpstreamError> {
        let request = self
            .http
            .delete(format!("{}/{}", self.scans_url(user_id), scan_id))
            .query(&[("currentDocument.exists", "true")]);
        self.send(request, token).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_every_value_type() {
        let typed = json!({
            "s": { "stringValue": "x" },
            "d": { "doubleValue": 0.75 },
            "i": { "integerValue": "42" },
            "b": { "booleanValue": true },
            "t": { "timestampValue": "2024-05-01T10:00:00Z" },
            "n": { "nullValue": null },
            "a": { "arrayValue": { "values": [{ "stringValue": "p" }, { "integerValue": "1" }] } },
            "e": { "arrayValue": {} },
            "m": { "mapValue": { "fields": { "k": { "booleanValue": false } } } },
            "g": { "geoPointValue": { "latitude": 1.0, "longitude": 2.0 } }
        });
        let plain = decode_fields(typed.as_object().unwrap());

        assert_eq!(
            Value::Object(plain),
            json!({
                "s": "x",
                "d": 0.75,
                "i": 42,
                "b": true,
                "t": "2024-05-01T10:00:00Z",
                "n": null,
                "a": ["p", 1],
                "e": [],
                "m": { "k": false }
            })
        );
    }

    #[test]
    fn test_encode_plain_json() {
        assert_eq!(encode_value(&json!(3)), json!({ "integerValue": "3" }));
        assert_eq!(encode_value(&json!(0.5)), json!({ "doubleValue": 0.5 }));
        assert_eq!(
            encode_value(&json!({ "tags": ["a"] })),
            json!({ "mapValue": { "fields": {
                "tags": { "arrayValue": { "values": [{ "stringValue": "a" }] } }
            } } })
        );
    }

    #[test]
    fn test_decode_scan_document() {
        let document: Document = serde_json::from_value(json!({
            "name": "projects/acurescan/databases/(default)/documents/users/u1/scans/abc123",
            "fields": {
                "dominantAcne": { "stringValue": "Papula" },
                "confidence": { "doubleValue": 0.82 },
                "createdAt": { "timestampValue": "2024-05-01T10:00:00Z" },
                "isMockResult": { "booleanValue": true },
                "predictions": { "arrayValue": { "values": [
                    { "mapValue": { "fields": {
                        "label": { "stringValue": "Papula" },
                        "confidence": { "doubleValue": 0.82 }
                    } } }
                ] } },
                "recommendations": { "mapValue": { "fields": {
                    "ingredients": { "arrayValue": { "values": [{ "stringValue": "Niacinamide" }] } },
                    "severity": { "stringValue": "Moderate" }
                } } }
            }
        }))
        .unwrap();

        let view = decode_scan(&document, "u1");
        assert_eq!(view.scan_id, "abc123");
        assert_eq!(view.scan.id.as_deref(), Some("abc123"));
        assert_eq!(view.scan.dominant_label, "Papula");
        assert_eq!(view.scan.timestamp, "2024-05-01T10:00:00Z");
        assert_eq!(view.scan.image_ref, "");
        assert!(view.scan.is_mock_result);
        assert_eq!(view.scan.predictions, vec![Prediction::new("Papula", 0.82)]);
        assert_eq!(view.scan.recommendations.ingredients, vec!["Niacinamide"]);
        assert!(view.scan.recommendations.treatment.is_empty());
        assert_eq!(view.scan.recommendations.severity, "Moderate");

        let wire = serde_json::to_value(&view).unwrap();
        assert_eq!(wire["id"], "abc123");
        assert_eq!(wire["scanId"], "abc123");
        assert_eq!(wire["userId"], "u1");
        assert_eq!(wire["dominantAcne"], "Papula");
    }

    #[test]
    fn test_empty_document_defaults() {
        let view = decode_scan(&Document::default(), "u1");
        assert_eq!(view.scan.dominant_label, UNKNOWN_LABEL);
        assert_eq!(view.scan.confidence, 0.0);
        assert_eq!(view.scan.recommendations.severity, "Unknown");
    }

    #[test]
    fn test_scan_fields_round_through_decode() {
        let scan = ScanRecord::from_predictions(
            vec![Prediction::new("Kistik", 0.9), Prediction::new("Papula", 0.1)],
            "data:image/png;base64,AAAA",
            Default::default(),
        );
        let owner = ScanOwner {
            user_id: "u1".into(),
            email: "ana@example.com".into(),
            name: "Ana".into(),
        };
        let fields = scan_fields("s1", &scan, &owner, "2024-05-01T10:00:00.000Z");

        assert_eq!(fields["confidence"], json!({ "doubleValue": 0.9 }));
        assert_eq!(fields["userId"], json!({ "stringValue": "u1" }));
        assert_eq!(
            fields["recommendations"]["mapValue"]["fields"]["severity"],
            json!({ "stringValue": "Unknown" })
        );

        let document = Document {
            name: "users/u1/scans/s1".into(),
            fields,
        };
        let view = decode_scan(&document, "u1");
        assert_eq!(view.scan.dominant_label, "Kistik");
        assert_eq!(view.scan.predictions.len(), 2);
        assert_eq!(view.scan.timestamp, "2024-05-01T10:00:00.000Z");
    }
}
