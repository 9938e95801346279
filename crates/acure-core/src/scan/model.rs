//! Scan record domain model.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::normalize::normalize_recommendations;

/// Severity used whenever a source cannot supply one.
pub const UNKNOWN_SEVERITY: &str = "Unknown";
/// Label used whenever a source cannot supply one.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// One class score from the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub confidence: f64,
}

impl Prediction {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// Canonical treatment advice attached to a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub treatment: Vec<String>,
    #[serde(default = "unknown_severity")]
    pub severity: String,
}

fn unknown_severity() -> String {
    UNKNOWN_SEVERITY.to_string()
}

impl Default for Recommendations {
    fn default() -> Self {
        Self {
            ingredients: Vec::new(),
            treatment: Vec::new(),
            severity: unknown_severity(),
        }
    }
}

/// The result of one inference run.
///
/// Field names on the wire follow the JSON shape shared by the cache and the
/// scan API (`dominantAcne`, `image`, `isMockResult`, ...). A record is never
/// mutated after creation except to attach a server-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    #[serde(default, alias = "scanId", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "dominantAcne", default = "unknown_label")]
    pub dominant_label: String,
    #[serde(default)]
    pub confidence: f64,
    /// Data URI or URL. Empty when the image was dropped.
    #[serde(rename = "image", default)]
    pub image_ref: String,
    #[serde(default = "now_iso8601")]
    pub timestamp: String,
    #[serde(default)]
    pub predictions: Vec<Prediction>,
    #[serde(default, deserialize_with = "deserialize_recommendations")]
    pub recommendations: Recommendations,
    #[serde(default)]
    pub is_mock_result: bool,
}

fn unknown_label() -> String {
    UNKNOWN_LABEL.to_string()
}

/// Current time as an ISO-8601 string with millisecond precision.
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn deserialize_recommendations<'de, D>(deserializer: D) -> Result<Recommendations, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(normalize_recommendations(&value))
}

impl ScanRecord {
    /// Builds a record from already-ranked predictions.
    ///
    /// The dominant label and confidence are taken from `predictions[0]`.
    pub fn from_predictions(
        predictions: Vec<Prediction>,
        image_ref: impl Into<String>,
        recommendations: Recommendations,
    ) -> Self {
        let (dominant_label, confidence) = predictions
            .first()
            .map(|p| (p.label.clone(), p.confidence))
            .unwrap_or_else(|| (unknown_label(), 0.0));

        Self {
            id: None,
            dominant_label,
            confidence,
            image_ref: image_ref.into(),
            timestamp: now_iso8601(),
            predictions,
            recommendations,
            is_mock_result: false,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Returns a copy carrying `id`.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Checks the ranking invariants: predictions sorted descending and the
    /// dominant label equal to the first prediction.
    pub fn is_consistent(&self) -> bool {
        let sorted = self
            .predictions
            .windows(2)
            .all(|pair| pair[0].confidence >= pair[1].confidence);
        let dominant_matches = self
            .predictions
            .first()
            .is_none_or(|first| first.label == self.dominant_label);
        sorted && dominant_matches
    }
}
