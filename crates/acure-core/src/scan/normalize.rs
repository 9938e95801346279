//! Normalization of heterogeneous scan payloads.
//!
//! The remote store and the local cache disagree on shape. These functions
//! are the seam that turns either producer's output into the canonical
//! [`ScanRecord`] / [`Recommendations`].

use chrono::Utc;
use serde_json::Value;

use super::model::{Prediction, Recommendations, ScanRecord, UNKNOWN_LABEL, now_iso8601};

/// Maximum number of items taken when recommendations arrive as a flat list.
const FLAT_LIST_LIMIT: usize = 5;

/// Produces canonical recommendations from any value.
///
/// - null → defaults
/// - object carrying both `ingredients` and `treatment` → kept as is
/// - flat list → its first five items become the ingredients
/// - anything else → defaults
pub fn normalize_recommendations(value: &Value) -> Recommendations {
    match value {
        Value::Object(map) if has_value(map.get("ingredients")) && has_value(map.get("treatment")) => {
            Recommendations {
                ingredients: string_list(&map["ingredients"], usize::MAX),
                treatment: string_list(&map["treatment"], usize::MAX),
                severity: map
                    .get("severity")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| Recommendations::default().severity),
            }
        }
        Value::Array(_) => Recommendations {
            ingredients: string_list(value, FLAT_LIST_LIMIT),
            ..Recommendations::default()
        },
        _ => Recommendations::default(),
    }
}

fn has_value(value: Option<&Value>) -> bool {
    value.is_some_and(|v| !v.is_null())
}

fn string_list(value: &Value, limit: usize) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .take(limit)
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Value::String(s) => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// Normalizes one item of a remote scan list.
///
/// `index` is the item's position in the list and seeds the fallback id
/// `scan-<index>-<millis>` for items that arrive without one.
pub fn normalize_scan(value: &Value, index: usize) -> ScanRecord {
    let field = |name: &str| value.get(name).filter(|v| !v.is_null());
    let non_empty_str = |name: &str| {
        field(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let id = non_empty_str("id")
        .or_else(|| non_empty_str("scanId"))
        .unwrap_or_else(|| format!("scan-{}-{}", index, Utc::now().timestamp_millis()));

    let predictions = field("predictions")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|p| Prediction {
                    label: p
                        .get("label")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    confidence: p.get("confidence").and_then(Value::as_f64).unwrap_or(0.0),
                })
                .collect()
        })
        .unwrap_or_default();

    ScanRecord {
        id: Some(id),
        dominant_label: non_empty_str("dominantAcne").unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
        confidence: field("confidence").and_then(Value::as_f64).unwrap_or(0.0),
        image_ref: non_empty_str("image").unwrap_or_default(),
        timestamp: non_empty_str("timestamp")
            .or_else(|| non_empty_str("createdAt"))
            .unwrap_or_else(now_iso8601),
        predictions,
        recommendations: normalize_recommendations(field("recommendations").unwrap_or(&Value::Null)),
        is_mock_result: field("isMockResult").and_then(Value::as_bool).unwrap_or(false),
    }
}
