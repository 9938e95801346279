//! Scan domain module.
//!
//! # Module Structure
//!
//! - `model`: [`ScanRecord`], [`Prediction`], [`Recommendations`]
//! - `labels`: the fixed label set, ranking and recommendation tables
//! - `normalize`: shape normalization for remote and cached payloads
//! - `repository`: cache and remote service traits

mod labels;
mod model;
mod normalize;
mod repository;

pub use labels::{AcneType, rank_scores, recommendations_for_label, round_confidence};
pub use model::{
    Prediction, Recommendations, ScanRecord, UNKNOWN_LABEL, UNKNOWN_SEVERITY, now_iso8601,
};
pub use normalize::{normalize_recommendations, normalize_scan};
pub use repository::{RemoteScanService, ScanCacheRepository};

/// Prefix of every scan cache key.
pub const SCAN_KEY_PREFIX: &str = "scan_";

/// Cache key for a scan id.
pub fn scan_key(id: &str) -> String {
    format!("{}{}", SCAN_KEY_PREFIX, id)
}
