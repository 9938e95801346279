//! Scan history filtering, sorting and pagination.

use std::cmp::Ordering;
use std::str::FromStr;

use acure_core::AcureError;
use acure_core::scan::ScanRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SCANS_PER_PAGE: usize = 6;
pub const ALL_FILTER: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistorySort {
    #[default]
    Newest,
    Oldest,
    Confidence,
}

impl FromStr for HistorySort {
    type Err = AcureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "confidence" => Ok(Self::Confidence),
            other => Err(AcureError::validation(format!("Unknown sort '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQuery {
    /// Case-insensitive substring of the dominant label, or `all`.
    pub filter: String,
    pub sort: HistorySort,
    /// 1-based.
    pub page: usize,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            filter: ALL_FILTER.to_string(),
            sort: HistorySort::default(),
            page: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPage {
    pub items: Vec<ScanRecord>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl HistoryPage {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

fn timestamp_of(record: &ScanRecord) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&record.timestamp)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

impl HistoryQuery {
    pub fn apply(&self, scans: &[ScanRecord]) -> HistoryPage {
        let needle = self.filter.trim().to_lowercase();
        let mut items: Vec<ScanRecord> = scans
            .iter()
            .filter(|scan| {
                needle.is_empty()
                    || needle == ALL_FILTER
                    || scan.dominant_label.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();

        // Unparseable timestamps sort as the epoch
        items.sort_by(|a, b| match self.sort {
            HistorySort::Newest => timestamp_of(b).cmp(&timestamp_of(a)),
            HistorySort::Oldest => timestamp_of(a).cmp(&timestamp_of(b)),
            HistorySort::Confidence => b
                .confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal),
        });

        let total_items = items.len();
        let total_pages = total_items.div_ceil(SCANS_PER_PAGE).max(1);
        let page = self.page.clamp(1, total_pages);
        let items = items
            .into_iter()
            .skip((page - 1) * SCANS_PER_PAGE)
            .take(SCANS_PER_PAGE)
            .collect();

        HistoryPage {
            items,
            page,
            total_pages,
            total_items,
        }
    }
}
