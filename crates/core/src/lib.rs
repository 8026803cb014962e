mod filter;
mod format;
mod kind;
mod projection;
mod summary;
mod table;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use filter::{FilterInputs, FilterPreset, FilterSpec, NameScope, parse_name_list};
pub use format::{format_bytes, format_credits, format_number, format_usd};
pub use kind::{HOUR_COLUMN, KindSchema, ResourceKind, TAGS_COLUMN, UnknownKind};
pub use projection::{
    DEFAULT_GROWTH_RATE, GrowthRates, HORIZONS, HorizonCost, PredictionInput, Projection,
    ProjectionRow, ProjectionTotals, ReceiptLine, project, projected_cost,
};
pub use summary::{DailyRollup, KindSummary, Tile, UsageReport, bucket_day, daily_rollups, summarize};
pub use table::{Cell, Table, TagPair, UsageRecord, parse_tag_document};

const BOUND_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Inclusive `[start, end]` bounds on the hour bucket, as SQLite datetimes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

impl TimeRange {
    /// Covers whole days: `start 00:00:00` through `end 23:59:59`.
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Self {
        let start = start.and_hms_opt(0, 0, 0).unwrap_or_default();
        let end = end.and_hms_opt(23, 59, 59).unwrap_or_default();
        Self {
            start: start.format(BOUND_FORMAT).to_string(),
            end: end.format(BOUND_FORMAT).to_string(),
        }
    }
}

/// Collects the distinct tag names of the given tag documents, sorted, behind
/// a leading `""` entry that stands for "no tag".
pub fn tag_catalog<'a>(
    documents: impl IntoIterator<Item = &'a str>,
) -> serde_json::Result<Vec<String>> {
    let mut names = std::collections::BTreeSet::new();
    for document in documents {
        for tag in parse_tag_document(document)? {
            if let Some(name) = tag.tag_name.filter(|name| !name.is_empty()) {
                names.insert(name);
            }
        }
    }
    let mut catalog = Vec::with_capacity(names.len() + 1);
    catalog.push(String::new());
    catalog.extend(names);
    Ok(catalog)
}
