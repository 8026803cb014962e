use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::kind::{HOUR_COLUMN, ResourceKind, TAGS_COLUMN};

/// One dynamically typed cell of a usage table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Cell {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Null => None,
            Cell::Integer(value) => Some(*value as f64),
            Cell::Real(value) => Some(*value),
            Cell::Text(value) => value.trim().parse::<f64>().ok(),
        }
    }

    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Null => None,
            Cell::Integer(value) => Some(value.to_string()),
            Cell::Real(value) => Some(value.to_string()),
            Cell::Text(value) => Some(value.clone()),
        }
    }
}

/// Tabular query result with lower-cased column names.
///
/// Readers treat every column as optional: sums over a missing column are
/// zero and lookups return `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let columns = columns
            .into_iter()
            .map(|column| column.to_ascii_lowercase())
            .collect();
        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.eq_ignore_ascii_case(name))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.column_index(column)?;
        self.rows.get(row).and_then(|cells| cells.get(index))
    }

    pub fn sum(&self, column: &str) -> f64 {
        let Some(index) = self.column_index(column) else {
            return 0.0;
        };
        self.rows
            .iter()
            .filter_map(|cells| cells.get(index).and_then(Cell::as_f64))
            .sum()
    }

    pub fn distinct_count(&self, column: &str) -> usize {
        let Some(index) = self.column_index(column) else {
            return 0;
        };
        self.rows
            .iter()
            .filter_map(|cells| cells.get(index).and_then(Cell::as_text))
            .collect::<HashSet<_>>()
            .len()
    }

    /// Typed view of every row for the given kind. A row whose tag document
    /// does not parse keeps its measures, with no tags and `malformed_tags` set.
    pub fn records(&self, kind: ResourceKind) -> Vec<UsageRecord> {
        (0..self.rows.len())
            .map(|row| UsageRecord::from_row(self, row, kind))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagPair {
    pub tag_name: Option<String>,
    pub tag_value: Option<String>,
}

/// Parses one tag document (a JSON array of `{tag_name, tag_value}`).
pub fn parse_tag_document(document: &str) -> serde_json::Result<Vec<TagPair>> {
    let trimmed = document.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed)
}

/// One `(entity, hour bucket)` row of a usage view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub entity: Option<String>,
    pub hour_start: Option<String>,
    pub measures: BTreeMap<String, f64>,
    pub labels: BTreeMap<String, String>,
    pub tags: Vec<TagPair>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub malformed_tags: bool,
}

impl UsageRecord {
    fn from_row(table: &Table, row: usize, kind: ResourceKind) -> Self {
        let schema = kind.schema();
        let text = |column: &str| table.cell(row, column).and_then(Cell::as_text);
        let measures = schema
            .measures
            .iter()
            .filter_map(|column| {
                table
                    .cell(row, column)
                    .and_then(Cell::as_f64)
                    .map(|value| (column.to_string(), value))
            })
            .collect();
        let labels = schema
            .labels
            .iter()
            .filter_map(|column| text(column).map(|value| (column.to_string(), value)))
            .collect();
        let parsed = text(TAGS_COLUMN)
            .map(|document| parse_tag_document(&document))
            .unwrap_or_else(|| Ok(Vec::new()));
        let malformed_tags = parsed.is_err();
        Self {
            entity: text(schema.entity_column),
            hour_start: text(HOUR_COLUMN),
            measures,
            labels,
            tags: parsed.unwrap_or_default(),
            malformed_tags,
        }
    }

    pub fn measure(&self, column: &str) -> f64 {
        self.measures.get(column).copied().unwrap_or(0.0)
    }
}
