use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::format::{format_bytes, format_credits, format_number, format_usd};
use crate::kind::{HOUR_COLUMN, ResourceKind};
use crate::table::{Cell, Table};

/// A single scalar shown on the dashboard with its display string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub title: String,
    pub value: f64,
    pub display: String,
}

impl Tile {
    fn usd(title: &str, value: f64) -> Self {
        Self::with(title, value, format_usd(value))
    }

    fn credits(title: &str, value: f64) -> Self {
        Self::with(title, value, format_credits(value))
    }

    fn count(title: &str, value: usize) -> Self {
        Self::with(title, value as f64, value.to_string())
    }

    fn number(title: &str, value: f64) -> Self {
        Self::with(title, value, format_number(value))
    }

    fn bytes(title: &str, value: f64) -> Self {
        Self::with(title, value, format_bytes(value))
    }

    fn with(title: &str, value: f64, display: String) -> Self {
        Self {
            title: title.to_string(),
            value,
            display,
        }
    }
}

/// Measures of one entity summed over one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRollup {
    pub day: Option<NaiveDate>,
    pub entity: Option<String>,
    pub measures: BTreeMap<String, f64>,
    pub labels: BTreeMap<String, String>,
}

impl DailyRollup {
    pub fn measure(&self, column: &str) -> f64 {
        self.measures.get(column).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindSummary {
    pub kind: ResourceKind,
    pub rows: usize,
    pub credits: f64,
    pub cost: f64,
    pub tiles: Vec<Tile>,
    pub daily: Vec<DailyRollup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageReport {
    pub price_per_credit: f64,
    pub total_credits: f64,
    pub total_cost: f64,
    pub totals: Vec<Tile>,
    /// Only kinds whose table has rows, in display order.
    pub kinds: Vec<KindSummary>,
}

impl UsageReport {
    pub fn kind(&self, kind: ResourceKind) -> Option<&KindSummary> {
        self.kinds.iter().find(|summary| summary.kind == kind)
    }

    pub fn kind_cost(&self, kind: ResourceKind) -> f64 {
        self.kind(kind).map(|summary| summary.cost).unwrap_or(0.0)
    }
}

pub fn summarize(tables: &BTreeMap<ResourceKind, Table>, price_per_credit: f64) -> UsageReport {
    let mut total_credits = 0.0;
    let mut kinds = Vec::new();
    for kind in ResourceKind::ALL {
        let Some(table) = tables.get(&kind) else {
            continue;
        };
        if table.is_empty() {
            continue;
        }
        let credits = table.sum(kind.schema().credit_column);
        total_credits += credits;
        kinds.push(KindSummary {
            kind,
            rows: table.len(),
            credits,
            cost: credits * price_per_credit,
            tiles: kind_tiles(kind, table, credits, price_per_credit),
            daily: daily_rollups(kind, table),
        });
    }
    let total_cost = total_credits * price_per_credit;
    UsageReport {
        price_per_credit,
        total_credits,
        total_cost,
        totals: vec![
            Tile::credits("Total Credits Consumed", total_credits),
            Tile::usd("Total Cost ($)", total_cost),
        ],
        kinds,
    }
}

fn kind_tiles(kind: ResourceKind, table: &Table, credits: f64, price: f64) -> Vec<Tile> {
    let entity = kind.schema().entity_column;
    let cost = Tile::usd("Total Cost ($)", credits * price);
    match kind {
        ResourceKind::Warehouse => vec![
            cost,
            Tile::credits("Total Credits", credits),
            Tile::credits("Compute Credits", table.sum("compute_credits_used")),
            Tile::credits(
                "Cloud Services Credits",
                table.sum("cloud_services_credits_used"),
            ),
        ],
        ResourceKind::ComputePool => vec![
            cost,
            Tile::count("Distinct Pools", table.distinct_count(entity)),
            Tile::credits("Total Credits", credits),
        ],
        ResourceKind::Pipe => vec![
            cost,
            Tile::count("Distinct Pipes", table.distinct_count(entity)),
            Tile::credits("Total Credits", credits),
            Tile::bytes("Total Data Inserted", table.sum("total_bytes_inserted")),
        ],
        ResourceKind::ServerlessTask => vec![
            cost,
            Tile::count("Distinct Tasks", table.distinct_count(entity)),
            Tile::credits("Total Credits", credits),
        ],
        ResourceKind::AnalyticsFunction => vec![
            cost,
            Tile::number("Total Queries", table.sum("qh_total_queries")),
            Tile::number("Total Rows Returned", table.sum("qh_total_rows_produced")),
            Tile::number("Total Tokens", table.sum("cf_total_tokens")),
            Tile::credits("Total Token Credits", credits),
        ],
    }
}

/// Groups rows by UTC day and entity, summing every measure the table has.
pub fn daily_rollups(kind: ResourceKind, table: &Table) -> Vec<DailyRollup> {
    let schema = kind.schema();
    let hour_index = table.column_index(HOUR_COLUMN);
    let entity_index = table.column_index(schema.entity_column);
    let measure_indexes: Vec<(&str, usize)> = schema
        .measures
        .iter()
        .filter_map(|column| table.column_index(column).map(|index| (*column, index)))
        .collect();
    let label_indexes: Vec<(&str, usize)> = schema
        .labels
        .iter()
        .filter_map(|column| table.column_index(column).map(|index| (*column, index)))
        .collect();

    let mut groups: BTreeMap<(Option<NaiveDate>, Option<String>), DailyRollup> = BTreeMap::new();
    for cells in table.rows() {
        let cell_at = |index: Option<usize>| index.and_then(|index| cells.get(index));
        let day = cell_at(hour_index)
            .and_then(Cell::as_text)
            .and_then(|value| bucket_day(&value));
        let entity = cell_at(entity_index).and_then(Cell::as_text);
        let rollup = groups
            .entry((day, entity.clone()))
            .or_insert_with(|| DailyRollup {
                day,
                entity,
                measures: measure_indexes
                    .iter()
                    .map(|(column, _)| (column.to_string(), 0.0))
                    .collect(),
                labels: BTreeMap::new(),
            });
        for (column, index) in &measure_indexes {
            let value = cells.get(*index).and_then(Cell::as_f64).unwrap_or(0.0);
            *rollup.measures.entry(column.to_string()).or_insert(0.0) += value;
        }
        for (column, index) in &label_indexes {
            if rollup.labels.contains_key(*column) {
                continue;
            }
            if let Some(value) = cells.get(*index).and_then(Cell::as_text) {
                rollup.labels.insert(column.to_string(), value);
            }
        }
    }
    groups.into_values().collect()
}

/// Truncates an hour-bucket timestamp to its UTC calendar day.
pub fn bucket_day(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc).date_naive());
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed.date());
        }
    }
    value
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Cell {
        Cell::Text(value.to_string())
    }

    fn warehouse_table() -> Table {
        Table::new(
            vec![
                "hour_start".to_string(),
                "warehouse_name".to_string(),
                "total_credits_used".to_string(),
                "compute_credits_used".to_string(),
                "cloud_services_credits_used".to_string(),
            ],
            vec![
                vec![
                    text("2025-01-01 10:00:00"),
                    text("WH_A"),
                    Cell::Real(1.25),
                    Cell::Real(1.0),
                    Cell::Real(0.25),
                ],
                vec![
                    text("2025-01-01 23:00:00"),
                    text("WH_A"),
                    Cell::Real(0.75),
                    Cell::Real(0.5),
                    Cell::Real(0.25),
                ],
                vec![
                    text("2025-01-02T00:00:00Z"),
                    text("WH_A"),
                    Cell::Real(2.0),
                    Cell::Real(2.0),
                    Cell::Null,
                ],
                vec![
                    text("2025-01-01 05:00:00"),
                    text("WH_B"),
                    Cell::Integer(3),
                    Cell::Integer(3),
                    Cell::Integer(0),
                ],
            ],
        )
    }

    fn pool_table() -> Table {
        Table::new(
            vec![
                "hour_start".to_string(),
                "compute_pool_name".to_string(),
                "total_credits_used".to_string(),
            ],
            vec![vec![text("2025-01-01 00:00:00"), text("POOL"), Cell::Real(4.0)]],
        )
    }

    #[test]
    fn total_cost_is_credits_times_price() {
        let mut tables = BTreeMap::new();
        tables.insert(ResourceKind::Warehouse, warehouse_table());
        tables.insert(ResourceKind::ComputePool, pool_table());
        let report = summarize(&tables, 3.0);
        assert_eq!(report.total_credits, 11.0);
        assert_eq!(report.total_cost, report.total_credits * 3.0);
        assert_eq!(report.totals[1].display, "$33.00");
        assert_eq!(report.kind_cost(ResourceKind::ComputePool), 12.0);
    }

    #[test]
    fn token_credits_count_towards_the_total() {
        let mut tables = BTreeMap::new();
        tables.insert(
            ResourceKind::AnalyticsFunction,
            Table::new(
                vec![
                    "hour_start".to_string(),
                    "cf_function_name".to_string(),
                    "cf_total_token_credits".to_string(),
                    "qh_total_queries".to_string(),
                ],
                vec![vec![
                    text("2025-01-01 00:00:00"),
                    text("COMPLETE"),
                    Cell::Real(0.5),
                    Cell::Integer(1_500),
                ]],
            ),
        );
        let report = summarize(&tables, 2.0);
        assert_eq!(report.total_credits, 0.5);
        let tiles = &report.kind(ResourceKind::AnalyticsFunction).expect("kind").tiles;
        assert_eq!(tiles[1].title, "Total Queries");
        assert_eq!(tiles[1].display, "1.5k");
        // Missing columns contribute zero rather than failing.
        assert_eq!(tiles[3].value, 0.0);
    }

    #[test]
    fn empty_tables_are_omitted() {
        let mut tables = BTreeMap::new();
        tables.insert(ResourceKind::Warehouse, warehouse_table());
        tables.insert(ResourceKind::Pipe, Table::empty());
        let report = summarize(&tables, 1.0);
        assert_eq!(report.kinds.len(), 1);
        assert!(report.kind(ResourceKind::Pipe).is_none());
        assert_eq!(report.kind_cost(ResourceKind::Pipe), 0.0);
    }

    #[test]
    fn daily_rollups_preserve_measure_sums() {
        let table = warehouse_table();
        let rollups = daily_rollups(ResourceKind::Warehouse, &table);
        assert_eq!(rollups.len(), 3);
        for column in ResourceKind::Warehouse.schema().measures {
            let rolled: f64 = rollups.iter().map(|rollup| rollup.measure(column)).sum();
            assert!((rolled - table.sum(column)).abs() < 1e-9, "{column}");
        }
        let first = &rollups[0];
        assert_eq!(first.day, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(first.entity.as_deref(), Some("WH_A"));
        assert_eq!(first.measure("total_credits_used"), 2.0);
    }

    #[test]
    fn rollups_keep_first_label_value() {
        let table = Table::new(
            vec![
                "hour_start".to_string(),
                "cf_function_name".to_string(),
                "cf_total_token_credits".to_string(),
                "cf_model_name".to_string(),
            ],
            vec![
                vec![
                    text("2025-01-01 01:00:00"),
                    text("COMPLETE"),
                    Cell::Real(1.0),
                    text("model-a"),
                ],
                vec![
                    text("2025-01-01 02:00:00"),
                    text("COMPLETE"),
                    Cell::Real(1.0),
                    text("model-b"),
                ],
            ],
        );
        let rollups = daily_rollups(ResourceKind::AnalyticsFunction, &table);
        assert_eq!(rollups.len(), 1);
        assert_eq!(rollups[0].labels["cf_model_name"], "model-a");
        assert_eq!(rollups[0].measure("cf_total_token_credits"), 2.0);
    }

    #[test]
    fn bucket_day_truncates_to_utc() {
        assert_eq!(
            bucket_day("2025-03-01T23:00:00-02:00"),
            NaiveDate::from_ymd_opt(2025, 3, 2)
        );
        assert_eq!(
            bucket_day("2025-03-01 07:00:00.000"),
            NaiveDate::from_ymd_opt(2025, 3, 1)
        );
        assert_eq!(bucket_day("garbage"), None);
    }
}
