#![allow(dead_code)]

use std::path::{Path, PathBuf};

use frost_core::{FilterSpec, TimeRange};
use frost_db::Db;
use rusqlite::{Connection, params};
use tempfile::TempDir;

pub struct TestDb {
    pub _dir: TempDir,
    pub db: Db,
    pub path: PathBuf,
}

/// A migrated settings database with empty usage views in `main`.
pub fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("test.sqlite");
    let mut db = Db::open(&path).expect("open db");
    db.migrate().expect("migrate db");
    db.create_source_views().expect("source views");
    TestDb {
        _dir: dir,
        db,
        path,
    }
}

pub fn connect(path: &Path) -> Connection {
    Connection::open(path).expect("open seed conn")
}

pub fn range(start: &str, end: &str) -> TimeRange {
    TimeRange {
        start: format!("{start} 00:00:00"),
        end: format!("{end} 23:59:59"),
    }
}

pub fn tag_document(pairs: &[(&str, &str)]) -> String {
    let items = pairs
        .iter()
        .map(|(name, value)| serde_json::json!({ "tag_name": name, "tag_value": value }))
        .collect::<Vec<_>>();
    serde_json::Value::Array(items).to_string()
}

pub fn insert_warehouse(conn: &Connection, hour: &str, name: &str, credits: f64, tags: Option<&str>) {
    conn.execute(
        r#"
        INSERT INTO MV_WAREHOUSE_USAGE (
          HOUR_START, WAREHOUSE_NAME, TOTAL_CREDITS_USED, COMPUTE_CREDITS_USED,
          CLOUD_SERVICES_CREDITS_USED, TAGS
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
        params![hour, name, credits, credits * 0.8, credits * 0.2, tags],
    )
    .expect("insert warehouse row");
}

pub fn insert_pool(conn: &Connection, hour: &str, name: &str, credits: f64, tags: Option<&str>) {
    conn.execute(
        "INSERT INTO MV_SPCS_USAGE (HOUR_START, COMPUTE_POOL_NAME, TOTAL_CREDITS_USED, TAGS) VALUES (?1, ?2, ?3, ?4)",
        params![hour, name, credits, tags],
    )
    .expect("insert pool row");
}

pub fn insert_pipe(conn: &Connection, hour: &str, name: &str, credits: f64, bytes: i64) {
    conn.execute(
        r#"
        INSERT INTO MV_PIPE_USAGE (
          HOUR_START, PIPE_NAME, TOTAL_CREDITS_USED, TOTAL_BYTES_INSERTED, TOTAL_FILES_INSERTED, TAGS
        ) VALUES (?1, ?2, ?3, ?4, 1, NULL)
        "#,
        params![hour, name, credits, bytes],
    )
    .expect("insert pipe row");
}

pub fn insert_analytics(conn: &Connection, hour: &str, function: &str, credits: f64) {
    conn.execute(
        r#"
        INSERT INTO MV_CORTEX_FUNCTION_CREDIT_USAGE (
          HOUR_START, CF_FUNCTION_NAME, CF_MODEL_NAME, CF_TOTAL_TOKENS, CF_TOTAL_TOKEN_CREDITS,
          QH_QUERY_TYPE, QH_WAREHOUSE_NAME, QH_TOTAL_QUERIES, QH_TOTAL_ROWS_PRODUCED,
          QH_TOTAL_ROWS_UPDATED, QH_TOTAL_CREDITS_USED_CLOUD_SERVICES
        ) VALUES (?1, ?2, 'model-a', 1000, ?3, 'SELECT', 'WH_A', 2, 10, 0, 0.01)
        "#,
        params![hour, function, credits],
    )
    .expect("insert analytics row");
}

pub fn warehouse_filter(names: &[&str], tags: &[&str]) -> FilterSpec {
    let list = |values: &[&str]| {
        (!values.is_empty()).then(|| values.iter().map(|value| value.to_string()).collect())
    };
    FilterSpec {
        warehouses: list(names),
        tags: list(tags),
        ..FilterSpec::default()
    }
}
