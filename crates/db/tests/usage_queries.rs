mod support;

use frost_core::{FilterSpec, ResourceKind, parse_tag_document};
use frost_db::Db;

use support::{
    connect, insert_analytics, insert_pipe, insert_pool, insert_warehouse, range, setup_db,
    tag_document, warehouse_filter,
};

#[test]
fn unfiltered_fetch_bounds_time_inclusively() {
    let test_db = setup_db();
    let conn = connect(&test_db.path);
    insert_warehouse(&conn, "2025-01-01 00:00:00", "WH_A", 1.0, None);
    insert_warehouse(&conn, "2025-01-07 23:00:00", "WH_A", 2.0, None);
    insert_warehouse(&conn, "2025-01-08 00:00:00", "WH_A", 4.0, None);
    insert_warehouse(&conn, "2024-12-31 23:00:00", "WH_B", 8.0, None);

    let table = test_db
        .db
        .fetch_usage(ResourceKind::Warehouse, None, &range("2025-01-01", "2025-01-07"))
        .expect("fetch");
    assert_eq!(table.len(), 2);
    assert_eq!(table.sum("total_credits_used"), 3.0);
}

#[test]
fn iso_timestamps_compare_by_datetime() {
    let test_db = setup_db();
    let conn = connect(&test_db.path);
    insert_warehouse(&conn, "2025-01-03T10:00:00", "WH_A", 1.5, None);

    let table = test_db
        .db
        .fetch_usage(ResourceKind::Warehouse, None, &range("2025-01-01", "2025-01-07"))
        .expect("fetch");
    assert_eq!(table.len(), 1);
}

#[test]
fn names_match_exactly() {
    let test_db = setup_db();
    let conn = connect(&test_db.path);
    insert_warehouse(&conn, "2025-01-02 00:00:00", "WH_A", 1.0, None);
    insert_warehouse(&conn, "2025-01-02 00:00:00", "WH_AB", 2.0, None);
    insert_warehouse(&conn, "2025-01-02 00:00:00", "wh_a", 4.0, None);

    let filter = warehouse_filter(&["WH_A"], &[]);
    let table = test_db
        .db
        .fetch_usage(
            ResourceKind::Warehouse,
            Some(&filter),
            &range("2025-01-01", "2025-01-07"),
        )
        .expect("fetch");
    assert_eq!(table.len(), 1);
    assert_eq!(table.sum("total_credits_used"), 1.0);
}

#[test]
fn empty_name_list_returns_empty_table() {
    let test_db = setup_db();
    let conn = connect(&test_db.path);
    insert_pipe(&conn, "2025-01-02 00:00:00", "PIPE_A", 1.0, 1024);

    let filter = warehouse_filter(&["WH_A"], &[]);
    let table = test_db
        .db
        .fetch_usage(ResourceKind::Pipe, Some(&filter), &range("2025-01-01", "2025-01-07"))
        .expect("fetch");
    assert!(table.is_empty());
}

#[test]
fn tag_filter_keeps_only_matching_tags() {
    let test_db = setup_db();
    let conn = connect(&test_db.path);
    let both = tag_document(&[("cost_center", "finance"), ("team", "data")]);
    let other = tag_document(&[("team", "ml")]);
    insert_warehouse(&conn, "2025-01-02 00:00:00", "WH_A", 3.0, Some(&both));
    insert_warehouse(&conn, "2025-01-02 01:00:00", "WH_A", 5.0, Some(&other));
    insert_warehouse(&conn, "2025-01-02 02:00:00", "WH_A", 7.0, None);

    let filter = warehouse_filter(&["WH_A"], &["finance"]);
    let table = test_db
        .db
        .fetch_usage(
            ResourceKind::Warehouse,
            Some(&filter),
            &range("2025-01-01", "2025-01-07"),
        )
        .expect("fetch");
    assert_eq!(table.len(), 1);
    assert_eq!(table.sum("total_credits_used"), 3.0);
    assert_eq!(
        table.columns(),
        &[
            "hour_start",
            "warehouse_name",
            "total_credits_used",
            "compute_credits_used",
            "cloud_services_credits_used",
            "tags",
        ]
    );

    let tags = table
        .cell(0, "tags")
        .and_then(|cell| cell.as_text())
        .expect("tags cell");
    let pairs = parse_tag_document(&tags).expect("tag json");
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].tag_name.as_deref(), Some("cost_center"));
    assert_eq!(pairs[0].tag_value.as_deref(), Some("finance"));
}

#[test]
fn several_matching_tags_do_not_duplicate_rows() {
    let test_db = setup_db();
    let conn = connect(&test_db.path);
    let doc = tag_document(&[("cost_center", "finance"), ("owner", "ops")]);
    insert_warehouse(&conn, "2025-01-02 00:00:00", "WH_A", 2.5, Some(&doc));

    let filter = warehouse_filter(&["WH_A"], &["finance", "ops"]);
    let table = test_db
        .db
        .fetch_usage(
            ResourceKind::Warehouse,
            Some(&filter),
            &range("2025-01-01", "2025-01-07"),
        )
        .expect("fetch");
    assert_eq!(table.len(), 1);
    assert_eq!(table.sum("total_credits_used"), 2.5);
}

#[test]
fn compute_pools_ignore_tag_filter() {
    let test_db = setup_db();
    let conn = connect(&test_db.path);
    insert_pool(
        &conn,
        "2025-01-02 00:00:00",
        "POOL_A",
        6.0,
        Some(&tag_document(&[("team", "ml")])),
    );

    let filter = FilterSpec {
        compute_pools: Some(vec!["POOL_A".to_string()]),
        tags: Some(vec!["finance".to_string()]),
        ..FilterSpec::default()
    };
    let table = test_db
        .db
        .fetch_usage(
            ResourceKind::ComputePool,
            Some(&filter),
            &range("2025-01-01", "2025-01-07"),
        )
        .expect("fetch");
    assert_eq!(table.len(), 1);
}

#[test]
fn analytics_rows_ignore_names_and_tags() {
    let test_db = setup_db();
    let conn = connect(&test_db.path);
    insert_analytics(&conn, "2025-01-02 00:00:00", "COMPLETE", 0.75);
    insert_analytics(&conn, "2025-01-03 00:00:00", "SUMMARIZE", 0.25);

    let filter = warehouse_filter(&["WH_A"], &["finance"]);
    let table = test_db
        .db
        .fetch_usage(
            ResourceKind::AnalyticsFunction,
            Some(&filter),
            &range("2025-01-01", "2025-01-07"),
        )
        .expect("fetch");
    assert_eq!(table.len(), 2);
    assert_eq!(table.sum("cf_total_token_credits"), 1.0);
}

#[test]
fn attached_warehouse_is_queried() {
    let dir = tempfile::tempdir().expect("temp dir");
    let source_path = dir.path().join("warehouse.sqlite");
    {
        let conn = connect(&source_path);
        conn.execute_batch(include_str!("../migrations/source_views.sql"))
            .expect("views");
        insert_warehouse(&conn, "2025-01-02 00:00:00", "WH_REMOTE", 9.0, None);
    }

    let mut db = Db::open(dir.path().join("app.sqlite")).expect("open");
    db.migrate().expect("migrate");
    db.attach_warehouse(&source_path).expect("attach");

    let table = db
        .fetch_usage(ResourceKind::Warehouse, None, &range("2025-01-01", "2025-01-07"))
        .expect("fetch");
    assert_eq!(table.len(), 1);
    assert_eq!(
        table
            .cell(0, "warehouse_name")
            .and_then(|cell| cell.as_text())
            .as_deref(),
        Some("WH_REMOTE")
    );
}

#[test]
fn warehouse_tag_documents_are_distinct() {
    let test_db = setup_db();
    let conn = connect(&test_db.path);
    let doc = tag_document(&[("team", "data")]);
    insert_warehouse(&conn, "2025-01-02 00:00:00", "WH_A", 1.0, Some(&doc));
    insert_warehouse(&conn, "2025-01-02 01:00:00", "WH_A", 1.0, Some(&doc));
    insert_warehouse(&conn, "2025-01-02 02:00:00", "WH_B", 1.0, None);

    let documents = test_db.db.warehouse_tag_documents().expect("tags");
    assert_eq!(documents, vec![doc]);
}
