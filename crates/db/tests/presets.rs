mod support;

use frost_core::{FilterInputs, FilterPreset};

#[test]
fn presets_upsert_and_list_sorted() {
    let test_db = support::setup_db();
    let db = &test_db.db;
    assert!(db.list_filter_ids().expect("list").is_empty());

    db.upsert_filter_document("weekly", r#"{"warehouses":"WH_A"}"#)
        .expect("save weekly");
    db.upsert_filter_document("finance", r#"{"tags":"finance"}"#)
        .expect("save finance");
    db.upsert_filter_document("weekly", r#"{"warehouses":"WH_B"}"#)
        .expect("overwrite weekly");

    assert_eq!(
        db.list_filter_ids().expect("list"),
        vec!["finance".to_string(), "weekly".to_string()]
    );
    assert_eq!(
        db.get_filter_document("weekly").expect("get").as_deref(),
        Some(r#"{"warehouses":"WH_B"}"#)
    );
    assert_eq!(db.get_filter_document("missing").expect("get"), None);
}

#[test]
fn stored_document_loads_into_preset() {
    let test_db = support::setup_db();
    let inputs = FilterInputs {
        warehouses: "WH_A, WH_B".to_string(),
        tags: "finance".to_string(),
        ..FilterInputs::default()
    };
    let preset = FilterPreset {
        name: "team".to_string(),
        spec: frost_core::FilterSpec::from_inputs(&inputs),
    };
    let document = preset.to_document().expect("encode");
    test_db
        .db
        .upsert_filter_document(&preset.name, &document)
        .expect("save");

    let stored = test_db
        .db
        .get_filter_document("team")
        .expect("get")
        .expect("present");
    let loaded = FilterPreset::from_document("team", &stored).expect("decode");
    assert_eq!(loaded, preset);
}
