use frost_core::{FilterSpec, HOUR_COLUMN, NameScope, ResourceKind, TAGS_COLUMN, TimeRange};

use crate::helpers::{placeholders, qualified, quote_ident};

/// A read query against one usage view, or the decision not to run one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPlan {
    /// The filter names no resources of this kind: the result is empty.
    Skip,
    Select { sql: String, params: Vec<String> },
}

/// True when `filter` scopes `kind` by name but supplies no names.
pub fn is_skipped(kind: ResourceKind, filter: Option<&FilterSpec>) -> bool {
    filter.is_some_and(|filter| filter.names(kind) == NameScope::Empty)
}

/// Builds the query for `kind` given the view's (lower-cased) columns.
///
/// `filter = None` means "all data": only the time range applies. With a
/// filter, the entity must be one of the listed names and, for tag-filterable
/// views, at least one attached tag must carry one of the listed values. Rows
/// that pass the tag filter keep only their matching tags.
pub fn build_usage_query(
    kind: ResourceKind,
    source_schema: &str,
    columns: &[String],
    filter: Option<&FilterSpec>,
    range: &TimeRange,
) -> QueryPlan {
    if is_skipped(kind, filter) {
        return QueryPlan::Skip;
    }
    let schema = kind.schema();
    let view = qualified(source_schema, schema.view);
    let entity = quote_ident(schema.entity_column);
    let hour = quote_ident(HOUR_COLUMN);
    let has_column = |name: &str| columns.iter().any(|column| column == name);

    let mut predicates = Vec::new();
    let mut where_params = Vec::new();
    let mut tag_values: &[String] = &[];
    if let Some(filter) = filter {
        if let NameScope::Names(names) = filter.names(kind) {
            predicates.push(format!("base.{} IN ({})", entity, placeholders(names.len())));
            where_params.extend(names.iter().cloned());
        }
        if schema.tag_filterable && has_column(TAGS_COLUMN) {
            tag_values = filter.tag_values();
        }
    }
    predicates.push(format!(
        "datetime(base.{hour}) BETWEEN datetime(?) AND datetime(?)"
    ));
    where_params.push(range.start.clone());
    where_params.push(range.end.clone());

    let mut params = Vec::new();
    let (select_list, join) = if tag_values.is_empty() {
        ("base.*".to_string(), String::new())
    } else {
        let select_list = columns
            .iter()
            .map(|column| {
                if column == TAGS_COLUMN {
                    format!("matched.filtered_tags AS {}", quote_ident(TAGS_COLUMN))
                } else {
                    format!("base.{}", quote_ident(column))
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        let tags = quote_ident(TAGS_COLUMN);
        let join = format!(
            r#"
            INNER JOIN (
              SELECT t.{hour} AS tag_hour_start,
                     t.{entity} AS resource_name,
                     json_group_array(json_object(
                       'tag_name', json_extract(f.value, '$.tag_name'),
                       'tag_value', json_extract(f.value, '$.tag_value')
                     )) AS filtered_tags
              FROM {view} AS t, json_each(t.{tags}) AS f
              WHERE json_extract(f.value, '$.tag_value') IN ({values})
              GROUP BY t.{hour}, t.{entity}
            ) AS matched
            ON base.{hour} = matched.tag_hour_start AND base.{entity} = matched.resource_name
            "#,
            values = placeholders(tag_values.len()),
        );
        params.extend(tag_values.iter().cloned());
        (select_list, join)
    };
    params.extend(where_params);

    let order = if has_column(schema.entity_column) {
        format!("base.{hour}, base.{entity}")
    } else {
        format!("base.{hour}")
    };
    let sql = format!(
        "SELECT {select_list} FROM {view} AS base {join} WHERE {predicates} ORDER BY {order}",
        predicates = predicates.join(" AND "),
    );
    QueryPlan::Select { sql, params }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn range() -> TimeRange {
        TimeRange {
            start: "2025-01-01 00:00:00".to_string(),
            end: "2025-01-07 23:59:59".to_string(),
        }
    }

    fn warehouse_columns() -> Vec<String> {
        columns(&["hour_start", "warehouse_name", "total_credits_used", "tags"])
    }

    #[test]
    fn empty_names_skip_the_query() {
        let filter = FilterSpec {
            pipes: Some(vec!["PIPE_A".to_string()]),
            ..FilterSpec::default()
        };
        for kind in [
            ResourceKind::Warehouse,
            ResourceKind::ComputePool,
            ResourceKind::ServerlessTask,
        ] {
            assert_eq!(
                build_usage_query(kind, "main", &[], Some(&filter), &range()),
                QueryPlan::Skip
            );
        }
    }

    #[test]
    fn no_filter_only_bounds_time() {
        let QueryPlan::Select { sql, params } = build_usage_query(
            ResourceKind::Warehouse,
            "main",
            &warehouse_columns(),
            None,
            &range(),
        ) else {
            panic!("expected select");
        };
        assert!(!sql.contains(" IN ("));
        assert!(!sql.contains("json_each"));
        assert_eq!(params, vec![range().start, range().end]);
    }

    #[test]
    fn tag_params_precede_name_params() {
        let filter = FilterSpec {
            warehouses: Some(vec!["WH_A".to_string(), "WH_B".to_string()]),
            tags: Some(vec!["finance".to_string()]),
            ..FilterSpec::default()
        };
        let QueryPlan::Select { sql, params } = build_usage_query(
            ResourceKind::Warehouse,
            "main",
            &warehouse_columns(),
            Some(&filter),
            &range(),
        ) else {
            panic!("expected select");
        };
        assert!(sql.contains("json_each"));
        assert!(sql.contains("matched.filtered_tags AS \"tags\""));
        assert_eq!(
            params,
            vec![
                "finance".to_string(),
                "WH_A".to_string(),
                "WH_B".to_string(),
                range().start,
                range().end,
            ]
        );
    }

    #[test]
    fn compute_pools_ignore_tag_values() {
        let filter = FilterSpec {
            compute_pools: Some(vec!["POOL".to_string()]),
            tags: Some(vec!["finance".to_string()]),
            ..FilterSpec::default()
        };
        let QueryPlan::Select { sql, params } = build_usage_query(
            ResourceKind::ComputePool,
            "main",
            &columns(&["hour_start", "compute_pool_name", "total_credits_used", "tags"]),
            Some(&filter),
            &range(),
        ) else {
            panic!("expected select");
        };
        assert!(!sql.contains("json_each"));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn views_without_tags_skip_tag_filter() {
        let filter = FilterSpec {
            tags: Some(vec!["finance".to_string()]),
            ..FilterSpec::default()
        };
        let QueryPlan::Select { sql, params } = build_usage_query(
            ResourceKind::AnalyticsFunction,
            "source_data",
            &columns(&["hour_start", "cf_function_name", "cf_total_token_credits"]),
            Some(&filter),
            &range(),
        ) else {
            panic!("expected select");
        };
        assert!(sql.contains("\"source_data\".\"mv_cortex_function_credit_usage\""));
        assert!(!sql.contains("json_each"));
        assert_eq!(params.len(), 2);
    }
}
