use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Hour-bucket column shared by every usage view.
pub const HOUR_COLUMN: &str = "hour_start";
/// Semi-structured tag list column (JSON array of `{tag_name, tag_value}`).
pub const TAGS_COLUMN: &str = "tags";

/// Billable resource categories, in dashboard display order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Warehouse,
    ComputePool,
    Pipe,
    ServerlessTask,
    AnalyticsFunction,
}

/// Static description of one kind's pre-aggregated usage view.
#[derive(Debug)]
pub struct KindSchema {
    pub view: &'static str,
    pub entity_column: &'static str,
    pub credit_column: &'static str,
    /// Numeric columns summed by rollups, primary credit column included.
    pub measures: &'static [&'static str],
    /// Descriptive columns carried through rollups as the first value seen.
    pub labels: &'static [&'static str],
    pub name_scoped: bool,
    pub carries_tags: bool,
    pub tag_filterable: bool,
    pub display_name: &'static str,
}

const WAREHOUSE: KindSchema = KindSchema {
    view: "mv_warehouse_usage",
    entity_column: "warehouse_name",
    credit_column: "total_credits_used",
    measures: &[
        "total_credits_used",
        "compute_credits_used",
        "cloud_services_credits_used",
    ],
    labels: &[],
    name_scoped: true,
    carries_tags: true,
    tag_filterable: true,
    display_name: "Warehouse",
};

const COMPUTE_POOL: KindSchema = KindSchema {
    view: "mv_spcs_usage",
    entity_column: "compute_pool_name",
    credit_column: "total_credits_used",
    measures: &["total_credits_used"],
    labels: &[],
    name_scoped: true,
    carries_tags: true,
    // Pools are matched by exact name only.
    tag_filterable: false,
    display_name: "Compute Pool",
};

const PIPE: KindSchema = KindSchema {
    view: "mv_pipe_usage",
    entity_column: "pipe_name",
    credit_column: "total_credits_used",
    measures: &["total_credits_used", "total_bytes_inserted"],
    labels: &[],
    name_scoped: true,
    carries_tags: true,
    tag_filterable: true,
    display_name: "Pipe",
};

const SERVERLESS_TASK: KindSchema = KindSchema {
    view: "mv_serverless_task_usage",
    entity_column: "task_name",
    credit_column: "total_credits_used",
    measures: &["total_credits_used"],
    labels: &[],
    name_scoped: true,
    carries_tags: true,
    tag_filterable: true,
    display_name: "Serverless Task",
};

const ANALYTICS_FUNCTION: KindSchema = KindSchema {
    view: "mv_cortex_function_credit_usage",
    entity_column: "cf_function_name",
    credit_column: "cf_total_token_credits",
    measures: &[
        "cf_total_token_credits",
        "qh_total_queries",
        "qh_total_rows_produced",
        "qh_total_rows_updated",
        "qh_total_credits_used_cloud_services",
        "cf_total_tokens",
    ],
    labels: &["cf_model_name", "qh_query_type", "qh_warehouse_name"],
    name_scoped: false,
    carries_tags: false,
    tag_filterable: false,
    display_name: "Analytics Function",
};

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Warehouse,
        ResourceKind::ComputePool,
        ResourceKind::Pipe,
        ResourceKind::ServerlessTask,
        ResourceKind::AnalyticsFunction,
    ];

    pub fn schema(self) -> &'static KindSchema {
        match self {
            ResourceKind::Warehouse => &WAREHOUSE,
            ResourceKind::ComputePool => &COMPUTE_POOL,
            ResourceKind::Pipe => &PIPE,
            ResourceKind::ServerlessTask => &SERVERLESS_TASK,
            ResourceKind::AnalyticsFunction => &ANALYTICS_FUNCTION,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Warehouse => "warehouse",
            ResourceKind::ComputePool => "compute_pool",
            ResourceKind::Pipe => "pipe",
            ResourceKind::ServerlessTask => "serverless_task",
            ResourceKind::AnalyticsFunction => "analytics_function",
        }
    }

    pub fn display_name(self) -> &'static str {
        self.schema().display_name
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported resource kind {}", self.0)
    }
}

impl std::error::Error for UnknownKind {}

impl FromStr for ResourceKind {
    type Err = UnknownKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| UnknownKind(value.to_string()))
    }
}
