use serde::Serialize;

use frost_app::SessionState;
use frost_core::{Projection, ReceiptLine, ResourceKind, Table, UsageRecord};

#[derive(Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub state: SessionState,
}

#[derive(Serialize)]
pub struct SessionClosedResponse {
    pub session_id: String,
    pub closed: bool,
}

#[derive(Serialize)]
pub struct TagsResponse {
    pub tags: Vec<String>,
    pub selected_tag: Option<String>,
}

#[derive(Serialize)]
pub struct PresetsResponse {
    pub presets: Vec<String>,
    pub selected_preset: Option<String>,
}

#[derive(Serialize)]
pub struct UsageTableResponse {
    pub kind: ResourceKind,
    pub display_name: &'static str,
    pub table: Table,
    /// The same rows with measures, labels and parsed tags.
    pub records: Vec<UsageRecord>,
}

#[derive(Serialize)]
pub struct GrowthControl {
    pub kind: ResourceKind,
    pub display_name: &'static str,
    pub growth_rate: f64,
    pub current_cost: f64,
}

#[derive(Serialize)]
pub struct ProjectionResponse {
    pub controls: Vec<GrowthControl>,
    pub projection: Projection,
    pub receipt: Vec<ReceiptLine>,
}
