use serde::Deserialize;

use frost_core::{FilterInputs, ResourceKind};

#[derive(Debug, Deserialize, Default)]
pub struct EmptyRequest {}

#[derive(Debug, Deserialize)]
pub struct SessionDatesRequest {
    pub range: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SessionPriceRequest {
    pub price_per_credit: f64,
}

#[derive(Debug, Deserialize)]
pub struct TagSubmitRequest {
    pub tag: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PresetSelectRequest {
    pub name: String,
}

/// Form fields to save and submit; the session's selected tag is stored with
/// them.
#[derive(Debug, Deserialize)]
pub struct PresetSaveRequest {
    pub name: String,
    #[serde(flatten)]
    pub inputs: FilterInputs,
}

#[derive(Debug, Deserialize)]
pub struct UsageTableRequest {
    pub kind: ResourceKind,
}

#[derive(Debug, Deserialize)]
pub struct GrowthRateRequest {
    pub kind: ResourceKind,
    pub rate: f64,
}
