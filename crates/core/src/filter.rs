use serde::{Deserialize, Serialize};

use crate::kind::ResourceKind;

/// Active scoping criteria for one dashboard query pass.
///
/// Name lists never hold empty entries and are never empty: an empty list is
/// stored as `None`, which keeps saved presets comparable after a round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSpec {
    pub warehouses: Option<Vec<String>>,
    pub pipes: Option<Vec<String>>,
    pub serverless_tasks: Option<Vec<String>>,
    pub compute_pools: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub selected_tag: Option<String>,
}

/// How a filter scopes a single resource kind by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameScope<'a> {
    /// The kind is not scoped by names at all.
    Unscoped,
    /// The kind is scoped, but no names were supplied: nothing matches.
    Empty,
    Names(&'a [String]),
}

impl FilterSpec {
    pub fn from_inputs(inputs: &FilterInputs) -> Self {
        Self {
            warehouses: parse_name_list(&inputs.warehouses),
            pipes: parse_name_list(&inputs.pipes),
            serverless_tasks: parse_name_list(&inputs.serverless_tasks),
            compute_pools: parse_name_list(&inputs.compute_pools),
            tags: parse_name_list(&inputs.tags),
            selected_tag: inputs
                .selected_tag
                .as_deref()
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string),
        }
    }

    fn name_list(&self, kind: ResourceKind) -> Option<&Vec<String>> {
        match kind {
            ResourceKind::Warehouse => self.warehouses.as_ref(),
            ResourceKind::ComputePool => self.compute_pools.as_ref(),
            ResourceKind::Pipe => self.pipes.as_ref(),
            ResourceKind::ServerlessTask => self.serverless_tasks.as_ref(),
            ResourceKind::AnalyticsFunction => None,
        }
    }

    pub fn names(&self, kind: ResourceKind) -> NameScope<'_> {
        if !kind.schema().name_scoped {
            return NameScope::Unscoped;
        }
        match self.name_list(kind) {
            Some(names) if !names.is_empty() => NameScope::Names(names),
            _ => NameScope::Empty,
        }
    }

    pub fn tag_values(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }
}

/// Raw form fields as the user typed them; also the persisted preset document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterInputs {
    pub warehouses: String,
    pub tags: String,
    pub pipes: String,
    pub serverless_tasks: String,
    pub compute_pools: String,
    pub selected_tag: Option<String>,
}

impl FilterInputs {
    pub fn from_spec(spec: &FilterSpec) -> Self {
        Self {
            warehouses: join_name_list(&spec.warehouses),
            tags: join_name_list(&spec.tags),
            pipes: join_name_list(&spec.pipes),
            serverless_tasks: join_name_list(&spec.serverless_tasks),
            compute_pools: join_name_list(&spec.compute_pools),
            selected_tag: spec.selected_tag.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPreset {
    pub name: String,
    pub spec: FilterSpec,
}

impl FilterPreset {
    pub fn from_document(name: &str, document: &str) -> serde_json::Result<Self> {
        let inputs: FilterInputs = serde_json::from_str(document)?;
        Ok(Self {
            name: name.to_string(),
            spec: FilterSpec::from_inputs(&inputs),
        })
    }

    pub fn to_document(&self) -> serde_json::Result<String> {
        serde_json::to_string(&FilterInputs::from_spec(&self.spec))
    }
}

/// Splits a comma-separated input, trimming entries and dropping blanks.
pub fn parse_name_list(value: &str) -> Option<Vec<String>> {
    let names = value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect::<Vec<_>>();
    if names.is_empty() { None } else { Some(names) }
}

fn join_name_list(names: &Option<Vec<String>>) -> String {
    names.as_ref().map(|names| names.join(",")).unwrap_or_default()
}
