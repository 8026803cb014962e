use frost_core::{FilterInputs, FilterPreset, FilterSpec};

use crate::error::{AppError, Result};
use crate::services::{SharedConfig, open_db};

#[derive(Clone)]
pub struct PresetsService {
    config: SharedConfig,
}

impl PresetsService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    pub fn list(&self) -> Result<Vec<String>> {
        let db = open_db(&self.config)?;
        Ok(db.list_filter_ids()?)
    }

    pub fn load(&self, name: &str) -> Result<FilterPreset> {
        let db = open_db(&self.config)?;
        let document = db
            .get_filter_document(name)?
            .ok_or_else(|| AppError::NotFound(format!("preset {} not found", name)))?;
        FilterPreset::from_document(name, &document).map_err(|err| {
            tracing::warn!(preset = name, error = %err, "malformed preset document");
            AppError::InvalidInput(format!("preset {} is malformed: {}", name, err))
        })
    }

    /// The preset's fields in form shape, ready to load into a session.
    pub fn load_inputs(&self, name: &str) -> Result<FilterInputs> {
        let preset = self.load(name)?;
        Ok(FilterInputs::from_spec(&preset.spec))
    }

    /// Upserts `inputs` under `name`; an existing preset is overwritten.
    pub fn save(&self, name: &str, inputs: &FilterInputs) -> Result<FilterPreset> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidInput(
                "preset name is required".to_string(),
            ));
        }
        let preset = FilterPreset {
            name: name.to_string(),
            spec: FilterSpec::from_inputs(inputs),
        };
        let document = preset.to_document()?;
        let db = open_db(&self.config)?;
        db.upsert_filter_document(&preset.name, &document)?;
        tracing::info!(preset = %preset.name, "filter preset saved");
        Ok(preset)
    }
}
