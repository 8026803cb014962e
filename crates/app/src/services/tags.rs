use std::sync::Arc;

use frost_core::tag_catalog;

use crate::cache::Cache;
use crate::error::Result;
use crate::services::{SharedConfig, open_db};

#[derive(Clone)]
pub struct TagsService {
    config: SharedConfig,
    cache: Arc<dyn Cache<(), Vec<String>>>,
}

impl TagsService {
    pub(super) fn new(config: SharedConfig, cache: Arc<dyn Cache<(), Vec<String>>>) -> Self {
        Self { config, cache }
    }

    /// Known warehouse tag names behind a leading `""` for "no tag".
    pub fn list(&self) -> Result<Vec<String>> {
        if let Some(tags) = self.cache.get(&()) {
            tracing::debug!("tag catalog cache hit");
            return Ok(tags);
        }
        let db = open_db(&self.config)?;
        let documents = db.warehouse_tag_documents()?;
        let tags = tag_catalog(documents.iter().map(String::as_str)).inspect_err(|err| {
            tracing::warn!(error = %err, "malformed warehouse tag document");
        })?;
        tracing::debug!(count = tags.len() - 1, "tag catalog loaded");
        self.cache.insert((), tags.clone());
        Ok(tags)
    }
}
