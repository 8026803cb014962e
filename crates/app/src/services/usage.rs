use std::collections::BTreeMap;
use std::sync::Arc;

use frost_core::{FilterSpec, ResourceKind, Table, TimeRange};
use frost_db::Db;

use crate::cache::Cache;
use crate::error::Result;
use crate::services::{SharedConfig, open_db};

/// Identifies one cached query result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UsageKey {
    pub kind: ResourceKind,
    pub filter: Option<FilterSpec>,
    pub range: TimeRange,
}

impl UsageKey {
    pub fn new(kind: ResourceKind, filter: Option<&FilterSpec>, range: &TimeRange) -> Self {
        Self {
            kind,
            filter: filter.cloned(),
            range: range.clone(),
        }
    }
}

#[derive(Clone)]
pub struct UsageService {
    config: SharedConfig,
    cache: Arc<dyn Cache<UsageKey, Table>>,
}

impl UsageService {
    pub(super) fn new(config: SharedConfig, cache: Arc<dyn Cache<UsageKey, Table>>) -> Self {
        Self { config, cache }
    }

    pub fn fetch(
        &self,
        kind: ResourceKind,
        filter: Option<&FilterSpec>,
        range: &TimeRange,
    ) -> Result<Table> {
        let key = UsageKey::new(kind, filter, range);
        if let Some(table) = self.cached(&key) {
            return Ok(table);
        }
        let db = open_db(&self.config)?;
        self.load(&db, key)
    }

    /// One table per kind, in display order. Stops at the first failure.
    pub fn fetch_all(
        &self,
        filter: Option<&FilterSpec>,
        range: &TimeRange,
    ) -> Result<BTreeMap<ResourceKind, Table>> {
        let mut tables = BTreeMap::new();
        let mut misses = Vec::new();
        for kind in ResourceKind::ALL {
            let key = UsageKey::new(kind, filter, range);
            match self.cached(&key) {
                Some(table) => {
                    tables.insert(kind, table);
                }
                None => misses.push(key),
            }
        }
        // A fully cached pass never opens the database.
        if !misses.is_empty() {
            let db = open_db(&self.config)?;
            for key in misses {
                let kind = key.kind;
                tables.insert(kind, self.load(&db, key)?);
            }
        }
        Ok(tables)
    }

    fn cached(&self, key: &UsageKey) -> Option<Table> {
        let table = self.cache.get(key);
        tracing::debug!(kind = %key.kind, hit = table.is_some(), "usage cache lookup");
        table
    }

    fn load(&self, db: &Db, key: UsageKey) -> Result<Table> {
        let table = db
            .fetch_usage(key.kind, key.filter.as_ref(), &key.range)
            .inspect_err(|err| {
                tracing::warn!(kind = %key.kind, error = %err, "usage query failed");
            })?;
        self.cache.insert(key, table.clone());
        Ok(table)
    }
}
