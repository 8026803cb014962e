mod dashboard;
mod presets;
mod tags;
mod usage;

use std::sync::Arc;

use crate::app::AppConfig;
use crate::cache::cache_for;
use crate::error::Result;
use frost_db::Db;

pub use dashboard::{ConsumptionReport, DashboardService, UsageOverview};
pub use presets::PresetsService;
pub use tags::TagsService;
pub use usage::{UsageKey, UsageService};

type SharedConfig = Arc<AppConfig>;

/// Service registry for app-level operations.
#[derive(Clone)]
pub struct AppServices {
    pub usage: UsageService,
    pub tags: TagsService,
    pub presets: PresetsService,
    pub dashboard: DashboardService,
}

impl AppServices {
    pub fn new(config: &AppConfig) -> Self {
        let shared = Arc::new(config.clone());
        let usage = UsageService::new(shared.clone(), cache_for(config.cache_ttl));
        Self {
            tags: TagsService::new(shared.clone(), cache_for(config.cache_ttl)),
            presets: PresetsService::new(shared),
            dashboard: DashboardService::new(usage.clone()),
            usage,
        }
    }
}

/// Opens the app database with the warehouse attached when one is configured.
fn open_db(config: &SharedConfig) -> Result<Db> {
    crate::app::open_db(config)
}
