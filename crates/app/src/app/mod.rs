use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::services::AppServices;
use crate::session::{SessionState, SessionStore};
use crate::util::time::today;
use frost_db::Db;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(600);
pub const DEFAULT_PRICE_PER_CREDIT: f64 = 3.0;
pub const DEFAULT_SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(4 * 60 * 60);

/// Paths and settings needed to run the dashboard backend.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub db_path: PathBuf,
    /// External warehouse file; usage views are read from `db_path` when unset.
    pub warehouse_path: Option<PathBuf>,
    pub cache_ttl: Duration,
    pub default_price_per_credit: f64,
    /// Sessions untouched this long are dropped when a new one opens.
    pub session_idle_timeout: Duration,
}

impl AppConfig {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            db_path,
            warehouse_path: None,
            cache_ttl: DEFAULT_CACHE_TTL,
            default_price_per_credit: DEFAULT_PRICE_PER_CREDIT,
            session_idle_timeout: DEFAULT_SESSION_IDLE_TIMEOUT,
        }
    }
}

/// Application state shared by frontend backends (HTTP, CLI).
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub services: AppServices,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let services = AppServices::new(&config);
        Self {
            config,
            services,
            sessions: SessionStore::new(),
        }
    }

    /// Migrates the settings tables. Without an external warehouse the usage
    /// views live in the app database, so they are created empty when absent.
    pub fn setup_db(&self) -> Result<()> {
        setup_db(&self.config.db_path, self.config.warehouse_path.is_none())
    }

    pub fn open_db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    pub fn new_session(&self) -> SessionState {
        SessionState::new(today(), self.config.default_price_per_credit)
    }

    /// Registers a fresh session under `id` and returns its initial state.
    pub fn open_session(&self, id: &str) -> SessionState {
        let dropped = self.sessions.sweep_idle(self.config.session_idle_timeout);
        if dropped > 0 {
            tracing::debug!(dropped, "idle sessions dropped");
        }
        let state = self.new_session();
        self.sessions.insert(id, state.clone());
        tracing::debug!(session = id, "session opened");
        state
    }

    pub fn close_session(&self, id: &str) -> Result<()> {
        if !self.sessions.remove(id) {
            return Err(AppError::NotFound(format!("session {} not found", id)));
        }
        tracing::debug!(session = id, "session closed");
        Ok(())
    }
}

pub fn setup_db(path: &Path, with_source_views: bool) -> Result<()> {
    let mut db = Db::open(path)?;
    db.migrate()?;
    if with_source_views {
        db.create_source_views()?;
    }
    Ok(())
}

pub fn open_db(config: &AppConfig) -> Result<Db> {
    let mut db = Db::open(&config.db_path)?;
    if let Some(warehouse) = &config.warehouse_path {
        db.attach_warehouse(warehouse)?;
    }
    Ok(db)
}
