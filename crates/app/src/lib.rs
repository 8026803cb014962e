pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod services;
pub mod session;
pub mod startup;
pub mod util;

pub use app::{
    AppConfig, AppState, DEFAULT_CACHE_TTL, DEFAULT_PRICE_PER_CREDIT, DEFAULT_SESSION_IDLE_TIMEOUT,
};
pub use cache::{Cache, NoCache, TtlCache, cache_for};
pub use config::RangeParams;
pub use error::{ApiError, AppError, Result};
pub use services::{AppServices, ConsumptionReport, UsageKey, UsageOverview};
pub use session::{SessionPhase, SessionState, SessionStore};
pub use startup::{AppPaths, DB_FILE_NAME, ensure_app_data_dir};
pub use util::time::{parse_date, resolve_dates, today};
