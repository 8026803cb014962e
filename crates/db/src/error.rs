#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("source view {0} not found")]
    MissingView(String),
}

pub type Result<T> = std::result::Result<T, DbError>;
