mod error;
mod helpers;
mod migrations;
mod presets;
mod query;
mod usage;

use std::path::Path;

use rusqlite::{Connection, params};

pub use error::{DbError, Result};
pub use query::{QueryPlan, build_usage_query, is_skipped};

/// Schema name an attached warehouse database is mounted under.
pub const SOURCE_SCHEMA: &str = "source_data";

pub struct Db {
    conn: Connection,
    source_schema: String,
}

impl Db {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "temp_store", "MEMORY")?;
        conn.pragma_update(None, "cache_size", -20_000)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn,
            source_schema: "main".to_string(),
        })
    }

    /// Reads usage views from a separate warehouse file instead of `main`.
    pub fn attach_warehouse(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref().to_string_lossy().to_string();
        self.conn.execute(
            &format!("ATTACH DATABASE ?1 AS {}", SOURCE_SCHEMA),
            params![path],
        )?;
        self.source_schema = SOURCE_SCHEMA.to_string();
        Ok(())
    }
}
