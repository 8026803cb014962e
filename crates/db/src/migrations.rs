use rusqlite::{Connection, params};

use crate::Db;
use crate::error::Result;

const MIGRATION_0001: &str = include_str!("../migrations/0001_filter_settings.sql");
const SOURCE_VIEWS: &str = include_str!("../migrations/source_views.sql");

const MIGRATIONS: &[(&str, &str)] = &[("0001_filter_settings", MIGRATION_0001)];

impl Db {
    pub fn migrate(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        for (name, sql) in MIGRATIONS {
            tracing::debug!(migration = *name, "applying migration");
            tx.execute_batch(sql)?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Creates empty usage views in `main` for a local warehouse.
    pub fn create_source_views(&self) -> Result<()> {
        self.conn.execute_batch(SOURCE_VIEWS)?;
        Ok(())
    }

    pub fn table_has_column(&self, table: &str, column: &str) -> Result<bool> {
        Ok(table_columns(&self.conn, "main", table)?
            .iter()
            .any(|name| name.eq_ignore_ascii_case(column)))
    }
}

/// Lower-cased column names of `schema.table`, empty when the table is absent.
pub(crate) fn table_columns(conn: &Connection, schema: &str, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1, ?2) ORDER BY cid")?;
    let columns = stmt
        .query_map(params![table, schema], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(columns
        .into_iter()
        .map(|name| name.to_ascii_lowercase())
        .collect())
}
