use rusqlite::{OptionalExtension, params};

use crate::Db;
use crate::error::Result;

impl Db {
    /// Names of every saved filter preset, alphabetically.
    pub fn list_filter_ids(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT filter_id FROM filter_setting ORDER BY filter_id")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    pub fn get_filter_document(&self, filter_id: &str) -> Result<Option<String>> {
        let document = self
            .conn
            .query_row(
                "SELECT filter_data FROM filter_setting WHERE filter_id = ?1",
                [filter_id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(document)
    }

    /// Saves `document` under `filter_id`, replacing any previous version.
    pub fn upsert_filter_document(&self, filter_id: &str, document: &str) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO filter_setting (filter_id, filter_data, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(filter_id) DO UPDATE SET
              filter_data = excluded.filter_data,
              updated_at = excluded.updated_at
            "#,
            params![filter_id, document],
        )?;
        Ok(())
    }
}
