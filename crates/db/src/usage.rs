use frost_core::{FilterSpec, ResourceKind, TAGS_COLUMN, Table, TimeRange};

use crate::Db;
use crate::error::{DbError, Result};
use crate::helpers::{qualified, query_table, quote_ident};
use crate::migrations::table_columns;
use crate::query::{QueryPlan, build_usage_query};

impl Db {
    /// Lower-cased columns of the source view backing `kind`.
    pub fn view_columns(&self, kind: ResourceKind) -> Result<Vec<String>> {
        let view = kind.schema().view;
        let columns = table_columns(&self.conn, &self.source_schema, view)?;
        if columns.is_empty() {
            return Err(DbError::MissingView(format!(
                "{}.{}",
                self.source_schema, view
            )));
        }
        Ok(columns)
    }

    /// Hourly usage rows for `kind` inside `range`, narrowed by `filter`.
    ///
    /// A filter that scopes the kind to no names yields an empty table without
    /// touching the database.
    pub fn fetch_usage(
        &self,
        kind: ResourceKind,
        filter: Option<&FilterSpec>,
        range: &TimeRange,
    ) -> Result<Table> {
        if crate::is_skipped(kind, filter) {
            tracing::debug!(kind = %kind, "no names selected, skipping query");
            return Ok(Table::empty());
        }
        let columns = self.view_columns(kind)?;
        match build_usage_query(kind, &self.source_schema, &columns, filter, range) {
            QueryPlan::Skip => Ok(Table::empty()),
            QueryPlan::Select { sql, params } => {
                tracing::debug!(kind = %kind, sql = %sql, params = ?params, "usage query");
                let table = query_table(&self.conn, &sql, &params)?;
                tracing::debug!(kind = %kind, rows = table.len(), "usage rows fetched");
                Ok(table)
            }
        }
    }

    /// Distinct non-null tag documents attached to warehouse usage rows.
    pub fn warehouse_tag_documents(&self) -> Result<Vec<String>> {
        let view = ResourceKind::Warehouse.schema().view;
        let columns = self.view_columns(ResourceKind::Warehouse)?;
        if !columns.iter().any(|column| column == TAGS_COLUMN) {
            return Ok(Vec::new());
        }
        let tags = quote_ident(TAGS_COLUMN);
        let sql = format!(
            "SELECT DISTINCT {tags} FROM {} WHERE {tags} IS NOT NULL",
            qualified(&self.source_schema, view)
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let documents = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(documents)
    }
}
