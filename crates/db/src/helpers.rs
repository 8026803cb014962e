use frost_core::{Cell, Table};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, params_from_iter};

use crate::error::Result;

pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub(crate) fn qualified(schema: &str, object: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(object))
}

pub(crate) fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn cell_from_ref(value: ValueRef<'_>) -> Cell {
    match value {
        ValueRef::Null => Cell::Null,
        ValueRef::Integer(value) => Cell::Integer(value),
        ValueRef::Real(value) => Cell::Real(value),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Cell::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

/// Runs a read query and collects every row into a [`Table`].
pub(crate) fn query_table(conn: &Connection, sql: &str, params: &[String]) -> Result<Table> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(|name| name.to_ascii_lowercase())
        .collect();
    let mut rows = stmt.query(params_from_iter(params.iter()))?;
    let mut cells = Vec::new();
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(columns.len());
        for index in 0..columns.len() {
            values.push(cell_from_ref(row.get_ref(index)?));
        }
        cells.push(values);
    }
    Ok(Table::new(columns, cells))
}
