use super::table::{ColumnDefinition, TableSummary};
use crate::engine::{Engine, Value};
use crate::error::{PlaygroundError, Result};
use tracing::debug;

pub const BROWSE_LIMIT: usize = 20;

const LIST_TABLES_SQL: &str = "SELECT name FROM sqlite_master WHERE type='table' ORDER BY name";

// PRAGMA table_info column positions.
const INFO_NAME: usize = 1;
const INFO_TYPE: usize = 2;
const INFO_PK: usize = 5;

/// Query that populates the console when a table entry is picked.
pub fn browse_query(table: &str) -> String {
    format!("SELECT * FROM {} LIMIT {};", table, BROWSE_LIMIT)
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Reads table metadata straight from the engine. Nothing is cached.
pub struct SchemaInspector<'a> {
    engine: &'a Engine,
}

impl<'a> SchemaInspector<'a> {
    pub fn new(engine: &'a Engine) -> Self {
        Self { engine }
    }

    pub fn list_tables(&self) -> Result<Vec<String>> {
        let results = self.engine.exec(LIST_TABLES_SQL)?;
        let Some(result) = results.into_iter().next() else {
            return Ok(Vec::new());
        };

        Ok(result
            .rows
            .into_iter()
            .filter_map(|row| match row.into_iter().next() {
                Some(Value::Text(name)) => Some(name),
                _ => None,
            })
            .collect())
    }

    pub fn describe(&self, table: &str) -> Result<TableSummary> {
        let info = self
            .engine
            .exec(&format!("PRAGMA table_info({})", quote_ident(table)))?;
        let info = info
            .into_iter()
            .next()
            .ok_or_else(|| PlaygroundError::UnknownTable(table.to_string()))?;

        let columns = info
            .rows
            .iter()
            .map(|row| ColumnDefinition {
                name: text_cell(row, INFO_NAME),
                declared_type: text_cell(row, INFO_TYPE),
                primary_key: matches!(row.get(INFO_PK), Some(Value::Integer(1))),
            })
            .collect();

        let counts = self
            .engine
            .exec(&format!("SELECT COUNT(*) FROM {}", quote_ident(table)))?;
        let row_count = match counts.first().and_then(|r| r.first_cell()) {
            Some(Value::Integer(n)) => *n,
            _ => 0,
        };

        debug!(table = %table, rows = row_count, "Described table");
        Ok(TableSummary {
            name: table.to_string(),
            columns,
            row_count,
        })
    }

    pub fn inspect(&self) -> Result<Vec<TableSummary>> {
        self.list_tables()?
            .iter()
            .map(|table| self.describe(table))
            .collect()
    }
}

fn text_cell(row: &[Value], idx: usize) -> String {
    row.get(idx).map(|v| v.to_string()).unwrap_or_default()
}
