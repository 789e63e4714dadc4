//! In-memory SQLite engine the playground runs every statement against.
//!
//! `exec` mirrors the classic browser-SQLite contract: every statement in the
//! text is stepped in order and each statement that yields at least one row
//! contributes one result set. DDL, DML and row-less SELECTs contribute none.

mod value;

pub use value::Value;

use crate::error::Result;
use rusqlite::types::Value as SqlValue;
use rusqlite::{Batch, Connection};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryResult {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn first_cell(&self) -> Option<&Value> {
        self.rows.first().and_then(|row| row.first())
    }
}

pub struct Engine {
    conn: Connection,
}

impl Engine {
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        info!("SQL engine initialized (in-memory)");
        Ok(Self { conn })
    }

    pub fn exec(&self, sql: &str) -> Result<Vec<QueryResult>> {
        let mut results = Vec::new();
        let mut batch = Batch::new(&self.conn, sql);

        while let Some(mut stmt) = batch.next()? {
            let columns: Vec<String> = stmt
                .column_names()
                .into_iter()
                .map(String::from)
                .collect();
            let column_count = columns.len();

            // Placeholders the text leaves unbound read as NULL.
            let unbound = vec![SqlValue::Null; stmt.parameter_count()];
            let mut rows = stmt.query(rusqlite::params_from_iter(unbound.iter()))?;
            let mut values = Vec::new();
            while let Some(row) = rows.next()? {
                let mut cells = Vec::with_capacity(column_count);
                for i in 0..column_count {
                    cells.push(Value::from_ref(row.get_ref(i)?));
                }
                values.push(cells);
            }

            if !values.is_empty() {
                results.push(QueryResult {
                    columns,
                    rows: values,
                });
            }
        }

        debug!(result_sets = results.len(), "Statement batch executed");
        Ok(results)
    }

    /// Runs one parameterized statement, returning the number of changed rows.
    pub fn run(&self, sql: &str, params: &[SqlValue]) -> Result<usize> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        Ok(stmt.execute(rusqlite::params_from_iter(params.iter()))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with_people() -> Engine {
        let engine = Engine::in_memory().unwrap();
        engine
            .exec(
                "CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT, score REAL);
                 INSERT INTO people VALUES (1, 'Ana', 9.5), (2, 'Bruno', NULL);",
            )
            .unwrap();
        engine
    }

    #[test]
    fn test_exec_mutations_yield_no_result_sets() {
        let engine = Engine::in_memory().unwrap();
        let results = engine
            .exec("CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (1);")
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_exec_select_yields_one_result_set() {
        let engine = engine_with_people();
        let results = engine
            .exec("SELECT id, name, score FROM people ORDER BY id")
            .unwrap();

        assert_eq!(results.len(), 1);
        let result = &results[0];
        assert_eq!(result.columns, vec!["id", "name", "score"]);
        assert_eq!(result.row_count(), 2);
        assert_eq!(result.rows[0][1], Value::Text("Ana".to_string()));
        assert_eq!(result.rows[0][2], Value::Real(9.5));
        assert_eq!(result.rows[1][2], Value::Null);
    }

    #[test]
    fn test_exec_select_without_rows_yields_nothing() {
        let engine = engine_with_people();
        let results = engine.exec("SELECT * FROM people WHERE id > 100").unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_exec_multiple_selects_keep_statement_order() {
        let engine = engine_with_people();
        let results = engine
            .exec("SELECT COUNT(*) FROM people; SELECT name FROM people WHERE id = 2;")
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].first_cell(), Some(&Value::Integer(2)));
        assert_eq!(
            results[1].first_cell(),
            Some(&Value::Text("Bruno".to_string()))
        );
    }

    #[test]
    fn test_exec_reports_syntax_errors() {
        let engine = Engine::in_memory().unwrap();
        let err = engine.exec("SELEC 1").unwrap_err();
        assert!(err.to_string().contains("syntax error"));
    }

    #[test]
    fn test_exec_unbound_parameters_read_as_null() {
        let engine = engine_with_people();
        let results = engine
            .exec("SELECT ? AS missing, ?2 IS NULL AS is_null, :name AS named")
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].rows[0],
            vec![Value::Null, Value::Integer(1), Value::Null]
        );

        let results = engine.exec("SELECT name FROM people WHERE id = ?").unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_run_binds_parameters() {
        let engine = engine_with_people();
        let changed = engine
            .run(
                "INSERT INTO people VALUES (?, ?, ?)",
                &[
                    SqlValue::Integer(3),
                    SqlValue::Text("Carla".to_string()),
                    SqlValue::Real(7.0),
                ],
            )
            .unwrap();
        assert_eq!(changed, 1);

        let results = engine.exec("SELECT COUNT(*) FROM people").unwrap();
        assert_eq!(results[0].first_cell(), Some(&Value::Integer(3)));
    }
}
