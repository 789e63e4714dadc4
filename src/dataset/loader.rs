use super::Dataset;
use crate::engine::{Engine, Value};
use crate::error::{PlaygroundError, Result};
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub statements: usize,
    pub tables: Vec<(String, usize)>,
}

impl LoadReport {
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|(_, rows)| rows).sum()
    }
}

/// Seeds an engine from a [`Dataset`].
///
/// Schema statements run in the order given; callers are responsible for
/// ordering them so foreign keys resolve. The first failure aborts the load.
pub struct CatalogLoader<'a> {
    engine: &'a Engine,
}

impl<'a> CatalogLoader<'a> {
    pub fn new(engine: &'a Engine) -> Self {
        Self { engine }
    }

    pub fn load(&self, dataset: &Dataset) -> Result<LoadReport> {
        let mut report = LoadReport::default();

        for (idx, sql) in dataset.schema.iter().enumerate() {
            self.engine.exec(sql).map_err(|e| {
                PlaygroundError::DatasetLoad(format!("schema statement {} failed: {}", idx + 1, e))
            })?;
            debug!(statement = %preview(sql), "Schema statement applied");
            report.statements += 1;
        }

        for (table, rows) in &dataset.data {
            let inserted = self.insert_rows(table, rows)?;
            info!(table = %table, rows = inserted, "Seeded table");
            report.tables.push((table.clone(), inserted));
        }

        info!(
            statements = report.statements,
            rows = report.total_rows(),
            "Dataset loaded"
        );
        Ok(report)
    }

    fn insert_rows(&self, table: &str, rows: &serde_json::Value) -> Result<usize> {
        let rows = rows.as_array().ok_or_else(|| {
            PlaygroundError::DatasetLoad(format!("rows for table '{}' must be an array", table))
        })?;

        let Some(first) = rows.first() else {
            return Ok(0);
        };
        let width = first.as_array().map(Vec::len).unwrap_or(0);
        let placeholders = vec!["?"; width].join(", ");
        let insert_sql = format!("INSERT INTO {} VALUES ({})", table, placeholders);

        for (idx, row) in rows.iter().enumerate() {
            let cells = row.as_array().ok_or_else(|| {
                PlaygroundError::DatasetLoad(format!(
                    "row {} of table '{}' must be an array",
                    idx + 1,
                    table
                ))
            })?;
            let params: Vec<_> = cells.iter().map(Value::bind_json).collect();
            self.engine.run(&insert_sql, &params).map_err(|e| {
                PlaygroundError::DatasetLoad(format!(
                    "insert into '{}' failed at row {}: {}",
                    table,
                    idx + 1,
                    e
                ))
            })?;
        }

        Ok(rows.len())
    }
}

fn preview(sql: &str) -> String {
    sql.chars().take(50).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_bundled_dataset() {
        let engine = Engine::in_memory().unwrap();
        let dataset = Dataset::bundled().unwrap();
        let report = CatalogLoader::new(&engine).load(&dataset).unwrap();

        assert_eq!(report.statements, 5);
        assert_eq!(
            report.tables,
            vec![
                ("departments".to_string(), 5),
                ("employees".to_string(), 12),
                ("suppliers".to_string(), 4),
                ("products".to_string(), 25),
                ("sales".to_string(), 15),
            ]
        );
        assert_eq!(report.total_rows(), 61);
    }

    #[test]
    fn test_load_inserts_rows_in_list_order() {
        let engine = Engine::in_memory().unwrap();
        let dataset = Dataset::parse(
            r#"{
                "schema": ["CREATE TABLE log (seq INTEGER, msg TEXT)"],
                "data": {"log": [[3, "c"], [1, "a"], [2, null]]}
            }"#,
        )
        .unwrap();
        CatalogLoader::new(&engine).load(&dataset).unwrap();

        let results = engine.exec("SELECT seq, msg FROM log ORDER BY rowid").unwrap();
        let seqs: Vec<&Value> = results[0].rows.iter().map(|r| &r[0]).collect();
        assert_eq!(
            seqs,
            vec![&Value::Integer(3), &Value::Integer(1), &Value::Integer(2)]
        );
        assert_eq!(results[0].rows[2][1], Value::Null);
    }

    #[test]
    fn test_load_skips_empty_tables() {
        let engine = Engine::in_memory().unwrap();
        let dataset = Dataset::parse(
            r#"{"schema": ["CREATE TABLE empty (x INTEGER)"], "data": {"empty": []}}"#,
        )
        .unwrap();
        let report = CatalogLoader::new(&engine).load(&dataset).unwrap();
        assert_eq!(report.tables, vec![("empty".to_string(), 0)]);
    }

    #[test]
    fn test_load_fails_on_bad_schema_statement() {
        let engine = Engine::in_memory().unwrap();
        let dataset = Dataset::parse(
            r#"{"schema": ["CREATE TABLE ok (x)", "CREATE TABL broken (x)"], "data": {}}"#,
        )
        .unwrap();
        let err = CatalogLoader::new(&engine).load(&dataset).unwrap_err();
        assert!(err.to_string().contains("schema statement 2 failed"));
    }

    #[test]
    fn test_load_fails_on_unknown_table() {
        let engine = Engine::in_memory().unwrap();
        let dataset =
            Dataset::parse(r#"{"schema": [], "data": {"ghosts": [[1, "boo"]]}}"#).unwrap();
        let err = CatalogLoader::new(&engine).load(&dataset).unwrap_err();
        assert!(matches!(err, PlaygroundError::DatasetLoad(_)));
        assert!(err.to_string().contains("ghosts"));
    }

    #[test]
    fn test_load_fails_on_primary_key_violation() {
        let engine = Engine::in_memory().unwrap();
        let dataset = Dataset::parse(
            r#"{
                "schema": ["CREATE TABLE t (id INTEGER PRIMARY KEY)"],
                "data": {"t": [[1], [1]]}
            }"#,
        )
        .unwrap();
        let err = CatalogLoader::new(&engine).load(&dataset).unwrap_err();
        assert!(err.to_string().contains("row 2"));
    }
}
