//! CSV export of the current result.
//!
//! The output is deliberately simple rather than RFC 4180: text containing a
//! comma is wrapped in double quotes, but embedded quotes and newlines are
//! written through unchanged.

use crate::engine::{QueryResult, Value};
use crate::error::Result;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::info;

pub fn to_csv(result: &QueryResult) -> String {
    let mut csv = result.columns.join(",");
    csv.push('\n');
    for row in &result.rows {
        let line = row.iter().map(csv_cell).collect::<Vec<_>>().join(",");
        csv.push_str(&line);
        csv.push('\n');
    }
    csv
}

fn csv_cell(value: &Value) -> String {
    match value {
        Value::Text(s) if s.contains(',') => format!("\"{}\"", s),
        other => other.to_string(),
    }
}

pub fn export_file_name(epoch_millis: i64) -> String {
    format!("query_results_{}.csv", epoch_millis)
}

/// Writes `result` as `query_results_<epoch-millis>.csv` under `dir`.
pub fn write_csv(result: &QueryResult, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let path = dir
        .as_ref()
        .join(export_file_name(Utc::now().timestamp_millis()));
    std::fs::write(&path, to_csv(result))?;
    info!(path = %path.display(), rows = result.row_count(), "Exported results");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> QueryResult {
        QueryResult {
            columns: vec!["id".to_string(), "name".to_string(), "price".to_string()],
            rows: vec![
                vec![
                    Value::Integer(1234567),
                    Value::Text("Gel Pens, 12 pack".to_string()),
                    Value::Real(9.9),
                ],
                vec![Value::Integer(2), Value::Null, Value::Real(60000.0)],
            ],
        }
    }

    #[test]
    fn test_to_csv_layout() {
        assert_eq!(
            to_csv(&sample()),
            "id,name,price\n1234567,\"Gel Pens, 12 pack\",9.9\n2,,60000\n"
        );
    }

    #[test]
    fn test_to_csv_keeps_full_text_and_raw_quotes() {
        let long = "z".repeat(150);
        let result = QueryResult {
            columns: vec!["note".to_string()],
            rows: vec![
                vec![Value::Text(long.clone())],
                vec![Value::Text("say \"hi\", then leave".to_string())],
            ],
        };
        let csv = to_csv(&result);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[1], long);
        assert_eq!(lines[2], "\"say \"hi\", then leave\"");
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(
            export_file_name(1700000000123),
            "query_results_1700000000123.csv"
        );
    }

    #[test]
    fn test_write_csv_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&sample(), dir.path()).unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("query_results_"));
        assert!(name.ends_with(".csv"));

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);
    }
}
