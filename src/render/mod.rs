//! Text views for console output.
//!
//! Everything here is display-only: numbers get locale grouping and long text
//! gets truncated. Export goes through the raw [`Value`]s instead.

mod number;

pub use number::{format_integer, format_number};

use crate::console::{format_elapsed, QueryOutcome};
use crate::engine::{QueryResult, Value};
use crate::schema::TableSummary;
use crate::stats::StatsPanel;
use tabled::builder::Builder;
use tabled::settings::Style;

pub const NULL_MARKER: &str = "NULL";
pub const MAX_CELL_CHARS: usize = 100;
pub const NO_RESULTS: &str = "No results found";

pub fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => NULL_MARKER.to_string(),
        Value::Integer(i) => format_integer(*i),
        Value::Real(f) => format_number(*f),
        Value::Text(s) => truncate(s),
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() > MAX_CELL_CHARS {
        let head: String = text.chars().take(MAX_CELL_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

pub fn render_table(result: &QueryResult) -> String {
    if result.rows.is_empty() {
        return NO_RESULTS.to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(result.columns.iter().cloned());
    for row in &result.rows {
        builder.push_record(row.iter().map(render_cell));
    }

    let mut table = builder.build();
    table.with(Style::psql());
    table.to_string()
}

pub fn render_outcome(outcome: &QueryOutcome) -> String {
    match outcome {
        QueryOutcome::Rows { row_count, elapsed } => format!(
            "{} row{} | {}",
            row_count,
            if *row_count == 1 { "" } else { "s" },
            format_elapsed(*elapsed)
        ),
        QueryOutcome::Mutation { elapsed } => format!(
            "✓ Query executed successfully\nTime: {}",
            format_elapsed(*elapsed)
        ),
    }
}

pub fn render_schema(tables: &[TableSummary]) -> String {
    let mut out = String::new();
    for table in tables {
        out.push_str(&format!("{} ({} rows)\n", table.name, table.row_count));
        for column in &table.columns {
            let marker = if column.primary_key { "🔑" } else { "▸" };
            out.push_str(&format!(
                "  {} {} {}\n",
                marker, column.name, column.declared_type
            ));
        }
    }
    out
}

pub fn render_stats(panel: &StatsPanel) -> String {
    match panel {
        StatsPanel::Ready(values) => values
            .iter()
            .map(|stat| format!("{} {}: {}", stat.icon, stat.label, stat.display))
            .collect::<Vec<_>>()
            .join("\n"),
        StatsPanel::Unavailable => StatsPanel::UNAVAILABLE_NOTICE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnDefinition;
    use crate::stats::StatValue;
    use std::time::Duration;

    #[test]
    fn test_render_cell_kinds() {
        assert_eq!(render_cell(&Value::Null), "NULL");
        assert_eq!(render_cell(&Value::Integer(1234567)), "1,234,567");
        assert_eq!(render_cell(&Value::Real(1299.99)), "1,299.99");
        assert_eq!(render_cell(&Value::Text("Ana".to_string())), "Ana");
    }

    #[test]
    fn test_render_cell_truncates_long_text() {
        let long = "x".repeat(150);
        let rendered = render_cell(&Value::Text(long));
        assert_eq!(rendered.len(), 103);
        assert!(rendered.ends_with("..."));
        assert_eq!(&rendered[..100], "x".repeat(100));

        let exact = "y".repeat(100);
        assert_eq!(render_cell(&Value::Text(exact.clone())), exact);
    }

    #[test]
    fn test_render_cell_truncates_by_characters() {
        let long = "ñ".repeat(101);
        let rendered = render_cell(&Value::Text(long));
        assert_eq!(rendered.chars().count(), 103);
    }

    #[test]
    fn test_render_table_contains_headers_and_formatted_cells() {
        let result = QueryResult {
            columns: vec!["name".to_string(), "salary".to_string()],
            rows: vec![
                vec![Value::Text("Ana".to_string()), Value::Integer(1234567)],
                vec![Value::Text("Bruno".to_string()), Value::Null],
            ],
        };
        let table = render_table(&result);
        assert!(table.contains("name"));
        assert!(table.contains("salary"));
        assert!(table.contains("1,234,567"));
        assert!(table.contains("NULL"));
        assert!(!table.contains("1234567"));
    }

    #[test]
    fn test_render_table_without_rows() {
        let result = QueryResult {
            columns: vec!["x".to_string()],
            rows: vec![],
        };
        assert_eq!(render_table(&result), NO_RESULTS);
    }

    #[test]
    fn test_render_outcome() {
        let rows = QueryOutcome::Rows {
            row_count: 1,
            elapsed: Duration::from_micros(250),
        };
        assert_eq!(render_outcome(&rows), "1 row | 0.25ms");

        let mutation = QueryOutcome::Mutation {
            elapsed: Duration::from_millis(3),
        };
        assert!(render_outcome(&mutation).contains("Time: 3.00ms"));
    }

    #[test]
    fn test_render_schema_marks_primary_keys() {
        let tables = vec![TableSummary {
            name: "departments".to_string(),
            columns: vec![
                ColumnDefinition {
                    name: "id".to_string(),
                    declared_type: "INTEGER".to_string(),
                    primary_key: true,
                },
                ColumnDefinition {
                    name: "name".to_string(),
                    declared_type: "TEXT".to_string(),
                    primary_key: false,
                },
            ],
            row_count: 5,
        }];
        let rendered = render_schema(&tables);
        assert_eq!(
            rendered,
            "departments (5 rows)\n  🔑 id INTEGER\n  ▸ name TEXT\n"
        );
    }

    #[test]
    fn test_render_stats() {
        let panel = StatsPanel::Ready(vec![StatValue {
            label: "Departments",
            icon: "🏢",
            display: "5".to_string(),
        }]);
        assert_eq!(render_stats(&panel), "🏢 Departments: 5");
        assert_eq!(
            render_stats(&StatsPanel::Unavailable),
            StatsPanel::UNAVAILABLE_NOTICE
        );
    }
}
