use super::commands::{ReplCommand, ReplResult};
use crate::console::{ExampleCategory, QueryOutcome};
use crate::error::Result;
use crate::render;
use crate::schema::SchemaInspector;
use crate::session::Session;
use std::path::PathBuf;

/// Headless REPL: turns each input line into text output over one [`Session`].
pub struct ReplSession {
    session: Session,
}

impl ReplSession {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn handle_line(&mut self, line: &str) -> ReplResult {
        match ReplCommand::parse(line) {
            Ok(command) => self.execute(command),
            Err(e) => ReplResult::Error(e.to_string()),
        }
    }

    pub fn execute(&mut self, command: ReplCommand) -> ReplResult {
        match command {
            ReplCommand::Quit => ReplResult::Exit,
            ReplCommand::Help => ReplResult::Output(ReplCommand::help_text().to_string()),
            ReplCommand::Usage(usage) => ReplResult::Error(format!("Usage: {}", usage)),
            ReplCommand::Unknown(name) => ReplResult::Error(format!(
                "Unknown command '\\{}'. Type \\? for help.",
                name
            )),
            ReplCommand::Sql(sql) => {
                let outcome = self.session.execute(&sql);
                self.report(outcome)
            }
            ReplCommand::Run => {
                let outcome = self.session.execute_editor();
                self.report(outcome)
            }
            ReplCommand::Browse(table) => {
                let outcome = self.session.browse(&table);
                self.report(outcome)
            }
            ReplCommand::Example { category, index } => {
                let outcome = self.session.run_example(category, index);
                match self.report(outcome) {
                    ReplResult::Output(out) => {
                        ReplResult::Output(format!("{}\n\n{}", self.session.editor(), out))
                    }
                    other => other,
                }
            }
            ReplCommand::Tables => {
                ReplResult::Output(render::render_schema(self.session.schema()))
            }
            ReplCommand::Refresh => match self.session.rebuild_schema() {
                Ok(tables) => ReplResult::Output(render::render_schema(tables)),
                Err(e) => ReplResult::Error(e.to_string()),
            },
            ReplCommand::Describe(table) => {
                match SchemaInspector::new(self.session.engine()).describe(&table) {
                    Ok(summary) => ReplResult::Output(render::render_schema(&[summary])),
                    Err(e) => ReplResult::Error(e.to_string()),
                }
            }
            ReplCommand::Stats => ReplResult::Output(render::render_stats(self.session.stats())),
            ReplCommand::Examples => ReplResult::Output(list_examples()),
            ReplCommand::Format => ReplResult::Output(self.session.format_editor().to_string()),
            ReplCommand::Show => ReplResult::Output(self.session.editor().to_string()),
            ReplCommand::Clear => {
                self.session.clear_editor();
                ReplResult::Output("Editor cleared".to_string())
            }
            ReplCommand::Export(dir) => {
                let dir = dir.unwrap_or_else(|| PathBuf::from("."));
                match self.session.export_to(&dir) {
                    Ok(path) => ReplResult::Output(format!("Exported to {}", path.display())),
                    Err(e) => ReplResult::Error(e.to_string()),
                }
            }
        }
    }

    fn report(&self, outcome: Result<QueryOutcome>) -> ReplResult {
        match outcome {
            Ok(outcome @ QueryOutcome::Rows { .. }) => {
                let table = self
                    .session
                    .current_result()
                    .map(render::render_table)
                    .unwrap_or_else(|| render::NO_RESULTS.to_string());
                ReplResult::Output(format!("{}\n{}", table, render::render_outcome(&outcome)))
            }
            Ok(outcome) => ReplResult::Output(render::render_outcome(&outcome)),
            Err(e) => ReplResult::Error(e.to_string()),
        }
    }
}

fn list_examples() -> String {
    let mut out = String::new();
    for category in ExampleCategory::ALL {
        out.push_str(&format!("{}:\n", category));
        for (i, query) in category.queries().iter().enumerate() {
            let first_line = query.lines().next().unwrap_or_default();
            out.push_str(&format!("  {}. {}\n", i + 1, first_line));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repl() -> ReplSession {
        ReplSession::new(Session::open_bundled().unwrap())
    }

    fn output(result: ReplResult) -> String {
        match result {
            ReplResult::Output(out) => out,
            other => panic!("expected output, got {:?}", other),
        }
    }

    #[test]
    fn test_select_prints_table_and_summary() {
        let mut repl = repl();
        let out = output(repl.handle_line("SELECT name FROM departments ORDER BY id;"));
        assert!(out.contains("Engineering"));
        assert!(out.contains("5 rows | "));
    }

    #[test]
    fn test_mutation_prints_success_notice() {
        let mut repl = repl();
        let out = output(repl.handle_line("UPDATE products SET stock = stock + 1;"));
        assert!(out.starts_with("✓ Query executed successfully"));
        assert!(repl.session().current_result().is_none());
    }

    #[test]
    fn test_engine_error_is_reported() {
        let mut repl = repl();
        match repl.handle_line("SELEC oops;") {
            ReplResult::Error(msg) => assert!(msg.contains("syntax error")),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_export_without_result_fails() {
        let mut repl = repl();
        let dir = tempfile::tempdir().unwrap();
        let line = format!("\\export {}", dir.path().display());
        match repl.handle_line(&line) {
            ReplResult::Error(msg) => assert!(msg.starts_with("No query executed")),
            other => panic!("expected error, got {:?}", other),
        }

        repl.handle_line("SELECT * FROM suppliers;");
        let out = output(repl.handle_line(&line));
        assert!(out.contains("query_results_"));
    }

    #[test]
    fn test_browse_and_show_editor() {
        let mut repl = repl();
        let out = output(repl.handle_line("\\browse products"));
        assert!(out.contains("20 rows"));
        assert_eq!(
            output(repl.handle_line("\\show")),
            "SELECT * FROM products LIMIT 20;"
        );
    }

    #[test]
    fn test_example_echoes_query() {
        let mut repl = repl();
        let out = output(repl.handle_line("\\example aggregations 1"));
        assert!(out.starts_with("SELECT"));
        assert!(out.contains("rows | ") || out.contains("row | "));
    }

    #[test]
    fn test_describe_unknown_table() {
        let mut repl = repl();
        match repl.handle_line("\\d nowhere") {
            ReplResult::Error(msg) => assert!(msg.contains("nowhere")),
            other => panic!("expected error, got {:?}", other),
        }
        let out = output(repl.handle_line("\\d employees"));
        assert!(out.starts_with("employees (12 rows)"));
    }

    #[test]
    fn test_examples_listing_covers_all_categories() {
        let out = list_examples();
        for category in ExampleCategory::ALL {
            assert!(out.contains(&format!("{}:", category)));
        }
    }

    #[test]
    fn test_quit() {
        assert_eq!(repl().handle_line("\\quit"), ReplResult::Exit);
    }
}
