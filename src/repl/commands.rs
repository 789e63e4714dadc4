//! Backslash commands understood by the REPL. Anything else is SQL.

use crate::console::ExampleCategory;
use crate::error::{PlaygroundError, Result};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Sql(String),
    Tables,
    Describe(String),
    Browse(String),
    Refresh,
    Stats,
    Examples,
    /// `index` is zero-based; the command line takes it one-based.
    Example {
        category: ExampleCategory,
        index: usize,
    },
    Format,
    Run,
    Show,
    Clear,
    Export(Option<PathBuf>),
    Help,
    Quit,
    Usage(&'static str),
    Unknown(String),
}

/// What the REPL should do with a command's outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplResult {
    Output(String),
    Error(String),
    Exit,
}

impl ReplCommand {
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let Some(body) = input.strip_prefix('\\') else {
            return Ok(ReplCommand::Sql(input.to_string()));
        };

        let mut parts = body.split_whitespace();
        let name = parts.next().unwrap_or_default().to_lowercase();
        let args: Vec<&str> = parts.collect();

        let command = match name.as_str() {
            "q" | "quit" | "exit" => ReplCommand::Quit,
            "?" | "h" | "help" => ReplCommand::Help,
            "dt" | "tables" => ReplCommand::Tables,
            "d" | "describe" => match args.first() {
                Some(table) => ReplCommand::Describe(table.to_string()),
                None => ReplCommand::Usage("\\d <table>"),
            },
            "b" | "browse" => match args.first() {
                Some(table) => ReplCommand::Browse(table.to_string()),
                None => ReplCommand::Usage("\\browse <table>"),
            },
            "refresh" => ReplCommand::Refresh,
            "stats" => ReplCommand::Stats,
            "examples" => ReplCommand::Examples,
            "example" => match args.as_slice() {
                [category, number] => Self::parse_example(category, number)?,
                _ => ReplCommand::Usage("\\example <basic|joins|aggregations|advanced> <n>"),
            },
            "format" | "f" => ReplCommand::Format,
            "g" | "run" => ReplCommand::Run,
            "p" | "show" => ReplCommand::Show,
            "clear" | "c" => ReplCommand::Clear,
            "export" => ReplCommand::Export(args.first().map(PathBuf::from)),
            _ => ReplCommand::Unknown(name),
        };
        Ok(command)
    }

    fn parse_example(category: &str, number: &str) -> Result<Self> {
        let category: ExampleCategory = category.parse()?;
        let index = number
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .ok_or_else(|| PlaygroundError::UnknownExample(format!("{} #{}", category, number)))?;
        Ok(ReplCommand::Example { category, index })
    }

    pub fn help_text() -> &'static str {
        r#"SQL statements run when they end with ';' (Ctrl+Enter runs them as-is).

Schema:
  \dt, \tables          Show tables with columns and row counts
  \d <table>            Describe one table
  \browse <table>       SELECT * FROM <table> LIMIT 20;
  \refresh              Rebuild the schema view

Editor:
  \g, \run              Run the last statement again
  \p, \show             Show the last statement
  \f, \format           Reformat the last statement
  \c, \clear            Clear the last statement

Examples:
  \examples             List canned queries
  \example <cat> <n>    Run canned query n of a category

Other:
  \stats                Dataset statistics
  \export [dir]         Save the current result as CSV
  \?, \help             Show this help
  \q, \quit             Exit"#
    }
}
