//! sqlplay command-line interface
//!
//! ```bash
//! # Interactive console over the bundled dataset
//! sqlplay
//!
//! # One query, printed as a table (or CSV)
//! sqlplay run "SELECT * FROM employees LIMIT 5"
//! echo "SELECT COUNT(*) FROM sales" | sqlplay run --csv
//!
//! # Catalog and watch-time API
//! sqlplay serve --config server.yaml
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use sqlplay::console::{format_sql, ExampleCategory};
use sqlplay::render;
use sqlplay::{
    to_csv, Dataset, InteractiveRepl, PlaygroundError, QueryOutcome, ReplResult, ReplSession,
    Result, ServerConfig, Session,
};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sqlplay", version, about = "SQL playground over an embedded SQLite catalog")]
struct Cli {
    /// Dataset JSON file ({ schema: [...], data: {...} }); defaults to the bundled catalog
    #[arg(long, global = true, env = "SQLPLAY_DATASET")]
    dataset: Option<PathBuf>,

    /// Log at info level (RUST_LOG still wins)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive console (default)
    Repl,

    /// Run one query; reads stdin when no SQL is given
    Run {
        sql: Option<String>,

        /// Read the query from a file
        #[arg(short, long, conflicts_with = "sql")]
        file: Option<PathBuf>,

        /// Print the result as CSV instead of a table
        #[arg(long)]
        csv: bool,

        /// Also save the result as query_results_<millis>.csv in this directory
        #[arg(long, value_name = "DIR")]
        export: Option<PathBuf>,
    },

    /// Show tables, columns and row counts
    Schema,

    /// Show the dataset statistics panel
    Stats,

    /// List canned queries, or run one (`examples joins 2`)
    Examples {
        category: Option<ExampleCategory>,
        number: Option<usize>,
    },

    /// Reformat SQL; reads stdin when no SQL is given
    Format { sql: Option<String> },

    /// Serve the catalog and watch-time API
    Serve {
        /// YAML server configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(long, env = "SQLPLAY_BIND")]
        bind: Option<String>,

        #[arg(long, env = "SQLPLAY_DATABASE")]
        database: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "sqlplay=info" } else { "sqlplay=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or(Command::Repl) {
        Command::Repl => run_repl(cli.dataset),
        Command::Run {
            sql,
            file,
            csv,
            export,
        } => {
            let sql = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => sql_or_stdin(sql)?,
            };
            run_query(open_session(cli.dataset)?, &sql, csv, export)
        }
        Command::Schema => {
            let session = open_session(cli.dataset)?;
            print!("{}", render::render_schema(session.schema()));
            Ok(())
        }
        Command::Stats => {
            let session = open_session(cli.dataset)?;
            println!("{}", render::render_stats(session.stats()));
            Ok(())
        }
        Command::Examples { category, number } => run_examples(cli.dataset, category, number),
        Command::Format { sql } => {
            println!("{}", format_sql(&sql_or_stdin(sql)?));
            Ok(())
        }
        Command::Serve {
            config,
            bind,
            database,
        } => {
            let mut server_config = match config {
                Some(path) => ServerConfig::from_path(path)?,
                None => ServerConfig::default(),
            };
            if let Some(bind) = bind {
                server_config.bind = bind;
            }
            if let Some(database) = database {
                server_config.database_path = database;
            }
            sqlplay::serve(&server_config).await
        }
    }
}

fn open_session(dataset: Option<PathBuf>) -> Result<Session> {
    match dataset {
        Some(path) => {
            info!(path = %path.display(), "Loading dataset");
            Session::open(&Dataset::from_path(path)?)
        }
        None => Session::open_bundled(),
    }
}

fn sql_or_stdin(sql: Option<String>) -> Result<String> {
    match sql {
        Some(sql) => Ok(sql),
        None => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

fn run_repl(dataset: Option<PathBuf>) -> Result<()> {
    let session = open_session(dataset)?;

    if !atty::is(atty::Stream::Stdin) {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        return print_result(ReplSession::new(session).handle_line(&input));
    }

    InteractiveRepl::new(ReplSession::new(session))?.run()
}

fn print_result(result: ReplResult) -> Result<()> {
    match result {
        ReplResult::Output(out) => {
            println!("{}", out);
            Ok(())
        }
        ReplResult::Error(msg) => Err(PlaygroundError::Engine(msg)),
        ReplResult::Exit => Ok(()),
    }
}

fn run_query(mut session: Session, sql: &str, csv: bool, export: Option<PathBuf>) -> Result<()> {
    let outcome = session.execute(sql)?;

    match (&outcome, session.current_result()) {
        (QueryOutcome::Rows { .. }, Some(result)) if csv => print!("{}", to_csv(result)),
        (QueryOutcome::Rows { .. }, Some(result)) => {
            println!("{}", render::render_table(result));
            println!("{}", render::render_outcome(&outcome).dimmed());
        }
        _ => println!("{}", render::render_outcome(&outcome).green()),
    }

    if let Some(dir) = export {
        let path = session.export_to(dir)?;
        eprintln!("Exported to {}", path.display());
    }
    Ok(())
}

fn run_examples(
    dataset: Option<PathBuf>,
    category: Option<ExampleCategory>,
    number: Option<usize>,
) -> Result<()> {
    let categories = match category {
        Some(category) => vec![category],
        None => ExampleCategory::ALL.to_vec(),
    };

    let Some(number) = number else {
        for category in categories {
            println!("{}", category.as_str().bold());
            for (i, query) in category.queries().iter().enumerate() {
                println!("{}. {}\n", i + 1, query);
            }
        }
        return Ok(());
    };

    let line = format!("\\example {} {}", categories[0], number);
    let mut repl = ReplSession::new(open_session(dataset)?);
    print_result(repl.handle_line(&line))
}
