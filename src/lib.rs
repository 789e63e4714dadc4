pub mod api;
pub mod config;
pub mod console;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod export;
pub mod render;
pub mod repl;
pub mod schema;
pub mod session;
pub mod stats;

pub use api::{create_router, serve, ApiState, ConfigStore, FileConfigStore, VideoStore};
pub use config::ServerConfig;
pub use console::{format_sql, run_query, ExampleCategory, QueryOutcome};
pub use dataset::{CatalogLoader, Dataset, LoadReport};
pub use engine::{Engine, QueryResult, Value};
pub use error::{PlaygroundError, Result};
pub use export::{to_csv, write_csv};
pub use repl::{InteractiveRepl, ReplCommand, ReplResult, ReplSession};
pub use schema::{ColumnDefinition, SchemaInspector, TableSummary};
pub use session::Session;
pub use stats::{StatValue, StatsPanel, StatsSummarizer};
