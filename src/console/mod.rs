mod formatter;
mod samples;

pub use formatter::format_sql;
pub use samples::{example, ExampleCategory};

use crate::engine::{Engine, QueryResult};
use crate::error::{PlaygroundError, Result};
use std::time::{Duration, Instant};
use tracing::debug;

/// Raw outcome of running console text through the engine, before any
/// session bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    pub result: Option<QueryResult>,
    pub elapsed: Duration,
}

/// What the console reports after a successful execution. Rows are kept by
/// the session as its current result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueryOutcome {
    Rows { row_count: usize, elapsed: Duration },
    Mutation { elapsed: Duration },
}

impl QueryOutcome {
    pub fn elapsed(&self) -> Duration {
        match self {
            QueryOutcome::Rows { elapsed, .. } | QueryOutcome::Mutation { elapsed } => *elapsed,
        }
    }

    pub fn is_mutation(&self) -> bool {
        matches!(self, QueryOutcome::Mutation { .. })
    }
}

pub fn run_query(engine: &Engine, text: &str) -> Result<Execution> {
    let query = text.trim();
    if query.is_empty() {
        return Err(PlaygroundError::EmptyQuery);
    }

    let start = Instant::now();
    let results = engine.exec(query)?;
    let elapsed = start.elapsed();

    debug!(
        result_sets = results.len(),
        elapsed_ms = %format_elapsed(elapsed),
        "Query executed"
    );

    Ok(Execution {
        result: results.into_iter().next(),
        elapsed,
    })
}

pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}ms", elapsed.as_secs_f64() * 1000.0)
}
