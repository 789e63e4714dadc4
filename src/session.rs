use crate::console::{self, example, ExampleCategory, QueryOutcome};
use crate::dataset::{CatalogLoader, Dataset, LoadReport};
use crate::engine::{Engine, QueryResult};
use crate::error::{PlaygroundError, Result};
use crate::export;
use crate::schema::{browse_query, SchemaInspector, TableSummary};
use crate::stats::{StatsPanel, StatsSummarizer};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// One playground session: the seeded engine, the editor text, the current
/// result and the last computed stats panel.
///
/// The schema panel is built once when the session opens and is only rebuilt
/// on request, so DDL run later does not show up until then.
pub struct Session {
    engine: Engine,
    editor: String,
    current: Option<QueryResult>,
    schema: Vec<TableSummary>,
    stats: StatsPanel,
}

impl Session {
    pub fn open(dataset: &Dataset) -> Result<Self> {
        let engine = Engine::in_memory()?;
        let report = CatalogLoader::new(&engine).load(dataset)?;
        Self::from_engine(engine, &report)
    }

    pub fn open_bundled() -> Result<Self> {
        Self::open(&Dataset::bundled()?)
    }

    fn from_engine(engine: Engine, report: &LoadReport) -> Result<Self> {
        let schema = SchemaInspector::new(&engine).inspect()?;
        let stats = StatsSummarizer::new(&engine).refresh();
        info!(
            tables = schema.len(),
            rows = report.total_rows(),
            "Session ready"
        );
        Ok(Self {
            engine,
            editor: String::new(),
            current: None,
            schema,
            stats,
        })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn editor(&self) -> &str {
        &self.editor
    }

    pub fn set_editor(&mut self, text: impl Into<String>) {
        self.editor = text.into();
    }

    pub fn clear_editor(&mut self) {
        self.editor.clear();
    }

    pub fn current_result(&self) -> Option<&QueryResult> {
        self.current.as_ref()
    }

    pub fn schema(&self) -> &[TableSummary] {
        &self.schema
    }

    pub fn stats(&self) -> &StatsPanel {
        &self.stats
    }

    /// Runs `text` as the editor content.
    ///
    /// A failing query leaves the current result in place; a query with no
    /// rows clears it and refreshes the stats panel.
    pub fn execute(&mut self, text: &str) -> Result<QueryOutcome> {
        self.editor = text.to_string();
        let execution = match console::run_query(&self.engine, text) {
            Ok(execution) => execution,
            Err(e) => {
                if !e.is_validation() {
                    warn!(error = %e, "Query failed");
                }
                return Err(e);
            }
        };

        match execution.result {
            Some(result) => {
                let row_count = result.row_count();
                self.current = Some(result);
                Ok(QueryOutcome::Rows {
                    row_count,
                    elapsed: execution.elapsed,
                })
            }
            None => {
                self.current = None;
                self.refresh_stats();
                Ok(QueryOutcome::Mutation {
                    elapsed: execution.elapsed,
                })
            }
        }
    }

    pub fn execute_editor(&mut self) -> Result<QueryOutcome> {
        let text = self.editor.clone();
        self.execute(&text)
    }

    pub fn browse(&mut self, table: &str) -> Result<QueryOutcome> {
        self.execute(&browse_query(table))
    }

    pub fn run_example(&mut self, category: ExampleCategory, index: usize) -> Result<QueryOutcome> {
        let sql = example(category, index)?;
        self.execute(sql)
    }

    pub fn format_editor(&mut self) -> &str {
        self.editor = console::format_sql(&self.editor);
        &self.editor
    }

    pub fn refresh_stats(&mut self) -> &StatsPanel {
        self.stats = StatsSummarizer::new(&self.engine).refresh();
        &self.stats
    }

    pub fn rebuild_schema(&mut self) -> Result<&[TableSummary]> {
        self.schema = SchemaInspector::new(&self.engine).inspect()?;
        Ok(&self.schema)
    }

    pub fn export_csv(&self) -> Result<String> {
        self.current
            .as_ref()
            .map(export::to_csv)
            .ok_or(PlaygroundError::NoResultToExport)
    }

    pub fn export_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let result = self
            .current
            .as_ref()
            .ok_or(PlaygroundError::NoResultToExport)?;
        export::write_csv(result, dir)
    }
}
