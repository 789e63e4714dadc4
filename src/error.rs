use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaygroundError {
    #[error("Please enter a SQL query")]
    EmptyQuery,

    #[error("No query executed: run a query before exporting results")]
    NoResultToExport,

    #[error("{0}")]
    Engine(String),

    #[error("Failed to load dataset: {0}")]
    DatasetLoad(String),

    #[error("Unknown example: {0}")]
    UnknownExample(String),

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for PlaygroundError {
    fn from(err: rusqlite::Error) -> Self {
        PlaygroundError::Engine(err.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for PlaygroundError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        PlaygroundError::Terminal(err.to_string())
    }
}

impl PlaygroundError {
    /// Validation errors leave session state untouched and never reach the engine.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PlaygroundError::EmptyQuery
                | PlaygroundError::NoResultToExport
                | PlaygroundError::UnknownExample(_)
                | PlaygroundError::UnknownTable(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PlaygroundError>;
