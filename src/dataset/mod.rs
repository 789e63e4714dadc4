mod loader;

pub use loader::{CatalogLoader, LoadReport};

use crate::error::{PlaygroundError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const BUNDLED_DATASET: &str = include_str!("../../data/playground.json");

/// Seed description: schema statements in dependency order plus per-table rows.
///
/// `data` keeps the JSON object's key order, which is also the insert order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub schema: Vec<String>,
    #[serde(default)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl Dataset {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PlaygroundError::DatasetLoad(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PlaygroundError::DatasetLoad(format!("{}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// The employees/departments/products/suppliers/sales catalog shipped with the crate.
    pub fn bundled() -> Result<Self> {
        Self::parse(BUNDLED_DATASET)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }
}
