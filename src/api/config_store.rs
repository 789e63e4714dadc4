use crate::error::{PlaygroundError, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::debug;

/// Key/value document store holding the curated video list.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    async fn upsert(&self, key: &str, value: Value) -> Result<()>;
}

/// Stores every key in one JSON object on disk.
///
/// A missing file reads as an empty store. Writes rewrite the whole file
/// under the lock.
pub struct FileConfigStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> Result<Map<String, Value>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(PlaygroundError::Store(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
        }
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let _guard = self.lock.lock().await;
        let mut items = self.read_all().await?;
        Ok(items.remove(key))
    }

    async fn upsert(&self, key: &str, value: Value) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut items = self.read_all().await?;
        items.insert(key.to_string(), value);
        let content = serde_json::to_string_pretty(&Value::Object(items))?;
        tokio::fs::write(&self.path, content).await?;
        debug!(key = %key, path = %self.path.display(), "Config item upserted");
        Ok(())
    }
}
