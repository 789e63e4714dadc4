use crate::error::{PlaygroundError, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_BIND: &str = "127.0.0.1:3000";
const DEFAULT_DATABASE_PATH: &str = "sqlplay.db";
const DEFAULT_CONFIG_STORE_PATH: &str = "config-store.json";
const DEFAULT_TIME_ZONE: &str = "America/Santiago";

/// Settings for the catalog/watch API server, loadable from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub database_path: PathBuf,
    pub config_store_path: PathBuf,
    /// IANA zone name used for watch timestamps and day boundaries.
    pub time_zone: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            config_store_path: PathBuf::from(DEFAULT_CONFIG_STORE_PATH),
            time_zone: DEFAULT_TIME_ZONE.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ServerConfig = serde_yaml::from_str(yaml)?;
        config.time_zone()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    pub fn time_zone(&self) -> Result<Tz> {
        self.time_zone.parse::<Tz>().map_err(|e| {
            PlaygroundError::Config(format!("unknown time_zone '{}': {}", self.time_zone, e))
        })
    }
}

/// Wall-clock time in `tz` at the UTC instant `at`.
pub fn local_time(tz: Tz, at: DateTime<Utc>) -> NaiveDateTime {
    at.with_timezone(&tz).naive_local()
}
