//! # Configuration
//!
//! Layered run settings: compiled-in defaults, then an optional JSON file, then
//! `FNGPINE_`-prefixed environment variables. With no file and no variables the
//! defaults reproduce the fixed endpoint, window and output names.

use figment::{Figment, providers::{Env, Format, Json, Serialized}};
use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use crate::core::error::FngError;
use crate::loggers::LogLevel;

pub const DEFAULT_ENDPOINT: &str = "https://api.alternative.me/fng/";
pub const DEFAULT_LIMIT: u32 = 90;
pub const DEFAULT_JSON_FILE: &str = "fear_greed_data.json";
pub const DEFAULT_PINE_FILE: &str = "fear_greed_index.pine";
pub const ENV_PREFIX: &str = "FNGPINE_";

/// Settings for one fetch-and-render run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the index API; the window is sent as the `limit` query parameter.
    pub endpoint: String,
    /// Number of daily samples requested.
    pub limit: u32,
    /// Directory receiving both artifacts.
    pub output_dir: PathBuf,
    pub json_file: String,
    pub pine_file: String,
    pub log_level: LogLevel,
    /// Request timeout. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            limit: DEFAULT_LIMIT,
            output_dir: PathBuf::from("."),
            json_file: DEFAULT_JSON_FILE.to_string(),
            pine_file: DEFAULT_PINE_FILE.to_string(),
            log_level: LogLevel::Info,
            timeout_secs: None,
        }
    }
}

impl AppConfig {
    pub fn json_path(&self) -> PathBuf {
        self.output_dir.join(&self.json_file)
    }

    pub fn pine_path(&self) -> PathBuf {
        self.output_dir.join(&self.pine_file)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<(), FngError> {
        if self.endpoint.trim().is_empty() {
            return Err(FngError::ConfigError("endpoint must not be empty".into()));
        }
        if self.limit == 0 {
            return Err(FngError::ConfigError("limit must be at least 1".into()));
        }
        if self.json_file.trim().is_empty() || self.pine_file.trim().is_empty() {
            return Err(FngError::ConfigError("output file names must not be empty".into()));
        }
        Ok(())
    }
}

pub struct ConfigManager {
    current: ArcSwap<AppConfig>,
    source_info: String,
}

impl ConfigManager {
    /// Compiled-in defaults only.
    pub fn defaults() -> Self {
        Self {
            current: ArcSwap::from_pointee(AppConfig::default()),
            source_info: "defaults".to_string(),
        }
    }

    /// Merges defaults + optional JSON file + `FNGPINE_` env vars.
    ///
    /// A missing file is skipped silently; a present but invalid one is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FngError> {
        let path = path.as_ref();
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        let source_info = if path.exists() {
            figment = figment.merge(Json::file(path));
            format!("local:{}", path.display())
        } else {
            "defaults".to_string()
        };

        let config: AppConfig = figment
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(|e| FngError::ConfigError(e.to_string()))?;
        config.validate()?;

        Ok(Self {
            current: ArcSwap::from_pointee(config),
            source_info,
        })
    }

    /// Replaces the active configuration after validating it.
    pub fn store(&self, config: AppConfig) -> Result<(), FngError> {
        config.validate()?;
        self.current.store(Arc::new(config));
        Ok(())
    }

    pub fn get(&self) -> Arc<AppConfig> {
        self.current.load_full()
    }

    pub fn source_info(&self) -> &str {
        &self.source_info
    }
}
