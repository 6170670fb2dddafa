//! Guard configuration. Loaded once at startup; model path, forest parameters and logging.

use crate::error::{GuardError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Env var naming the config file; falls back to `config.json`.
pub const CONFIG_PATH_ENV: &str = "BEC_GUARD_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Persisted model bundle (written by training, read by scoring)
    pub model_path: PathBuf,
    /// Isolation forest fit parameters
    pub forest: ForestConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Number of isolation trees
    pub n_estimators: usize,
    /// Expected share of outliers in the training set (0.0–0.5]
    pub contamination: f64,
    /// Per-tree subsample cap
    pub max_samples: usize,
    /// Fit-time RNG seed
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("bec_model.json"),
            forest: ForestConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            contamination: 0.2,
            max_samples: 256,
            seed: 42,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl ForestConfig {
    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(GuardError::InvalidParameter(
                "n_estimators must be at least 1".into(),
            ));
        }
        if !(self.contamination > 0.0 && self.contamination <= 0.5) {
            return Err(GuardError::InvalidParameter(format!(
                "contamination must be in (0, 0.5], got {}",
                self.contamination
            )));
        }
        if self.max_samples == 0 {
            return Err(GuardError::InvalidParameter(
                "max_samples must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl GuardConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path)
            .map_err(GuardError::from)
            .and_then(|data| serde_json::from_str::<GuardConfig>(&data).map_err(GuardError::from))
        {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "config unreadable; using defaults");
                Self::default()
            }
        }
    }

    /// Resolve the config path from the environment.
    pub fn default_path() -> PathBuf {
        std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.json"))
    }
}
