//! Codec and CLI configuration.
//!
//! Values come from defaults, then an optional JSON file, then `NEN_*`
//! environment variables.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HuffmanError, Result};

pub const ENV_PREFIX: &str = "NEN_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Directory used by the file-backed artifact store.
    pub store_dir: PathBuf,
    /// Largest input `compress` accepts.
    pub max_input_bytes: usize,
    pub log_level: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from("nen-store"),
            max_input_bytes: 1 << 30,
            log_level: "info".to_string(),
        }
    }
}

impl CodecConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_input_bytes == 0 {
            return Err(HuffmanError::configuration("max_input_bytes must be greater than 0"));
        }
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(HuffmanError::configuration(format!(
                "log_level must be one of {:?}, got {:?}",
                LOG_LEVELS, self.log_level
            )));
        }
        if self.store_dir.as_os_str().is_empty() {
            return Err(HuffmanError::configuration("store_dir must not be empty"));
        }
        Ok(())
    }

    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides(ENV_PREFIX)
    }

    /// Applies `{prefix}STORE_DIR`, `{prefix}MAX_INPUT_BYTES` and
    /// `{prefix}LOG_LEVEL` on top of `self`.
    pub fn with_env_overrides(mut self, prefix: &str) -> Result<Self> {
        if let Ok(dir) = env::var(format!("{}STORE_DIR", prefix)) {
            self.store_dir = PathBuf::from(dir);
        }
        self.max_input_bytes = parse_env_var(&format!("{}MAX_INPUT_BYTES", prefix), self.max_input_bytes);
        if let Ok(level) = env::var(format!("{}LOG_LEVEL", prefix)) {
            self.log_level = level;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| HuffmanError::configuration(format!("Failed to read config file: {}", e)))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| HuffmanError::configuration(format!("Failed to parse config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)
            .map_err(|e| HuffmanError::configuration(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, serialized)
            .map_err(|e| HuffmanError::configuration(format!("Failed to write config file: {}", e)))?;
        Ok(())
    }
}

/// Parses an environment variable, falling back to `default` when it is
/// unset or does not parse.
pub fn parse_env_var<T>(var_name: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    env::var(var_name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
