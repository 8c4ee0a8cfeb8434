//! Scan configuration for treesum
//!
//! Configuration is read from TOML, looked up in this order:
//! 1. an explicit `--config` path
//! 2. `treesum.toml` in the working directory
//! 3. `~/.config/treesum/config.toml` (or `$TREESUM_CONFIG_DIR/config.toml`)
//!
//! A missing file means defaults. Environment variables override oracle
//! settings after the file is loaded.

pub mod types;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::bail_missing_config;
use crate::error::{Result, TreesumError};

pub use types::{
    OracleConfig, ScanConfig, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_METADATA_DIR,
    DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECONDS, PLACEHOLDER_API_KEY,
};

/// Per-project config file name
pub const LOCAL_CONFIG_FILE: &str = "treesum.toml";

const CONFIG_DIR: &str = "treesum";
const CONFIG_FILE: &str = "config.toml";
const CONFIG_DIR_ENV_VAR: &str = "TREESUM_CONFIG_DIR";

/// API key override
pub const API_KEY_ENV_VAR: &str = "TREESUM_API_KEY";
/// Secondary API key source, shared with other OpenRouter tooling
pub const OPENROUTER_API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";
/// Model override
pub const MODEL_ENV_VAR: &str = "TREESUM_MODEL";
/// Base URL override
pub const BASE_URL_ENV_VAR: &str = "TREESUM_BASE_URL";
/// Timeout override, in seconds
pub const TIMEOUT_ENV_VAR: &str = "TREESUM_TIMEOUT";

const MIN_TIMEOUT_SECONDS: u64 = 5;
const MAX_TIMEOUT_SECONDS: u64 = 600;

impl ScanConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|e| TreesumError::invalid_config(path, e))?;
        toml::from_str(&content).map_err(|e| TreesumError::invalid_config(path, e))
    }

    /// Resolve configuration for a run and apply environment overrides.
    ///
    /// An explicit path must exist; the implicit locations are optional.
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(TreesumError::invalid_config(path, "file not found"));
                }
                Self::load(path)?
            }
            None => match Self::implicit_path(cwd) {
                Some(path) => {
                    tracing::debug!(path = %path.display(), "loading config");
                    Self::load(&path)?
                }
                None => Self::default(),
            },
        };

        config.oracle.apply_env();
        Ok(config)
    }

    fn implicit_path(cwd: &Path) -> Option<PathBuf> {
        let local = cwd.join(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Some(local);
        }
        global_config_path().filter(|path| path.is_file())
    }

    /// Resolve the metadata root for a repository
    pub fn metadata_root(&self, repo_root: &Path) -> PathBuf {
        if self.metadata_dir.is_absolute() {
            self.metadata_dir.clone()
        } else {
            repo_root.join(&self.metadata_dir)
        }
    }
}

/// Location of the user-level config file, if one can be determined
pub fn global_config_path() -> Option<PathBuf> {
    let config_dir = match std::env::var(CONFIG_DIR_ENV_VAR) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::config_dir()?.join(CONFIG_DIR),
    };
    Some(config_dir.join(CONFIG_FILE))
}

impl OracleConfig {
    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(key) = lookup(API_KEY_ENV_VAR).or_else(|| {
            // The file value wins over the shared OpenRouter variable
            if self.api_key.is_none() {
                lookup(OPENROUTER_API_KEY_ENV_VAR)
            } else {
                None
            }
        }) {
            self.api_key = Some(key);
        }

        if let Some(model) = lookup(MODEL_ENV_VAR) {
            self.model = Some(model);
        }

        if let Some(url) = lookup(BASE_URL_ENV_VAR) {
            self.base_url = url;
        }

        if let Some(timeout) = lookup(TIMEOUT_ENV_VAR) {
            match timeout.trim().parse::<u64>() {
                Ok(seconds) => {
                    self.timeout_seconds = seconds.clamp(MIN_TIMEOUT_SECONDS, MAX_TIMEOUT_SECONDS)
                }
                Err(_) => tracing::warn!(value = %timeout, "ignoring non-numeric {}", TIMEOUT_ENV_VAR),
            }
        }
    }

    /// Request timeout, kept within 5..=600 seconds wherever it was set
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(
            self.timeout_seconds
                .clamp(MIN_TIMEOUT_SECONDS, MAX_TIMEOUT_SECONDS),
        )
    }

    /// Check that the oracle can be used, returning `(api_key, model)`.
    pub fn validate(&self) -> Result<(&str, &str)> {
        let api_key = match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() && key != PLACEHOLDER_API_KEY => key,
            _ => bail_missing_config!("oracle.api_key", API_KEY_ENV_VAR),
        };

        let model = match self.model.as_deref().map(str::trim) {
            Some(model) if !model.is_empty() => model,
            _ => bail_missing_config!("oracle.model", MODEL_ENV_VAR),
        };

        if self.base_url.trim().is_empty() {
            crate::bail_invalid!("oracle.base_url", "(empty)");
        }

        Ok((api_key, model))
    }
}
