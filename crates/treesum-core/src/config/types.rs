//! Configuration type definitions

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default metadata directory, relative to the repository root
pub const DEFAULT_METADATA_DIR: &str = "scanner_metadata";

/// Default OpenAI-compatible API base URL
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Value shipped in example configs; never a usable key
pub const PLACEHOLDER_API_KEY: &str = "your-api-key-here";

/// Default oracle request timeout
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

/// Default completion length for one summary
pub const DEFAULT_MAX_TOKENS: u32 = 200;

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Scan configuration (`treesum.toml`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Where summary records are written, relative to the repository root
    /// unless absolute
    #[serde(default = "default_metadata_dir")]
    pub metadata_dir: PathBuf,

    /// Ignore rules document (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_file: Option<PathBuf>,

    /// Summarization oracle settings
    #[serde(default)]
    pub oracle: OracleConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            metadata_dir: default_metadata_dir(),
            ignore_file: None,
            oracle: OracleConfig::default(),
        }
    }
}

/// Settings for the chat-completions summarization oracle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// API key (required to scan)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model identifier (required to scan)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// API base URL; `/chat/completions` is appended
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Maximum completion tokens per summary
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: None,
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

fn default_metadata_dir() -> PathBuf {
    PathBuf::from(DEFAULT_METADATA_DIR)
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}
