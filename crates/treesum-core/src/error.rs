//! Error types and exit codes for treesum
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure
//! - 2: Usage error (bad flags/args)
//! - 3: Configuration/data error (missing credentials, missing repository, missing record)
//!
//! Only run-level problems surface as a [`TreesumError`]. Per-item failures
//! during a scan (an unreadable file, an oracle failure, a failed record
//! write) are logged and turn into "this item contributes nothing".

mod macros;

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the treesum CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Configuration or data error (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during treesum operations
#[derive(Error, Debug)]
pub enum TreesumError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human or json)")]
    UnknownFormat(String),

    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Configuration/data errors (exit code 3)
    #[error("invalid config {path:?}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },

    #[error("{field} not configured (set it in treesum.toml or {env_var})")]
    MissingConfig { field: String, env_var: String },

    #[error("repository not found: {path:?}")]
    RepositoryNotFound { path: PathBuf },

    #[error("ignore file not found: {path:?}")]
    IgnoreFileNotFound { path: PathBuf },

    #[error("no summary recorded for {label} (expected {path:?})")]
    RecordNotFound { label: String, path: PathBuf },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to {operation}: {reason}")]
    FailedOperation { operation: String, reason: String },

    #[error("{0}")]
    Other(String),
}

impl TreesumError {
    /// Create an error for an invalid value or argument
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        TreesumError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an unset configuration field
    pub fn missing_config(field: &str, env_var: &str) -> Self {
        TreesumError::MissingConfig {
            field: field.to_string(),
            env_var: env_var.to_string(),
        }
    }

    /// Create an error for a config file that could not be read or parsed
    pub fn invalid_config(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        TreesumError::InvalidConfig {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an error for a failed operation
    pub fn failed(operation: &str, error: impl std::fmt::Display) -> Self {
        TreesumError::FailedOperation {
            operation: operation.to_string(),
            reason: error.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            // Usage errors
            TreesumError::UnknownFormat(_)
            | TreesumError::UsageError(_)
            | TreesumError::InvalidValue { .. } => ExitCode::Usage,

            // Configuration/data errors
            TreesumError::InvalidConfig { .. }
            | TreesumError::MissingConfig { .. }
            | TreesumError::RepositoryNotFound { .. }
            | TreesumError::IgnoreFileNotFound { .. }
            | TreesumError::RecordNotFound { .. } => ExitCode::Data,

            // Generic failures
            TreesumError::Io(_)
            | TreesumError::Json(_)
            | TreesumError::Toml(_)
            | TreesumError::FailedOperation { .. }
            | TreesumError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            TreesumError::UnknownFormat(_) => "unknown_format",
            TreesumError::UsageError(_) => "usage_error",
            TreesumError::InvalidValue { .. } => "invalid_value",
            TreesumError::InvalidConfig { .. } => "invalid_config",
            TreesumError::MissingConfig { .. } => "missing_config",
            TreesumError::RepositoryNotFound { .. } => "repository_not_found",
            TreesumError::IgnoreFileNotFound { .. } => "ignore_file_not_found",
            TreesumError::RecordNotFound { .. } => "record_not_found",
            TreesumError::Io(_) => "io_error",
            TreesumError::Json(_) => "json_error",
            TreesumError::Toml(_) => "toml_error",
            TreesumError::FailedOperation { .. } => "failed_operation",
            TreesumError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for treesum operations
pub type Result<T> = std::result::Result<T, TreesumError>;
