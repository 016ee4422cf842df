//! Structured error types for configuration resolution.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Environment errors
    HomeDirUnavailable,
    WorkingDirUnavailable,

    // File errors
    ConfigReadFailed,
    ConfigParseFailed,

    // Validation errors
    MissingRequiredField,

    // Discovery errors
    InvalidGlobPattern,
    GlobFailed,
    NoStackFiles,

    // Internal errors
    InternalError,
}

/// Any failure that aborts configuration resolution.
///
/// There is no partial success: the first error ends the pipeline and
/// callers are expected to stop the process.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to determine the current user's home directory")]
    HomeDir,

    #[error("Unable to determine the current working directory: {0}")]
    WorkingDir(#[source] std::io::Error),

    #[error("Failed reading config file {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML config {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{message}")]
    MissingField {
        field: &'static str,
        message: String,
    },

    #[error("Invalid stack path glob '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Failed expanding stack path glob: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("No config files found in any of the provided path globs:\n{globs}\n")]
    NoStackFiles { globs: String },

    #[error("Failed serializing configuration: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ConfigError {
    /// Missing required field, naming the file key and environment variable that set it.
    pub fn missing_field(field: &'static str, message: impl Into<String>) -> Self {
        Self::MissingField {
            field,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::HomeDir => ErrorCode::HomeDirUnavailable,
            Self::WorkingDir(_) => ErrorCode::WorkingDirUnavailable,
            Self::Read { .. } => ErrorCode::ConfigReadFailed,
            Self::Parse { .. } => ErrorCode::ConfigParseFailed,
            Self::MissingField { .. } => ErrorCode::MissingRequiredField,
            Self::Pattern { .. } => ErrorCode::InvalidGlobPattern,
            Self::Glob(_) => ErrorCode::GlobFailed,
            Self::NoStackFiles { .. } => ErrorCode::NoStackFiles,
            Self::Serialize(_) => ErrorCode::InternalError,
        }
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
