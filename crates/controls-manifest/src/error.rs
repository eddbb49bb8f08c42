//! Manifest-specific error types.
//!
//! Errors here mark the input boundary only: a file that cannot be read
//! or parsed, or a CLI selection that names no control. Data-quality
//! problems inside well-formed input (unparseable references, unknown
//! vocabulary ids) are never errors; they degrade into registry
//! annotations. Every boundary error carries the offending path.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading inputs or rendering a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// YAML parsing failed.
    #[error("failed to parse YAML at {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// JSON parsing failed.
    #[error("failed to parse JSON at {path}: {source}")]
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A required input file was not found.
    #[error("required file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// No control in the working set matches the requested identifier.
    #[error("no control with scoped_id or id {wanted:?}")]
    ControlNotFound { wanted: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic serde_json error (not file-specific).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic serde_yaml error (not file-specific).
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for manifest operations.
pub type ManifestResult<T> = Result<T, ManifestError>;
