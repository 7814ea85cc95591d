//! Error types for the I/O boundary around the engine.
//!
//! The engine itself never fails; these errors come from reading documents,
//! loading configuration and persisting history.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading input or configuration
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Invalid JSON in config {path}: {source}")]
    ConfigJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Circular extends detected in config: {0}")]
    CircularExtends(PathBuf),

    #[error("Invalid ignore pattern: {0}")]
    Glob(#[from] globset::Error),

    #[error("Invalid base URL '{url}': {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

pub type Result<T> = std::result::Result<T, AuditError>;
