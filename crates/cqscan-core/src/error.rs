use std::path::PathBuf;
use thiserror::Error;

/// All the ways a scan can go wrong
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input report not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Malformed dependency line: {0}")]
    Malformed(#[from] cqscan_deps::CoordinateError),

    #[error("Export failed: {0}")]
    ExportError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
