//! Error types for the ingest crate

use crate::mapper::MapperError;
use std::path::PathBuf;

/// Result type for ingest operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Error types for loading sources and resolving roles
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Source file not found: {}", .0.display())]
    MissingSource(PathBuf),

    #[error("Malformed source document {path}: {message}")]
    Source { path: String, message: String },

    #[error("Name mapper failed for role {role_id}: {source}")]
    Mapper {
        role_id: String,
        #[source]
        source: MapperError,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Common(#[from] seedlink_common::SeedlinkError),
}
