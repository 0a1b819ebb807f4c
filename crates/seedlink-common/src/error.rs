//! Error types shared by the SEED link crates

use thiserror::Error;

/// Result type alias for common operations
pub type Result<T> = std::result::Result<T, SeedlinkError>;

/// Main error type for shared utilities
#[derive(Error, Debug)]
pub enum SeedlinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
