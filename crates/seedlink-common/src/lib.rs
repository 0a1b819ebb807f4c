//! SEED Link Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared utilities and error handling for the SEED link workspace.
//!
//! # Overview
//!
//! - **Error Handling**: Custom error types and result types
//! - **Checksums**: Source file fingerprints recorded in run provenance
//! - **Logging**: Centralized `tracing` subscriber setup
//!
//! # Example
//!
//! ```no_run
//! use seedlink_common::Result;
//! use seedlink_common::checksum::SourceFingerprint;
//!
//! fn fingerprint(path: &str) -> Result<String> {
//!     Ok(SourceFingerprint::of_file(path)?.sha256)
//! }
//! ```

pub mod checksum;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{Result, SeedlinkError};
