//! Checksum utilities for source file provenance
//!
//! Every run records a fingerprint of each input document so that two
//! coverage reports can be compared knowing whether the sources changed.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

/// Fingerprint of a file consumed by a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFingerprint {
    /// Path as given to the run
    pub path: String,

    /// Hex-encoded SHA-256 digest
    pub sha256: String,

    /// File size in bytes
    pub size: u64,
}

impl SourceFingerprint {
    /// Fingerprint a file on disk
    pub fn of_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let size = std::fs::metadata(path)?.len();
        let sha256 = compute_file_checksum(path)?;

        Ok(Self {
            path: path.display().to_string(),
            sha256,
            size,
        })
    }
}

/// Compute the SHA-256 checksum of a file
pub fn compute_file_checksum(path: impl AsRef<Path>) -> Result<String> {
    let mut file = std::fs::File::open(path)?;
    compute_checksum(&mut file)
}

/// Compute the SHA-256 checksum of any readable source
pub fn compute_checksum<R: Read>(reader: &mut R) -> Result<String> {
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}
