//! Source document loaders
//!
//! Thin serde readers for the three upstream documents. They turn JSON into
//! the in-memory records the resolver and assembler work on and perform no
//! matching of their own.

pub mod obograph;
pub mod template;

pub use obograph::{BiochemGraph, OboGraphDocument, RoleHierarchyEdge, SeedRoleGraph, SourceInfo};
pub use template::{Template, TemplateOptions};

use crate::{IngestError, Result};
use flate2::read::GzDecoder;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Whether a path names a gzip file
pub fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

/// Open a source file, transparently decompressing `.gz` input
pub fn open_source(path: &Path) -> Result<Box<dyn Read>> {
    if !path.exists() {
        return Err(IngestError::MissingSource(path.to_path_buf()));
    }

    let file = BufReader::new(File::open(path)?);
    if is_gzip(path) {
        debug!(path = %path.display(), "Reading gzip source");
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(file))
    }
}

/// Deserialize a JSON source document
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let reader = open_source(path)?;
    serde_json::from_reader(reader).map_err(|e| IngestError::Source {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Last `/`-separated segment of a reference such as `~/complexes/id/cpx00001`
pub fn last_segment(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}
