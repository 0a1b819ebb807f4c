//! External name → identifier mapping
//!
//! The resolver's second stage delegates to an [`AnnotationMapper`], an
//! annotation service that knows curated spellings the registry does not.
//! A non-empty answer is authoritative.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Failure of the mapping collaborator
#[derive(Debug, Clone, thiserror::Error)]
pub enum MapperError {
    #[error("mapper unavailable: {0}")]
    Unavailable(String),

    #[error("mapper failed: {0}")]
    Failed(String),
}

/// What the resolver does when the mapper fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapperFailurePolicy {
    /// Halt the run and propagate the error
    #[default]
    Abort,
    /// Count the failure and continue with normalization matching
    TreatAsNoMatch,
}

impl std::str::FromStr for MapperFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "abort" | "fail_fast" => Ok(MapperFailurePolicy::Abort),
            "treat_as_no_match" | "no_match" | "lenient" => Ok(MapperFailurePolicy::TreatAsNoMatch),
            _ => Err(format!("Unknown mapper failure policy: {}", s)),
        }
    }
}

/// Name → canonical identifier service
pub trait AnnotationMapper {
    /// Map a role annotation to a canonical identifier, `Ok(None)` when the
    /// service has no answer
    fn map_annotation(&self, name: &str) -> Result<Option<String>, MapperError>;
}

impl<F> AnnotationMapper for F
where
    F: Fn(&str) -> Result<Option<String>, MapperError>,
{
    fn map_annotation(&self, name: &str) -> Result<Option<String>, MapperError> {
        self(name)
    }
}

/// Mapper with no knowledge; every lookup misses
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMapper;

impl AnnotationMapper for NoMapper {
    fn map_annotation(&self, _name: &str) -> Result<Option<String>, MapperError> {
        Ok(None)
    }
}

/// Mapper backed by a curated name → identifier table
#[derive(Debug, Clone, Default)]
pub struct TableMapper {
    table: HashMap<String, String>,
}

impl TableMapper {
    pub fn new(table: HashMap<String, String>) -> Self {
        TableMapper { table }
    }

    /// Load a JSON object `{ "<role name>": "<identifier>" }`
    pub fn from_json_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(crate::IngestError::MissingSource(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let table: HashMap<String, String> = serde_json::from_str(&content)?;
        info!(path = %path.display(), entries = table.len(), "Loaded mapper table");
        Ok(TableMapper::new(table))
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl AnnotationMapper for TableMapper {
    fn map_annotation(&self, name: &str) -> Result<Option<String>, MapperError> {
        Ok(self
            .table
            .get(name.trim())
            .filter(|id| !id.trim().is_empty())
            .cloned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_table_mapper_lookup() {
        let mapper = TableMapper::new(HashMap::from([
            ("Hexokinase".to_string(), "seed.role:7".to_string()),
            ("Blank".to_string(), " ".to_string()),
        ]));

        assert_eq!(mapper.map_annotation(" Hexokinase ").unwrap(), Some("seed.role:7".to_string()));
        assert_eq!(mapper.map_annotation("hexokinase").unwrap(), None);
        assert_eq!(mapper.map_annotation("Blank").unwrap(), None);
    }

    #[test]
    fn test_closure_mapper() {
        let mapper = |name: &str| -> Result<Option<String>, MapperError> {
            if name == "down" {
                Err(MapperError::Unavailable("offline".to_string()))
            } else {
                Ok(None)
            }
        };
        assert!(mapper.map_annotation("down").is_err());
        assert_eq!(NoMapper.map_annotation("anything").unwrap(), None);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("abort".parse::<MapperFailurePolicy>().unwrap(), MapperFailurePolicy::Abort);
        assert_eq!(
            "treat-as-no-match".parse::<MapperFailurePolicy>().unwrap(),
            MapperFailurePolicy::TreatAsNoMatch
        );
        assert!("retry".parse::<MapperFailurePolicy>().is_err());
    }

    #[test]
    fn test_missing_table_file() {
        let err = TableMapper::from_json_file("/nonexistent/mapper.json").unwrap_err();
        assert!(matches!(err, crate::IngestError::MissingSource(_)));
    }
}
