// Link pipeline configuration

use crate::mapper::MapperFailurePolicy;
use crate::{IngestError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_TEMPLATE_PATH: &str = "templates/v6.0/GramNegModelTemplateV6.json";
pub const DEFAULT_BIOCHEM_PATH: &str = "ontology/json/modelseed.json.gz";
pub const DEFAULT_SEED_ROLES_PATH: &str = "ontology/json/seed.json";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_EXAMPLE_LIMIT: usize = 25;

/// Inputs, outputs and policies of one link run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Model template JSON
    pub template_path: PathBuf,

    /// ModelSEED biochemistry OBO-graph (`.json` or `.json.gz`)
    pub biochem_path: PathBuf,

    /// SEED role OBO-graph
    pub seed_roles_path: PathBuf,

    /// Curated name → identifier table for the external mapper stage
    pub mapper_table_path: Option<PathBuf>,

    pub output_dir: PathBuf,

    pub mapper_failure_policy: MapperFailurePolicy,

    /// Reduce template reaction ids such as `rxn00001_c` to `rxn00001`
    pub strip_compartment_suffix: bool,

    /// Maximum examples kept per report list
    pub example_limit: usize,

    /// Also write derived `realized_by` links
    pub emit_inverse_links: bool,

    /// Write `same_as` links between canonical roles sharing a normalized name
    pub emit_same_as_links: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            template_path: PathBuf::from(DEFAULT_TEMPLATE_PATH),
            biochem_path: PathBuf::from(DEFAULT_BIOCHEM_PATH),
            seed_roles_path: PathBuf::from(DEFAULT_SEED_ROLES_PATH),
            mapper_table_path: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            mapper_failure_policy: MapperFailurePolicy::default(),
            strip_compartment_suffix: true,
            example_limit: DEFAULT_EXAMPLE_LIMIT,
            emit_inverse_links: false,
            emit_same_as_links: false,
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Load from `SEEDLINK_*` environment variables, reading `.env` first
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup; unset variables keep defaults
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("SEEDLINK_TEMPLATE") {
            config.template_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("SEEDLINK_BIOCHEM") {
            config.biochem_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("SEEDLINK_SEED_ROLES") {
            config.seed_roles_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("SEEDLINK_MAPPER_TABLE").filter(|p| !p.trim().is_empty()) {
            config.mapper_table_path = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup("SEEDLINK_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(path);
        }
        if let Some(policy) = lookup("SEEDLINK_MAPPER_FAILURE_POLICY") {
            config.mapper_failure_policy = policy.parse().map_err(IngestError::Config)?;
        }
        if let Some(value) = lookup("SEEDLINK_STRIP_COMPARTMENT_SUFFIX") {
            config.strip_compartment_suffix = parse_bool("SEEDLINK_STRIP_COMPARTMENT_SUFFIX", &value)?;
        }
        if let Some(value) = lookup("SEEDLINK_EXAMPLE_LIMIT") {
            config.example_limit = value.trim().parse().map_err(|_| {
                IngestError::Config(format!("SEEDLINK_EXAMPLE_LIMIT must be a number, got {:?}", value))
            })?;
        }
        if let Some(value) = lookup("SEEDLINK_EMIT_INVERSE_LINKS") {
            config.emit_inverse_links = parse_bool("SEEDLINK_EMIT_INVERSE_LINKS", &value)?;
        }
        if let Some(value) = lookup("SEEDLINK_EMIT_SAME_AS_LINKS") {
            config.emit_same_as_links = parse_bool("SEEDLINK_EMIT_SAME_AS_LINKS", &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.template_path.as_os_str().is_empty() {
            return Err(IngestError::Config("Template path cannot be empty".to_string()));
        }
        if self.biochem_path.as_os_str().is_empty() {
            return Err(IngestError::Config("Biochemistry path cannot be empty".to_string()));
        }
        if self.seed_roles_path.as_os_str().is_empty() {
            return Err(IngestError::Config("SEED roles path cannot be empty".to_string()));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(IngestError::Config("Output directory cannot be empty".to_string()));
        }
        if self.example_limit == 0 {
            return Err(IngestError::Config("Example limit must be greater than 0".to_string()));
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(IngestError::Config(format!("{} must be a boolean, got {:?}", key, other))),
    }
}

/// Builder for [`PipelineConfig`]
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    template_path: Option<PathBuf>,
    biochem_path: Option<PathBuf>,
    seed_roles_path: Option<PathBuf>,
    mapper_table_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    mapper_failure_policy: Option<MapperFailurePolicy>,
    strip_compartment_suffix: Option<bool>,
    example_limit: Option<usize>,
    emit_inverse_links: Option<bool>,
    emit_same_as_links: Option<bool>,
}

impl PipelineConfigBuilder {
    pub fn template_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_path = Some(path.into());
        self
    }

    pub fn biochem_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.biochem_path = Some(path.into());
        self
    }

    pub fn seed_roles_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.seed_roles_path = Some(path.into());
        self
    }

    pub fn mapper_table_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.mapper_table_path = Some(path.into());
        self
    }

    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    pub fn mapper_failure_policy(mut self, policy: MapperFailurePolicy) -> Self {
        self.mapper_failure_policy = Some(policy);
        self
    }

    pub fn strip_compartment_suffix(mut self, strip: bool) -> Self {
        self.strip_compartment_suffix = Some(strip);
        self
    }

    pub fn example_limit(mut self, limit: usize) -> Self {
        self.example_limit = Some(limit);
        self
    }

    pub fn emit_inverse_links(mut self, emit: bool) -> Self {
        self.emit_inverse_links = Some(emit);
        self
    }

    pub fn emit_same_as_links(mut self, emit: bool) -> Self {
        self.emit_same_as_links = Some(emit);
        self
    }

    pub fn build(self) -> PipelineConfig {
        let default = PipelineConfig::default();
        PipelineConfig {
            template_path: self.template_path.unwrap_or(default.template_path),
            biochem_path: self.biochem_path.unwrap_or(default.biochem_path),
            seed_roles_path: self.seed_roles_path.unwrap_or(default.seed_roles_path),
            mapper_table_path: self.mapper_table_path.or(default.mapper_table_path),
            output_dir: self.output_dir.unwrap_or(default.output_dir),
            mapper_failure_policy: self.mapper_failure_policy.unwrap_or(default.mapper_failure_policy),
            strip_compartment_suffix: self
                .strip_compartment_suffix
                .unwrap_or(default.strip_compartment_suffix),
            example_limit: self.example_limit.unwrap_or(default.example_limit),
            emit_inverse_links: self.emit_inverse_links.unwrap_or(default.emit_inverse_links),
            emit_same_as_links: self.emit_same_as_links.unwrap_or(default.emit_same_as_links),
        }
    }
}
