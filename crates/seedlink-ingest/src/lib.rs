//! SEED Link Library
//!
//! Entity normalization and cross-source record linkage for the ModelSEED
//! biochemistry ontology.
//!
//! # Components
//!
//! - **normalize**: role name → comparison key
//! - **xref**: `PREFIX:value` strings → typed cross-references
//! - **registry**: read-only index over canonical SEED roles
//! - **resolver**: exact → external mapper → normalized priority chain
//! - **assembler**: `has_complex`, `has_role` and `enables_reaction` links
//!
//! # Example
//!
//! ```no_run
//! use seedlink_ingest::config::PipelineConfig;
//! use seedlink_ingest::pipeline::LinkPipeline;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = PipelineConfig::from_env()?;
//!     let output_dir = config.output_dir.clone();
//!     let output = LinkPipeline::new(config).run()?;
//!     output.write(&output_dir)?;
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod assembler;
pub mod biochem;
pub mod config;
pub mod error;
pub mod loader;
pub mod mapper;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod registry;
pub mod report;
pub mod resolver;
pub mod xref;

pub use error::{IngestError, Result};
pub use normalize::normalize;
pub use xref::extract;
