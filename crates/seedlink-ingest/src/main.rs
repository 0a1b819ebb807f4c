//! SEED Link - template to SEED ontology linker

use anyhow::{Context, Result};
use clap::Parser;
use seedlink_common::logging::{init_logging, LogConfig, LogLevel};
use seedlink_ingest::config::PipelineConfig;
use seedlink_ingest::mapper::MapperFailurePolicy;
use seedlink_ingest::pipeline::LinkPipeline;
use seedlink_ingest::{extract, normalize};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "seedlink-ingest")]
#[command(author, version, about = "Link ModelSEED templates to the SEED role ontology")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Parser, Debug)]
enum Command {
    /// Resolve template roles and write links and coverage reports
    Link {
        /// Model template JSON
        #[arg(long, env = "SEEDLINK_TEMPLATE")]
        template: Option<PathBuf>,

        /// ModelSEED biochemistry OBO-graph (.json or .json.gz)
        #[arg(long, env = "SEEDLINK_BIOCHEM")]
        biochem: Option<PathBuf>,

        /// SEED role OBO-graph
        #[arg(long, env = "SEEDLINK_SEED_ROLES")]
        seed_roles: Option<PathBuf>,

        /// Name to identifier table used as the external mapper
        #[arg(long, env = "SEEDLINK_MAPPER_TABLE")]
        mapper_table: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, env = "SEEDLINK_OUTPUT_DIR")]
        output: Option<PathBuf>,

        /// What to do when the mapper fails (abort, treat-as-no-match)
        #[arg(long)]
        on_mapper_failure: Option<MapperFailurePolicy>,

        /// Keep compartment suffixes on template reaction ids
        #[arg(long)]
        keep_compartment_suffix: bool,

        /// Maximum examples per report list
        #[arg(long)]
        example_limit: Option<usize>,

        /// Also write derived realized_by links
        #[arg(long)]
        inverse_links: bool,

        /// Also write same_as links between equivalent SEED roles
        #[arg(long)]
        same_as_links: bool,
    },

    /// Print the normalized comparison key of each label
    Normalize {
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Print the cross-references extracted from raw PREFIX:value strings
    Xrefs {
        #[arg(required = true)]
        raw: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("seedlink-ingest")
        .build()
        .merge_env()?;

    let _guard = init_logging(&log_config)?;

    match cli.command {
        Command::Link {
            template,
            biochem,
            seed_roles,
            mapper_table,
            output,
            on_mapper_failure,
            keep_compartment_suffix,
            example_limit,
            inverse_links,
            same_as_links,
        } => {
            let mut config = PipelineConfig::from_env().context("Failed to load pipeline configuration")?;
            if let Some(path) = template {
                config.template_path = path;
            }
            if let Some(path) = biochem {
                config.biochem_path = path;
            }
            if let Some(path) = seed_roles {
                config.seed_roles_path = path;
            }
            if let Some(path) = mapper_table {
                config.mapper_table_path = Some(path);
            }
            if let Some(path) = output {
                config.output_dir = path;
            }
            if let Some(policy) = on_mapper_failure {
                config.mapper_failure_policy = policy;
            }
            if keep_compartment_suffix {
                config.strip_compartment_suffix = false;
            }
            if let Some(limit) = example_limit {
                config.example_limit = limit;
            }
            if inverse_links {
                config.emit_inverse_links = true;
            }
            if same_as_links {
                config.emit_same_as_links = true;
            }

            info!("Linking template roles");
            let output_dir = config.output_dir.clone();
            let output = LinkPipeline::new(config).run().context("Link pipeline failed")?;
            let files = output
                .write(&output_dir)
                .with_context(|| format!("Failed to write outputs to {}", output_dir.display()))?;

            for line in output.report.summary_lines() {
                println!("{}", line);
            }
            for file in files {
                println!("Wrote {}", file.display());
            }
        },
        Command::Normalize { text } => {
            for label in text {
                println!("{}\t{}", label, normalize(&label));
            }
        },
        Command::Xrefs { raw } => {
            let extraction = extract(&raw);
            println!("{}", serde_json::to_string_pretty(&extraction.references)?);
            for dropped in &extraction.dropped {
                info!(raw = %dropped.raw, reason = ?dropped.reason, "Dropped cross-reference");
            }
        },
    }

    info!("Done");
    Ok(())
}
