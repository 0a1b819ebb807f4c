// Link pipeline orchestration
//
// load sources → build registry → resolve roles → assemble links → report

use crate::assembler::{reaction_types, same_as_links, Assembly, RelationshipAssembler};
use crate::biochem::BiochemIndex;
use crate::config::PipelineConfig;
use crate::loader::{BiochemGraph, RoleHierarchyEdge, SeedRoleGraph, Template, TemplateOptions};
use crate::mapper::{AnnotationMapper, NoMapper, TableMapper};
use crate::models::{CollisionRecord, ResolvedLink, Role};
use crate::registry::CanonicalRegistry;
use crate::report::{
    write_unmapped_csv, BiochemSummary, CoverageReport, OntologySources, RegistrySummary, ReportInputs, UnmappedRow,
};
use crate::resolver::IdentityResolver;
use crate::Result;
use seedlink_common::checksum::SourceFingerprint;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

pub const RESOLVED_ROLES_FILE: &str = "resolved_roles.json";
pub const LINKS_FILE: &str = "links.json";
pub const COLLISIONS_FILE: &str = "collisions.json";
pub const HIERARCHY_FILE: &str = "role_hierarchy.json";
pub const ROLE_REACTIONS_FILE: &str = "role_reactions.json";
pub const REPORT_FILE: &str = "coverage_report.json";
pub const UNMAPPED_FILE: &str = "unmapped_roles.csv";

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub roles: Vec<Role>,
    pub links: Vec<ResolvedLink>,
    pub collisions: Vec<CollisionRecord>,
    pub hierarchy: Vec<RoleHierarchyEdge>,
    /// Canonical role → `seed.reaction` cross-references from the SEED graph
    pub role_reactions: BTreeMap<String, Vec<String>>,
    pub unmapped: Vec<UnmappedRow>,
    pub report: CoverageReport,
}

impl PipelineOutput {
    /// Write all output files into `dir`, creating it if needed
    pub fn write(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;

        let mut written = Vec::new();
        written.push(write_json(&dir.join(RESOLVED_ROLES_FILE), &self.roles)?);
        written.push(write_json(&dir.join(LINKS_FILE), &self.links)?);
        written.push(write_json(&dir.join(COLLISIONS_FILE), &self.collisions)?);
        written.push(write_json(&dir.join(HIERARCHY_FILE), &self.hierarchy)?);
        written.push(write_json(&dir.join(ROLE_REACTIONS_FILE), &self.role_reactions)?);

        let report_path = dir.join(REPORT_FILE);
        self.report.write_json(&report_path)?;
        written.push(report_path);

        let unmapped_path = dir.join(UNMAPPED_FILE);
        write_unmapped_csv(&unmapped_path, &self.unmapped)?;
        written.push(unmapped_path);

        info!(dir = %dir.display(), files = written.len(), "Wrote link outputs");
        Ok(written)
    }
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<PathBuf> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), value)?;
    Ok(path.to_path_buf())
}

/// Template-to-SEED link pipeline
pub struct LinkPipeline {
    config: PipelineConfig,
    mapper: Option<Box<dyn AnnotationMapper>>,
}

impl LinkPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config, mapper: None }
    }

    /// Use a custom mapper instead of the configured table
    pub fn with_mapper(mut self, mapper: Box<dyn AnnotationMapper>) -> Self {
        self.mapper = Some(mapper);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn run(self) -> Result<PipelineOutput> {
        let LinkPipeline { config, mapper } = self;
        config.validate()?;
        info!("Starting link pipeline");

        // Step 1: canonical registry
        info!(path = %config.seed_roles_path.display(), "Loading SEED roles");
        let seed = SeedRoleGraph::load(&config.seed_roles_path)?;
        let registry = CanonicalRegistry::build(seed.roles.iter().cloned());

        // Step 2: template
        info!(path = %config.template_path.display(), "Loading template");
        let template = Template::load(
            &config.template_path,
            TemplateOptions {
                strip_compartment_suffix: config.strip_compartment_suffix,
            },
        )?;

        // Step 3: biochemistry
        info!(path = %config.biochem_path.display(), "Loading biochemistry graph");
        let biochem = BiochemGraph::load(&config.biochem_path)?;
        let dropped_xrefs = biochem.dropped_xrefs;
        let biochem_info = biochem.info;
        let index = BiochemIndex::new(biochem.compounds, biochem.reactions);

        // Step 4: resolve roles
        let mapper: Box<dyn AnnotationMapper> = match (mapper, &config.mapper_table_path) {
            (Some(mapper), _) => mapper,
            (None, Some(path)) => Box::new(TableMapper::from_json_file(path)?),
            (None, None) => Box::new(NoMapper),
        };
        let run = IdentityResolver::new(&registry, mapper.as_ref())
            .with_policy(config.mapper_failure_policy)
            .resolve_all(template.roles, &template.complexes)?;

        // Step 5: assemble links
        let assembly: Assembly =
            RelationshipAssembler::new(&run.roles).assemble(&template.complexes, &template.reactions);
        let same_as = if config.emit_same_as_links {
            same_as_links(&registry)
        } else {
            Vec::new()
        };

        let mut links: Vec<ResolvedLink> = if config.emit_inverse_links {
            assembly.links.with_inverse()
        } else {
            assembly.links.iter().cloned().collect()
        };
        links.extend(same_as.iter().cloned());

        // Step 6: biochemistry mapping of template reactions and compounds
        let mut biochem_summary = BiochemSummary {
            graph_compounds: index.compound_count(),
            graph_reactions: index.reaction_count(),
            template_reactions: template.reactions.len(),
            template_compounds: template.compounds.len(),
            ..BiochemSummary::default()
        };
        for (_, reaction_type) in reaction_types(&template.reactions) {
            *biochem_summary.reaction_types.entry(reaction_type).or_insert(0) += 1;
        }
        let mut unmapped: Vec<UnmappedRow> = run.unmapped.iter().map(UnmappedRow::from).collect();
        for reaction in &template.reactions {
            if index.map_reaction(&reaction.id).is_some() {
                biochem_summary.reactions_mapped += 1;
                continue;
            }
            biochem_summary.reactions_unmapped += 1;
            if biochem_summary.unmapped_reaction_examples.len() < config.example_limit {
                biochem_summary.unmapped_reaction_examples.push(reaction.id.clone());
            }
            unmapped.push(UnmappedRow {
                entity_type: "reaction".to_string(),
                id: reaction.id.clone(),
                name: reaction.name.clone(),
                normalized_form: String::new(),
                source: "template".to_string(),
            });
        }
        for compound in &template.compounds {
            if index.map_compound(&compound.id).is_some() {
                biochem_summary.compounds_mapped += 1;
                continue;
            }
            biochem_summary.compounds_unmapped += 1;
            if biochem_summary.unmapped_compound_examples.len() < config.example_limit {
                biochem_summary.unmapped_compound_examples.push(compound.id.clone());
            }
            unmapped.push(UnmappedRow {
                entity_type: "compound".to_string(),
                id: compound.id.clone(),
                name: compound.name.clone(),
                normalized_form: String::new(),
                source: "template".to_string(),
            });
        }
        info!(
            reactions_mapped = biochem_summary.reactions_mapped,
            reactions_unmapped = biochem_summary.reactions_unmapped,
            compounds_mapped = biochem_summary.compounds_mapped,
            compounds_unmapped = biochem_summary.compounds_unmapped,
            "Mapped template entities to biochemistry"
        );

        // Step 7: report
        let sources = [&config.seed_roles_path, &config.template_path, &config.biochem_path]
            .into_iter()
            .chain(config.mapper_table_path.as_ref())
            .map(SourceFingerprint::of_file)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let registry_summary = RegistrySummary {
            entries: registry.len(),
            collision_keys: registry.collision_count(),
            duplicate_names: registry.duplicate_name_count(),
            hierarchy_edges: seed.hierarchy.len(),
            same_as_links: same_as.len(),
            roles_with_reactions: seed.role_reactions.len(),
        };

        let report = CoverageReport::build(
            ReportInputs {
                resolution: &run,
                assembly: &assembly,
                registry: registry_summary,
                biochem: biochem_summary,
                xrefs: index.xref_coverage(),
                dropped_xrefs: &dropped_xrefs,
                sources,
                ontologies: OntologySources {
                    seed_roles: seed.info,
                    biochem: biochem_info,
                },
            },
            config.example_limit,
        );

        info!(
            roles = run.stats.total,
            resolved = run.stats.resolved(),
            links = links.len(),
            collisions = run.collisions.len(),
            "Link pipeline completed"
        );

        Ok(PipelineOutput {
            roles: run.roles,
            links,
            collisions: run.collisions,
            hierarchy: seed.hierarchy,
            role_reactions: seed.role_reactions,
            unmapped,
            report,
        })
    }
}
