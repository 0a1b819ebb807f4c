//! Coverage reporting
//!
//! [`CoverageReport`] gathers the counters of a link run into one serializable
//! value. Every list is capped at the configured example limit; the counts
//! next to it always cover the full run.

use crate::assembler::{Assembly, AssemblyStats, DanglingComplexRef};
use crate::biochem::XrefCoverage;
use crate::loader::SourceInfo;
use crate::models::{CollisionRecord, ReactionType, RelationKind};
use crate::resolver::{NormalizationMatch, ResolutionRun, ResolutionStats, UnmappedRole};
use crate::xref::DroppedXref;
use crate::Result;
use chrono::{DateTime, Utc};
use seedlink_common::checksum::SourceFingerprint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Canonical registry figures
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySummary {
    pub entries: usize,
    /// Normalized keys shared by several entries
    pub collision_keys: usize,
    pub duplicate_names: usize,
    pub hierarchy_edges: usize,
    pub same_as_links: usize,
    /// Canonical roles carrying `seed.reaction` cross-references
    pub roles_with_reactions: usize,
}

/// Template reactions and compounds looked up in the biochemistry graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiochemSummary {
    pub graph_compounds: usize,
    pub graph_reactions: usize,
    pub template_reactions: usize,
    pub reactions_mapped: usize,
    pub reactions_unmapped: usize,
    pub unmapped_reaction_examples: Vec<String>,
    pub template_compounds: usize,
    pub compounds_mapped: usize,
    pub compounds_unmapped: usize,
    pub unmapped_compound_examples: Vec<String>,
    /// Template reactions per recognised type
    pub reaction_types: BTreeMap<ReactionType, usize>,
}

/// Metadata of the two ontology sources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologySources {
    pub seed_roles: SourceInfo,
    pub biochem: SourceInfo,
}

/// Capped example lists for human review
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportExamples {
    pub unmapped_roles: Vec<UnmappedRole>,
    pub normalization_matches: Vec<NormalizationMatch>,
    pub collisions: Vec<CollisionRecord>,
    pub dropped_xrefs: Vec<DroppedXref>,
    pub dangling_complex_refs: Vec<DanglingComplexRef>,
    pub complexes_without_resolved_members: Vec<String>,
}

/// Summary of one link run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub generated_at: DateTime<Utc>,
    pub sources: Vec<SourceFingerprint>,
    pub ontologies: OntologySources,
    pub roles: ResolutionStats,
    /// Resolved share of complex-referenced roles, in percent
    pub coverage_pct: f64,
    pub registry: RegistrySummary,
    pub links: BTreeMap<RelationKind, usize>,
    pub assembly: AssemblyStats,
    pub biochem: BiochemSummary,
    pub xrefs: XrefCoverage,
    pub dropped_xrefs: usize,
    pub examples: ReportExamples,
}

/// Borrowed results a report is built from
pub struct ReportInputs<'a> {
    pub resolution: &'a ResolutionRun,
    pub assembly: &'a Assembly,
    pub registry: RegistrySummary,
    pub biochem: BiochemSummary,
    pub xrefs: XrefCoverage,
    pub dropped_xrefs: &'a [DroppedXref],
    pub sources: Vec<SourceFingerprint>,
    pub ontologies: OntologySources,
}

fn capped<T: Clone>(items: &[T], limit: usize) -> Vec<T> {
    items.iter().take(limit).cloned().collect()
}

impl CoverageReport {
    pub fn build(inputs: ReportInputs<'_>, example_limit: usize) -> Self {
        let ReportInputs {
            resolution,
            assembly,
            registry,
            biochem,
            xrefs,
            dropped_xrefs,
            sources,
            ontologies,
        } = inputs;

        let mut links = assembly.links.counts();
        links.insert(RelationKind::SameAs, registry.same_as_links);

        CoverageReport {
            generated_at: Utc::now(),
            sources,
            ontologies,
            coverage_pct: resolution.stats.coverage_pct(),
            roles: resolution.stats.clone(),
            registry,
            links,
            assembly: assembly.stats.clone(),
            biochem,
            xrefs,
            dropped_xrefs: dropped_xrefs.len(),
            examples: ReportExamples {
                unmapped_roles: capped(&resolution.unmapped, example_limit),
                normalization_matches: capped(&resolution.normalization_matches, example_limit),
                collisions: capped(&resolution.collisions, example_limit),
                dropped_xrefs: capped(dropped_xrefs, example_limit),
                dangling_complex_refs: capped(&assembly.dangling_complex_refs, example_limit),
                complexes_without_resolved_members: capped(
                    &assembly.complexes_without_resolved_members,
                    example_limit,
                ),
            },
        }
    }

    /// Plain-text summary for terminal output
    pub fn summary_lines(&self) -> Vec<String> {
        let r = &self.roles;
        let mut lines = vec![
            format!("Roles: {} total, {} referenced by complexes", r.total, r.in_complexes),
        ];
        for (source, count) in &r.by_source {
            lines.push(format!("  {}: {}", source, count));
        }
        lines.push(format!(
            "Resolved: {} exact, {} mapper, {} normalized ({:.1}% coverage)",
            r.exact, r.external_mapper, r.normalized, self.coverage_pct
        ));
        lines.push(format!(
            "Unmapped: {} ({} collision skips, {} unnamed, {} mapper failures)",
            r.unmapped, r.collision_skips, r.unnamed, r.mapper_failures
        ));
        for (kind, count) in &self.links {
            lines.push(format!("  {}: {}", kind, count));
        }
        lines.push(format!(
            "Reactions: {}/{} mapped to biochemistry",
            self.biochem.reactions_mapped, self.biochem.template_reactions
        ));
        lines.push(format!(
            "Compounds: {}/{} mapped to biochemistry",
            self.biochem.compounds_mapped, self.biochem.template_compounds
        ));
        for (reaction_type, count) in &self.biochem.reaction_types {
            lines.push(format!("  {}: {}", reaction_type.as_str(), count));
        }
        lines.push(format!("Dropped cross-references: {}", self.dropped_xrefs));
        lines
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)?;
        Ok(())
    }
}

/// One row of `unmapped_roles.csv`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmappedRow {
    pub entity_type: String,
    pub id: String,
    pub name: String,
    pub normalized_form: String,
    pub source: String,
}

impl From<&UnmappedRole> for UnmappedRow {
    fn from(role: &UnmappedRole) -> Self {
        UnmappedRow {
            entity_type: "role".to_string(),
            id: role.id.clone(),
            name: role.name.clone(),
            normalized_form: role.normalized.clone(),
            source: role.source.to_string(),
        }
    }
}

/// Write unmapped entities as CSV with a header row
pub fn write_unmapped_csv<'a, I>(path: &Path, rows: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a UnmappedRow>,
{
    let mut writer = csv::Writer::from_path(path)?;
    let mut count = 0;
    for row in rows {
        writer.serialize(row)?;
        count += 1;
    }
    // header only when there are no rows
    if count == 0 {
        writer.write_record(["entity_type", "id", "name", "normalized_form", "source"])?;
    }
    writer.flush()?;
    Ok(count)
}
