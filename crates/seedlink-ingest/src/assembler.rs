//! Relationship assembly
//!
//! Walks every reaction's complex references and emits the link set between
//! resolved identifiers:
//!
//! - `has_complex(R, C)` for each reaction → known complex reference
//! - `has_role(C, r)` for each member role that resolved
//! - `enables_reaction(r, R)` for each resolved member flagged triggering
//!
//! Links are collected into a set, so repeated triples collapse. The inverse
//! `realized_by(R, r)` is derived from `enables_reaction` on demand and never
//! stored on its own.

use crate::models::{Complex, ReactionType, Reaction, RelationKind, ResolvedLink, Role};
use crate::registry::CanonicalRegistry;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::{debug, info};

/// Deduplicated set of links
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkSet {
    links: BTreeSet<ResolvedLink>,
}

impl LinkSet {
    /// Insert a link, returning `false` when it was already present.
    ///
    /// `realized_by` links are rejected; they only exist as the inverse of
    /// `enables_reaction`.
    pub fn insert(&mut self, link: ResolvedLink) -> bool {
        if link.relation == RelationKind::RealizedBy {
            return false;
        }
        self.links.insert(link)
    }

    pub fn contains(&self, link: &ResolvedLink) -> bool {
        match link.relation {
            RelationKind::RealizedBy => self.links.contains(&ResolvedLink::new(
                link.object.clone(),
                RelationKind::EnablesReaction,
                link.subject.clone(),
            )),
            _ => self.links.contains(link),
        }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedLink> {
        self.links.iter()
    }

    pub fn of_kind(&self, relation: RelationKind) -> impl Iterator<Item = &ResolvedLink> {
        self.links.iter().filter(move |link| link.relation == relation)
    }

    /// `realized_by(R, r)` for every stored `enables_reaction(r, R)`
    pub fn inverse(&self) -> impl Iterator<Item = ResolvedLink> + '_ {
        self.of_kind(RelationKind::EnablesReaction)
            .map(|link| ResolvedLink::new(link.object.clone(), RelationKind::RealizedBy, link.subject.clone()))
    }

    /// Stored links followed by the derived inverses
    pub fn with_inverse(&self) -> Vec<ResolvedLink> {
        self.links.iter().cloned().chain(self.inverse()).collect()
    }

    /// Link count per relation kind, including derived `realized_by`
    pub fn counts(&self) -> BTreeMap<RelationKind, usize> {
        let mut counts: BTreeMap<RelationKind, usize> =
            RelationKind::ALL.iter().map(|kind| (*kind, 0)).collect();
        for link in &self.links {
            *counts.entry(link.relation).or_insert(0) += 1;
        }
        let enables = counts.get(&RelationKind::EnablesReaction).copied().unwrap_or(0);
        counts.insert(RelationKind::RealizedBy, enables);
        counts
    }
}

/// A reaction pointing at a complex that is not in the template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DanglingComplexRef {
    pub reaction_id: String,
    pub complex_id: String,
}

/// A complex member whose role id is not in the role table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingMemberRole {
    pub complex_id: String,
    pub role_id: String,
}

/// Counters of an assembly pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyStats {
    pub reactions: usize,
    pub complexes: usize,
    pub complexes_without_resolved_members: usize,
    pub complexes_without_reactions: usize,
    pub dangling_complex_refs: usize,
    pub missing_member_roles: usize,
}

/// Links plus the degenerate cases met while building them
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    pub links: LinkSet,
    pub complexes_without_resolved_members: Vec<String>,
    pub dangling_complex_refs: Vec<DanglingComplexRef>,
    pub missing_member_roles: Vec<MissingMemberRole>,
    pub stats: AssemblyStats,
}

/// Builds links from resolved roles, complexes and reactions
pub struct RelationshipAssembler<'a> {
    roles: HashMap<&'a str, &'a Role>,
}

impl<'a> RelationshipAssembler<'a> {
    pub fn new(roles: &'a [Role]) -> Self {
        RelationshipAssembler {
            roles: roles.iter().map(|role| (role.id.as_str(), role)).collect(),
        }
    }

    pub fn assemble(&self, complexes: &[Complex], reactions: &[Reaction]) -> Assembly {
        let by_id: HashMap<&str, &Complex> = complexes.iter().map(|c| (c.id.as_str(), c)).collect();
        let mut assembly = Assembly::default();
        let mut linked_complexes: HashSet<&str> = HashSet::new();

        for reaction in reactions {
            for complex_ref in &reaction.complex_refs {
                let Some(complex) = by_id.get(complex_ref.as_str()) else {
                    debug!(reaction_id = %reaction.id, complex_id = %complex_ref, "Reaction references unknown complex");
                    assembly.dangling_complex_refs.push(DanglingComplexRef {
                        reaction_id: reaction.id.clone(),
                        complex_id: complex_ref.clone(),
                    });
                    continue;
                };
                linked_complexes.insert(complex.id.as_str());

                assembly.links.insert(ResolvedLink::new(
                    reaction.id.as_str(),
                    RelationKind::HasComplex,
                    complex.id.as_str(),
                ));

                for member in &complex.member_roles {
                    let Some(identifier) = self
                        .roles
                        .get(member.role_id.as_str())
                        .and_then(|role| role.resolved_identifier())
                    else {
                        continue;
                    };

                    assembly.links.insert(ResolvedLink::new(
                        complex.id.as_str(),
                        RelationKind::HasRole,
                        identifier,
                    ));
                    if member.triggering {
                        assembly.links.insert(ResolvedLink::new(
                            identifier,
                            RelationKind::EnablesReaction,
                            reaction.id.as_str(),
                        ));
                    }
                }
            }
        }

        for complex in complexes {
            let mut any_resolved = false;
            for member in &complex.member_roles {
                match self.roles.get(member.role_id.as_str()) {
                    Some(role) => any_resolved |= role.is_resolved(),
                    None => assembly.missing_member_roles.push(MissingMemberRole {
                        complex_id: complex.id.clone(),
                        role_id: member.role_id.clone(),
                    }),
                }
            }
            if !any_resolved {
                assembly.complexes_without_resolved_members.push(complex.id.clone());
            }
            if !linked_complexes.contains(complex.id.as_str()) {
                assembly.stats.complexes_without_reactions += 1;
            }
        }

        assembly.stats.reactions = reactions.len();
        assembly.stats.complexes = complexes.len();
        assembly.stats.complexes_without_resolved_members = assembly.complexes_without_resolved_members.len();
        assembly.stats.dangling_complex_refs = assembly.dangling_complex_refs.len();
        assembly.stats.missing_member_roles = assembly.missing_member_roles.len();

        let counts = assembly.links.counts();
        info!(
            has_complex = counts.get(&RelationKind::HasComplex).copied().unwrap_or(0),
            has_role = counts.get(&RelationKind::HasRole).copied().unwrap_or(0),
            enables_reaction = counts.get(&RelationKind::EnablesReaction).copied().unwrap_or(0),
            dangling = assembly.stats.dangling_complex_refs,
            "Assembled relationships"
        );

        assembly
    }
}

/// Convenience wrapper over [`RelationshipAssembler`]
pub fn assemble(roles: &[Role], complexes: &[Complex], reactions: &[Reaction]) -> Assembly {
    RelationshipAssembler::new(roles).assemble(complexes, reactions)
}

/// Pairwise `same_as` links between canonical roles sharing a normalized key
pub fn same_as_links(registry: &CanonicalRegistry) -> Vec<ResolvedLink> {
    let mut links = Vec::new();
    for identifiers in registry.duplicate_sets().values() {
        for (i, subject) in identifiers.iter().enumerate() {
            for object in &identifiers[i + 1..] {
                links.push(ResolvedLink::new(*subject, RelationKind::SameAs, *object));
            }
        }
    }
    links
}

/// `(reaction id, type)` for reactions carrying a recognised type
pub fn reaction_types(reactions: &[Reaction]) -> Vec<(&str, ReactionType)> {
    reactions
        .iter()
        .filter_map(|r| r.reaction_type.map(|t| (r.id.as_str(), t)))
        .collect()
}
