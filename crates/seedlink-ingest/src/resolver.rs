//! Identity resolution of template roles
//!
//! Each role referenced by a complex walks a fixed priority chain and stops
//! at the first stage that answers:
//!
//! 1. **Exact**: the literal name is a registry key.
//! 2. **External mapper**: the [`AnnotationMapper`] returns an identifier.
//! 3. **Normalized**: the normalized name maps to exactly one registry entry.
//!
//! A normalized key shared by several registry entries is a collision. The
//! role is left unmapped and a [`CollisionRecord`] is emitted; ties are never
//! broken heuristically. Roles no complex references are passed through
//! untouched.
//!
//! The registry is only read, so roles could be resolved in shards and the
//! per-shard [`ResolutionRun`]s merged afterwards.

use crate::mapper::{AnnotationMapper, MapperFailurePolicy};
use crate::models::{CollisionRecord, Complex, ResolutionMethod, ResolvedIdentity, Role, RoleSource};
use crate::registry::CanonicalRegistry;
use crate::{IngestError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};

/// Terminal state of one role after resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "method")]
pub enum ResolutionState {
    Resolved(ResolutionMethod),
    /// Normalized key matched several canonical entries
    SkippedCollision,
    /// No stage produced an identifier
    Unmapped,
    /// Not referenced by any complex, left untouched
    NotReferenced,
}

/// Outcome of resolving a single role
#[derive(Debug, Clone)]
pub struct Resolution {
    pub role: Role,
    pub state: ResolutionState,
    pub collision: Option<CollisionRecord>,
    /// Mapper error swallowed under [`MapperFailurePolicy::TreatAsNoMatch`]
    pub mapper_failure: Option<String>,
    /// Set when the normalized stage answered
    pub normalization: Option<NormalizationMatch>,
}

impl Resolution {
    fn pending(role: Role) -> Self {
        Resolution {
            role,
            state: ResolutionState::Unmapped,
            collision: None,
            mapper_failure: None,
            normalization: None,
        }
    }
}

/// A referenced role that stayed unresolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmappedRole {
    pub id: String,
    pub name: String,
    pub normalized: String,
    pub source: RoleSource,
}

impl From<&Role> for UnmappedRole {
    fn from(role: &Role) -> Self {
        UnmappedRole {
            id: role.id.clone(),
            name: role.name.clone(),
            normalized: role.normalized_name.clone(),
            source: role.source,
        }
    }
}

/// A role resolved only through its normalized form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationMatch {
    pub role_id: String,
    pub role_name: String,
    pub identifier: String,
    pub canonical_name: String,
    pub normalized_form: String,
}

/// A swallowed mapper failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapperFailure {
    pub role_id: String,
    pub message: String,
}

/// Counters of a resolution run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionStats {
    pub total: usize,
    pub by_source: BTreeMap<RoleSource, usize>,
    pub in_complexes: usize,
    pub exact: usize,
    pub external_mapper: usize,
    pub normalized: usize,
    pub unmapped: usize,
    pub collision_skips: usize,
    /// Referenced roles whose name normalizes to the empty key
    pub unnamed: usize,
    pub mapper_failures: usize,
}

impl ResolutionStats {
    pub fn resolved(&self) -> usize {
        self.exact + self.external_mapper + self.normalized
    }

    /// Percentage of referenced roles that resolved
    pub fn coverage_pct(&self) -> f64 {
        if self.in_complexes == 0 {
            return 0.0;
        }
        self.resolved() as f64 * 100.0 / self.in_complexes as f64
    }

    fn record(&mut self, role: &Role, state: ResolutionState) {
        match state {
            ResolutionState::Resolved(ResolutionMethod::Exact) => self.exact += 1,
            ResolutionState::Resolved(ResolutionMethod::ExternalMapper) => self.external_mapper += 1,
            ResolutionState::Resolved(ResolutionMethod::Normalized) => self.normalized += 1,
            ResolutionState::SkippedCollision => {
                self.collision_skips += 1;
                self.unmapped += 1;
            },
            ResolutionState::Unmapped => self.unmapped += 1,
            ResolutionState::NotReferenced => return,
        }
        self.in_complexes += 1;
        if role.normalized_name.is_empty() {
            self.unnamed += 1;
        }
    }
}

/// Everything a resolution run produced, in role input order
#[derive(Debug, Clone, Default)]
pub struct ResolutionRun {
    pub roles: Vec<Role>,
    pub states: Vec<ResolutionState>,
    pub collisions: Vec<CollisionRecord>,
    pub unmapped: Vec<UnmappedRole>,
    pub normalization_matches: Vec<NormalizationMatch>,
    pub mapper_failures: Vec<MapperFailure>,
    pub stats: ResolutionStats,
}

impl ResolutionRun {
    fn push(&mut self, resolution: Resolution) {
        let Resolution {
            role,
            state,
            collision,
            mapper_failure,
            normalization,
        } = resolution;

        self.stats.total += 1;
        *self.stats.by_source.entry(role.source).or_insert(0) += 1;
        self.stats.record(&role, state);

        if let Some(message) = mapper_failure {
            self.stats.mapper_failures += 1;
            self.mapper_failures.push(MapperFailure {
                role_id: role.id.clone(),
                message,
            });
        }
        if let Some(collision) = collision {
            self.collisions.push(collision);
        }
        if let Some(normalization) = normalization {
            self.normalization_matches.push(normalization);
        }
        if matches!(state, ResolutionState::Unmapped | ResolutionState::SkippedCollision) {
            self.unmapped.push(UnmappedRole::from(&role));
        }

        self.roles.push(role);
        self.states.push(state);
    }

    /// Merge a run over a later shard of the role list
    pub fn merge(&mut self, other: ResolutionRun) {
        let ResolutionRun {
            roles,
            states,
            collisions,
            unmapped,
            normalization_matches,
            mapper_failures,
            stats,
        } = other;

        self.roles.extend(roles);
        self.states.extend(states);
        self.collisions.extend(collisions);
        self.unmapped.extend(unmapped);
        self.normalization_matches.extend(normalization_matches);
        self.mapper_failures.extend(mapper_failures);

        self.stats.total += stats.total;
        for (source, count) in stats.by_source {
            *self.stats.by_source.entry(source).or_insert(0) += count;
        }
        self.stats.in_complexes += stats.in_complexes;
        self.stats.exact += stats.exact;
        self.stats.external_mapper += stats.external_mapper;
        self.stats.normalized += stats.normalized;
        self.stats.unmapped += stats.unmapped;
        self.stats.collision_skips += stats.collision_skips;
        self.stats.unnamed += stats.unnamed;
        self.stats.mapper_failures += stats.mapper_failures;
    }
}

/// Role ids referenced by at least one complex
pub fn referenced_role_ids(complexes: &[Complex]) -> HashSet<&str> {
    complexes
        .iter()
        .flat_map(|complex| complex.member_roles.iter())
        .map(|member| member.role_id.as_str())
        .collect()
}

/// Priority-chain resolver over a read-only registry
pub struct IdentityResolver<'a, M: AnnotationMapper + ?Sized> {
    registry: &'a CanonicalRegistry,
    mapper: &'a M,
    policy: MapperFailurePolicy,
}

impl<'a, M: AnnotationMapper + ?Sized> IdentityResolver<'a, M> {
    pub fn new(registry: &'a CanonicalRegistry, mapper: &'a M) -> Self {
        IdentityResolver {
            registry,
            mapper,
            policy: MapperFailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: MapperFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run the priority chain for one role.
    ///
    /// A role that is already resolved keeps its identity.
    pub fn resolve(&self, role: Role) -> Result<Resolution> {
        let mut resolution = Resolution::pending(role);
        resolution.state = match resolution.role.resolved().map(|identity| identity.method) {
            Some(method) => ResolutionState::Resolved(method),
            None => self.run_chain(&mut resolution)?,
        };
        Ok(resolution)
    }

    fn run_chain(&self, resolution: &mut Resolution) -> Result<ResolutionState> {
        let role = &mut resolution.role;
        if role.name.trim().is_empty() {
            debug!(role_id = %role.id, "Role has no name, leaving unmapped");
            return Ok(ResolutionState::Unmapped);
        }

        // 1. exact
        if let Some(entry) = self.registry.exact(&role.name) {
            role.assign(ResolvedIdentity {
                identifier: entry.identifier.clone(),
                uri: entry.uri.clone(),
                method: ResolutionMethod::Exact,
            });
            return Ok(ResolutionState::Resolved(ResolutionMethod::Exact));
        }

        // 2. external mapper
        match self.mapper.map_annotation(&role.name) {
            Ok(Some(identifier)) if !identifier.trim().is_empty() => {
                let identifier = identifier.trim().to_string();
                role.assign(ResolvedIdentity {
                    uri: self.registry.uri_for(&identifier),
                    identifier,
                    method: ResolutionMethod::ExternalMapper,
                });
                return Ok(ResolutionState::Resolved(ResolutionMethod::ExternalMapper));
            },
            Ok(_) => {},
            Err(source) => match self.policy {
                MapperFailurePolicy::Abort => {
                    return Err(IngestError::Mapper {
                        role_id: role.id.clone(),
                        source,
                    });
                },
                MapperFailurePolicy::TreatAsNoMatch => {
                    warn!(role_id = %role.id, error = %source, "Mapper failed, treating as no match");
                    resolution.mapper_failure = Some(source.to_string());
                },
            },
        }

        // 3. normalized
        let Some(candidates) = self.registry.normalized_candidates(&role.normalized_name) else {
            debug!(role_id = %role.id, name = %role.name, "No mapping found");
            return Ok(ResolutionState::Unmapped);
        };

        if candidates.len() > 1 {
            debug!(
                role_id = %role.id,
                normalized = %role.normalized_name,
                candidates = candidates.len(),
                "Skipping normalization match: collision"
            );
            resolution.collision = Some(CollisionRecord {
                role_id: role.id.clone(),
                role_name: role.name.clone(),
                normalized_form: role.normalized_name.clone(),
                candidate_identifiers: candidates.iter().cloned().collect(),
            });
            return Ok(ResolutionState::SkippedCollision);
        }

        match candidates.iter().next().and_then(|id| self.registry.get(id)) {
            Some(entry) => {
                role.assign(ResolvedIdentity {
                    identifier: entry.identifier.clone(),
                    uri: entry.uri.clone(),
                    method: ResolutionMethod::Normalized,
                });
                resolution.normalization = Some(NormalizationMatch {
                    role_id: role.id.clone(),
                    role_name: role.name.clone(),
                    identifier: entry.identifier.clone(),
                    canonical_name: entry.name.clone(),
                    normalized_form: role.normalized_name.clone(),
                });
                Ok(ResolutionState::Resolved(ResolutionMethod::Normalized))
            },
            None => Ok(ResolutionState::Unmapped),
        }
    }

    /// Resolve every role referenced by `complexes`; the rest pass through.
    pub fn resolve_all(&self, roles: Vec<Role>, complexes: &[Complex]) -> Result<ResolutionRun> {
        let referenced = referenced_role_ids(complexes);
        let mut run = ResolutionRun::default();

        for role in roles {
            let resolution = if referenced.contains(role.id.as_str()) {
                self.resolve(role)?
            } else {
                Resolution {
                    state: ResolutionState::NotReferenced,
                    ..Resolution::pending(role)
                }
            };
            run.push(resolution);
        }

        info!(
            total = run.stats.total,
            in_complexes = run.stats.in_complexes,
            exact = run.stats.exact,
            external_mapper = run.stats.external_mapper,
            normalized = run.stats.normalized,
            unmapped = run.stats.unmapped,
            collision_skips = run.stats.collision_skips,
            "Resolved template roles"
        );

        Ok(run)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mapper::{MapperError, NoMapper, TableMapper};
    use crate::models::MemberRole;
    use crate::registry::CanonicalRole;
    use std::cell::Cell;
    use std::collections::HashMap;

    fn registry() -> CanonicalRegistry {
        CanonicalRegistry::build([
            CanonicalRole::from_seed_number("0000123", "Glucose-6-phosphate isomerase"),
            CanonicalRole::from_seed_number("0000200", "Foo bar"),
            CanonicalRole::from_seed_number("0000201", "FOO-BAR"),
            CanonicalRole::from_seed_number("0000300", "Pyruvate kinase (EC 2.7.1.40)"),
        ])
    }

    fn complex_of(role_ids: &[&str]) -> Vec<Complex> {
        vec![Complex::new(
            "cpx1",
            "test complex",
            role_ids.iter().map(|id| MemberRole::new(*id, true, false)).collect(),
        )]
    }

    #[test]
    fn test_exact_match() {
        let registry = registry();
        let resolver = IdentityResolver::new(&registry, &NoMapper);
        let role = Role::new("ftr1", "Glucose-6-phosphate isomerase", RoleSource::ModelSEED);

        let resolution = resolver.resolve(role).unwrap();
        assert_eq!(resolution.state, ResolutionState::Resolved(ResolutionMethod::Exact));
        assert_eq!(resolution.role.resolved_identifier(), Some("seed.role:0000123"));
        assert_eq!(
            resolution.role.resolved_uri(),
            Some("https://pubseed.theseed.org/RoleEditor.cgi?page=ShowRole&Role=0000123")
        );
    }

    #[test]
    fn test_exact_wins_over_colliding_normalization() {
        let registry = registry();
        let calls = Cell::new(0);
        let mapper = |_: &str| -> std::result::Result<Option<String>, MapperError> {
            calls.set(calls.get() + 1);
            Ok(Some("seed.role:9999".to_string()))
        };
        let resolver = IdentityResolver::new(&registry, &mapper);

        let resolution = resolver.resolve(Role::new("ftr2", "FOO-BAR", RoleSource::SEED)).unwrap();
        assert_eq!(resolution.role.resolved_identifier(), Some("seed.role:0000201"));
        assert!(resolution.collision.is_none());
        assert_eq!(calls.get(), 0, "later stages must not run after an exact hit");
    }

    #[test]
    fn test_mapper_before_normalization() {
        let registry = registry();
        let mapper = TableMapper::new(HashMap::from([(
            "pyruvate kinase".to_string(),
            "seed.role:0000301".to_string(),
        )]));
        let resolver = IdentityResolver::new(&registry, &mapper);

        let resolution = resolver
            .resolve(Role::new("ftr3", "pyruvate kinase", RoleSource::KEGG))
            .unwrap();
        assert_eq!(resolution.state, ResolutionState::Resolved(ResolutionMethod::ExternalMapper));
        assert_eq!(resolution.role.resolved_identifier(), Some("seed.role:0000301"));
        assert_eq!(
            resolution.role.resolved_uri(),
            Some("https://pubseed.theseed.org/RoleEditor.cgi?page=ShowRole&Role=0000301")
        );
    }

    #[test]
    fn test_normalized_match() {
        let registry = registry();
        let resolver = IdentityResolver::new(&registry, &NoMapper);

        let resolution = resolver
            .resolve(Role::new("ftr4", "Pyruvate-kinase", RoleSource::ModelSEED))
            .unwrap();
        assert_eq!(resolution.state, ResolutionState::Resolved(ResolutionMethod::Normalized));
        assert_eq!(resolution.role.resolved_identifier(), Some("seed.role:0000300"));

        let matched = resolution.normalization.expect("normalized match recorded");
        assert_eq!(matched.canonical_name, "Pyruvate kinase (EC 2.7.1.40)");
        assert_eq!(matched.normalized_form, "pyruvatekinase");
    }

    #[test]
    fn test_collision_leaves_role_unmapped() {
        let registry = registry();
        let resolver = IdentityResolver::new(&registry, &NoMapper);

        let resolution = resolver
            .resolve(Role::new("ftr5", "foo bar", RoleSource::ModelSEED))
            .unwrap();
        assert_eq!(resolution.state, ResolutionState::SkippedCollision);
        assert!(!resolution.role.is_resolved());

        let collision = resolution.collision.unwrap();
        assert_eq!(collision.normalized_form, "foobar");
        assert_eq!(
            collision.candidate_identifiers,
            vec!["seed.role:0000200".to_string(), "seed.role:0000201".to_string()]
        );
    }

    #[test]
    fn test_empty_name_is_never_looked_up() {
        let registry = registry();
        let mapper = |_: &str| -> std::result::Result<Option<String>, MapperError> {
            panic!("mapper must not be consulted for empty names")
        };
        let resolver = IdentityResolver::new(&registry, &mapper);

        let resolution = resolver.resolve(Role::new("ftr6", "  ", RoleSource::Other)).unwrap();
        assert_eq!(resolution.state, ResolutionState::Unmapped);
    }

    #[test]
    fn test_mapper_failure_policies() {
        let registry = registry();
        let mapper = |_: &str| -> std::result::Result<Option<String>, MapperError> {
            Err(MapperError::Unavailable("connection refused".to_string()))
        };

        let strict = IdentityResolver::new(&registry, &mapper);
        let err = strict
            .resolve(Role::new("ftr7", "Pyruvate-kinase", RoleSource::ModelSEED))
            .unwrap_err();
        assert!(matches!(err, IngestError::Mapper { ref role_id, .. } if role_id == "ftr7"));

        let lenient = IdentityResolver::new(&registry, &mapper)
            .with_policy(MapperFailurePolicy::TreatAsNoMatch);
        let resolution = lenient
            .resolve(Role::new("ftr7", "Pyruvate-kinase", RoleSource::ModelSEED))
            .unwrap();
        assert_eq!(resolution.state, ResolutionState::Resolved(ResolutionMethod::Normalized));
        assert!(resolution.mapper_failure.is_some());
    }

    #[test]
    fn test_resolve_all_skips_unreferenced_roles() {
        let registry = registry();
        let resolver = IdentityResolver::new(&registry, &NoMapper);
        let roles = vec![
            Role::new("ftr1", "Glucose-6-phosphate isomerase", RoleSource::ModelSEED),
            Role::new("ftr2", "Pyruvate kinase (EC 2.7.1.40)", RoleSource::KEGG),
            Role::new("ftr3", "foo_bar", RoleSource::PlantSEED),
            Role::new("ftr4", "Unknown protein", RoleSource::ModelSEED),
        ];

        let run = resolver
            .resolve_all(roles, &complex_of(&["ftr1", "ftr3", "ftr4"]))
            .unwrap();

        assert_eq!(run.stats.total, 4);
        assert_eq!(run.stats.in_complexes, 3);
        assert_eq!(run.stats.exact, 1);
        assert_eq!(run.stats.collision_skips, 1);
        assert_eq!(run.stats.unmapped, 2);
        assert_eq!(run.stats.by_source.get(&RoleSource::ModelSEED), Some(&2));
        assert_eq!(run.states[1], ResolutionState::NotReferenced);
        assert!(!run.roles[1].is_resolved(), "unreferenced role must pass through untouched");
        assert_eq!(run.collisions.len(), 1);
        assert_eq!(run.unmapped.len(), 2);
        assert!((run.stats.coverage_pct() - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalization_matches_carry_canonical_name() {
        let registry = registry();
        let resolver = IdentityResolver::new(&registry, &NoMapper);
        let run = resolver
            .resolve_all(
                vec![Role::new("ftr4", "pyruvate kinase", RoleSource::ModelSEED)],
                &complex_of(&["ftr4"]),
            )
            .unwrap();

        assert_eq!(run.normalization_matches.len(), 1);
        assert_eq!(run.normalization_matches[0].canonical_name, "Pyruvate kinase (EC 2.7.1.40)");
        assert_eq!(run.normalization_matches[0].identifier, "seed.role:0000300");
    }

    #[test]
    fn test_merge_shards() {
        let registry = registry();
        let resolver = IdentityResolver::new(&registry, &NoMapper);
        let complexes = complex_of(&["ftr1", "ftr2"]);

        let mut left = resolver
            .resolve_all(
                vec![Role::new("ftr1", "Glucose-6-phosphate isomerase", RoleSource::SEED)],
                &complexes,
            )
            .unwrap();
        let right = resolver
            .resolve_all(vec![Role::new("ftr2", "foo bar", RoleSource::SEED)], &complexes)
            .unwrap();
        left.merge(right);

        assert_eq!(left.roles.len(), 2);
        assert_eq!(left.stats.in_complexes, 2);
        assert_eq!(left.stats.exact, 1);
        assert_eq!(left.stats.collision_skips, 1);
        assert_eq!(left.stats.by_source.get(&RoleSource::SEED), Some(&2));
    }
}
