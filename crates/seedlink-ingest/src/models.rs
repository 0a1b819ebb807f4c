// Entity records shared by the loaders, the resolver and the assembler

use crate::normalize::normalize;
use crate::xref::CrossReferences;
use serde::{Deserialize, Serialize};

// ============================================================================
// Role
// ============================================================================

/// Upstream curation source of a template role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoleSource {
    ModelSEED,
    KEGG,
    PlantSEED,
    SEED,
    Other,
}

impl RoleSource {
    /// Classify the free-text `source` field of a template role.
    /// Matching is exact, unknown or empty labels fall into `Other`.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "ModelSEED" => RoleSource::ModelSEED,
            "KEGG" => RoleSource::KEGG,
            "PlantSEED" => RoleSource::PlantSEED,
            "SEED" => RoleSource::SEED,
            _ => RoleSource::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleSource::ModelSEED => "ModelSEED",
            RoleSource::KEGG => "KEGG",
            RoleSource::PlantSEED => "PlantSEED",
            RoleSource::SEED => "SEED",
            RoleSource::Other => "other",
        }
    }
}

impl std::fmt::Display for RoleSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stage of the priority chain that produced a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMethod {
    Exact,
    ExternalMapper,
    Normalized,
}

impl std::fmt::Display for ResolutionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionMethod::Exact => f.write_str("exact"),
            ResolutionMethod::ExternalMapper => f.write_str("external_mapper"),
            ResolutionMethod::Normalized => f.write_str("normalized"),
        }
    }
}

/// Canonical identity assigned to a role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedIdentity {
    /// Canonical identifier (e.g., "seed.role:0000000001234")
    pub identifier: String,

    /// Resolvable URI of the canonical entry
    pub uri: String,

    pub method: ResolutionMethod,
}

/// A functional role from the template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Template role id (e.g., "ftr01234")
    pub id: String,

    /// Role name as curated upstream; empty when the source had none
    pub name: String,

    pub source: RoleSource,

    /// Comparison key derived from `name`
    pub normalized_name: String,

    /// Alternative names carried by the template (not used for matching)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,

    #[serde(default)]
    resolved: Option<ResolvedIdentity>,
}

impl Role {
    pub fn new(id: impl Into<String>, name: impl Into<String>, source: RoleSource) -> Self {
        let name = name.into();
        Role {
            id: id.into(),
            normalized_name: normalize(&name),
            name,
            source,
            aliases: Vec::new(),
            resolved: None,
        }
    }

    pub fn with_aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn resolved(&self) -> Option<&ResolvedIdentity> {
        self.resolved.as_ref()
    }

    pub fn resolved_identifier(&self) -> Option<&str> {
        self.resolved.as_ref().map(|r| r.identifier.as_str())
    }

    pub fn resolved_uri(&self) -> Option<&str> {
        self.resolved.as_ref().map(|r| r.uri.as_str())
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    /// Record the canonical identity of this role.
    ///
    /// The first assignment wins; returns `false` and leaves the role
    /// untouched if it was already resolved.
    pub fn assign(&mut self, identity: ResolvedIdentity) -> bool {
        if self.resolved.is_some() {
            return false;
        }
        self.resolved = Some(identity);
        true
    }
}

// ============================================================================
// Compound / Reaction
// ============================================================================

/// A biochemical compound from the ModelSEED graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compound {
    /// ModelSEED compound id (e.g., "cpd00002")
    pub id: String,
    pub name: String,
    pub uri: String,
    pub cross_references: CrossReferences,
}

/// Template reaction classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionType {
    Spontaneous,
    Universal,
}

impl ReactionType {
    /// Only "spontaneous" and "universal" are meaningful; other template
    /// values (e.g. "conditional") carry no classification.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "spontaneous" => Some(ReactionType::Spontaneous),
            "universal" => Some(ReactionType::Universal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionType::Spontaneous => "spontaneous",
            ReactionType::Universal => "universal",
        }
    }
}

/// A reaction, either from the template (with complex references) or from
/// the biochemistry graph (with cross-references)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub uri: String,

    /// Ids of the complexes able to catalyze this reaction
    #[serde(default)]
    pub complex_refs: Vec<String>,

    #[serde(default)]
    pub reaction_type: Option<ReactionType>,

    #[serde(default)]
    pub cross_references: CrossReferences,
}

impl Reaction {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Reaction {
            id: id.into(),
            name: name.into(),
            uri: String::new(),
            complex_refs: Vec::new(),
            reaction_type: None,
            cross_references: CrossReferences::default(),
        }
    }

    pub fn with_complexes<I, S>(mut self, complex_refs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.complex_refs = complex_refs.into_iter().map(Into::into).collect();
        self
    }
}

// ============================================================================
// Complex
// ============================================================================

/// Membership of a role in a complex
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRole {
    pub role_id: String,

    /// Presence of this role alone indicates the complex's catalytic capability
    pub triggering: bool,

    pub optional: bool,
}

impl MemberRole {
    pub fn new(role_id: impl Into<String>, triggering: bool, optional: bool) -> Self {
        MemberRole {
            role_id: role_id.into(),
            triggering,
            optional,
        }
    }
}

/// A protein complex and its ordered member roles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complex {
    pub id: String,
    pub name: String,
    pub member_roles: Vec<MemberRole>,
}

impl Complex {
    pub fn new(id: impl Into<String>, name: impl Into<String>, member_roles: Vec<MemberRole>) -> Self {
        Complex {
            id: id.into(),
            name: name.into(),
            member_roles,
        }
    }
}

// ============================================================================
// Links and collisions
// ============================================================================

/// Semantic relationship kinds of the unified ontology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// role → reaction
    EnablesReaction,
    /// complex → role
    HasRole,
    /// reaction → complex
    HasComplex,
    /// reaction → role, inverse of `EnablesReaction`
    RealizedBy,
    /// canonical role ↔ canonical role sharing a normalized form
    SameAs,
}

impl RelationKind {
    pub const ALL: [RelationKind; 5] = [
        RelationKind::EnablesReaction,
        RelationKind::HasRole,
        RelationKind::HasComplex,
        RelationKind::RealizedBy,
        RelationKind::SameAs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::EnablesReaction => "enables_reaction",
            RelationKind::HasRole => "has_role",
            RelationKind::HasComplex => "has_complex",
            RelationKind::RealizedBy => "realized_by",
            RelationKind::SameAs => "same_as",
        }
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A subject–relation–object triple between resolved identifiers
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResolvedLink {
    pub subject: String,
    pub relation: RelationKind,
    pub object: String,
}

impl ResolvedLink {
    pub fn new(subject: impl Into<String>, relation: RelationKind, object: impl Into<String>) -> Self {
        ResolvedLink {
            subject: subject.into(),
            relation,
            object: object.into(),
        }
    }
}

impl std::fmt::Display for ResolvedLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({}, {})", self.relation, self.subject, self.object)
    }
}

/// A role whose normalized form matched several canonical entries and was
/// therefore left unresolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionRecord {
    /// Template role that triggered the lookup
    pub role_id: String,
    pub role_name: String,

    pub normalized_form: String,

    /// Distinct canonical identifiers sharing `normalized_form`, sorted
    pub candidate_identifiers: Vec<String>,
}
