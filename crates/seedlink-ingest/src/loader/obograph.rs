// OBO-graph JSON loader (SEED roles and ModelSEED biochemistry)

use crate::loader::{last_segment, read_json};
use crate::models::{Compound, Reaction};
use crate::registry::{CanonicalRole, SEED_ROLE_PREFIX};
use crate::xref::{self, DroppedXref, XrefDatabase};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

// ============================================================================
// Raw document
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OboGraphDocument {
    #[serde(default)]
    pub graphs: Vec<OboGraph>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OboGraph {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub meta: Option<GraphMeta>,
    #[serde(default)]
    pub nodes: Vec<OboNode>,
    #[serde(default)]
    pub edges: Vec<OboEdge>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphMeta {
    #[serde(default, rename = "basicPropertyValues")]
    pub basic_property_values: Vec<PropertyValue>,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PropertyValue {
    #[serde(default)]
    pub pred: String,
    #[serde(default)]
    pub val: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OboNode {
    pub id: String,
    #[serde(default)]
    pub lbl: Option<String>,
    #[serde(default, rename = "type")]
    pub node_type: Option<String>,
    #[serde(default)]
    pub meta: Option<NodeMeta>,
}

impl OboNode {
    /// Untyped nodes are accepted; typed ones must be classes
    fn is_class(&self) -> bool {
        self.node_type.as_deref().is_none_or(|t| t == "CLASS")
    }

    fn label(&self) -> Option<&str> {
        self.lbl.as_deref().map(str::trim).filter(|l| !l.is_empty())
    }

    fn raw_xrefs(&self) -> impl Iterator<Item = &str> {
        self.meta
            .iter()
            .flat_map(|meta| meta.xrefs.iter())
            .map(|xref| xref.val.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeMeta {
    #[serde(default)]
    pub xrefs: Vec<XrefValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct XrefValue {
    #[serde(default)]
    pub val: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OboEdge {
    pub sub: String,
    pub pred: String,
    pub obj: String,
}

impl OboGraphDocument {
    pub fn load(path: &Path) -> Result<Self> {
        let document: OboGraphDocument = read_json(path)?;
        info!(
            path = %path.display(),
            graphs = document.graphs.len(),
            nodes = document.nodes().count(),
            "Loaded OBO-graph document"
        );
        Ok(document)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &OboNode> {
        self.graphs.iter().flat_map(|g| g.nodes.iter())
    }

    pub fn edges(&self) -> impl Iterator<Item = &OboEdge> {
        self.graphs.iter().flat_map(|g| g.edges.iter())
    }

    /// Title, description and version of the first graph carrying metadata
    pub fn source_info(&self) -> SourceInfo {
        let mut info = SourceInfo {
            node_count: self.nodes().count(),
            edge_count: self.edges().count(),
            ..SourceInfo::default()
        };

        if let Some(meta) = self.graphs.iter().find_map(|g| g.meta.as_ref()) {
            info.version = meta.version.clone();
            for prop in &meta.basic_property_values {
                if prop.pred.contains("title") {
                    info.title = Some(prop.val.clone());
                } else if prop.pred.contains("description") {
                    info.description = Some(prop.val.clone());
                } else if prop.pred.contains("version") {
                    info.version = Some(prop.val.clone());
                }
            }
        }

        info
    }
}

/// Descriptive metadata of a loaded graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    pub node_count: usize,
    pub edge_count: usize,
}

// ============================================================================
// SEED roles
// ============================================================================

/// Hierarchy edge kinds between SEED roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyKind {
    IsA,
    PartOf,
}

/// `child kind parent` between two canonical roles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleHierarchyEdge {
    pub parent: String,
    pub child: String,
    pub kind: HierarchyKind,
}

/// Number following `Role=` in a SEED role URL
pub fn seed_role_number(url: &str) -> Option<&str> {
    let start = url.find("Role=")? + "Role=".len();
    let rest = &url[start..];
    let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    (end > 0).then(|| &rest[..end])
}

/// Canonical role set extracted from the SEED role graph
#[derive(Debug, Clone, Default)]
pub struct SeedRoleGraph {
    pub roles: Vec<CanonicalRole>,
    pub hierarchy: Vec<RoleHierarchyEdge>,
    /// Canonical identifier → `seed.reaction:` cross-references of that role
    pub role_reactions: BTreeMap<String, Vec<String>>,
    pub info: SourceInfo,
    pub skipped_unlabeled: usize,
}

impl SeedRoleGraph {
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::from_document(&OboGraphDocument::load(path)?))
    }

    pub fn from_document(document: &OboGraphDocument) -> Self {
        let mut graph = SeedRoleGraph {
            info: document.source_info(),
            ..SeedRoleGraph::default()
        };

        for node in document.nodes().filter(|n| n.is_class()) {
            let Some(number) = seed_role_number(&node.id) else {
                continue;
            };
            let Some(label) = node.label() else {
                graph.skipped_unlabeled += 1;
                continue;
            };

            let role = CanonicalRole {
                identifier: format!("{}{}", SEED_ROLE_PREFIX, number),
                name: label.to_string(),
                uri: node.id.clone(),
            };

            let reactions = xref::extract(node.raw_xrefs())
                .references
                .get(XrefDatabase::SeedReaction)
                .to_vec();
            if !reactions.is_empty() {
                graph.role_reactions.insert(role.identifier.clone(), reactions);
            }

            graph.roles.push(role);
        }

        for edge in document.edges() {
            let (Some(child), Some(parent)) = (seed_role_number(&edge.sub), seed_role_number(&edge.obj)) else {
                continue;
            };
            let kind = if edge.pred.contains("subClassOf") {
                HierarchyKind::IsA
            } else if edge.pred.contains("partOf") {
                HierarchyKind::PartOf
            } else {
                continue;
            };
            graph.hierarchy.push(RoleHierarchyEdge {
                parent: format!("{}{}", SEED_ROLE_PREFIX, parent),
                child: format!("{}{}", SEED_ROLE_PREFIX, child),
                kind,
            });
        }

        info!(
            roles = graph.roles.len(),
            hierarchy = graph.hierarchy.len(),
            skipped_unlabeled = graph.skipped_unlabeled,
            "Extracted SEED roles"
        );

        graph
    }
}

// ============================================================================
// Biochemistry
// ============================================================================

/// Compounds and reactions extracted from the ModelSEED graph
#[derive(Debug, Clone, Default)]
pub struct BiochemGraph {
    pub compounds: Vec<Compound>,
    pub reactions: Vec<Reaction>,
    pub dropped_xrefs: Vec<DroppedXref>,
    pub info: SourceInfo,
}

impl BiochemGraph {
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::from_document(&OboGraphDocument::load(path)?))
    }

    pub fn from_document(document: &OboGraphDocument) -> Self {
        let mut graph = BiochemGraph {
            info: document.source_info(),
            ..BiochemGraph::default()
        };

        for node in document.nodes().filter(|n| n.node_type.as_deref() == Some("CLASS")) {
            let is_compound = node.id.contains("/compounds/");
            if !is_compound && !node.id.contains("/reactions/") {
                continue;
            }

            let id = last_segment(&node.id).to_string();
            if id.is_empty() {
                debug!(node = %node.id, "Skipping node without local id");
                continue;
            }

            let extraction = xref::extract(node.raw_xrefs());
            graph.dropped_xrefs.extend(extraction.dropped);
            let name = node.label().unwrap_or_default().to_string();

            if is_compound {
                graph.compounds.push(Compound {
                    id,
                    name,
                    uri: node.id.clone(),
                    cross_references: extraction.references,
                });
            } else {
                let mut reaction = Reaction::new(id, name);
                reaction.uri = node.id.clone();
                reaction.cross_references = extraction.references;
                graph.reactions.push(reaction);
            }
        }

        info!(
            compounds = graph.compounds.len(),
            reactions = graph.reactions.len(),
            dropped_xrefs = graph.dropped_xrefs.len(),
            "Extracted biochemistry entities"
        );

        graph
    }
}
