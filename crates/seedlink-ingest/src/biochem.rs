//! Lookup of template entities in the ModelSEED biochemistry graph

use crate::models::{Compound, Reaction};
use crate::xref::{summarize, CrossReferences, XrefDatabase};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub const SEED_REACTION_PREFIX: &str = "seed.reaction:";
pub const SEED_COMPOUND_PREFIX: &str = "seed.compound:";

/// Strip a compartment suffix: `rxn00001_c` → `rxn00001`
pub fn base_reaction_id(id: &str) -> &str {
    id.split('_').next().unwrap_or(id)
}

/// A template entity found in the biochemistry graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiochemMapping {
    /// CURIE such as `seed.reaction:rxn00001`
    pub seed_id: String,
    pub uri: String,
    pub cross_references: CrossReferences,
}

/// Per-database cross-reference totals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XrefCoverage {
    pub compounds: BTreeMap<XrefDatabase, usize>,
    pub reactions: BTreeMap<XrefDatabase, usize>,
    pub compounds_with_xrefs: usize,
    pub reactions_with_xrefs: usize,
}

#[derive(Debug, Default)]
pub struct BiochemIndex {
    compounds: HashMap<String, Compound>,
    reactions: HashMap<String, Reaction>,
}

impl BiochemIndex {
    pub fn new(compounds: Vec<Compound>, reactions: Vec<Reaction>) -> Self {
        BiochemIndex {
            compounds: compounds.into_iter().map(|c| (c.id.clone(), c)).collect(),
            reactions: reactions.into_iter().map(|r| (r.id.clone(), r)).collect(),
        }
    }

    pub fn compound_count(&self) -> usize {
        self.compounds.len()
    }

    pub fn reaction_count(&self) -> usize {
        self.reactions.len()
    }

    /// Map a template reaction id, compartment suffix allowed
    pub fn map_reaction(&self, id: &str) -> Option<BiochemMapping> {
        let base = base_reaction_id(id);
        self.reactions.get(base).map(|reaction| BiochemMapping {
            seed_id: format!("{}{}", SEED_REACTION_PREFIX, base),
            uri: reaction.uri.clone(),
            cross_references: reaction.cross_references.clone(),
        })
    }

    /// Map a compound id, compartment suffix allowed
    pub fn map_compound(&self, id: &str) -> Option<BiochemMapping> {
        let base = base_reaction_id(id);
        self.compounds.get(base).map(|compound| BiochemMapping {
            seed_id: format!("{}{}", SEED_COMPOUND_PREFIX, base),
            uri: compound.uri.clone(),
            cross_references: compound.cross_references.clone(),
        })
    }

    pub fn xref_coverage(&self) -> XrefCoverage {
        XrefCoverage {
            compounds: summarize(self.compounds.values().map(|c| &c.cross_references)),
            reactions: summarize(self.reactions.values().map(|r| &r.cross_references)),
            compounds_with_xrefs: self.compounds.values().filter(|c| !c.cross_references.is_empty()).count(),
            reactions_with_xrefs: self.reactions.values().filter(|r| !r.cross_references.is_empty()).count(),
        }
    }
}
