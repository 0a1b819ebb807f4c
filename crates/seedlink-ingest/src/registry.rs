//! Canonical role registry
//!
//! Read-only index over the authoritative SEED role set, built once before
//! resolution starts. Two parallel views are kept:
//!
//! - literal name → identifier, for exact matching
//! - normalized name → every identifier sharing that key, so collisions are
//!   visible across the whole registry rather than first-come-first-served

use crate::normalize::normalize;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info};

/// Namespace prefix of canonical SEED role identifiers
pub const SEED_ROLE_PREFIX: &str = "seed.role:";

/// URI template base for SEED role pages
pub const SEED_ROLE_URL_BASE: &str = "https://pubseed.theseed.org/RoleEditor.cgi?page=ShowRole&Role=";

/// An authoritative role entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRole {
    /// Canonical identifier (e.g., "seed.role:0000000001234")
    pub identifier: String,
    pub name: String,
    pub uri: String,
}

impl CanonicalRole {
    /// Build an entry from a bare SEED role number
    pub fn from_seed_number(number: &str, name: impl Into<String>) -> Self {
        CanonicalRole {
            identifier: format!("{}{}", SEED_ROLE_PREFIX, number),
            name: name.into(),
            uri: format!("{}{}", SEED_ROLE_URL_BASE, number),
        }
    }
}

/// Read-only lookup indices over canonical roles
#[derive(Debug, Default)]
pub struct CanonicalRegistry {
    entries: Vec<CanonicalRole>,
    by_identifier: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
    by_normalized: HashMap<String, BTreeSet<String>>,
    duplicate_names: usize,
}

impl CanonicalRegistry {
    /// Index a set of canonical roles.
    ///
    /// When two entries share a literal name the first one keeps the exact
    /// index slot; both still count towards the normalized key.
    pub fn build(roles: impl IntoIterator<Item = CanonicalRole>) -> Self {
        let mut registry = CanonicalRegistry::default();

        for role in roles {
            if registry.by_identifier.contains_key(&role.identifier) {
                debug!(identifier = %role.identifier, "Skipping repeated canonical identifier");
                continue;
            }

            let idx = registry.entries.len();
            registry.by_identifier.insert(role.identifier.clone(), idx);

            if !role.name.is_empty() {
                if registry.by_name.contains_key(&role.name) {
                    registry.duplicate_names += 1;
                } else {
                    registry.by_name.insert(role.name.clone(), idx);
                }
            }

            let key = normalize(&role.name);
            if !key.is_empty() {
                registry
                    .by_normalized
                    .entry(key)
                    .or_default()
                    .insert(role.identifier.clone());
            }

            registry.entries.push(role);
        }

        info!(
            entries = registry.entries.len(),
            normalized_keys = registry.by_normalized.len(),
            collisions = registry.collision_count(),
            "Built canonical role registry"
        );

        registry
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, identifier: &str) -> Option<&CanonicalRole> {
        self.by_identifier.get(identifier).map(|&idx| &self.entries[idx])
    }

    /// Entry whose name equals `name` verbatim
    pub fn exact(&self, name: &str) -> Option<&CanonicalRole> {
        self.by_name.get(name).map(|&idx| &self.entries[idx])
    }

    /// All identifiers sharing a normalized key; empty keys match nothing
    pub fn normalized_candidates(&self, key: &str) -> Option<&BTreeSet<String>> {
        if key.is_empty() {
            return None;
        }
        self.by_normalized.get(key)
    }

    /// Whether a normalized key is shared by two or more distinct entries
    pub fn is_collision(&self, key: &str) -> bool {
        self.normalized_candidates(key).is_some_and(|ids| ids.len() > 1)
    }

    pub fn collision_count(&self) -> usize {
        self.by_normalized.values().filter(|ids| ids.len() > 1).count()
    }

    /// Number of entries whose literal name repeated an earlier entry
    pub fn duplicate_name_count(&self) -> usize {
        self.duplicate_names
    }

    /// Normalized keys shared by several entries, with their sorted
    /// identifiers, in key order
    pub fn duplicate_sets(&self) -> BTreeMap<&str, Vec<&str>> {
        self.by_normalized
            .iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|(key, ids)| (key.as_str(), ids.iter().map(String::as_str).collect()))
            .collect()
    }

    /// URI for an identifier: the registry's own URI when known, otherwise
    /// derived from the SEED role number for `seed.role:` identifiers
    pub fn uri_for(&self, identifier: &str) -> String {
        if let Some(entry) = self.get(identifier) {
            return entry.uri.clone();
        }
        match identifier.strip_prefix(SEED_ROLE_PREFIX) {
            Some(number) => format!("{}{}", SEED_ROLE_URL_BASE, number),
            None => identifier.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn registry() -> CanonicalRegistry {
        CanonicalRegistry::build([
            CanonicalRole::from_seed_number("0000000000001", "Glucokinase (EC 2.7.1.2)"),
            CanonicalRole::from_seed_number("0000000000002", "ATP synthase alpha chain"),
            CanonicalRole::from_seed_number("0000000000003", "ATP-synthase, alpha chain"),
            CanonicalRole::from_seed_number("0000000000004", ""),
        ])
    }

    #[test]
    fn test_exact_lookup_is_literal() {
        let registry = registry();
        assert_eq!(
            registry.exact("Glucokinase (EC 2.7.1.2)").map(|r| r.identifier.as_str()),
            Some("seed.role:0000000000001")
        );
        assert!(registry.exact("glucokinase").is_none());
    }

    #[test]
    fn test_normalized_lookup_and_collisions() {
        let registry = registry();

        let ids = registry.normalized_candidates("glucokinase").unwrap();
        assert_eq!(ids.len(), 1);
        assert!(!registry.is_collision("glucokinase"));

        assert!(registry.is_collision("atpsynthasealphachain"));
        assert_eq!(registry.collision_count(), 1);
    }

    #[test]
    fn test_empty_key_never_matches() {
        let registry = registry();
        assert!(registry.normalized_candidates("").is_none());
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_duplicate_sets_are_sorted() {
        let registry = registry();
        let sets = registry.duplicate_sets();
        assert_eq!(
            sets.get("atpsynthasealphachain"),
            Some(&vec!["seed.role:0000000000002", "seed.role:0000000000003"])
        );
    }

    #[test]
    fn test_repeated_identifier_and_name() {
        let registry = CanonicalRegistry::build([
            CanonicalRole::from_seed_number("1", "Foo"),
            CanonicalRole::from_seed_number("1", "Bar"),
            CanonicalRole::from_seed_number("2", "Foo"),
        ]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.duplicate_name_count(), 1);
        assert_eq!(registry.exact("Foo").map(|r| r.identifier.as_str()), Some("seed.role:1"));
        assert!(registry.is_collision("foo"));
    }

    #[test]
    fn test_uri_for_unknown_seed_identifier() {
        let registry = registry();
        assert_eq!(
            registry.uri_for("seed.role:42"),
            "https://pubseed.theseed.org/RoleEditor.cgi?page=ShowRole&Role=42"
        );
        assert_eq!(registry.uri_for("other:1"), "other:1");
    }
}
