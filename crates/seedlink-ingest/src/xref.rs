//! Cross-reference extraction
//!
//! OBO-graph nodes carry cross-references as flat `PREFIX:value` strings,
//! some of them packing several ids into one value (`kegg.compound:C00002;C00008;`).
//! [`extract`] turns them into a typed mapping keyed by database.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical database key of an external reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XrefDatabase {
    Chebi,
    Kegg,
    Metacyc,
    Ec,
    SeedReaction,
}

impl XrefDatabase {
    pub fn as_str(&self) -> &'static str {
        match self {
            XrefDatabase::Chebi => "chebi",
            XrefDatabase::Kegg => "kegg",
            XrefDatabase::Metacyc => "metacyc",
            XrefDatabase::Ec => "ec",
            XrefDatabase::SeedReaction => "seed_reaction",
        }
    }
}

impl std::fmt::Display for XrefDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the value part of a recognized prefix is stored
#[derive(Debug, Clone, Copy)]
enum ValueStyle {
    /// Keep the full CURIE (`CHEBI:15422`)
    KeepPrefix,
    /// Store the bare local id (`C00002`)
    StripPrefix,
}

/// Recognized upstream prefixes, matched case-sensitively
const PREFIXES: &[(&str, XrefDatabase, ValueStyle)] = &[
    ("CHEBI:", XrefDatabase::Chebi, ValueStyle::KeepPrefix),
    ("KEGG.COMPOUND:", XrefDatabase::Kegg, ValueStyle::StripPrefix),
    ("kegg.compound:", XrefDatabase::Kegg, ValueStyle::StripPrefix),
    ("KEGG.REACTION:", XrefDatabase::Kegg, ValueStyle::StripPrefix),
    ("metacyc.compound:", XrefDatabase::Metacyc, ValueStyle::StripPrefix),
    ("MetaCyc:", XrefDatabase::Metacyc, ValueStyle::StripPrefix),
    ("EC:", XrefDatabase::Ec, ValueStyle::StripPrefix),
    ("seed.reaction:", XrefDatabase::SeedReaction, ValueStyle::StripPrefix),
];

/// Why a raw cross-reference produced no ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    MissingColon,
    UnknownPrefix,
    EmptyValue,
}

/// A raw cross-reference string that was skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedXref {
    pub raw: String,
    pub reason: DropReason,
}

/// Typed cross-references of one entity
///
/// Values are kept in encounter order and never contain empty or
/// whitespace-only strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrossReferences {
    entries: BTreeMap<XrefDatabase, Vec<String>>,
}

impl CrossReferences {
    pub fn get(&self, database: XrefDatabase) -> &[String] {
        self.entries.get(&database).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn databases(&self) -> impl Iterator<Item = XrefDatabase> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (XrefDatabase, &[String])> {
        self.entries.iter().map(|(db, ids)| (*db, ids.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of ids across all databases
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    fn push(&mut self, database: XrefDatabase, value: String) {
        self.entries.entry(database).or_default().push(value);
    }
}

/// Result of extracting one entity's cross-references
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub references: CrossReferences,
    pub dropped: Vec<DroppedXref>,
}

/// Parse raw `PREFIX:value` strings into typed references.
///
/// Malformed or unrecognized entries are skipped, never fatal; they are
/// returned in [`Extraction::dropped`] so callers can count them.
pub fn extract<I, S>(raw_xrefs: I) -> Extraction
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut extraction = Extraction::default();

    for raw in raw_xrefs {
        let raw = raw.as_ref().trim();

        if !raw.contains(':') {
            extraction.dropped.push(DroppedXref {
                raw: raw.to_string(),
                reason: DropReason::MissingColon,
            });
            continue;
        }

        let Some((prefix, database, style)) = PREFIXES
            .iter()
            .find(|(prefix, _, _)| raw.starts_with(prefix))
        else {
            extraction.dropped.push(DroppedXref {
                raw: raw.to_string(),
                reason: DropReason::UnknownPrefix,
            });
            continue;
        };

        let before = extraction.references.len();
        for part in raw[prefix.len()..].split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let value = match style {
                ValueStyle::KeepPrefix => format!("{}{}", prefix, part),
                ValueStyle::StripPrefix => part.to_string(),
            };
            extraction.references.push(*database, value);
        }

        if extraction.references.len() == before {
            extraction.dropped.push(DroppedXref {
                raw: raw.to_string(),
                reason: DropReason::EmptyValue,
            });
        }
    }

    extraction
}

/// Per-database id totals over many entities
pub fn summarize<'a, I>(references: I) -> BTreeMap<XrefDatabase, usize>
where
    I: IntoIterator<Item = &'a CrossReferences>,
{
    let mut summary = BTreeMap::new();
    for refs in references {
        for (database, ids) in refs.iter() {
            *summary.entry(database).or_insert(0) += ids.len();
        }
    }
    summary
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_chebi_and_multi_valued_kegg() {
        let extraction = extract(["CHEBI:15422", "kegg.compound:C00002;C00008;"]);

        assert_eq!(extraction.references.get(XrefDatabase::Chebi), ["CHEBI:15422"]);
        assert_eq!(extraction.references.get(XrefDatabase::Kegg), ["C00002", "C00008"]);
        assert_eq!(extraction.references.databases().count(), 2);
        assert!(extraction.dropped.is_empty());
    }

    #[test]
    fn test_reaction_prefixes() {
        let extraction = extract([
            "EC:2.7.1.1",
            "KEGG.REACTION:R00299",
            "MetaCyc:GLUCOKIN-RXN",
            "seed.reaction:rxn00216",
        ]);
        let refs = &extraction.references;

        assert_eq!(refs.get(XrefDatabase::Ec), ["2.7.1.1"]);
        assert_eq!(refs.get(XrefDatabase::Kegg), ["R00299"]);
        assert_eq!(refs.get(XrefDatabase::Metacyc), ["GLUCOKIN-RXN"]);
        assert_eq!(refs.get(XrefDatabase::SeedReaction), ["rxn00216"]);
        assert_eq!(refs.len(), 4);
    }

    #[test]
    fn test_both_kegg_compound_spellings_share_a_key() {
        let extraction = extract(["KEGG.COMPOUND:C00031", "kegg.compound:C00267"]);
        assert_eq!(extraction.references.get(XrefDatabase::Kegg), ["C00031", "C00267"]);
    }

    #[test]
    fn test_whitespace_parts_are_discarded() {
        let extraction = extract(["metacyc.compound: ATP ; ;ADP "]);
        assert_eq!(extraction.references.get(XrefDatabase::Metacyc), ["ATP", "ADP"]);
        assert!(extraction
            .references
            .iter()
            .all(|(_, ids)| ids.iter().all(|id| !id.trim().is_empty())));
    }

    #[test]
    fn test_malformed_entries_are_dropped() {
        let extraction = extract(["no colon here", "PUBCHEM:1234", "EC:", "chebi:15422"]);

        assert!(extraction.references.is_empty());
        let reasons: Vec<_> = extraction.dropped.iter().map(|d| d.reason).collect();
        assert_eq!(
            reasons,
            vec![
                DropReason::MissingColon,
                DropReason::UnknownPrefix,
                DropReason::EmptyValue,
                DropReason::UnknownPrefix,
            ]
        );
    }

    #[test]
    fn test_duplicates_are_kept_in_order() {
        let extraction = extract(["EC:1.1.1.1", "EC:1.1.1.1"]);
        assert_eq!(extraction.references.get(XrefDatabase::Ec), ["1.1.1.1", "1.1.1.1"]);
    }

    #[test]
    fn test_summarize_counts_ids() {
        let a = extract(["CHEBI:1", "kegg.compound:C1;C2"]).references;
        let b = extract(["CHEBI:2"]).references;

        let summary = summarize([&a, &b]);
        assert_eq!(summary.get(&XrefDatabase::Chebi), Some(&2));
        assert_eq!(summary.get(&XrefDatabase::Kegg), Some(&2));
    }
}
