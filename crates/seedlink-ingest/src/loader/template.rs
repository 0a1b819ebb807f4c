// ModelSEED template loader (roles, complexes, reactions, compounds)

use crate::biochem::base_reaction_id;
use crate::loader::{last_segment, read_json};
use crate::models::{Complex, Compound, MemberRole, ReactionType, Reaction, Role, RoleSource};
use crate::Result;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

// ============================================================================
// Raw document
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateDocument {
    #[serde(default)]
    pub roles: Vec<RawRole>,
    #[serde(default)]
    pub complexes: Vec<RawComplex>,
    #[serde(default)]
    pub reactions: Vec<RawReaction>,
    #[serde(default)]
    pub compounds: Vec<RawCompound>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRole {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    /// Strings are kept, anything else is ignored
    #[serde(default)]
    pub aliases: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawComplex {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub complexroles: Vec<RawComplexRole>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawComplexRole {
    #[serde(default)]
    pub templaterole_ref: String,
    /// 0/1 upstream, booleans accepted
    #[serde(default)]
    pub triggering: Value,
    #[serde(default)]
    pub optional_role: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawReaction {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub reaction_type: Option<String>,
    #[serde(default)]
    pub templatecomplex_refs: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCompound {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

fn flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
        Value::String(s) => matches!(s.trim(), "1" | "true"),
        _ => false,
    }
}

// ============================================================================
// Template
// ============================================================================

/// Loading options for [`Template`]
#[derive(Debug, Clone, Copy)]
pub struct TemplateOptions {
    /// Reduce reaction ids such as `rxn00001_c` to `rxn00001`
    pub strip_compartment_suffix: bool,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        TemplateOptions {
            strip_compartment_suffix: true,
        }
    }
}

/// Roles, complexes, reactions and compounds of a model template
#[derive(Debug, Clone, Default)]
pub struct Template {
    pub roles: Vec<Role>,
    pub complexes: Vec<Complex>,
    pub reactions: Vec<Reaction>,
    /// Template compounds carry no uri or cross-references of their own
    pub compounds: Vec<Compound>,
    /// Entries dropped for lacking an id
    pub skipped: usize,
}

impl Template {
    pub fn load(path: &Path, options: TemplateOptions) -> Result<Self> {
        let document: TemplateDocument = read_json(path)?;
        let template = Self::from_document(document, options);
        info!(
            path = %path.display(),
            roles = template.roles.len(),
            complexes = template.complexes.len(),
            reactions = template.reactions.len(),
            compounds = template.compounds.len(),
            skipped = template.skipped,
            "Loaded template"
        );
        Ok(template)
    }

    pub fn from_document(document: TemplateDocument, options: TemplateOptions) -> Self {
        let mut template = Template::default();

        for raw in document.roles {
            if raw.id.trim().is_empty() {
                template.skipped += 1;
                continue;
            }
            let source = RoleSource::from_label(raw.source.as_deref().unwrap_or_default());
            let aliases = raw
                .aliases
                .into_iter()
                .filter_map(|alias| match alias {
                    Value::String(s) if !s.trim().is_empty() => Some(s),
                    _ => None,
                })
                .collect();
            template
                .roles
                .push(Role::new(raw.id, raw.name.unwrap_or_default(), source).with_aliases(aliases));
        }

        for raw in document.complexes {
            if raw.id.trim().is_empty() {
                template.skipped += 1;
                continue;
            }
            let member_roles = raw
                .complexroles
                .iter()
                .filter_map(|member| {
                    let role_id = last_segment(member.templaterole_ref.trim());
                    if role_id.is_empty() {
                        debug!(complex_id = %raw.id, "Skipping complex role without reference");
                        return None;
                    }
                    Some(MemberRole::new(role_id, flag(&member.triggering), flag(&member.optional_role)))
                })
                .collect();
            template
                .complexes
                .push(Complex::new(raw.id, raw.name.unwrap_or_default(), member_roles));
        }

        for raw in document.reactions {
            if raw.id.trim().is_empty() {
                template.skipped += 1;
                continue;
            }
            let id = if options.strip_compartment_suffix {
                base_reaction_id(&raw.id).to_string()
            } else {
                raw.id
            };
            let complex_refs = raw
                .templatecomplex_refs
                .iter()
                .map(|reference| last_segment(reference.trim()))
                .filter(|id| !id.is_empty());

            let mut reaction = Reaction::new(id, raw.name.unwrap_or_default()).with_complexes(complex_refs);
            reaction.reaction_type = raw.reaction_type.as_deref().and_then(ReactionType::from_label);
            template.reactions.push(reaction);
        }

        for raw in document.compounds {
            if raw.id.trim().is_empty() {
                template.skipped += 1;
                continue;
            }
            template.compounds.push(Compound {
                id: raw.id.trim().to_string(),
                name: raw.name.unwrap_or_default(),
                uri: String::new(),
                cross_references: Default::default(),
            });
        }

        template
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const TEMPLATE: &str = r#"{
      "roles": [
        {"id": "ftr01", "name": "Glucose-6-phosphate isomerase", "source": "ModelSEED", "aliases": ["pgi", 7]},
        {"id": "ftr02", "source": "KEGG"},
        {"id": "", "name": "nameless id"}
      ],
      "complexes": [
        {"id": "cpx01", "name": "pgi complex", "complexroles": [
          {"templaterole_ref": "~/roles/id/ftr01", "triggering": 1, "optional_role": 0},
          {"templaterole_ref": "~/roles/id/ftr02", "triggering": 0, "optional_role": true},
          {"templaterole_ref": ""}
        ]}
      ],
      "reactions": [
        {"id": "rxn00558_c", "name": "D-glucose-6-phosphate aldose-ketose-isomerase",
         "type": "conditional", "templatecomplex_refs": ["~/complexes/id/cpx01"]},
        {"id": "rxn00001_c", "name": "diphosphate phosphohydrolase", "type": "spontaneous"}
      ],
      "compounds": [
        {"id": "cpd00001", "name": "H2O", "formula": "H2O"},
        {"id": " cpd00067 ", "name": "H+"}
      ]
    }"#;

    fn document() -> TemplateDocument {
        serde_json::from_str(TEMPLATE).unwrap()
    }

    #[test]
    fn test_roles() {
        let template = Template::from_document(document(), TemplateOptions::default());

        assert_eq!(template.roles.len(), 2);
        assert_eq!(template.skipped, 1);

        let pgi = &template.roles[0];
        assert_eq!(pgi.source, RoleSource::ModelSEED);
        assert_eq!(pgi.normalized_name, "glucose6phosphateisomerase");
        assert_eq!(pgi.aliases, vec!["pgi".to_string()]);

        let unnamed = &template.roles[1];
        assert_eq!(unnamed.name, "");
        assert_eq!(unnamed.normalized_name, "");
    }

    #[test]
    fn test_complex_members() {
        let template = Template::from_document(document(), TemplateOptions::default());
        let members = &template.complexes[0].member_roles;

        assert_eq!(
            members,
            &vec![
                MemberRole::new("ftr01", true, false),
                MemberRole::new("ftr02", false, true),
            ]
        );
    }

    #[test]
    fn test_reactions() {
        let template = Template::from_document(document(), TemplateOptions::default());

        assert_eq!(template.reactions[0].id, "rxn00558");
        assert_eq!(template.reactions[0].complex_refs, vec!["cpx01".to_string()]);
        assert_eq!(template.reactions[0].reaction_type, None);
        assert_eq!(template.reactions[1].reaction_type, Some(ReactionType::Spontaneous));
    }

    #[test]
    fn test_compounds() {
        let template = Template::from_document(document(), TemplateOptions::default());

        let ids: Vec<&str> = template.compounds.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["cpd00001", "cpd00067"]);
        assert_eq!(template.compounds[0].name, "H2O");
        assert!(template.compounds[0].cross_references.is_empty());
    }

    #[test]
    fn test_compartment_suffix_kept_when_disabled() {
        let options = TemplateOptions {
            strip_compartment_suffix: false,
        };
        let template = Template::from_document(document(), options);
        assert_eq!(template.reactions[0].id, "rxn00558_c");
    }

    #[test]
    fn test_flag_values() {
        assert!(flag(&Value::from(1)));
        assert!(flag(&Value::from(true)));
        assert!(flag(&Value::from("1")));
        assert!(!flag(&Value::from(0)));
        assert!(!flag(&Value::Null));
    }
}
