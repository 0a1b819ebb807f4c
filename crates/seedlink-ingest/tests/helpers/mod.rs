//! Fixture builders for the link pipeline integration tests
//!
//! Source documents are written to a temporary directory in the same shapes
//! the upstream files use, so the loaders run for real.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use flate2::write::GzEncoder;
use flate2::Compression;
use seedlink_ingest::config::PipelineConfig;
use serde_json::{json, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const ROLE_URL: &str = "https://pubseed.theseed.org/RoleEditor.cgi?page=ShowRole&Role=";

/// Builder for a complete set of source files
#[derive(Debug, Default)]
pub struct SourceFixture {
    seed_roles: Vec<(String, String, Vec<String>)>,
    seed_meta: Option<Value>,
    template_roles: Vec<Value>,
    complexes: Vec<Value>,
    reactions: Vec<Value>,
    compounds: Vec<Value>,
    biochem_nodes: Vec<Value>,
    mapper_table: Option<Value>,
}

impl SourceFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical SEED role `seed.role:<number>`
    pub fn seed_role(self, number: &str, name: &str) -> Self {
        self.seed_role_with_xrefs(number, name, &[])
    }

    pub fn seed_role_with_xrefs(mut self, number: &str, name: &str, xrefs: &[&str]) -> Self {
        self.seed_roles.push((
            number.to_string(),
            name.to_string(),
            xrefs.iter().map(|x| x.to_string()).collect(),
        ));
        self
    }

    /// Title and version of the SEED role graph
    pub fn seed_metadata(mut self, title: &str, version: &str) -> Self {
        self.seed_meta = Some(json!({
            "basicPropertyValues": [
                {"pred": "http://purl.org/dc/elements/1.1/title", "val": title},
                {"pred": "http://www.w3.org/2002/07/owl#versionInfo", "val": version}
            ]
        }));
        self
    }

    pub fn template_role(mut self, id: &str, name: &str, source: &str) -> Self {
        self.template_roles
            .push(json!({"id": id, "name": name, "source": source, "aliases": []}));
        self
    }

    /// Complex with `(role id, triggering)` members
    pub fn complex(mut self, id: &str, members: &[(&str, bool)]) -> Self {
        let complexroles: Vec<Value> = members
            .iter()
            .map(|(role_id, triggering)| {
                json!({
                    "templaterole_ref": format!("~/roles/id/{}", role_id),
                    "triggering": if *triggering { 1 } else { 0 },
                    "optional_role": 0
                })
            })
            .collect();
        self.complexes
            .push(json!({"id": id, "name": format!("{} complex", id), "complexroles": complexroles}));
        self
    }

    pub fn reaction(mut self, id: &str, complexes: &[&str]) -> Self {
        let refs: Vec<String> = complexes
            .iter()
            .map(|c| format!("~/complexes/id/{}", c))
            .collect();
        self.reactions
            .push(json!({"id": id, "name": format!("{} reaction", id), "type": "conditional", "templatecomplex_refs": refs}));
        self
    }

    pub fn template_compound(mut self, id: &str, name: &str) -> Self {
        self.compounds.push(json!({"id": id, "name": name, "formula": ""}));
        self
    }

    pub fn biochem_reaction(mut self, id: &str, xrefs: &[&str]) -> Self {
        self.biochem_nodes.push(node(&format!("https://modelseed.org/biochem/reactions/{}", id), id, xrefs));
        self
    }

    pub fn biochem_compound(mut self, id: &str, name: &str, xrefs: &[&str]) -> Self {
        self.biochem_nodes.push(node(&format!("https://modelseed.org/biochem/compounds/{}", id), name, xrefs));
        self
    }

    pub fn mapper_entry(mut self, name: &str, identifier: &str) -> Self {
        let table = self.mapper_table.get_or_insert_with(|| json!({}));
        table[name] = json!(identifier);
        self
    }

    /// Write every document and return a config pointing at them
    pub fn write(self, dir: &TempDir) -> PipelineConfig {
        let root = dir.path();

        let seed_nodes: Vec<Value> = self
            .seed_roles
            .iter()
            .map(|(number, name, xrefs)| {
                let xrefs: Vec<&str> = xrefs.iter().map(String::as_str).collect();
                node(&format!("{}{}", ROLE_URL, number), name, &xrefs)
            })
            .collect();
        let mut seed_graph = json!({"id": "seed", "nodes": seed_nodes, "edges": []});
        if let Some(meta) = self.seed_meta {
            seed_graph["meta"] = meta;
        }
        let seed_path = root.join("seed.json");
        write_json(&seed_path, &json!({"graphs": [seed_graph]}));

        let template_path = root.join("template.json");
        write_json(
            &template_path,
            &json!({
                "roles": self.template_roles,
                "complexes": self.complexes,
                "reactions": self.reactions,
                "compounds": self.compounds,
            }),
        );

        let biochem_path = root.join("modelseed.json.gz");
        write_gzip_json(&biochem_path, &json!({"graphs": [{"nodes": self.biochem_nodes}]}));

        let mut builder = PipelineConfig::builder()
            .seed_roles_path(&seed_path)
            .template_path(&template_path)
            .biochem_path(&biochem_path)
            .output_dir(root.join("out"));

        if let Some(table) = self.mapper_table {
            let mapper_path = root.join("mapper.json");
            write_json(&mapper_path, &table);
            builder = builder.mapper_table_path(mapper_path);
        }

        builder.build()
    }
}

fn node(id: &str, label: &str, xrefs: &[&str]) -> Value {
    let xrefs: Vec<Value> = xrefs.iter().map(|x| json!({"val": x})).collect();
    json!({"id": id, "lbl": label, "type": "CLASS", "meta": {"xrefs": xrefs}})
}

pub fn write_json(path: &Path, value: &Value) -> PathBuf {
    std::fs::write(path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
    path.to_path_buf()
}

pub fn write_gzip_json(path: &Path, value: &Value) -> PathBuf {
    let file = std::fs::File::create(path).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(&serde_json::to_vec(value).unwrap()).unwrap();
    encoder.finish().unwrap();
    path.to_path_buf()
}

pub fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}
