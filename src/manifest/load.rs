use super::error::ManifestError;
use super::types::{EntrySpec, Manifest, NodeSpec};
use crate::config::TreeConfig;
use crate::handler::{HandlerRef, HandlerRegistry};
use crate::path::join_paths;
use crate::tree::Node;
use anyhow::{Context, Result};
use http::Method;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Manifest file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Yaml,
    Json,
}

impl ManifestFormat {
    /// Format implied by a file extension. Anything but `.json` is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ManifestFormat::Json,
            _ => ManifestFormat::Yaml,
        }
    }
}

/// Parse manifest text.
pub fn parse_manifest(content: &str, format: ManifestFormat) -> Result<Manifest> {
    let manifest = match format {
        ManifestFormat::Json => {
            serde_json::from_str(content).context("Failed to parse JSON manifest")?
        }
        ManifestFormat::Yaml => {
            serde_yaml::from_str(content).context("Failed to parse YAML manifest")?
        }
    };
    Ok(manifest)
}

/// Read and parse a manifest file (`.yaml`, `.yml` or `.json`).
pub fn load_manifest(path: impl AsRef<Path>) -> Result<Manifest> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;
    let manifest = parse_manifest(&content, ManifestFormat::from_path(path))
        .with_context(|| format!("Invalid manifest {}", path.display()))?;
    info!(
        manifest = %path.display(),
        named_trees = manifest.trees.len(),
        root_entries = manifest.root.entries.len(),
        "Manifest loaded"
    );
    Ok(manifest)
}

/// Build the root [`Node`] of `manifest`, resolving handler names against `registry`.
///
/// The root prefix is `config.base_path` joined with the manifest root's own prefix.
/// Each named tree is built once; all of its mounts share that node.
pub fn build_tree(
    manifest: &Manifest,
    registry: &HandlerRegistry,
    config: &TreeConfig,
) -> Result<Node, ManifestError> {
    let mut builder = TreeBuilder {
        manifest,
        registry,
        built: HashMap::new(),
        mounting: Vec::new(),
    };
    let prefix = join_paths([config.base_path.as_str(), manifest.root.prefix.as_str()]);
    let root = Node::new(&prefix, manifest.root.doc.clone());
    builder.fill(&root, &manifest.root.entries)?;
    debug!(
        prefix = %prefix,
        shared_trees = builder.built.len(),
        "Tree built from manifest"
    );
    Ok(root)
}

struct TreeBuilder<'a> {
    manifest: &'a Manifest,
    registry: &'a HandlerRegistry,
    built: HashMap<String, Node>,
    mounting: Vec<String>,
}

impl TreeBuilder<'_> {
    fn fill(&mut self, node: &Node, entries: &[EntrySpec]) -> Result<(), ManifestError> {
        for entry in entries {
            match entry {
                EntrySpec::Middleware { handlers, doc } => {
                    node.middleware(self.handlers(handlers)?, doc.clone());
                }
                EntrySpec::Route {
                    method,
                    path,
                    handlers,
                    doc,
                } => {
                    node.route(parse_method(method)?, path, self.handlers(handlers)?, doc.clone());
                }
                EntrySpec::Subtree {
                    path,
                    handlers,
                    doc,
                    entries,
                } => {
                    let child = node.subtree_with(path, self.handlers(handlers)?, doc.clone());
                    self.fill(&child, entries)?;
                }
                EntrySpec::Mount {
                    tree,
                    path,
                    handlers,
                    doc,
                } => {
                    let shared = self.named(tree)?;
                    node.attach(&shared, path, self.handlers(handlers)?, doc.clone());
                }
            }
        }
        Ok(())
    }

    fn named(&mut self, name: &str) -> Result<Node, ManifestError> {
        if let Some(node) = self.built.get(name) {
            return Ok(node.clone());
        }
        if self.mounting.iter().any(|m| m == name) {
            let mut chain = self.mounting.clone();
            chain.push(name.to_string());
            return Err(ManifestError::CyclicMount { chain });
        }
        let spec: &NodeSpec =
            self.manifest
                .trees
                .get(name)
                .ok_or_else(|| ManifestError::UnknownTree {
                    name: name.to_string(),
                })?;

        self.mounting.push(name.to_string());
        let node = Node::new(&spec.prefix, spec.doc.clone());
        self.fill(&node, &spec.entries)?;
        self.mounting.pop();

        debug!(tree = name, entries = node.len(), "Named tree built");
        self.built.insert(name.to_string(), node.clone());
        Ok(node)
    }

    fn handlers(&self, names: &[String]) -> Result<Vec<HandlerRef>, ManifestError> {
        names
            .iter()
            .map(|name| {
                self.registry
                    .get(name)
                    .ok_or_else(|| ManifestError::UnknownHandler { name: name.clone() })
            })
            .collect()
    }
}

fn parse_method(method: &str) -> Result<Method, ManifestError> {
    match method.to_uppercase().as_str() {
        "GET" => Ok(Method::GET),
        "POST" => Ok(Method::POST),
        "PUT" => Ok(Method::PUT),
        "PATCH" => Ok(Method::PATCH),
        "DELETE" => Ok(Method::DELETE),
        "HEAD" => Ok(Method::HEAD),
        "OPTIONS" => Ok(Method::OPTIONS),
        "TRACE" => Ok(Method::TRACE),
        _ => Err(ManifestError::InvalidMethod {
            method: method.to_string(),
        }),
    }
}
