use crate::doc::DocValue;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Declarative description of a route tree.
///
/// `trees` holds named nodes that can be mounted any number of times; every mount of
/// one name shares a single node. `root` is the tree that gets flattened.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub trees: BTreeMap<String, NodeSpec>,
    #[serde(default)]
    pub root: NodeSpec,
}

impl Manifest {
    /// Every handler name referenced anywhere in the manifest.
    #[must_use]
    pub fn handler_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        for spec in self.trees.values().chain(std::iter::once(&self.root)) {
            collect_handler_names(&spec.entries, &mut names);
        }
        names
    }
}

fn collect_handler_names(entries: &[EntrySpec], names: &mut BTreeSet<String>) {
    for entry in entries {
        let handlers = match entry {
            EntrySpec::Middleware { handlers, .. }
            | EntrySpec::Route { handlers, .. }
            | EntrySpec::Mount { handlers, .. } => handlers,
            EntrySpec::Subtree {
                handlers, entries, ..
            } => {
                collect_handler_names(entries, names);
                handlers
            }
        };
        names.extend(handlers.iter().cloned());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSpec {
    #[serde(default)]
    pub prefix: String,
    /// Base documentation of the node.
    #[serde(default)]
    pub doc: DocValue,
    #[serde(default)]
    pub entries: Vec<EntrySpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntrySpec {
    Middleware {
        handlers: Vec<String>,
        #[serde(default)]
        doc: DocValue,
    },
    Route {
        method: String,
        #[serde(default)]
        path: String,
        handlers: Vec<String>,
        #[serde(default)]
        doc: DocValue,
    },
    /// Inline child node.
    Subtree {
        path: String,
        #[serde(default)]
        handlers: Vec<String>,
        #[serde(default)]
        doc: DocValue,
        #[serde(default)]
        entries: Vec<EntrySpec>,
    },
    /// Mount of a named tree from [`Manifest::trees`].
    Mount {
        tree: String,
        #[serde(default)]
        path: String,
        #[serde(default)]
        handlers: Vec<String>,
        #[serde(default)]
        doc: DocValue,
    },
}
