//! Tree to route-table flattening.
//!
//! Each node is flattened with two accumulators: the handlers inherited from earlier
//! middleware entries and the documentation fragments that apply to every later
//! entry (starting with the node's base doc). Subtrees are flattened on their own and
//! their routes re-rooted under the edge, so a child never sees a sibling's or its
//! parent's later middleware.

use super::entry::{DocSlot, Entry};
use super::node::Node;
use super::route::Route;
use crate::doc::{join_docs, DocValue};
use crate::handler::{HandlerChain, HandlerRef};
use crate::path::{join_paths, route_path};
use http::Method;
use std::sync::Arc;
use tracing::{info, trace, warn};

struct PendingRoute {
    method: Method,
    path: String,
    handlers: Vec<HandlerRef>,
    doc: DocValue,
    slot: DocSlot,
}

pub(crate) fn flatten(node: &Node) -> Vec<Route> {
    let mut visiting = Vec::new();
    let pending = flatten_node(node, &mut visiting);

    let routes: Vec<Route> = pending
        .into_iter()
        .enumerate()
        .map(|(index, route)| Route {
            index,
            path: route_path([route.path]),
            method: route.method,
            chain: HandlerChain::new(route.handlers.into_iter().map(HandlerRef::guarded)),
            doc: route.doc,
            slot: route.slot,
        })
        .collect();

    info!(
        prefix = %node.prefix(),
        routes = routes.len(),
        "Route tree flattened"
    );
    routes
}

fn handler_docs(handlers: &[HandlerRef]) -> impl Iterator<Item = &DocValue> {
    handlers.iter().filter_map(HandlerRef::doc)
}

fn flatten_node(node: &Node, visiting: &mut Vec<usize>) -> Vec<PendingRoute> {
    let key = Arc::as_ptr(&node.inner) as usize;
    if visiting.contains(&key) {
        warn!(
            prefix = %node.prefix(),
            depth = visiting.len(),
            "Cyclic attachment detected - skipping subtree"
        );
        return Vec::new();
    }

    // Snapshot so no lock is held while recursing into children.
    let (prefix, base_doc, entries) = {
        let inner = node.inner.read();
        (inner.prefix.clone(), inner.doc.clone(), inner.entries.clone())
    };

    visiting.push(key);

    let mut inherited_handlers: Vec<HandlerRef> = Vec::new();
    let mut inherited_docs: Vec<DocValue> = vec![base_doc];
    let mut out = Vec::new();

    for entry in entries {
        trace!(prefix = %prefix, kind = entry.kind(), "Flattening entry");
        match entry {
            Entry::Middleware { handlers, doc } => {
                inherited_docs.push(doc);
                inherited_docs.extend(handler_docs(&handlers).cloned());
                inherited_handlers.extend(handlers);
            }
            Entry::Route {
                method,
                path,
                handlers,
                doc,
            } => {
                let explicit = doc.get();
                let merged = join_docs(
                    inherited_docs
                        .iter()
                        .chain(handler_docs(&handlers))
                        .chain(std::iter::once(&explicit)),
                );
                let mut chain = inherited_handlers.clone();
                chain.extend(handlers);
                out.push(PendingRoute {
                    method,
                    path: join_paths([prefix.as_str(), path.as_str()]),
                    handlers: chain,
                    doc: merged,
                    slot: doc,
                });
            }
            Entry::Subtree {
                mount,
                handlers,
                doc,
                node: child,
            } => {
                for route in flatten_node(&child, visiting) {
                    let merged = join_docs(
                        inherited_docs
                            .iter()
                            .chain(handler_docs(&handlers))
                            .chain([&doc, &route.doc]),
                    );
                    let mut chain = inherited_handlers.clone();
                    chain.extend(handlers.iter().cloned());
                    chain.extend(route.handlers);
                    out.push(PendingRoute {
                        method: route.method,
                        path: join_paths([mount.as_str(), route.path.as_str()]),
                        handlers: chain,
                        doc: merged,
                        slot: route.slot,
                    });
                }
            }
        }
    }

    visiting.pop();
    out
}
