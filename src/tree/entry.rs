use super::node::Node;
use crate::doc::DocValue;
use crate::handler::HandlerRef;
use http::Method;
use parking_lot::RwLock;
use std::sync::Arc;

/// Shared handle to the explicit documentation fragment of one route entry.
///
/// Every [`Route`](super::Route) emitted for the entry holds a clone of the same slot,
/// so amending it is visible through all paths the entry is reachable by.
#[derive(Clone, Debug, Default)]
pub struct DocSlot(Arc<RwLock<DocValue>>);

impl DocSlot {
    pub(crate) fn new(doc: DocValue) -> Self {
        Self(Arc::new(RwLock::new(doc)))
    }

    /// Snapshot of the current fragment.
    #[must_use]
    pub fn get(&self) -> DocValue {
        self.0.read().clone()
    }

    /// Deep-merge `overlay` into the fragment.
    pub fn amend(&self, overlay: &DocValue) {
        self.0.write().merge_from(overlay);
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Entry {
    /// Applies to every later route and subtree entry of the same node.
    Middleware {
        handlers: Vec<HandlerRef>,
        doc: DocValue,
    },
    Route {
        method: Method,
        path: String,
        handlers: Vec<HandlerRef>,
        doc: DocSlot,
    },
    /// Edge into a child node. `handlers` only apply to routes reached through it.
    Subtree {
        mount: String,
        handlers: Vec<HandlerRef>,
        doc: DocValue,
        node: Node,
    },
}

impl Entry {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Entry::Middleware { .. } => "middleware",
            Entry::Route { .. } => "route",
            Entry::Subtree { .. } => "subtree",
        }
    }
}
