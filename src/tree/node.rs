use super::entry::{DocSlot, Entry};
use super::flatten::flatten;
use super::route::Route;
use crate::config::TreeConfig;
use crate::doc::{merge, DocValue};
use crate::handler::{run_sequential, HandlerRef, MiddlewareChain, Next, RequestContext};
use crate::path::join_paths;
use http::Method;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

pub(crate) struct NodeInner {
    pub(crate) prefix: String,
    pub(crate) doc: DocValue,
    pub(crate) entries: Vec<Entry>,
}

/// A node of the route tree.
///
/// A node owns a path prefix (already joined with its ancestors' prefixes), a base
/// documentation fragment and an ordered, append-only list of entries. Entry order is
/// significant: middleware only applies to entries declared after it.
///
/// `Node` is a cheap, shared handle. Cloning it and [attaching](Node::attach) it in a
/// second place shares the same node, so entries appended later show up under every
/// attachment point.
#[derive(Clone)]
pub struct Node {
    pub(crate) inner: Arc<RwLock<NodeInner>>,
}

impl Node {
    /// An empty root node with no prefix.
    #[must_use]
    pub fn root() -> Self {
        Self::new("", DocValue::empty())
    }

    pub fn new(prefix: &str, doc: impl Into<DocValue>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(NodeInner {
                prefix: join_paths([prefix]),
                doc: doc.into(),
                entries: Vec::new(),
            })),
        }
    }

    /// Root node rooted at the configured base path.
    #[must_use]
    pub fn from_config(config: &TreeConfig) -> Self {
        Self::new(&config.base_path, DocValue::empty())
    }

    #[must_use]
    pub fn prefix(&self) -> String {
        self.inner.read().prefix.clone()
    }

    /// Base documentation fragment every route of this node starts from.
    #[must_use]
    pub fn doc(&self) -> DocValue {
        self.inner.read().doc.clone()
    }

    /// Number of direct entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Add middleware that applies to every route and subtree declared after it.
    pub fn middleware<I>(&self, handlers: I, doc: impl Into<DocValue>) -> &Self
    where
        I: IntoIterator<Item = HandlerRef>,
    {
        let handlers: Vec<HandlerRef> = handlers.into_iter().collect();
        let doc = doc.into();
        let mut inner = self.inner.write();
        let doc = merge(&inner.doc, [&doc]);
        debug!(
            prefix = %inner.prefix,
            handlers = ?handlers.iter().map(HandlerRef::name).collect::<Vec<_>>(),
            "Middleware added"
        );
        inner.entries.push(Entry::Middleware { handlers, doc });
        drop(inner);
        self
    }

    /// Install a reusable [`MiddlewareChain`]. Handler identities are shared with every
    /// other node the chain is installed on.
    pub fn use_chain(&self, chain: &MiddlewareChain) -> &Self {
        self.middleware(chain.handlers().iter().cloned(), chain.doc().clone())
    }

    /// Declare a route relative to this node's prefix.
    ///
    /// Returns the slot holding the route's explicit documentation fragment.
    pub fn route<I>(
        &self,
        method: Method,
        path: &str,
        handlers: I,
        doc: impl Into<DocValue>,
    ) -> DocSlot
    where
        I: IntoIterator<Item = HandlerRef>,
    {
        let slot = DocSlot::new(doc.into());
        let mut inner = self.inner.write();
        debug!(prefix = %inner.prefix, method = %method, path, "Route declared");
        inner.entries.push(Entry::Route {
            method,
            path: path.to_string(),
            handlers: handlers.into_iter().collect(),
            doc: slot.clone(),
        });
        slot
    }

    pub fn get<I>(&self, path: &str, handlers: I, doc: impl Into<DocValue>) -> DocSlot
    where
        I: IntoIterator<Item = HandlerRef>,
    {
        self.route(Method::GET, path, handlers, doc)
    }

    pub fn post<I>(&self, path: &str, handlers: I, doc: impl Into<DocValue>) -> DocSlot
    where
        I: IntoIterator<Item = HandlerRef>,
    {
        self.route(Method::POST, path, handlers, doc)
    }

    pub fn put<I>(&self, path: &str, handlers: I, doc: impl Into<DocValue>) -> DocSlot
    where
        I: IntoIterator<Item = HandlerRef>,
    {
        self.route(Method::PUT, path, handlers, doc)
    }

    pub fn patch<I>(&self, path: &str, handlers: I, doc: impl Into<DocValue>) -> DocSlot
    where
        I: IntoIterator<Item = HandlerRef>,
    {
        self.route(Method::PATCH, path, handlers, doc)
    }

    pub fn delete<I>(&self, path: &str, handlers: I, doc: impl Into<DocValue>) -> DocSlot
    where
        I: IntoIterator<Item = HandlerRef>,
    {
        self.route(Method::DELETE, path, handlers, doc)
    }

    pub fn head<I>(&self, path: &str, handlers: I, doc: impl Into<DocValue>) -> DocSlot
    where
        I: IntoIterator<Item = HandlerRef>,
    {
        self.route(Method::HEAD, path, handlers, doc)
    }

    pub fn options<I>(&self, path: &str, handlers: I, doc: impl Into<DocValue>) -> DocSlot
    where
        I: IntoIterator<Item = HandlerRef>,
    {
        self.route(Method::OPTIONS, path, handlers, doc)
    }

    /// Create a child node under `path` and return it.
    ///
    /// The child's prefix is this node's prefix joined with `path` and `doc` becomes its
    /// base fragment. Middleware added to the child never leaks back into this node.
    pub fn subtree(&self, path: &str, doc: impl Into<DocValue>) -> Node {
        self.subtree_with(path, std::iter::empty(), doc)
    }

    /// Like [`subtree`](Self::subtree), with handlers that only apply to routes reached
    /// through this edge.
    pub fn subtree_with<I>(&self, path: &str, handlers: I, doc: impl Into<DocValue>) -> Node
    where
        I: IntoIterator<Item = HandlerRef>,
    {
        let mut inner = self.inner.write();
        let child = Node::new(&join_paths([inner.prefix.as_str(), path]), doc);
        debug!(prefix = %inner.prefix, child = %child.prefix(), "Subtree created");
        inner.entries.push(Entry::Subtree {
            mount: String::new(),
            handlers: handlers.into_iter().collect(),
            doc: DocValue::empty(),
            node: child.clone(),
        });
        child
    }

    /// Attach an already built node under `path`.
    ///
    /// The node is shared, not copied. Its routes are re-rooted under this node's prefix
    /// joined with `path`, on top of the attached node's own prefix.
    pub fn attach<I>(
        &self,
        node: &Node,
        path: &str,
        handlers: I,
        doc: impl Into<DocValue>,
    ) -> &Self
    where
        I: IntoIterator<Item = HandlerRef>,
    {
        let mut inner = self.inner.write();
        let mount = join_paths([inner.prefix.as_str(), path]);
        debug!(prefix = %inner.prefix, mount = %mount, "Node attached");
        inner.entries.push(Entry::Subtree {
            mount,
            handlers: handlers.into_iter().collect(),
            doc: doc.into(),
            node: node.clone(),
        });
        drop(inner);
        self
    }

    /// Flatten the tree below this node into its route table.
    ///
    /// Recomputed on every call; nothing is cached.
    #[must_use]
    pub fn routes(&self) -> Vec<Route> {
        flatten(self)
    }

    /// Merge `doc` into the explicit fragment of the route emitted at `index`.
    ///
    /// Returns `false` when no route has that index.
    pub fn amend_doc(&self, index: usize, doc: impl Into<DocValue>) -> bool {
        let doc = doc.into();
        match self.routes().into_iter().find(|route| route.index == index) {
            Some(route) => {
                route.doc_slot().amend(&doc);
                debug!(index, path = %route.path, method = %route.method, "Route doc amended");
                true
            }
            None => {
                warn!(index, prefix = %self.prefix(), "No route at index - doc not amended");
                false
            }
        }
    }

    /// Drain this node's own middleware entries with [`run_sequential`], then `next`.
    pub async fn run_middleware(&self, ctx: &mut RequestContext, next: Next) -> anyhow::Result<()> {
        let handlers: Vec<HandlerRef> = {
            let inner = self.inner.read();
            inner
                .entries
                .iter()
                .filter_map(|entry| match entry {
                    Entry::Middleware { handlers, .. } => Some(handlers.iter().cloned()),
                    _ => None,
                })
                .flatten()
                .map(HandlerRef::guarded)
                .collect()
        };
        run_sequential(&handlers, ctx, next).await
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("Node")
            .field("prefix", &inner.prefix)
            .field(
                "entries",
                &inner.entries.iter().map(Entry::kind).collect::<Vec<_>>(),
            )
            .finish()
    }
}
