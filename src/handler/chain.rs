use super::context::RequestContext;
use super::core::{Handler, HandlerFuture, HandlerRef, Next};
use crate::doc::DocValue;
use crate::ids::HandlerId;
use std::sync::Arc;
use tracing::debug;

/// Fully resolved, ordered handler chain of one route.
///
/// Inherited middleware comes first, the route's own handlers last. Cloning is cheap;
/// the handlers are shared.
#[derive(Clone, Debug)]
pub struct HandlerChain {
    handlers: Arc<[HandlerRef]>,
}

impl HandlerChain {
    pub fn new<I>(handlers: I) -> Self
    where
        I: IntoIterator<Item = HandlerRef>,
    {
        Self {
            handlers: handlers.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HandlerRef> {
        self.handlers.iter()
    }

    #[must_use]
    pub fn ids(&self) -> Vec<HandlerId> {
        self.handlers.iter().map(HandlerRef::id).collect()
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.handlers.iter().map(HandlerRef::name).collect()
    }

    /// Execute the chain with real continuation semantics: each handler decides
    /// whether the rest of the chain runs by running or dropping its `next`.
    ///
    /// Handler errors propagate to the caller unchanged.
    pub async fn run(&self, ctx: &mut RequestContext) -> anyhow::Result<()> {
        debug!(
            request_id = %ctx.request_id,
            handlers = self.handlers.len(),
            "Running handler chain"
        );
        run_from(Arc::clone(&self.handlers), 0, ctx).await
    }
}

impl Default for HandlerChain {
    fn default() -> Self {
        Self::new(std::iter::empty())
    }
}

fn run_from(
    handlers: Arc<[HandlerRef]>,
    index: usize,
    ctx: &mut RequestContext,
) -> HandlerFuture<'_> {
    Box::pin(async move {
        let Some(handler) = handlers.get(index).cloned() else {
            return Ok(());
        };
        let next = Next::new(move |ctx| run_from(handlers, index + 1, ctx));
        handler.call(ctx, next).await
    })
}

/// Reusable, ordered group of middleware with its own documentation.
///
/// Installing the same chain in several nodes reuses the same handler identities,
/// so the execute-once guard still runs each handler once per request.
#[derive(Clone, Debug, Default)]
pub struct MiddlewareChain {
    handlers: Vec<HandlerRef>,
    doc: DocValue,
}

impl MiddlewareChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, handler: HandlerRef) -> Self {
        self.handlers.push(handler);
        self
    }

    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<DocValue>) -> Self {
        self.doc.merge_from(&doc.into());
        self
    }

    #[must_use]
    pub fn handlers(&self) -> &[HandlerRef] {
        &self.handlers
    }

    #[must_use]
    pub fn doc(&self) -> &DocValue {
        &self.doc
    }
}

impl FromIterator<HandlerRef> for MiddlewareChain {
    fn from_iter<T: IntoIterator<Item = HandlerRef>>(iter: T) -> Self {
        Self {
            handlers: iter.into_iter().collect(),
            doc: DocValue::empty(),
        }
    }
}
