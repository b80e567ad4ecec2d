use super::context::{HandlerResponse, RequestContext};
use super::guard::ExecuteOnce;
use crate::doc::DocValue;
use crate::ids::HandlerId;
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

/// Future returned by every handler invocation.
pub type HandlerFuture<'a> = BoxFuture<'a, anyhow::Result<()>>;

type Continuation = Box<dyn for<'c> FnOnce(&'c mut RequestContext) -> HandlerFuture<'c> + Send>;

/// Continuation handed to a handler.
///
/// Running it executes the rest of the chain. A handler that returns without
/// running it stops the chain there.
pub struct Next {
    continuation: Option<Continuation>,
}

impl Next {
    pub fn new<F>(continuation: F) -> Self
    where
        F: for<'c> FnOnce(&'c mut RequestContext) -> HandlerFuture<'c> + Send + 'static,
    {
        Self {
            continuation: Some(Box::new(continuation)),
        }
    }

    /// A continuation that does nothing.
    #[must_use]
    pub fn noop() -> Self {
        Self { continuation: None }
    }

    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.continuation.is_none()
    }

    /// Continue with the rest of the chain.
    pub fn run(self, ctx: &mut RequestContext) -> HandlerFuture<'_> {
        match self.continuation {
            Some(continuation) => continuation(ctx),
            None => Box::pin(async { anyhow::Ok(()) }),
        }
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("noop", &self.is_noop())
            .finish()
    }
}

/// A middleware or terminal request handler.
///
/// Handlers receive the request context and the continuation for the rest of the
/// chain. Middleware runs `next`; terminal handlers usually call
/// [`RequestContext::respond`] and return.
pub trait Handler: Send + Sync {
    fn call<'a>(&'a self, ctx: &'a mut RequestContext, next: Next) -> HandlerFuture<'a>;
}

/// Adapter turning an async closure into a [`Handler`].
pub struct FnHandler<F>(F);

impl<F> Handler for FnHandler<F>
where
    F: for<'a> Fn(&'a mut RequestContext, Next) -> HandlerFuture<'a> + Send + Sync,
{
    fn call<'a>(&'a self, ctx: &'a mut RequestContext, next: Next) -> HandlerFuture<'a> {
        (self.0)(ctx, next)
    }
}

/// Synchronous middleware: runs the closure, then the rest of the chain.
struct BeforeHandler<F>(F);

impl<F> Handler for BeforeHandler<F>
where
    F: Fn(&mut RequestContext) + Send + Sync,
{
    fn call<'a>(&'a self, ctx: &'a mut RequestContext, next: Next) -> HandlerFuture<'a> {
        (self.0)(ctx);
        next.run(ctx)
    }
}

/// Synchronous terminal handler: stores the closure's response and stops.
struct TerminalHandler<F>(F);

impl<F> Handler for TerminalHandler<F>
where
    F: Fn(&RequestContext) -> HandlerResponse + Send + Sync,
{
    fn call<'a>(&'a self, ctx: &'a mut RequestContext, _next: Next) -> HandlerFuture<'a> {
        let response = (self.0)(ctx);
        ctx.respond(response);
        Box::pin(async { anyhow::Ok(()) })
    }
}

/// A registered handler together with its identity and documentation.
///
/// Creating a `HandlerRef` assigns a fresh [`HandlerId`]; cloning it keeps the id.
/// Reuse clones wherever the same middleware instance should be recognised, e.g. when
/// one authentication handler is installed on several subtrees.
#[derive(Clone)]
pub struct HandlerRef {
    id: HandlerId,
    name: Arc<str>,
    inner: Arc<dyn Handler>,
    doc: Option<DocValue>,
    guarded: bool,
}

impl HandlerRef {
    /// Register `handler` under `name`.
    pub fn new<H: Handler + 'static>(name: &str, handler: H) -> Self {
        Self {
            id: HandlerId::new(),
            name: Arc::from(name),
            inner: Arc::new(handler),
            doc: None,
            guarded: false,
        }
    }

    /// Register an async closure.
    ///
    /// ```rust
    /// use routetree::handler::HandlerRef;
    ///
    /// let logger = HandlerRef::from_fn("logger", |ctx, next| {
    ///     Box::pin(async move {
    ///         ctx.locals.insert("logged".into(), true.into());
    ///         next.run(ctx).await
    ///     })
    /// });
    /// assert_eq!(logger.name(), "logger");
    /// ```
    pub fn from_fn<F>(name: &str, f: F) -> Self
    where
        F: for<'a> Fn(&'a mut RequestContext, Next) -> HandlerFuture<'a> + Send + Sync + 'static,
    {
        Self::new(name, FnHandler(f))
    }

    /// Register a synchronous middleware that always continues the chain.
    pub fn before<F>(name: &str, f: F) -> Self
    where
        F: Fn(&mut RequestContext) + Send + Sync + 'static,
    {
        Self::new(name, BeforeHandler(f))
    }

    /// Register a synchronous terminal handler.
    pub fn terminal<F>(name: &str, f: F) -> Self
    where
        F: Fn(&RequestContext) -> HandlerResponse + Send + Sync + 'static,
    {
        Self::new(name, TerminalHandler(f))
    }

    /// Attach a documentation fragment that is merged into every route this handler
    /// ends up on.
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<DocValue>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    #[must_use]
    pub fn id(&self) -> HandlerId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn doc(&self) -> Option<&DocValue> {
        self.doc.as_ref()
    }

    #[must_use]
    pub fn is_guarded(&self) -> bool {
        self.guarded
    }

    /// Wrap in the execute-once guard. Idempotent: an already guarded reference is
    /// returned as is, and the id never changes.
    #[must_use]
    pub fn guarded(self) -> Self {
        if self.guarded {
            return self;
        }
        Self {
            inner: Arc::new(ExecuteOnce::new(self.id, Arc::clone(&self.inner))),
            guarded: true,
            ..self
        }
    }
}

impl Handler for HandlerRef {
    fn call<'a>(&'a self, ctx: &'a mut RequestContext, next: Next) -> HandlerFuture<'a> {
        self.inner.call(ctx, next)
    }
}

impl fmt::Debug for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRef")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("guarded", &self.guarded)
            .field("doc", &self.doc)
            .finish()
    }
}
