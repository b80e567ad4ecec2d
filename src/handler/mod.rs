//! # Handler Module
//!
//! Handlers are the units a route tree is built from: middleware that runs and then
//! continues with `next`, and terminal handlers that produce a response.
//!
//! - [`HandlerRef`] pairs a handler with a stable [`HandlerId`](crate::ids::HandlerId)
//!   and an optional documentation fragment.
//! - [`HandlerChain`] is the resolved, ordered chain of a flattened route.
//! - The execute-once guard ([`HandlerRef::guarded`]) keeps a handler reachable through
//!   several tree paths from running more than once per request.
//! - [`run_sequential`] drains a list of handlers outside a live transport.
//!
//! ## Example
//!
//! ```rust
//! use routetree::handler::{HandlerChain, HandlerRef, HandlerResponse, RequestContext};
//! use http::Method;
//!
//! # futures::executor::block_on(async {
//! let auth = HandlerRef::before("auth", |ctx| {
//!     ctx.locals.insert("user".into(), "alice".into());
//! });
//! let hello = HandlerRef::terminal("hello", |ctx| {
//!     HandlerResponse::json(200, serde_json::json!({ "user": ctx.locals["user"] }))
//! });
//!
//! let chain = HandlerChain::new([auth.guarded(), hello.guarded()]);
//! let mut ctx = RequestContext::new(Method::GET, "/hello");
//! chain.run(&mut ctx).await?;
//! assert_eq!(ctx.response().map(|r| r.status), Some(200));
//! # anyhow::Ok(())
//! # }).unwrap();
//! ```

mod chain;
mod context;
mod core;
mod executor;
mod guard;
mod registry;

pub use chain::{HandlerChain, MiddlewareChain};
pub use context::{
    HandlerResponse, HeaderVec, ParamVec, RequestContext, MAX_INLINE_GUARDS, MAX_INLINE_HEADERS,
    MAX_INLINE_PARAMS,
};
pub use self::core::{FnHandler, Handler, HandlerFuture, HandlerRef, Next};
pub use executor::run_sequential;
pub use registry::{echo_handler, HandlerRegistry, ECHO_HANDLER};
