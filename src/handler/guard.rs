//! Execute-once guard.
//!
//! A middleware instance can be reachable through several paths of a route tree: a
//! subtree attached in two places, or a reusable chain installed on both a parent and
//! a child. The resolved handler chain then contains the same [`HandlerId`] more than
//! once. The guard makes sure the underlying handler runs at most once per request;
//! repeat visits skip straight to `next`.

use super::context::RequestContext;
use super::core::{Handler, HandlerFuture, Next};
use crate::ids::HandlerId;
use std::sync::Arc;
use tracing::trace;

pub(crate) struct ExecuteOnce {
    id: HandlerId,
    inner: Arc<dyn Handler>,
}

impl ExecuteOnce {
    pub(crate) fn new(id: HandlerId, inner: Arc<dyn Handler>) -> Self {
        Self { id, inner }
    }
}

impl Handler for ExecuteOnce {
    fn call<'a>(&'a self, ctx: &'a mut RequestContext, next: Next) -> HandlerFuture<'a> {
        if ctx.has_executed(self.id) {
            trace!(
                request_id = %ctx.request_id,
                handler_id = %self.id,
                "Guarded handler already executed - skipping"
            );
            return next.run(ctx);
        }

        ctx.mark_executed(self.id);
        let id = self.id;

        // Downstream handlers install their own guard; restore ours once they return
        // so execute_once() after `next` still addresses this handler.
        let next = Next::new(move |ctx| {
            Box::pin(async move {
                let result = next.run(ctx).await;
                ctx.swap_active_guard(Some(id));
                result
            })
        });

        Box::pin(async move {
            let previous = ctx.swap_active_guard(Some(id));
            let result = self.inner.call(ctx, next).await;
            ctx.swap_active_guard(previous);
            result
        })
    }
}
