use super::context::RequestContext;
use super::core::{Handler, HandlerRef, Next};
use tracing::debug;

/// Drain `handlers` one at a time, then continue with `next`.
///
/// This is not a general chain runner. Every handler but the last receives a no-op
/// continuation and the loop moves on whether or not it was run; only the last
/// handler receives the caller's `next`. The loop stops early once a response has been
/// finalized. With no handlers, `next` runs directly.
///
/// Handlers are awaited strictly one after another. Errors propagate.
///
/// Use [`HandlerChain::run`](super::HandlerChain::run) for real request handling.
pub async fn run_sequential(
    handlers: &[HandlerRef],
    ctx: &mut RequestContext,
    next: Next,
) -> anyhow::Result<()> {
    if handlers.is_empty() {
        return next.run(ctx).await;
    }

    let last = handlers.len() - 1;
    let mut next = Some(next);
    for (idx, handler) in handlers.iter().enumerate() {
        if ctx.is_finished() {
            debug!(
                request_id = %ctx.request_id,
                handler = handler.name(),
                remaining = handlers.len() - idx,
                "Response finalized - stopping sequential execution"
            );
            break;
        }
        let step = if idx == last {
            next.take().unwrap_or_else(Next::noop)
        } else {
            Next::noop()
        };
        handler.call(ctx, step).await?;
    }
    Ok(())
}
