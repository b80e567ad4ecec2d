use super::context::HandlerResponse;
use super::core::HandlerRef;
use std::collections::HashMap;
use tracing::{info, warn};

/// Name under which [`echo_handler`] is pre-registered.
pub const ECHO_HANDLER: &str = "echo";

/// Named handler instances used when building trees from a manifest.
///
/// Every lookup returns a clone of the registered [`HandlerRef`], so all references
/// to one name share a single identity.
#[derive(Debug, Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, HandlerRef>,
}

impl HandlerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the built-in [`echo_handler`].
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.insert(echo_handler());
        registry
    }

    /// Insert a handler under its own name.
    ///
    /// **IMPORTANT**: an existing handler with the same name is replaced. Trees built
    /// before the replacement keep the old instance.
    pub fn insert(&mut self, handler: HandlerRef) -> HandlerRef {
        let name = handler.name().to_string();
        if self.handlers.contains_key(&name) {
            warn!(handler_name = %name, "Replaced existing handler registration");
        } else {
            info!(
                handler_name = %name,
                handler_id = %handler.id(),
                total_handlers = self.handlers.len() + 1,
                "Handler registered"
            );
        }
        self.handlers.insert(name, handler.clone());
        handler
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<HandlerRef> {
        self.handlers.get(name).cloned()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

// Terminal handler that echoes the request back.
#[must_use]
pub fn echo_handler() -> HandlerRef {
    HandlerRef::terminal(ECHO_HANDLER, |ctx| {
        HandlerResponse::json(
            200,
            serde_json::json!({
                "request_id": ctx.request_id,
                "method": ctx.method.to_string(),
                "path": ctx.path,
                "params": ctx.path_params_map(),
                "body": ctx.body,
                "locals": ctx.locals,
            }),
        )
    })
}
