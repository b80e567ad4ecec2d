use crate::ids::{HandlerId, RequestId};
use http::Method;
use serde::Serialize;
use serde_json::{Map, Value};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Maximum number of path parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Maximum inline headers before heap allocation.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Guarded handlers a request can pass before its executed set spills to the heap.
pub const MAX_INLINE_GUARDS: usize = 16;

/// Parameter storage: names are shared, values are per-request.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Header storage: names are shared, values are per-request.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

type ExecutedSet = SmallVec<[HandlerId; MAX_INLINE_GUARDS]>;

/// Response produced by a handler chain.
#[derive(Debug, Clone, Serialize)]
pub struct HandlerResponse {
    /// HTTP status code (200, 404, 500, etc.)
    pub status: u16,
    #[serde(skip_serializing)]
    pub headers: HeaderVec,
    pub body: Value,
}

impl HandlerResponse {
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create a JSON response with a `content-type` header.
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "application/json".to_string()));
        Self {
            status,
            headers,
            body,
        }
    }

    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": message }))
    }

    /// Get a header by name (case-insensitive)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }
}

/// Per-request state threaded through a handler chain.
///
/// The transport builds one context per inbound request. Besides the parsed request
/// it holds the response slot (a filled slot means the request is finished) and the
/// execute-once bookkeeping used by guarded handlers. That bookkeeping is private to
/// this request and never shared.
#[derive(Debug)]
pub struct RequestContext {
    pub request_id: RequestId,
    pub method: Method,
    /// Request path as received.
    pub path: String,
    pub path_params: ParamVec,
    pub headers: HeaderVec,
    pub body: Option<Value>,
    /// Free-form values handlers hand to later handlers.
    pub locals: Map<String, Value>,
    response: Option<HandlerResponse>,
    executed: Option<ExecutedSet>,
    active_guard: Option<HandlerId>,
}

impl RequestContext {
    #[must_use]
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            request_id: RequestId::new(),
            method,
            path: path.to_string(),
            path_params: ParamVec::new(),
            headers: HeaderVec::new(),
            body: None,
            locals: Map::new(),
            response: None,
            executed: None,
            active_guard: None,
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((Arc::from(name), value.to_string()));
        self
    }

    #[must_use]
    pub fn with_path_param(mut self, name: &str, value: &str) -> Self {
        self.path_params.push((Arc::from(name), value.to_string()));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Get a header by name (case-insensitive per RFC 7230)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Get a path parameter by name. Last write wins on duplicates.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Convert path_params to a HashMap. Allocates; prefer `get_path_param`.
    #[must_use]
    pub fn path_params_map(&self) -> HashMap<String, String> {
        self.path_params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    /// Finalize the response. Later handlers observe [`is_finished`](Self::is_finished).
    pub fn respond(&mut self, response: HandlerResponse) {
        self.response = Some(response);
    }

    #[must_use]
    pub fn response(&self) -> Option<&HandlerResponse> {
        self.response.as_ref()
    }

    pub fn response_mut(&mut self) -> Option<&mut HandlerResponse> {
        self.response.as_mut()
    }

    pub fn take_response(&mut self) -> Option<HandlerResponse> {
        self.response.take()
    }

    /// `true` once a response has been finalized.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.response.is_some()
    }

    /// Opt the currently running guarded handler in (`true`) or out (`false`) of the
    /// execute-once guard for this request.
    ///
    /// Opting out forgets that the handler ran, so another path through the chain may
    /// run it again. Outside a guarded invocation this does nothing.
    pub fn execute_once(&mut self, flag: bool) {
        let Some(id) = self.active_guard else {
            debug!(
                request_id = %self.request_id,
                flag,
                "execute_once called outside a guarded handler - ignored"
            );
            return;
        };
        if flag {
            self.mark_executed(id);
        } else if let Some(executed) = self.executed.as_mut() {
            executed.retain(|seen| *seen != id);
        }
    }

    /// Whether the guarded handler `id` already ran for this request.
    #[must_use]
    pub fn has_executed(&self, id: HandlerId) -> bool {
        self.executed
            .as_ref()
            .is_some_and(|executed| executed.contains(&id))
    }

    /// Number of distinct guarded handlers recorded as executed.
    #[must_use]
    pub fn executed_count(&self) -> usize {
        self.executed.as_ref().map_or(0, SmallVec::len)
    }

    pub(crate) fn mark_executed(&mut self, id: HandlerId) {
        let executed = self.executed.get_or_insert_with(ExecutedSet::new);
        if !executed.contains(&id) {
            executed.push(id);
        }
    }

    /// Install `guard` as the active guard, returning the previous one.
    pub(crate) fn swap_active_guard(&mut self, guard: Option<HandlerId>) -> Option<HandlerId> {
        std::mem::replace(&mut self.active_guard, guard)
    }
}
