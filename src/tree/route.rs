use super::entry::DocSlot;
use crate::doc::DocValue;
use crate::handler::HandlerChain;
use crate::path::param_names;
use http::Method;
use std::fmt;

/// One endpoint of a flattened tree.
///
/// `path` is absolute and uses `{param}` placeholders. `chain` holds inherited
/// middleware followed by the route's own handlers, each behind the execute-once
/// guard. `doc` is the fully merged documentation of the endpoint.
#[derive(Clone)]
pub struct Route {
    /// Position in the flattened table.
    pub index: usize,
    pub method: Method,
    pub path: String,
    pub chain: HandlerChain,
    pub doc: DocValue,
    pub(crate) slot: DocSlot,
}

impl Route {
    /// Slot holding the declaring entry's explicit documentation fragment.
    #[must_use]
    pub fn doc_slot(&self) -> &DocSlot {
        &self.slot
    }

    #[must_use]
    pub fn param_names(&self) -> Vec<&str> {
        param_names(&self.path)
    }

    /// Handler names in execution order.
    #[must_use]
    pub fn handler_names(&self) -> Vec<&str> {
        self.chain.names()
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("index", &self.index)
            .field("method", &self.method)
            .field("path", &self.path)
            .field("handlers", &self.chain.names())
            .field("doc", &self.doc)
            .finish()
    }
}
