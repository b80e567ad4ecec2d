//! # Route Tree Module
//!
//! Declarative construction of a tree of endpoints and middleware, and its flattening
//! into the linear route table a dispatcher needs.
//!
//! ## Overview
//!
//! A [`Node`] holds an ordered list of entries:
//!
//! - **middleware**, applying to every route and subtree declared after it in the node
//! - **routes**, relative to the node's prefix
//! - **subtrees**, edges into child nodes that may carry handlers of their own
//!
//! [`Node::routes`] walks the tree depth first and emits one [`Route`] per declared
//! endpoint, in declaration order. Each route carries its resolved handler chain and
//! its merged documentation.
//!
//! ## Shared Subtrees
//!
//! [`Node::attach`] mounts a node that already exists. The node is shared, so routes
//! added to it afterwards appear under every mount point. Middleware reachable through
//! more than one mount still runs once per request thanks to the execute-once guard
//! around every handler of a flattened chain.
//!
//! ## Example
//!
//! ```rust
//! use routetree::doc::DocValue;
//! use routetree::handler::{HandlerRef, HandlerResponse};
//! use routetree::tree::Node;
//! use serde_json::json;
//!
//! let auth = HandlerRef::before("auth", |_ctx| {});
//! let list = HandlerRef::terminal("list_users", |_ctx| HandlerResponse::json(200, json!([])));
//! let stats = HandlerRef::terminal("stats", |_ctx| HandlerResponse::json(200, json!({})));
//!
//! let root = Node::root();
//! root.get("/users", [list], json!({ "summary": "List users" }));
//! let admin = root.subtree("/admin", json!({ "tags": ["admin"] }));
//! admin.middleware([auth], DocValue::empty());
//! admin.get("/stats", [stats], DocValue::empty());
//!
//! let routes = root.routes();
//! assert_eq!(routes[0].path, "/users");
//! assert_eq!(routes[0].handler_names(), vec!["list_users"]);
//! assert_eq!(routes[1].path, "/admin/stats");
//! assert_eq!(routes[1].handler_names(), vec!["auth", "stats"]);
//! assert_eq!(routes[1].doc.to_json(), json!({ "tags": ["admin"] }));
//! ```

mod entry;
mod flatten;
mod node;
mod route;
#[cfg(test)]
mod tests;

pub use entry::DocSlot;
pub use node::Node;
pub use route::Route;
