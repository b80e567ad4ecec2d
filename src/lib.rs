//! # routetree
//!
//! **routetree** is a route-registration front end: build a tree of HTTP endpoints and
//! reusable middleware declaratively, then flatten it into the linear route table a
//! request dispatcher needs, with every endpoint's documentation merged from the
//! fragments declared along the way.
//!
//! ## Overview
//!
//! Routes are declared on [`tree::Node`]s. A node carries a path prefix, a base
//! documentation fragment and an ordered list of entries: middleware, routes, and
//! subtrees. Flattening walks the tree depth first and produces one [`tree::Route`] per
//! endpoint, each with
//!
//! - its absolute path, with `:param` placeholders rewritten to `{param}`
//! - its resolved handler chain: inherited middleware first, own handlers last
//! - its merged documentation, folded with [`doc::join_docs`]
//!
//! Transport, request parsing and documentation rendering are left to the caller.
//!
//! ## Architecture
//!
//! - **[`path`]** - path segment joining and placeholder normalization
//! - **[`doc`]** - documentation values and the deep merge over them
//! - **[`handler`]** - handler trait, request context, chains, the execute-once guard
//!   and the sequential executor
//! - **[`tree`]** - nodes, entries and the flattener
//! - **[`manifest`]** - trees declared in YAML or JSON
//! - **[`openapi`]** - OpenAPI 3.1 document assembly from a route table
//! - **[`config`]** / **[`logging`]** - configuration and structured logging setup
//! - **[`cli`]** - the `routetree` inspection binary
//!
//! ### Flatten Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant User
//!     participant Node as tree::Node
//!     participant Flatten as tree::flatten
//!     participant Merge as doc::join_docs
//!     participant Guard as handler::guard
//!
//!     User->>Node: middleware / route / subtree / attach
//!     User->>Node: routes()
//!     Node->>Flatten: flatten(root)
//!     Flatten->>Flatten: walk entries in order,<br/>accumulate inherited handlers and docs
//!     Flatten->>Flatten: recurse into subtrees,<br/>re-root child routes under the edge
//!     Flatten->>Merge: join inherited docs,<br/>handler docs, route doc
//!     Flatten->>Guard: wrap every chain handler<br/>in the execute-once guard
//!     Flatten-->>User: Vec<Route> (index, method, path, chain, doc)
//! ```
//!
//! ## Middleware Identity
//!
//! Every [`handler::HandlerRef`] gets a [`ids::HandlerId`] when it is created; clones keep
//! it. When the same middleware instance is reachable through several paths of the tree
//! (a shared subtree mounted twice, a reusable chain installed on parent and child),
//! the flattened chain lists it more than once, yet it runs once per request. A handler
//! can opt out for the current request with
//! [`RequestContext::execute_once(false)`](handler::RequestContext::execute_once).
//!
//! ## Quick Start
//!
//! ```rust
//! use routetree::doc::DocValue;
//! use routetree::handler::{HandlerRef, HandlerResponse, RequestContext};
//! use routetree::tree::Node;
//! use serde_json::json;
//!
//! # futures::executor::block_on(async {
//! let auth = HandlerRef::before("auth", |ctx| {
//!     ctx.locals.insert("user".into(), "admin".into());
//! });
//! let stats = HandlerRef::terminal("stats", |ctx| {
//!     HandlerResponse::json(200, json!({ "user": ctx.locals["user"] }))
//! });
//!
//! let root = Node::root();
//! let admin = root.subtree("/admin", json!({ "tags": ["admin"] }));
//! admin.middleware([auth], DocValue::empty());
//! admin.get("/stats", [stats], json!({ "summary": "Usage statistics" }));
//!
//! let routes = root.routes();
//! let route = &routes[0];
//! assert_eq!(route.path, "/admin/stats");
//!
//! let mut ctx = RequestContext::new(route.method.clone(), &route.path);
//! route.chain.run(&mut ctx).await?;
//! assert_eq!(ctx.response().map(|r| r.status), Some(200));
//! # anyhow::Ok(())
//! # }).unwrap();
//! ```
//!
//! ## Command Line
//!
//! ```bash
//! routetree routes --manifest routes.yaml
//! routetree doc --manifest routes.yaml --yaml
//! ```

pub mod cli;
pub mod config;
pub mod doc;
pub mod handler;
pub mod ids;
pub mod logging;
pub mod manifest;
pub mod openapi;
pub mod path;
pub mod tree;

pub use config::TreeConfig;
pub use doc::{join_docs, merge, DocValue};
pub use handler::{HandlerChain, HandlerRef, HandlerRegistry, MiddlewareChain, RequestContext};
pub use ids::{HandlerId, RequestId};
pub use manifest::{build_tree, load_manifest, Manifest, ManifestError};
pub use openapi::ApiDocument;
pub use path::{join_paths, normalize_params};
pub use tree::{DocSlot, Node, Route};
