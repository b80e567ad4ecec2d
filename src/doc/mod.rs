//! # Documentation Module
//!
//! Documentation fragments are attached to tree nodes, middleware entries, individual
//! handlers and routes. Flattening a tree folds every fragment that applies to an
//! endpoint into one merged description using [`merge`] / [`join_docs`].
//!
//! ## Merge Rules
//!
//! | overlay value      | result                                              |
//! |--------------------|-----------------------------------------------------|
//! | key absent         | existing value kept                                 |
//! | `Null` / `Opaque`  | overlay replaces                                    |
//! | `List`             | existing ++ overlay, deep-deduplicated, first wins  |
//! | `Record`           | recursive merge into existing (or empty) record     |
//! | scalar             | overlay replaces                                    |
//!
//! ## Example
//!
//! ```rust
//! use routetree::doc::{join_docs, DocValue};
//! use serde_json::json;
//!
//! let a = DocValue::from(json!({ "tags": ["a", "b"], "summary": "old" }));
//! let b = DocValue::from(json!({ "tags": ["b", "c"], "summary": "new" }));
//!
//! let merged = join_docs([&a, &b]);
//! assert_eq!(merged.to_json(), json!({ "tags": ["a", "b", "c"], "summary": "new" }));
//! ```

mod merge;
mod value;

pub use merge::{join_docs, merge};
pub use value::{DocMap, DocValue, Opaque, OpaqueDoc};
