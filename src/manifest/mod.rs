//! # Manifest Module
//!
//! Route trees described in YAML or JSON instead of code. Handler names are resolved
//! against a [`HandlerRegistry`](crate::handler::HandlerRegistry), so the same name
//! always yields the same handler identity.
//!
//! ```yaml
//! trees:
//!   health:
//!     entries:
//!       - kind: route
//!         method: GET
//!         path: /health
//!         handlers: [echo]
//! root:
//!   prefix: /api
//!   entries:
//!     - kind: middleware
//!       handlers: [auth]
//!     - kind: subtree
//!       path: /admin
//!       doc: { tags: [admin] }
//!       entries:
//!         - kind: route
//!           method: GET
//!           path: /stats
//!           handlers: [echo]
//!     - kind: mount
//!       tree: health
//!       path: /public
//! ```

mod error;
mod load;
mod types;

pub use error::ManifestError;
pub use load::{build_tree, load_manifest, parse_manifest, ManifestFormat};
pub use types::{EntrySpec, Manifest, NodeSpec};
