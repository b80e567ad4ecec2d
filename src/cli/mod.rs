//! # CLI Module
//!
//! Command-line inspection of route tree manifests.
//!
//! ## Commands
//!
//! ### `routes`
//!
//! Print the flattened route table, one route per line with its handler chain:
//!
//! ```bash
//! routetree routes --manifest routes.yaml
//! routetree routes --manifest routes.yaml --json
//! ```
//!
//! ### `doc`
//!
//! Print the OpenAPI document assembled from the routes' merged documentation:
//!
//! ```bash
//! routetree doc --manifest routes.yaml --yaml
//! ```
//!
//! Handler names the manifest uses are stubbed with pass-through handlers, so any
//! manifest can be inspected without the service that implements it.
//!
//! `--config <FILE>` (or `ROUTETREE_CONFIG`) loads a [`TreeConfig`](crate::config::TreeConfig).

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{execute, run_cli, Cli, Commands};
