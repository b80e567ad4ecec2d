//! # API Document Assembly
//!
//! Builds one OpenAPI 3.1 document out of a flattened route table. Each route's merged
//! documentation becomes the operation object at `paths.<path>.<method>`. A
//! `components` key found in any route's documentation is lifted to the document root,
//! and all of them are combined with the documentation merger, so fragments declared by
//! different middleware add up instead of overwriting each other.
//!
//! Operations are completed where OpenAPI requires it: a default response is added when
//! `responses` is missing, and every `{param}` of the path gets a string path parameter
//! unless the documentation already declares it.
//!
//! ```rust
//! use routetree::config::TreeConfig;
//! use routetree::handler::echo_handler;
//! use routetree::openapi::ApiDocument;
//! use routetree::tree::Node;
//! use serde_json::json;
//!
//! let root = Node::root();
//! root.get("/pets/:id", [echo_handler()], json!({ "summary": "Get a pet" }));
//!
//! let doc = ApiDocument::from_routes(&root.routes(), &TreeConfig::default());
//! let json = doc.to_json();
//! assert_eq!(json["paths"]["/pets/{id}"]["get"]["summary"], "Get a pet");
//! assert!(doc.to_spec().is_ok());
//! ```

use crate::config::TreeConfig;
use crate::doc::DocValue;
use crate::tree::Route;
use anyhow::{Context, Result};
use oas3::OpenApiV3Spec;
use serde_json::{json, Value};
use tracing::{debug, warn};

/// OpenAPI version written to every document.
pub const OPENAPI_VERSION: &str = "3.1.0";

#[derive(Debug, Clone)]
pub struct ApiDocument {
    doc: DocValue,
}

impl ApiDocument {
    pub fn from_routes(routes: &[Route], config: &TreeConfig) -> Self {
        let mut paths = DocValue::empty();
        let mut components = DocValue::empty();

        for route in routes {
            let mut operation = route.doc.clone();
            if !operation.is_record() {
                warn!(
                    path = %route.path,
                    method = %route.method,
                    "Route documentation is not a record - ignored"
                );
                operation = DocValue::empty();
            }
            if let Some(fragment) = operation.remove("components") {
                components.merge_from(&fragment);
            }

            let mut operation = operation.to_json();
            complete_operation(&mut operation, &route.param_names());

            // Two routes with the same path and method merge into one operation.
            let method = route.method.as_str().to_lowercase();
            paths.merge_from(&DocValue::from(json!({ (route.path.clone()): { method: operation } })));
        }

        let mut doc = DocValue::from(json!({
            "openapi": OPENAPI_VERSION,
            "info": {
                "title": config.api_title,
                "version": config.api_version,
            },
        }));
        doc.merge_from(&DocValue::from(json!({ "paths": paths.to_json() })));
        if !components.is_empty() {
            doc.merge_from(&DocValue::from(json!({ "components": components.to_json() })));
        }

        debug!(
            routes = routes.len(),
            paths = paths.as_record().map_or(0, |p| p.len()),
            "API document assembled"
        );
        Self { doc }
    }

    /// The assembled document.
    #[must_use]
    pub fn doc(&self) -> &DocValue {
        &self.doc
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        self.doc.to_json()
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_json()).context("Failed to serialize API document")
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.to_json()).context("Failed to serialize API document as YAML")
    }

    /// Parse the document as an OpenAPI 3.1 specification.
    pub fn to_spec(&self) -> Result<OpenApiV3Spec> {
        serde_json::from_value(self.to_json()).context("Assembled document is not valid OpenAPI")
    }
}

fn complete_operation(operation: &mut Value, params: &[&str]) {
    let Value::Object(op) = operation else {
        return;
    };

    op.entry("responses").or_insert_with(|| {
        json!({ "default": { "description": "Default response" } })
    });

    if params.is_empty() {
        return;
    }
    let declared: Vec<String> = op
        .get("parameters")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter(|p| p.get("in").and_then(Value::as_str) == Some("path"))
                .filter_map(|p| p.get("name").and_then(Value::as_str).map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    let missing: Vec<Value> = params
        .iter()
        .filter(|name| !declared.iter().any(|d| d.as_str() == **name))
        .map(|name| {
            json!({
                "name": name,
                "in": "path",
                "required": true,
                "schema": { "type": "string" },
            })
        })
        .collect();
    if missing.is_empty() {
        return;
    }
    match op.get_mut("parameters") {
        Some(Value::Array(list)) => list.extend(missing),
        _ => {
            op.insert("parameters".to_string(), Value::Array(missing));
        }
    }
}
