#![allow(dead_code)]

pub mod temp_files {
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Write `content` to a temporary file with the given extension. The file is
    /// removed when the handle is dropped.
    pub fn create_temp_manifest(content: &str, ext: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .prefix("routetree_test_")
            .suffix(&format!(".{ext}"))
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    pub fn create_temp_yaml(content: &str) -> NamedTempFile {
        create_temp_manifest(content, "yaml")
    }

    pub fn create_temp_json(content: &str) -> NamedTempFile {
        create_temp_manifest(content, "json")
    }
}

pub mod handlers {
    use routetree::handler::{HandlerRef, HandlerResponse, RequestContext};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Middleware that counts its invocations.
    pub fn counting(name: &str) -> (HandlerRef, Arc<AtomicUsize>) {
        let counter = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&counter);
        let handler = HandlerRef::before(name, move |_ctx| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        (handler, counter)
    }

    /// Middleware that appends its name to `locals.trail`.
    pub fn trail(name: &'static str) -> HandlerRef {
        HandlerRef::before(name, move |ctx| {
            let entry = ctx
                .locals
                .entry("trail")
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(items) = entry {
                items.push(name.into());
            }
        })
    }

    pub fn trail_of(ctx: &RequestContext) -> Vec<String> {
        ctx.locals
            .get("trail")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn ok(name: &str) -> HandlerRef {
        HandlerRef::terminal(name, |_ctx| HandlerResponse::json(200, json!({ "ok": true })))
    }
}
