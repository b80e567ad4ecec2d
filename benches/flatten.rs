use criterion::{criterion_group, criterion_main, Criterion};
use http::Method;
use routetree::doc::{join_docs, DocValue};
use routetree::handler::{HandlerRef, HandlerResponse, RequestContext};
use routetree::tree::Node;
use serde_json::json;
use std::hint::black_box;

fn zoo_tree() -> Node {
    let auth = HandlerRef::before("auth", |_ctx| {})
        .with_doc(json!({ "security": [{ "apiKey": [] }] }));
    let log = HandlerRef::before("log", |_ctx| {});
    let ok = HandlerRef::terminal("ok", |_ctx| HandlerResponse::json(200, json!({})));

    let shared = Node::root();
    shared.get("/health", [ok.clone()], json!({ "tags": ["ops"] }));
    shared.options("/health", [ok.clone()], DocValue::empty());

    let root = Node::new("/api", json!({ "tags": ["zoo"] }));
    root.middleware([log], DocValue::empty());
    for category in ["cats", "dogs", "birds", "fish"] {
        let animals = root.subtree(&format!("/{category}"), json!({ "tags": [category] }));
        animals.middleware([auth.clone()], DocValue::empty());
        animals.get("/", [ok.clone()], json!({ "summary": format!("List {category}") }));
        animals.post("/", [ok.clone()], DocValue::empty());
        let animal = animals.subtree("/:id", DocValue::empty());
        animal.get("/", [ok.clone()], DocValue::empty());
        animal.put("/", [ok.clone()], DocValue::empty());
        animal.delete("/", [ok.clone()], DocValue::empty());
        animal.get("/toys/:toy_id", [ok.clone()], DocValue::empty());
        animal.attach(&shared, "/status", [auth.clone()], DocValue::empty());
    }
    root
}

fn bench_flatten(c: &mut Criterion) {
    let root = zoo_tree();
    c.bench_function("flatten_tree", |b| {
        b.iter(|| {
            let routes = root.routes();
            black_box(&routes);
        })
    });
}

fn bench_merge(c: &mut Criterion) {
    let fragments: Vec<DocValue> = (0..8)
        .map(|i| {
            DocValue::from(json!({
                "tags": [format!("t{i}"), "shared"],
                "responses": { (format!("{}", 200 + i)): { "description": "ok" } },
                "summary": format!("step {i}"),
            }))
        })
        .collect();
    c.bench_function("join_docs", |b| {
        b.iter(|| {
            let merged = join_docs(fragments.iter());
            black_box(&merged);
        })
    });
}

fn bench_guarded_chain(c: &mut Criterion) {
    let routes = zoo_tree().routes();
    let route = routes
        .iter()
        .find(|r| r.path == "/api/cats/{id}/status/health" && r.method == Method::GET)
        .cloned();
    c.bench_function("guarded_chain_run", |b| {
        b.iter(|| {
            if let Some(route) = &route {
                let mut ctx = RequestContext::new(Method::GET, &route.path);
                let result = futures::executor::block_on(route.chain.run(&mut ctx));
                black_box(&result);
            }
        })
    });
}

criterion_group!(benches, bench_flatten, bench_merge, bench_guarded_chain);
criterion_main!(benches);
