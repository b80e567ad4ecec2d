use super::*;
use crate::doc::DocValue;
use crate::handler::{HandlerRef, HandlerResponse, Next, RequestContext};
use http::Method;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn mw(name: &str) -> HandlerRef {
    HandlerRef::before(name, |_ctx| {})
}

fn ok(name: &str) -> HandlerRef {
    HandlerRef::terminal(name, |_ctx| HandlerResponse::json(200, json!({})))
}

fn table(routes: &[Route]) -> Vec<(String, String)> {
    routes
        .iter()
        .map(|r| (r.method.to_string(), r.path.clone()))
        .collect()
}

#[test]
fn test_empty_node_has_no_routes() {
    let root = Node::root();
    assert!(root.is_empty());
    assert!(root.routes().is_empty());
}

#[test]
fn test_routes_keep_declaration_order() {
    let root = Node::root();
    root.get("/b", [ok("b")], DocValue::empty());
    let sub = root.subtree("/s", DocValue::empty());
    sub.get("/x", [ok("x")], DocValue::empty());
    sub.post("/y", [ok("y")], DocValue::empty());
    root.get("/a", [ok("a")], DocValue::empty());

    let routes = root.routes();
    assert_eq!(
        table(&routes),
        vec![
            ("GET".into(), "/b".into()),
            ("GET".into(), "/s/x".into()),
            ("POST".into(), "/s/y".into()),
            ("GET".into(), "/a".into()),
        ]
    );
    let indices: Vec<usize> = routes.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3]);
}

#[test]
fn test_middleware_only_applies_to_later_entries() {
    let root = Node::root();
    root.get("/before", [ok("before")], DocValue::empty());
    root.middleware([mw("log")], DocValue::empty());
    root.get("/after", [ok("after")], DocValue::empty());

    let routes = root.routes();
    assert_eq!(routes[0].handler_names(), vec!["before"]);
    assert_eq!(routes[1].handler_names(), vec!["log", "after"]);
}

#[test]
fn test_subtree_middleware_does_not_leak() {
    let root = Node::root();
    let child = root.subtree("/child", DocValue::empty());
    child.middleware([mw("child_only")], DocValue::empty());
    child.get("/x", [ok("x")], DocValue::empty());
    root.get("/y", [ok("y")], DocValue::empty());

    let routes = root.routes();
    assert_eq!(routes[0].handler_names(), vec!["child_only", "x"]);
    assert_eq!(routes[1].handler_names(), vec!["y"]);
}

#[test]
fn test_users_admin_scenario() {
    let auth = mw("auth").with_doc(json!({ "security": [{ "bearer": [] }] }));
    let root = Node::root();
    root.get("/users", [ok("list_users")], json!({ "summary": "List users" }));
    let admin = root.subtree("/admin", json!({ "tags": ["admin"] }));
    admin.middleware([auth], DocValue::empty());
    admin.get("/stats", [ok("stats")], json!({ "summary": "Stats" }));

    let routes = root.routes();
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].path, "/users");
    assert_eq!(routes[0].handler_names(), vec!["list_users"]);
    assert_eq!(routes[0].doc.to_json(), json!({ "summary": "List users" }));

    assert_eq!(routes[1].path, "/admin/stats");
    assert_eq!(routes[1].handler_names(), vec!["auth", "stats"]);
    assert_eq!(
        routes[1].doc.to_json(),
        json!({
            "tags": ["admin"],
            "security": [{ "bearer": [] }],
            "summary": "Stats"
        })
    );
}

#[test]
fn test_edge_handlers_apply_only_through_edge() {
    let root = Node::root();
    let child = root.subtree_with("/v1", [mw("edge")], DocValue::empty());
    child.get("/ping", [ok("ping")], DocValue::empty());

    let routes = root.routes();
    assert_eq!(routes[0].path, "/v1/ping");
    assert_eq!(routes[0].handler_names(), vec!["edge", "ping"]);
    assert_eq!(child.routes()[0].handler_names(), vec!["ping"]);
}

#[test]
fn test_attach_shares_node_and_sees_later_routes() {
    let shared = Node::root();
    shared.get("/health", [ok("health")], DocValue::empty());

    let root = Node::root();
    root.attach(&shared, "/a", [], json!({ "tags": ["a"] }));
    root.attach(&shared, "/b", [], json!({ "tags": ["b"] }));
    shared.get("/ready", [ok("ready")], DocValue::empty());

    let routes = root.routes();
    assert_eq!(
        table(&routes),
        vec![
            ("GET".into(), "/a/health".into()),
            ("GET".into(), "/a/ready".into()),
            ("GET".into(), "/b/health".into()),
            ("GET".into(), "/b/ready".into()),
        ]
    );
    assert_eq!(routes[0].doc.to_json(), json!({ "tags": ["a"] }));
    assert_eq!(routes[3].doc.to_json(), json!({ "tags": ["b"] }));
}

#[test]
fn test_attach_under_prefixed_parent() {
    let shared = Node::new("/inner", DocValue::empty());
    shared.get("/x", [ok("x")], DocValue::empty());
    let root = Node::new("/api", DocValue::empty());
    root.attach(&shared, "/mount", [], DocValue::empty());

    assert_eq!(root.routes()[0].path, "/api/mount/inner/x");
}

#[test]
fn test_root_route_path_is_slash() {
    let root = Node::root();
    root.get("", [ok("index")], DocValue::empty());
    root.get("/", [ok("index")], DocValue::empty());
    let routes = root.routes();
    assert_eq!(routes[0].path, "/");
    assert_eq!(routes[1].path, "/");
}

#[test]
fn test_colon_params_are_normalized() {
    let root = Node::root();
    let users = root.subtree("/users/:user_id", DocValue::empty());
    users.get("/posts/:post_id", [ok("post")], DocValue::empty());

    let routes = root.routes();
    assert_eq!(routes[0].path, "/users/{user_id}/posts/{post_id}");
    assert_eq!(routes[0].param_names(), vec!["user_id", "post_id"]);
}

#[test]
fn test_middleware_doc_is_merged_with_node_base() {
    let root = Node::new("", json!({ "tags": ["base"] }));
    root.middleware([mw("m")], json!({ "tags": ["mw"] }));
    root.get("/x", [ok("x")], json!({ "tags": ["route"] }));

    assert_eq!(
        root.routes()[0].doc.to_json(),
        json!({ "tags": ["base", "mw", "route"] })
    );
}

#[test]
fn test_amend_doc_is_visible_through_every_attachment() {
    let shared = Node::root();
    shared.get("/x", [ok("x")], json!({ "summary": "old" }));
    let root = Node::root();
    root.attach(&shared, "/a", [], DocValue::empty());
    root.attach(&shared, "/b", [], DocValue::empty());

    assert!(root.amend_doc(0, json!({ "summary": "new", "tags": ["t"] })));
    let routes = root.routes();
    for route in &routes {
        assert_eq!(route.doc.to_json(), json!({ "summary": "new", "tags": ["t"] }));
    }
    assert!(routes[0].doc_slot().ptr_eq(routes[1].doc_slot()));
    assert!(!root.amend_doc(99, json!({ "summary": "missing" })));
}

#[test]
fn test_slot_returned_by_route_amends_flattened_doc() {
    let root = Node::root();
    let slot = root.get("/x", [ok("x")], DocValue::empty());
    slot.amend(&DocValue::from(json!({ "deprecated": true })));
    assert_eq!(root.routes()[0].doc.to_json(), json!({ "deprecated": true }));
}

#[test]
fn test_cyclic_attachment_is_skipped() {
    let root = Node::root();
    root.get("/x", [ok("x")], DocValue::empty());
    root.attach(&root, "/loop", [], DocValue::empty());

    let routes = root.routes();
    assert_eq!(table(&routes), vec![("GET".into(), "/x".into())]);
}

#[tokio::test]
async fn test_shared_middleware_runs_once_across_two_paths() {
    let counter = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&counter);
    let auth = HandlerRef::before("auth", move |_ctx| {
        seen.fetch_add(1, Ordering::SeqCst);
    });

    // auth applies at the root and again on the edge into the shared node.
    let shared = Node::root();
    shared.get("/x", [ok("x")], DocValue::empty());
    let root = Node::root();
    root.middleware([auth.clone()], DocValue::empty());
    root.attach(&shared, "/a", [auth], DocValue::empty());

    let route = &root.routes()[0];
    assert_eq!(route.handler_names(), vec!["auth", "auth", "x"]);

    let mut ctx = RequestContext::new(Method::GET, "/a/x");
    route.chain.run(&mut ctx).await.unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(ctx.response().map(|r| r.status), Some(200));

    let mut fresh = RequestContext::new(Method::GET, "/a/x");
    route.chain.run(&mut fresh).await.unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_run_middleware_drains_node_middleware() {
    let root = Node::root();
    root.middleware(
        [HandlerRef::before("a", |ctx| {
            ctx.locals.insert("a".into(), true.into());
        })],
        DocValue::empty(),
    );
    root.get("/x", [ok("x")], DocValue::empty());
    root.middleware(
        [HandlerRef::before("b", |ctx| {
            ctx.locals.insert("b".into(), true.into());
        })],
        DocValue::empty(),
    );

    let mut ctx = RequestContext::new(Method::GET, "/x");
    root.run_middleware(&mut ctx, Next::noop()).await.unwrap();
    assert!(ctx.locals.contains_key("a"));
    assert!(ctx.locals.contains_key("b"));
    assert!(!ctx.is_finished());
}

#[test]
fn test_use_chain_shares_identity() {
    let chain = crate::handler::MiddlewareChain::new()
        .with(mw("auth"))
        .with_doc(json!({ "tags": ["secure"] }));
    let a = Node::root();
    let b = Node::root();
    a.use_chain(&chain);
    b.use_chain(&chain);
    a.get("/x", [ok("x")], DocValue::empty());
    b.get("/y", [ok("y")], DocValue::empty());

    let ra = a.routes();
    let rb = b.routes();
    assert_eq!(ra[0].chain.ids()[0], rb[0].chain.ids()[0]);
    assert_eq!(ra[0].doc.to_json(), json!({ "tags": ["secure"] }));
}

#[test]
fn test_subtree_flattens_the_same_alone_and_inside_parent() {
    let root = Node::root();
    root.middleware([mw("outer")], DocValue::empty());
    let child = root.subtree("/c", json!({ "tags": ["c"], "x": 1 }));
    child.middleware(
        [mw("auth").with_doc(json!({ "security": [{ "k": [] }] }))],
        json!({ "x": 1 }),
    );
    child.get("/leaf", [ok("leaf")], json!({ "summary": "leaf" }));
    let grandchild = child.subtree("/g/:id", json!({ "tags": ["g"] }));
    grandchild.put("/", [ok("put")], json!({ "summary": "replace" }));

    let alone = child.routes();
    let joined = root.routes();
    assert_eq!(alone.len(), joined.len());
    for (a, j) in alone.iter().zip(&joined) {
        assert_eq!(a.method, j.method);
        assert_eq!(a.path, j.path);
        assert_eq!(a.doc, j.doc);
    }
    assert_eq!(joined[0].path, "/c/leaf");
    assert_eq!(
        joined[0].doc.to_json(),
        json!({ "tags": ["c"], "x": 1, "security": [{ "k": [] }], "summary": "leaf" })
    );
    assert_eq!(joined[1].path, "/c/g/{id}");
    assert_eq!(joined[0].handler_names(), vec!["outer", "auth", "leaf"]);
    assert_eq!(alone[0].handler_names(), vec!["auth", "leaf"]);
}
