use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use http::{header, Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use trellis::Engine;

fn request(method: Method, uri: &str) -> Request<Bytes> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Bytes::new())
        .unwrap()
}

async fn body_text(response: Response<Full<Bytes>>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn unmatched_path_gets_plaintext_404() {
    let engine = Engine::new();
    let response = engine.dispatch(request(Method::GET, "/nope/nothing"));

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "404 NOT FOUND: /nope/nothing\n");
}

#[tokio::test]
async fn handler_sees_extracted_params() {
    let mut engine = Engine::new();
    engine.get("/hello/:name", |ctx| {
        let name = ctx.param("name").unwrap_or_default().to_owned();
        ctx.string(StatusCode::OK, format!("hello {}", name));
    });

    let response = engine.dispatch(request(Method::GET, "/hello/geektutu"));
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("text/plain; charset=utf-8"),
    );
    assert_eq!(body_text(response).await, "hello geektutu");
}

#[tokio::test]
async fn catch_all_serves_nested_paths() {
    let mut engine = Engine::new();
    engine.get("/assets/*filepath", |ctx| {
        let filepath = ctx.param("filepath").unwrap_or_default().to_owned();
        ctx.string(StatusCode::OK, filepath);
    });

    let response = engine.dispatch(request(Method::GET, "/assets/css/site.css"));
    assert_eq!(body_text(response).await, "css/site.css");
}

#[tokio::test]
async fn methods_are_routed_independently() {
    let mut engine = Engine::new();
    engine.get("/resource", |ctx| ctx.string(StatusCode::OK, "got"));
    engine.post("/resource", |ctx| ctx.string(StatusCode::CREATED, "made"));

    let got = engine.dispatch(request(Method::GET, "/resource"));
    assert_eq!(got.status(), StatusCode::OK);

    let made = engine.dispatch(request(Method::POST, "/resource"));
    assert_eq!(made.status(), StatusCode::CREATED);

    let missing = engine.dispatch(request(Method::DELETE, "/resource"));
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reregistration_replaces_the_handler() {
    let calls = Arc::new(AtomicUsize::new(0));

    let mut engine = Engine::new();
    let first = calls.clone();
    engine.get("/v", move |ctx| {
        first.fetch_add(1, Ordering::SeqCst);
        ctx.string(StatusCode::OK, "first");
    });
    engine.get("/v", |ctx| ctx.string(StatusCode::OK, "second"));

    let response = engine.dispatch(request(Method::GET, "/v"));
    assert_eq!(body_text(response).await, "second");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn query_and_form_reach_the_handler() {
    let mut engine = Engine::new();
    engine.post("/login", |ctx| {
        let user = ctx.post_form("username").unwrap_or_default().to_owned();
        let next = ctx.query("next").unwrap_or("/").to_owned();
        ctx.string(StatusCode::OK, format!("{} -> {}", user, next));
    });

    let request = Request::builder()
        .method(Method::POST)
        .uri("/login?next=/home")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Bytes::from_static(b"username=geektutu&password=1234"))
        .unwrap();

    let response = engine.dispatch(request);
    assert_eq!(body_text(response).await, "geektutu -> /home");
}

#[tokio::test]
async fn json_helper_round_trips() {
    let mut engine = Engine::new();
    engine.get("/whoami/:name", |ctx| {
        let payload = serde_json::json!({
            "name": ctx.param("name"),
            "path": ctx.path(),
        });
        ctx.json(StatusCode::OK, &payload);
    });

    let response = engine.dispatch(request(Method::GET, "/whoami/ferris"));
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("application/json"),
    );

    let decoded: serde_json::Value =
        serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(decoded["name"], "ferris");
    assert_eq!(decoded["path"], "/whoami/ferris");
}
