//! A small server exercising every routing feature: static routes, named
//! wildcards, catch-alls, query strings and form bodies.
//!
//! Run with `cargo run --example basic`, then try:
//!
//! ```sh
//! curl http://127.0.0.1:9999/
//! curl http://127.0.0.1:9999/hello?name=geektutu
//! curl http://127.0.0.1:9999/hello/geektutu
//! curl http://127.0.0.1:9999/assets/css/site.css
//! curl -d 'username=geektutu&password=1234' http://127.0.0.1:9999/login
//! ```

use http::StatusCode;
use trellis::Engine;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let mut app = Engine::new();

    app.get("/", |ctx| {
        ctx.html(StatusCode::OK, "<h1>Hello trellis</h1>");
    });

    app.get("/hello", |ctx| {
        let name = ctx.query("name").unwrap_or("stranger").to_owned();
        let path = ctx.path().to_owned();
        ctx.string(StatusCode::OK, format!("hello {}, you're at {}\n", name, path));
    });

    app.get("/hello/:name", |ctx| {
        let name = ctx.param("name").unwrap_or_default().to_owned();
        let path = ctx.path().to_owned();
        ctx.string(StatusCode::OK, format!("hello {}, you're at {}\n", name, path));
    });

    app.post("/login", |ctx| {
        let payload = serde_json::json!({
            "username": ctx.post_form("username"),
            "password": ctx.post_form("password"),
        });
        ctx.json(StatusCode::OK, &payload);
    });

    app.get("/assets/*filepath", |ctx| {
        let payload = serde_json::json!({ "filepath": ctx.param("filepath") });
        ctx.json(StatusCode::OK, &payload);
    });

    app.run("127.0.0.1:9999").await
}
