//! A minimal web framework built around a trie-based request router.
//!
//! Routes are registered as `/`-separated patterns. A pattern segment may be:
//!
//! ```ignore
//!  Syntax    Type
//!  :name     named wildcard, matches exactly one path segment
//!  *name     catch-all, matches the rest of the path
//! ```
//!
//! Named wildcards bind the matched segment under `name`; catch-alls bind the
//! `/`-joined remainder of the path and must be the last segment of a pattern.
//!
//! ```rust,no_run
//! use http::StatusCode;
//! use trellis::Engine;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let mut app = Engine::new();
//!
//!     app.get("/hello/:name", |ctx| {
//!         let name = ctx.param("name").unwrap_or("world").to_owned();
//!         ctx.string(StatusCode::OK, format!("hello {}\n", name));
//!     });
//!
//!     app.get("/assets/*filepath", |ctx| {
//!         let path = ctx.param("filepath").unwrap_or("").to_owned();
//!         ctx.string(StatusCode::OK, format!("would serve {}\n", path));
//!     });
//!
//!     app.run("127.0.0.1:9999").await
//! }
//! ```
//!
//! Handlers receive a mutable [`Context`] holding the request fields, the
//! extracted parameters and the response builder. The route table is built
//! during startup and treated as read-only once serving begins; it is shared
//! across connections without locks.

#![deny(clippy::all)]
#![forbid(unsafe_code)]

pub mod context;
pub mod engine;
pub mod error;
pub mod params;
pub mod router;
mod tree;

#[macro_use]
extern crate log;

pub use context::Context;
pub use engine::Engine;
pub use error::MatchError;
pub use params::Params;
pub use router::{HandlerFunc, RouteMatch, Router};
