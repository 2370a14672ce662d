//! The route table: one trie per HTTP method for matching, plus a flat
//! `"METHOD-pattern"` map that is the single source of truth for which
//! handler runs. The trie resolves a concrete path to the pattern it was
//! registered under; the handler is then fetched under that pattern, which is
//! what lets one handler serve infinitely many concrete paths.

use std::collections::HashMap;
use std::fmt;

use http::{Method, StatusCode};

use crate::context::Context;
use crate::error::MatchError;
use crate::params::Params;
use crate::tree::{parse_pattern, Node};

/// A registered request handler.
///
/// Handlers run with exclusive access to the per-request [`Context`] and are
/// solely responsible for producing the response.
pub type HandlerFunc = Box<dyn Fn(&mut Context) + Send + Sync>;

fn route_key(method: &Method, pattern: &str) -> String {
    format!("{}-{}", method, pattern)
}

/// A successful route resolution.
pub struct RouteMatch<'r> {
    /// The pattern the route was registered under, as stored (not resolved).
    pub pattern: &'r str,
    /// Parameters bound by `:name` and `*name` segments.
    pub params: Params,
    /// The handler registered for the matched pattern.
    pub handler: &'r HandlerFunc,
}

impl fmt::Debug for RouteMatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("pattern", &self.pattern)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Dispatches requests to handlers via registered route patterns.
///
/// The table is built during startup and is logically read-only once serving
/// begins; it may be shared freely across concurrent dispatches.
#[derive(Default)]
pub struct Router {
    roots: HashMap<Method, Node>,
    handlers: HashMap<String, HandlerFunc>,
}

impl Router {
    pub fn new() -> Router {
        Router::default()
    }

    /// Registers `handler` for `method` and `pattern`.
    ///
    /// Pattern syntax is not validated beyond segment classification.
    /// Registering the same (method, pattern) pair again silently replaces
    /// the previous handler.
    pub fn add_route<F>(&mut self, method: Method, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        debug!("route registered: {} {}", method, pattern);

        let parts = parse_pattern(pattern);
        let key = route_key(&method, pattern);
        self.roots
            .entry(method)
            .or_default()
            .insert(pattern, &parts, 0);
        self.handlers.insert(key, Box::new(handler));
    }

    /// Resolves a concrete (method, path) pair to the matching route.
    ///
    /// Parameters are extracted by replaying the matched pattern's segments
    /// against the path: a `:name` segment binds the segment at its index, a
    /// `*name` segment binds the `/`-joined remainder.
    ///
    /// # Panics
    ///
    /// Panics if a pattern matched in the trie but no handler is registered
    /// for it. The two structures are only ever updated together by
    /// [`add_route`](Router::add_route), so this indicates a corrupted table.
    pub fn resolve(&self, method: &Method, path: &str) -> Result<RouteMatch<'_>, MatchError> {
        let root = self.roots.get(method).ok_or(MatchError::NoRouteForMethod)?;

        let search_parts = parse_pattern(path);
        let pattern = root
            .search(&search_parts, 0)
            .and_then(Node::pattern)
            .ok_or(MatchError::NoMatchingPattern)?;

        let mut params = Params::new();
        for (idx, part) in parse_pattern(pattern).iter().enumerate() {
            if let Some(name) = part.strip_prefix(':') {
                params.push(name, search_parts[idx]);
            } else if let Some(name) = part.strip_prefix('*') {
                params.push(name, &search_parts[idx..].join("/"));
                break;
            }
        }

        let handler = self
            .handlers
            .get(&route_key(method, pattern))
            .unwrap_or_else(|| {
                panic!(
                    "route {} {} matched but has no handler; the route table is corrupted",
                    method, pattern
                )
            });

        Ok(RouteMatch {
            pattern,
            params,
            handler,
        })
    }

    /// Resolves the request held by `ctx` and invokes the matched handler,
    /// falling back to a plaintext 404 naming the unmatched path.
    pub(crate) fn dispatch(&self, ctx: &mut Context) {
        match self.resolve(ctx.method(), ctx.path()) {
            Ok(matched) => {
                ctx.set_params(matched.params);
                (matched.handler)(ctx);
            }
            Err(err) => {
                let path = ctx.path().to_owned();
                debug!("{} {}: {}", ctx.method(), path, err);
                ctx.string(StatusCode::NOT_FOUND, format!("404 NOT FOUND: {}\n", path));
            }
        }
    }
}
