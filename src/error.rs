use std::fmt;

/// A failed match attempt.
///
/// Both variants surface to clients as a plain 404; the distinction only
/// matters to callers of [`Router::resolve`](crate::Router::resolve).
///
/// ```
/// use http::Method;
/// use trellis::{MatchError, Router};
///
/// let mut router = Router::new();
/// router.add_route(Method::GET, "/home", |_ctx| {});
///
/// assert_eq!(
///     router.resolve(&Method::GET, "/foobar").unwrap_err(),
///     MatchError::NoMatchingPattern,
/// );
/// assert_eq!(
///     router.resolve(&Method::POST, "/home").unwrap_err(),
///     MatchError::NoRouteForMethod,
/// );
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MatchError {
    /// No route at all is registered for the request method.
    NoRouteForMethod,
    /// Routes exist for the method, but none matches the path.
    NoMatchingPattern,
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::NoRouteForMethod => write!(f, "no routes registered for method"),
            MatchError::NoMatchingPattern => write!(f, "no registered pattern matches the path"),
        }
    }
}

impl std::error::Error for MatchError {}
