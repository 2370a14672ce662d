//! The engine: registration surface and request entry point, plus the
//! listen-and-serve binding to hyper.

use std::io;
use std::sync::Arc;

use http::{Method, Request, Response};
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use crate::context::Context;
use crate::router::Router;

/// The application: owns the route table and drives dispatch.
///
/// Register all routes before calling [`run`](Engine::run); the route table
/// carries no synchronization and is shared read-only across connections once
/// serving starts.
#[derive(Default)]
pub struct Engine {
    router: Router,
}

impl Engine {
    pub fn new() -> Engine {
        Engine::default()
    }

    /// Registers `handler` for any HTTP method.
    ///
    /// Ambiguous siblings (a static and a wildcard segment at the same
    /// position) are tried in registration order, so register the more
    /// specific pattern first to give it precedence.
    pub fn add_route<F>(&mut self, method: Method, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.router.add_route(method, pattern, handler);
    }

    /// Registers a handler for GET requests.
    pub fn get<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::GET, pattern, handler);
    }

    /// Registers a handler for POST requests.
    pub fn post<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::POST, pattern, handler);
    }

    /// Registers a handler for PUT requests.
    pub fn put<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::PUT, pattern, handler);
    }

    /// Registers a handler for PATCH requests.
    pub fn patch<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::PATCH, pattern, handler);
    }

    /// Registers a handler for DELETE requests.
    pub fn delete<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::DELETE, pattern, handler);
    }

    /// Registers a handler for HEAD requests.
    pub fn head<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::HEAD, pattern, handler);
    }

    /// Registers a handler for OPTIONS requests.
    pub fn options<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::OPTIONS, pattern, handler);
    }

    /// Dispatches one request and produces its response.
    ///
    /// This is the transport-independent seam: a context is built from the
    /// request, the router resolves and invokes the handler (or writes the
    /// 404 fallback), and the context is consumed into the response.
    pub fn dispatch(&self, request: Request<Bytes>) -> Response<Full<Bytes>> {
        let (parts, body) = request.into_parts();
        let mut ctx = Context::new(parts, body);
        self.router.dispatch(&mut ctx);
        ctx.into_response()
    }

    /// Binds `addr` and serves requests until the process exits.
    ///
    /// Each connection runs on its own tokio task; connection-level errors
    /// are logged and do not take the listener down.
    pub async fn run(self, addr: &str) -> io::Result<()> {
        let listener = TcpListener::bind(addr).await?;
        info!("listening on {}", listener.local_addr()?);

        let engine = Arc::new(self);
        loop {
            let (stream, remote) = listener.accept().await?;
            let engine = engine.clone();

            tokio::task::spawn(async move {
                let service = service_fn(move |request: Request<Incoming>| {
                    let engine = engine.clone();
                    async move {
                        let (parts, body) = request.into_parts();
                        let body = body.collect().await?.to_bytes();
                        Ok::<_, hyper::Error>(engine.dispatch(Request::from_parts(parts, body)))
                    }
                });

                if let Err(err) = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await
                {
                    error!("error serving connection from {}: {:?}", remote, err);
                }
            });
        }
    }
}
