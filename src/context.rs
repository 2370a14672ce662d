//! The per-request dispatch context. Created fresh for every request, owned
//! exclusively by the request-handling call stack, and consumed when the
//! response is produced.

use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::request::Parts;
use http::{HeaderMap, Method, Response, StatusCode};
use http_body_util::Full;
use hyper::body::Bytes;
use serde::Serialize;
use url::form_urlencoded;

use crate::params::Params;

const CONTENT_TYPE_TEXT: &str = "text/plain; charset=utf-8";
const CONTENT_TYPE_JSON: &str = "application/json";
const CONTENT_TYPE_HTML: &str = "text/html; charset=utf-8";
const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// Request and response state carried across a single handler invocation.
///
/// The request side exposes the normalized method and path, the parameters
/// extracted by the route match, and decoded query/form values. The response
/// side buffers a status code, headers and a body; the body is written
/// exactly once, by whichever of [`string`](Context::string),
/// [`json`](Context::json), [`data`](Context::data) or
/// [`html`](Context::html) runs first.
pub struct Context {
    method: Method,
    path: String,
    params: Params,
    query: Vec<(String, String)>,
    form: Vec<(String, String)>,

    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    committed: bool,
}

impl Context {
    /// Builds a context from decomposed request parts and the collected body.
    pub fn new(parts: Parts, body: Bytes) -> Context {
        let query = match parts.uri.query() {
            Some(query) => form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
            None => Vec::new(),
        };

        let is_form = parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with(CONTENT_TYPE_FORM));
        let form = if is_form {
            form_urlencoded::parse(&body).into_owned().collect()
        } else {
            Vec::new()
        };

        Context {
            method: parts.method,
            path: parts.uri.path().to_owned(),
            params: Params::new(),
            query,
            form,
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            committed: false,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The value bound to a `:name` or `*name` pattern segment.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Attaches the parameters extracted by the route match. Normally called
    /// by the router before the handler runs; exposed so handlers can be
    /// driven directly in tests.
    pub fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    /// The first query-string value under `key`, if any.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The first urlencoded form value under `key`, if any. Empty unless the
    /// request carried an `application/x-www-form-urlencoded` body.
    pub fn post_form(&self, key: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The response status code as currently set.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, code: StatusCode) {
        self.status = code;
    }

    pub fn set_header(&mut self, key: HeaderName, value: HeaderValue) {
        self.headers.insert(key, value);
    }

    /// Writes a `text/plain` response.
    pub fn string(&mut self, code: StatusCode, body: impl Into<String>) {
        self.set_header(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_TEXT));
        self.write(code, Bytes::from(body.into()));
    }

    /// Serializes `value` and writes an `application/json` response.
    ///
    /// A serialization failure is logged and turned into a plaintext 500.
    pub fn json<T>(&mut self, code: StatusCode, value: &T)
    where
        T: Serialize + ?Sized,
    {
        match serde_json::to_vec(value) {
            Ok(encoded) => {
                self.set_header(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
                self.write(code, Bytes::from(encoded));
            }
            Err(err) => {
                error!("failed to encode json response for {}: {}", self.path, err);
                self.set_header(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_TEXT));
                self.write(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Bytes::from(err.to_string()),
                );
            }
        }
    }

    /// Writes a raw byte response without setting a content type.
    pub fn data(&mut self, code: StatusCode, data: impl Into<Bytes>) {
        self.write(code, data.into());
    }

    /// Writes a `text/html` response.
    pub fn html(&mut self, code: StatusCode, html: impl Into<String>) {
        self.set_header(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_HTML));
        self.write(code, Bytes::from(html.into()));
    }

    // First write wins; the transport contract is one body per request.
    fn write(&mut self, code: StatusCode, body: Bytes) {
        if self.committed {
            warn!("response for {} already written, ignoring", self.path);
            return;
        }
        self.status = code;
        self.body = body;
        self.committed = true;
    }

    pub(crate) fn into_response(self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Request;

    fn context(uri: &str) -> Context {
        let (parts, _) = Request::builder()
            .uri(uri)
            .body(())
            .unwrap()
            .into_parts();
        Context::new(parts, Bytes::new())
    }

    #[test]
    fn query_first_value_wins() {
        let ctx = context("/search?q=rust&q=go&page=2");
        assert_eq!(ctx.query("q"), Some("rust"));
        assert_eq!(ctx.query("page"), Some("2"));
        assert_eq!(ctx.query("missing"), None);
    }

    #[test]
    fn form_requires_content_type() {
        let body = Bytes::from_static(b"username=geektutu&password=1234");

        let (parts, _) = Request::builder()
            .uri("/login")
            .header(CONTENT_TYPE, CONTENT_TYPE_FORM)
            .body(())
            .unwrap()
            .into_parts();
        let ctx = Context::new(parts, body.clone());
        assert_eq!(ctx.post_form("username"), Some("geektutu"));
        assert_eq!(ctx.post_form("password"), Some("1234"));

        let (parts, _) = Request::builder().uri("/login").body(()).unwrap().into_parts();
        let ctx = Context::new(parts, body);
        assert_eq!(ctx.post_form("username"), None);
    }

    #[test]
    fn first_body_write_wins() {
        let mut ctx = context("/once");
        ctx.string(StatusCode::OK, "first");
        ctx.string(StatusCode::INTERNAL_SERVER_ERROR, "second");

        assert_eq!(ctx.status(), StatusCode::OK);
        assert_eq!(ctx.body, Bytes::from_static(b"first"));
    }

    #[test]
    fn json_sets_content_type() {
        let mut ctx = context("/json");
        ctx.json(StatusCode::OK, &serde_json::json!({ "ok": true }));

        assert_eq!(ctx.status(), StatusCode::OK);
        assert_eq!(
            ctx.headers.get(CONTENT_TYPE).unwrap(),
            CONTENT_TYPE_JSON
        );
        let decoded: serde_json::Value = serde_json::from_slice(&ctx.body).unwrap();
        assert_eq!(decoded["ok"], true);
    }

    #[test]
    fn html_and_data_bodies() {
        let mut ctx = context("/page");
        ctx.html(StatusCode::OK, "<h1>hi</h1>");
        assert_eq!(ctx.headers.get(CONTENT_TYPE).unwrap(), CONTENT_TYPE_HTML);

        let mut ctx = context("/blob");
        ctx.data(StatusCode::OK, vec![1u8, 2, 3]);
        assert!(ctx.headers.get(CONTENT_TYPE).is_none());
        assert_eq!(ctx.body, Bytes::from_static(&[1, 2, 3]));
    }

    #[test]
    fn response_carries_status_and_headers() {
        let mut ctx = context("/r");
        ctx.string(StatusCode::CREATED, "made");
        let response = ctx.into_response();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            CONTENT_TYPE_TEXT
        );
    }
}
