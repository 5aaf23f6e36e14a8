//! Request context types.
//!
//! A [`Context`] is built by the external server for every matched request
//! and handed to the route's handler after the registrar's wrapper has
//! attached the request id, the API document and the caller identity.

use bytes::Bytes;
use http::{HeaderMap, Request};
use indexmap::IndexMap;
use restmount_docs::ApiDocument;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::HandlerError;
use crate::identity::Identity;

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which keeps log lines for one request sortable.
///
/// # Example
///
/// ```
/// use restmount_core::RequestId;
///
/// let id = RequestId::new();
/// println!("Request ID: {}", id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Path parameters extracted by the external server, in path order.
pub type PathParams = IndexMap<String, String>;

/// Per-request state passed to handlers.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use restmount_core::Context;
///
/// let request = http::Request::builder()
///     .uri("/users/7?expand=true")
///     .body(Bytes::new())
///     .unwrap();
/// let mut ctx = Context::new(request);
/// ctx.set_param("id", "7");
///
/// assert_eq!(ctx.param("id"), Some("7"));
/// assert_eq!(ctx.query("expand").as_deref(), Some("true"));
/// ```
#[derive(Debug)]
pub struct Context {
    request: Request<Bytes>,
    params: PathParams,
    request_id: RequestId,
    identity: Option<Identity>,
    document: Option<ApiDocument>,
}

impl Context {
    /// Creates a context with a fresh request id.
    #[must_use]
    pub fn new(request: Request<Bytes>) -> Self {
        Self {
            request,
            params: PathParams::new(),
            request_id: RequestId::new(),
            identity: None,
            document: None,
        }
    }

    /// Creates a context with already extracted path parameters.
    #[must_use]
    pub fn with_params(request: Request<Bytes>, params: PathParams) -> Self {
        Self {
            params,
            ..Self::new(request)
        }
    }

    /// Returns the request.
    #[must_use]
    pub const fn request(&self) -> &Request<Bytes> {
        &self.request
    }

    /// Returns the request method.
    #[must_use]
    pub fn method(&self) -> &http::Method {
        self.request.method()
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        self.request.uri().path()
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.request.headers()
    }

    /// Returns a header value if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.request
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
    }

    /// Returns the first decoded value of a query parameter.
    #[must_use]
    pub fn query(&self, name: &str) -> Option<String> {
        let query = self.request.uri().query()?;
        query.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = urlencoding::decode(key).ok()?;
            if key != name {
                return None;
            }
            urlencoding::decode(&value.replace('+', " "))
                .ok()
                .map(|v| v.into_owned())
        })
    }

    /// Returns a path parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Returns all path parameters.
    #[must_use]
    pub const fn params(&self) -> &PathParams {
        &self.params
    }

    /// Sets a path parameter.
    pub fn set_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.insert(name.into(), value.into());
    }

    /// Returns the raw request body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        self.request.body()
    }

    /// Deserializes the request body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HandlerError> {
        serde_json::from_slice(self.request.body())
            .map_err(|e| HandlerError::bad_request(format!("invalid JSON body: {e}")))
    }

    /// Returns the request id.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the authenticated caller, if any.
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Sets the authenticated caller.
    pub fn set_identity(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    /// Returns the frozen API document.
    #[must_use]
    pub const fn document(&self) -> Option<&ApiDocument> {
        self.document.as_ref()
    }

    /// Attaches the frozen API document.
    pub fn set_document(&mut self, document: ApiDocument) {
        self.document = Some(document);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(uri: &str, body: &'static str) -> Request<Bytes> {
        Request::builder()
            .uri(uri)
            .header("x-token", "abc")
            .body(Bytes::from_static(body.as_bytes()))
            .unwrap()
    }

    #[test]
    fn test_request_id_uniqueness() {
        assert_ne!(RequestId::new(), RequestId::new());
    }

    #[test]
    fn test_query_decoding() {
        let ctx = Context::new(request("/s?q=hello+world&name=a%2Fb&flag", ""));
        assert_eq!(ctx.query("q").as_deref(), Some("hello world"));
        assert_eq!(ctx.query("name").as_deref(), Some("a/b"));
        assert_eq!(ctx.query("flag").as_deref(), Some(""));
        assert_eq!(ctx.query("missing"), None);
    }

    #[test]
    fn test_header_and_path() {
        let ctx = Context::new(request("/users/7", ""));
        assert_eq!(ctx.header("x-token"), Some("abc"));
        assert_eq!(ctx.path(), "/users/7");
        assert!(ctx.identity().is_none());
        assert!(ctx.document().is_none());
    }

    #[test]
    fn test_json_body() {
        #[derive(Deserialize)]
        struct Payload {
            name: String,
        }

        let ctx = Context::new(request("/", r#"{"name":"ada"}"#));
        assert_eq!(ctx.json::<Payload>().unwrap().name, "ada");

        let bad = Context::new(request("/", "{"));
        let err = bad.json::<Payload>().err().unwrap();
        assert_eq!(err.status_code(), http::StatusCode::BAD_REQUEST);
    }
}
