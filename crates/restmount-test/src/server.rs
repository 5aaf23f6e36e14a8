//! Recording web server.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use http::Request;
use restmount_core::{Context, Handler, Method, PathParams};
use restmount_server::{BackendError, WebServer};

use crate::error::TestError;
use crate::response::TestResponse;

/// A route pushed to the web server.
#[derive(Clone)]
pub struct Binding {
    /// Bound verb.
    pub method: Method,
    /// Path in `:name` parameter syntax.
    pub path: String,
    /// Finalized handler.
    pub handler: Handler,
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("method", &self.method)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// How the server was started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listener {
    /// Listen address.
    pub addr: String,
    /// Certificate and key, for TLS.
    pub tls: Option<(PathBuf, PathBuf)>,
}

/// In-memory [`WebServer`] that records everything it is asked to do.
///
/// Parameters are converted to `:name` tokens. Requests can be dispatched
/// to recorded bindings without any network I/O.
///
/// # Example
///
/// ```
/// use restmount_server::WebServer;
/// use restmount_test::RecordingServer;
///
/// let server = RecordingServer::new();
/// assert_eq!(server.convert_param("id"), ":id");
/// ```
#[derive(Debug, Default)]
pub struct RecordingServer {
    bindings: Vec<Binding>,
    statics: Vec<(String, PathBuf)>,
    listener: Option<Listener>,
    stops: usize,
    reject_paths: Vec<String>,
    start_failure: Option<String>,
}

impl RecordingServer {
    /// Creates an empty server.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes [`add`](WebServer::add) fail for `path`.
    #[must_use]
    pub fn reject_path(mut self, path: impl Into<String>) -> Self {
        self.reject_paths.push(path.into());
        self
    }

    /// Makes `start` and `start_tls` fail with `message`.
    #[must_use]
    pub fn fail_start(mut self, message: impl Into<String>) -> Self {
        self.start_failure = Some(message.into());
        self
    }

    /// Recorded bindings, in registration order.
    #[must_use]
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Recorded `(method, path)` pairs.
    #[must_use]
    pub fn routes(&self) -> Vec<(Method, &str)> {
        self.bindings
            .iter()
            .map(|b| (b.method, b.path.as_str()))
            .collect()
    }

    /// Static mounts.
    #[must_use]
    pub fn statics(&self) -> &[(String, PathBuf)] {
        &self.statics
    }

    /// Current listener, if started.
    #[must_use]
    pub const fn listener(&self) -> Option<&Listener> {
        self.listener.as_ref()
    }

    /// Number of `stop` calls.
    #[must_use]
    pub const fn stops(&self) -> usize {
        self.stops
    }

    /// Dispatches `request` to the first binding matching its method and
    /// path.
    ///
    /// Handler errors are rendered the way a web server would render them.
    ///
    /// # Errors
    ///
    /// Returns an error if no binding matches or the method is unknown.
    pub fn dispatch(&self, request: Request<Bytes>) -> Result<TestResponse, TestError> {
        let method = Method::try_from(request.method())
            .map_err(|_| TestError::UnsupportedMethod(request.method().to_string()))?;
        let path = request.uri().path().to_string();

        let (binding, params) = self
            .bindings
            .iter()
            .filter(|b| b.method == method)
            .find_map(|b| match_path(&b.path, &path).map(|params| (b, params)))
            .ok_or_else(|| TestError::no_route(method, &path))?;

        let mut ctx = Context::with_params(request, params);
        let response = match (binding.handler)(&mut ctx) {
            Ok(response) => response,
            Err(err) => err.into_response(Some(ctx.request_id())),
        };
        Ok(TestResponse::from_http(response))
    }
}

impl WebServer for RecordingServer {
    type App = Self;

    fn start(&mut self, addr: &str) -> Result<(), BackendError> {
        if let Some(message) = &self.start_failure {
            return Err(BackendError::Listen {
                addr: addr.to_string(),
                message: message.clone(),
            });
        }
        self.listener = Some(Listener {
            addr: addr.to_string(),
            tls: None,
        });
        Ok(())
    }

    fn start_tls(&mut self, addr: &str, cert: &Path, key: &Path) -> Result<(), BackendError> {
        self.start(addr)?;
        if let Some(listener) = self.listener.as_mut() {
            listener.tls = Some((cert.to_path_buf(), key.to_path_buf()));
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), BackendError> {
        self.stops += 1;
        self.listener = None;
        Ok(())
    }

    fn mount_static(&mut self, prefix: &str, root: &Path) {
        self.statics.push((prefix.to_string(), root.to_path_buf()));
    }

    fn add(&mut self, method: Method, path: &str, handler: Handler) -> Result<(), BackendError> {
        if self.reject_paths.iter().any(|p| p == path) {
            return Err(BackendError::Route(format!("{method} {path} rejected")));
        }
        self.bindings.push(Binding {
            method,
            path: path.to_string(),
            handler,
        });
        Ok(())
    }

    fn convert_param(&self, name: &str) -> String {
        format!(":{name}")
    }

    fn app(&self) -> &Self::App {
        self
    }
}

// A pattern segment `prefix:name` captures the rest of the request segment
// after `prefix`.
fn match_path(pattern: &str, path: &str) -> Option<PathParams> {
    let pattern_segments: Vec<&str> = pattern.trim_end_matches('/').split('/').collect();
    let path_segments: Vec<&str> = path.trim_end_matches('/').split('/').collect();
    if pattern_segments.len() != path_segments.len() {
        return None;
    }

    let mut params = PathParams::new();
    for (expected, actual) in pattern_segments.iter().zip(&path_segments) {
        match expected.split_once(':') {
            Some((prefix, name)) => {
                let value = actual.strip_prefix(prefix).filter(|v| !v.is_empty())?;
                let decoded = urlencoding::decode(value).ok()?;
                params.insert(name.to_string(), decoded.into_owned());
            }
            None if expected == actual => {}
            None => return None,
        }
    }
    Some(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_path() {
        let params = match_path("/users/:id", "/users/42").unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("42"));
        assert!(match_path("/users/:id", "/users").is_none());
        assert!(match_path("/users", "/accounts").is_none());
        assert!(match_path("/", "/").unwrap().is_empty());
    }

    #[test]
    fn test_match_path_with_segment_prefix() {
        let params = match_path("/files/v:version", "/files/v3").unwrap();
        assert_eq!(params["version"], "3");
        assert!(match_path("/files/v:version", "/files/x3").is_none());
    }

    #[test]
    fn test_match_path_decodes() {
        let params = match_path("/tags/:name", "/tags/a%20b").unwrap();
        assert_eq!(params["name"], "a b");
    }
}
