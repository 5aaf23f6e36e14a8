//! Test error types.

use std::fmt;

use restmount_core::Method;

/// Errors that can occur during testing.
#[derive(Debug)]
pub enum TestError {
    /// Request building failed
    RequestBuild(String),
    /// Response body reading failed
    BodyRead(String),
    /// JSON serialization/deserialization failed
    Json(serde_json::Error),
    /// No binding matches the request
    NoRoute {
        /// Request method
        method: String,
        /// Request path
        path: String,
    },
    /// The request method is not one Restmount binds
    UnsupportedMethod(String),
}

impl TestError {
    pub(crate) fn no_route(method: Method, path: &str) -> Self {
        Self::NoRoute {
            method: method.to_string(),
            path: path.to_string(),
        }
    }
}

impl fmt::Display for TestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestBuild(msg) => write!(f, "Request build error: {msg}"),
            Self::BodyRead(msg) => write!(f, "Body read error: {msg}"),
            Self::Json(e) => write!(f, "JSON error: {e}"),
            Self::NoRoute { method, path } => write!(f, "No route for {method} {path}"),
            Self::UnsupportedMethod(method) => write!(f, "Unsupported method: {method}"),
        }
    }
}

impl std::error::Error for TestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TestError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
