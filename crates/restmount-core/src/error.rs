//! Error types for Restmount handlers and controller capabilities.
//!
//! [`HandlerError`] is what request handlers return; each variant maps to an
//! HTTP status and is rendered as a JSON envelope. [`CapabilityError`] is
//! what a verb capability returns when it cannot describe its route, which
//! aborts server start.

use bytes::Bytes;
use http::{header, Response, StatusCode};
use serde::Serialize;
use thiserror::Error;

use crate::context::RequestId;

/// Result type for request handlers.
pub type HandlerResult = Result<Response<Bytes>, HandlerError>;

/// Error returned from a request handler.
///
/// # Example
///
/// ```
/// use restmount_core::HandlerError;
///
/// fn find(id: &str) -> Result<(), HandlerError> {
///     Err(HandlerError::not_found(format!("user {id} not found")))
/// }
///
/// assert_eq!(find("7").unwrap_err().status_code(), 404);
/// ```
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Malformed request.
    #[error("Bad request: {message}")]
    BadRequest {
        /// Human-readable error message.
        message: String,
    },

    /// Missing or rejected credentials.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Human-readable error message.
        message: String,
        /// Value for the `WWW-Authenticate` header.
        challenge: Option<String>,
    },

    /// Authenticated but not permitted.
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Human-readable error message.
        message: String,
    },

    /// Resource not found.
    #[error("Not found: {message}")]
    NotFound {
        /// Human-readable error message.
        message: String,
    },

    /// Any other failure.
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl HandlerError {
    /// Creates a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates an unauthorized error without a challenge.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
            challenge: None,
        }
    }

    /// Creates an unauthorized error carrying a `WWW-Authenticate` challenge.
    #[must_use]
    pub fn challenge(message: impl Into<String>, challenge: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
            challenge: Some(challenge.into()),
        }
    }

    /// Creates a forbidden error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates an internal error from a message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(anyhow::anyhow!(message.into()))
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => "BAD_REQUEST",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Renders the error as a JSON error envelope.
    ///
    /// Internal errors never expose their source to the client.
    #[must_use]
    pub fn into_response(self, request_id: Option<RequestId>) -> Response<Bytes> {
        let message = match &self {
            Self::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        let envelope = ErrorEnvelope {
            error: ErrorDetail {
                code: self.code(),
                message,
            },
            request_id: request_id.map(|id| id.to_string()),
        };
        let body = serde_json::to_vec(&envelope).unwrap_or_default();

        let mut response = Response::new(Bytes::from(body));
        *response.status_mut() = self.status_code();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        if let Self::Unauthorized {
            challenge: Some(challenge),
            ..
        } = &self
        {
            if let Ok(value) = header::HeaderValue::from_str(challenge) {
                response.headers_mut().insert(header::WWW_AUTHENTICATE, value);
            }
        }
        response
    }
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

/// Error returned by a verb capability while it describes its route.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CapabilityError {
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

impl CapabilityError {
    /// Creates a capability error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a capability error wrapping an underlying cause.
    pub fn with_source(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(HandlerError::bad_request("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(HandlerError::unauthorized("x").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(HandlerError::forbidden("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(HandlerError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            HandlerError::internal("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_envelope_hides_internal_source() {
        let err = HandlerError::from(anyhow::anyhow!("db password leaked"));
        let response = err.into_response(None);
        let json: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
        assert!(!json.to_string().contains("password"));
    }

    #[test]
    fn test_envelope_carries_request_id_and_challenge() {
        let id = RequestId::new();
        let response =
            HandlerError::challenge("login required", "Basic realm=\"api\"").into_response(Some(id));
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers()[header::WWW_AUTHENTICATE],
            "Basic realm=\"api\""
        );
        let json: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(json["request_id"], id.to_string());
    }

    #[test]
    fn test_capability_error_source() {
        use std::error::Error as _;
        let err = CapabilityError::with_source("bad route", std::io::Error::other("disk"));
        assert_eq!(err.to_string(), "bad route");
        assert!(err.source().is_some());
        assert!(CapabilityError::new("plain").source().is_none());
    }
}
