//! Request handlers and response helpers.
//!
//! A [`Handler`] is a shared, type-erased function from a mutable
//! [`Context`] to a response. The same handler value is bound once per
//! path variant of a route, so it is reference counted.

use std::sync::Arc;

use bytes::Bytes;
use http::{header, Response, StatusCode};
use serde::Serialize;

use crate::context::Context;
use crate::error::{HandlerError, HandlerResult};

/// A type-erased request handler.
pub type Handler = Arc<dyn Fn(&mut Context) -> HandlerResult + Send + Sync>;

/// Wraps a closure or function as a [`Handler`].
///
/// ```rust
/// use restmount_core::{handler, response, Context};
///
/// let h = handler(|ctx: &mut Context| response::text(ctx.path().to_string()));
/// # let _ = h;
/// ```
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&mut Context) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Response constructors for handlers.
pub mod response {
    use super::{header, Bytes, HandlerError, HandlerResult, Response, Serialize, StatusCode};

    /// A response with only a status.
    pub fn status(status: StatusCode) -> HandlerResult {
        let mut response = Response::new(Bytes::new());
        *response.status_mut() = status;
        Ok(response)
    }

    /// A `200 OK` plain text response.
    pub fn text(body: impl Into<String>) -> HandlerResult {
        bytes(StatusCode::OK, "text/plain; charset=utf-8", body.into())
    }

    /// A `200 OK` JSON response.
    pub fn json<T: Serialize>(value: &T) -> HandlerResult {
        json_with_status(StatusCode::OK, value)
    }

    /// A JSON response with the given status.
    pub fn json_with_status<T: Serialize>(status: StatusCode, value: &T) -> HandlerResult {
        let body = serde_json::to_vec(value).map_err(anyhow::Error::from)?;
        bytes(status, "application/json", body)
    }

    /// A response with a raw body and content type.
    pub fn bytes(
        status: StatusCode,
        content_type: &'static str,
        body: impl Into<Bytes>,
    ) -> HandlerResult {
        let mut response = Response::new(body.into());
        *response.status_mut() = status;
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static(content_type),
        );
        Ok(response)
    }

    /// Builds an error response directly.
    pub fn error(err: HandlerError) -> HandlerResult {
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> Context {
        Context::new(http::Request::new(Bytes::new()))
    }

    #[test]
    fn test_handler_invocation() {
        let h = handler(|ctx: &mut Context| {
            ctx.set_param("seen", "yes");
            response::status(StatusCode::NO_CONTENT)
        });
        let mut ctx = ctx();
        let response = h(&mut ctx).unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(ctx.param("seen"), Some("yes"));
    }

    #[test]
    fn test_json_response() {
        let response = response::json(&serde_json::json!({ "ok": true })).unwrap();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(response.body().as_ref(), br#"{"ok":true}"#);
    }

    #[test]
    fn test_error_propagates() {
        let h = handler(|_| response::error(HandlerError::not_found("nothing")));
        let err = h(&mut ctx()).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
