//! Built-in controller serving the API document.

use http::StatusCode;
use restmount_core::{
    handler, response, CapabilityResult, Context, Controller, HandlerError, HandlerResult, Method,
    MethodSet, Route,
};

const APPLICATION_JSON: &str = "application/json";

/// Serves the frozen API document as JSON on GET.
///
/// The route needs no authorization and is not permission-checked. Register
/// it like any other controller, usually hidden so the document does not
/// describe itself:
///
/// ```rust,ignore
/// server
///     .register(ApiDocsController)
///     .set_path("/")
///     .set_name("swagger.json")
///     .hide();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiDocsController;

impl Controller for ApiDocsController {
    fn methods(&self) -> MethodSet {
        MethodSet::from([Method::Get])
    }

    fn get(&self, route: &mut Route) -> CapabilityResult {
        route
            .set_handler(handler(serve_document))
            .clear_security()
            .set_permission(false)
            .set_summary("API document")
            .produces([APPLICATION_JSON]);
        Ok(())
    }
}

fn serve_document(ctx: &mut Context) -> HandlerResult {
    let document = ctx
        .document()
        .ok_or_else(|| HandlerError::not_found("API document is not available"))?;
    let body = document.to_json().map_err(anyhow::Error::from)?;
    response::bytes(StatusCode::OK, APPLICATION_JSON, body)
}
