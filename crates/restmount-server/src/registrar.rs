//! Turns controllers into web server bindings and document entries.
//!
//! Registration runs once, single-threaded, before the server listens.
//! Bindings already pushed to the web server stay there when a later step
//! fails; there is no rollback.

use std::sync::{Arc, OnceLock};

use restmount_core::{
    describe, path, Context, Controller, Handler, HandlerResult, Method, ResolvedController,
    Route,
};
use restmount_docs::{ApiDocument, DocumentBuilder, Parameter};

use crate::auth::Guard;
use crate::backend::WebServer;
use crate::config::ServerConfig;
use crate::error::RegistrationError;

/// Holds the frozen document once `start` has built it.
///
/// Handlers are created before the document is frozen, so they capture the
/// slot and read it per request.
#[derive(Debug, Clone, Default)]
pub(crate) struct DocumentSlot(Arc<OnceLock<ApiDocument>>);

impl DocumentSlot {
    pub(crate) fn fill(&self, document: ApiDocument) {
        if self.0.set(document).is_err() {
            tracing::warn!("API document was already frozen");
        }
    }

    pub(crate) fn get(&self) -> Option<&ApiDocument> {
        self.0.get()
    }
}

pub(crate) struct Registrar<'a, W: WebServer> {
    pub(crate) config: &'a ServerConfig,
    pub(crate) docs: &'a mut DocumentBuilder,
    pub(crate) backend: &'a mut W,
    pub(crate) slot: &'a DocumentSlot,
}

impl<W: WebServer> Registrar<'_, W> {
    /// Registers every verb `controller` implements, in fixed verb order.
    pub(crate) fn register(
        &mut self,
        resolved: &ResolvedController,
        controller: &dyn Controller,
    ) -> Result<(), RegistrationError> {
        for method in controller.methods().iter() {
            let mut route = self.new_route();
            describe(controller, method, &mut route).map_err(|source| {
                RegistrationError::Capability {
                    controller: resolved.name.clone(),
                    method,
                    source,
                }
            })?;
            self.add(resolved, method, route)?;
        }
        Ok(())
    }

    fn new_route(&self) -> Route {
        let mut route = Route::new();
        if let Some(permission) = self.config.permission() {
            route.set_permission(permission.applies_to_all_routes());
        }
        if let Some(scheme) = self.config.authorization().global_scheme() {
            route.set_security(scheme);
        }
        route
    }

    fn add(
        &mut self,
        resolved: &ResolvedController,
        method: Method,
        mut route: Route,
    ) -> Result<(), RegistrationError> {
        let Some(inner) = route.handler().cloned() else {
            tracing::debug!(controller = %resolved.name, %method, "no handler, verb skipped");
            return Ok(());
        };

        let variants = route.variants();
        let schemes: Vec<_> = route.schemes().collect();
        let authorization = self.config.authorization();
        for scheme in &schemes {
            if !authorization.is_configured(*scheme) {
                tracing::warn!(
                    controller = %resolved.name,
                    %method,
                    %scheme,
                    "route requires an authorization scheme with no verifier"
                );
            }
            self.docs
                .set_security_definition(scheme.as_str(), authorization.definition(*scheme));
        }

        for suffix in resolved.suffixes.iter().filter(|s| !s.is_parameter()) {
            route.add_parameter(Parameter::path(suffix.value(), true, suffix.description()));
        }
        route.operation_mut().add_tag(&resolved.tag.name);

        let guard = Guard {
            authorization: authorization.clone(),
            schemes,
            permission: self
                .config
                .permission()
                .filter(|_| route.requires_permission())
                .cloned(),
        };
        let handler = finalize(inner, guard, self.slot.clone());

        for variant in variants {
            let full = path::join([resolved.path.as_str(), variant.as_str()]);

            let (under_base, base_len) = self.docs.compare_base_path(&full);
            if under_base && resolved.visible && (!variant.is_empty() || !route.accepts_empty()) {
                let relative = &full[base_len..];
                let key = if relative.starts_with('/') {
                    relative.to_string()
                } else {
                    format!("/{relative}")
                };
                self.docs
                    .set_path(key, method.doc_key(), route.operation().clone());
            }

            let bound = path::translate(&full, |name| self.backend.convert_param(name));
            tracing::debug!(%method, path = %bound, "binding route");
            self.backend
                .add(method, &bound, Arc::clone(&handler))
                .map_err(|source| RegistrationError::Binding {
                    method,
                    path: bound,
                    source,
                })?;
        }
        Ok(())
    }
}

/// Wraps a user handler with the request span, document attachment and
/// the route's authorization checks.
fn finalize(inner: Handler, guard: Guard, slot: DocumentSlot) -> Handler {
    Arc::new(move |ctx: &mut Context| -> HandlerResult {
        let span = tracing::info_span!(
            "request",
            request_id = %ctx.request_id(),
            method = %ctx.method(),
            path = %ctx.path(),
        );
        let _entered = span.enter();

        if let Some(document) = slot.get() {
            ctx.set_document(document.clone());
        }
        if let Err(err) = guard.check(ctx) {
            return guard.authorization.reject(ctx, err);
        }
        inner(ctx)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Authorization, BasicAuth, Permission};
    use crate::testing::StubServer;
    use bytes::Bytes;
    use http::{Request, StatusCode};
    use restmount_core::{
        handler, response, AuthScheme, CapabilityError, CapabilityResult, MethodSet,
        RegisteredController, Suffix,
    };

    struct Items;

    impl Controller for Items {
        fn methods(&self) -> MethodSet {
            MethodSet::from([Method::Get, Method::Post, Method::Delete])
        }

        fn get(&self, route: &mut Route) -> CapabilityResult {
            route
                .set_handler(handler(|ctx| response::text(ctx.param("id").unwrap_or("all").to_string())))
                .path_param("id", "Item id")
                .empty_param();
            Ok(())
        }

        fn post(&self, route: &mut Route) -> CapabilityResult {
            route.set_handler(handler(|_| response::status(StatusCode::CREATED)));
            Ok(())
        }

        // Declared but leaves the handler unset.
        fn delete(&self, _route: &mut Route) -> CapabilityResult {
            Ok(())
        }
    }

    struct Broken;

    impl Controller for Broken {
        fn methods(&self) -> MethodSet {
            MethodSet::from([Method::Get, Method::Put])
        }

        fn get(&self, route: &mut Route) -> CapabilityResult {
            route.set_handler(handler(|_| response::text("ok")));
            Ok(())
        }

        fn put(&self, _route: &mut Route) -> CapabilityResult {
            Err(CapabilityError::new("model not registered"))
        }
    }

    fn run(
        config: &ServerConfig,
        docs: &mut DocumentBuilder,
        backend: &mut StubServer,
        controller: &RegisteredController,
    ) -> Result<(), RegistrationError> {
        let slot = DocumentSlot::default();
        let resolved = controller.resolve(docs.base_path());
        Registrar {
            config,
            docs,
            backend,
            slot: &slot,
        }
        .register(&resolved, controller.controller())
    }

    fn request(uri: &str) -> Context {
        Context::new(Request::builder().uri(uri).body(Bytes::new()).unwrap())
    }

    #[test]
    fn test_verbs_and_variants() {
        let config = ServerConfig::default();
        let mut docs = DocumentBuilder::new();
        let mut backend = StubServer::default();
        let mut controller = RegisteredController::new(Items);
        controller.set_path("/shop");

        run(&config, &mut docs, &mut backend, &controller).unwrap();

        assert_eq!(
            backend.bindings(),
            vec![
                (Method::Get, "/shop/items/:id"),
                (Method::Get, "/shop/items"),
                (Method::Post, "/shop/items"),
            ]
        );

        let doc = docs.freeze();
        assert_eq!(doc.paths.len(), 2);
        assert!(doc.paths["/shop/items/{id}"].contains_key("get"));
        // The bare GET variant is an empty_param alias and stays undocumented.
        assert!(!doc.paths["/shop/items"].contains_key("get"));
        assert!(doc.paths["/shop/items"].contains_key("post"));
        assert_eq!(doc.paths["/shop/items"]["post"].tags, vec!["shop/items".to_string()]);
    }

    #[test]
    fn test_capability_error_keeps_earlier_bindings() {
        let config = ServerConfig::default();
        let mut docs = DocumentBuilder::new();
        let mut backend = StubServer::default();
        let controller = RegisteredController::new(Broken);

        let err = run(&config, &mut docs, &mut backend, &controller).unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::Capability { method: Method::Put, .. }
        ));
        assert_eq!(backend.bindings(), vec![(Method::Get, "/broken")]);
    }

    #[test]
    fn test_backend_rejection() {
        let config = ServerConfig::default();
        let mut docs = DocumentBuilder::new();
        let mut backend = StubServer {
            reject: Some("/broken".to_string()),
            ..Default::default()
        };
        let err = run(&config, &mut docs, &mut backend, &RegisteredController::new(Broken)).unwrap_err();
        assert!(matches!(err, RegistrationError::Binding { method: Method::Get, .. }));
    }

    #[test]
    fn test_base_path_and_visibility() {
        let config = ServerConfig::default();
        let mut docs = DocumentBuilder::new();
        docs.set_base_path("/api");
        let mut backend = StubServer::default();

        let mut inside = RegisteredController::new(Broken);
        inside.set_path("/api").set_name("inside");
        let mut outside = RegisteredController::new(Broken);
        outside.set_path("/internal").set_name("outside");
        let mut hidden = RegisteredController::new(Broken);
        hidden.set_path("/api").set_name("hidden");
        hidden.hide();

        for controller in [&inside, &outside, &hidden] {
            let _ = run(&config, &mut docs, &mut backend, controller);
        }

        assert_eq!(
            backend.bindings(),
            vec![
                (Method::Get, "/api/inside"),
                (Method::Get, "/internal/outside"),
                (Method::Get, "/api/hidden"),
            ]
        );
        let doc = docs.freeze();
        assert_eq!(doc.paths.keys().collect::<Vec<_>>(), vec!["/inside"]);
    }

    #[test]
    fn test_suffix_parameters_and_security_definitions() {
        let config = ServerConfig::builder()
            .authorization(Authorization::new().all_routes(AuthScheme::Basic))
            .build();
        let mut docs = DocumentBuilder::new();
        let mut backend = StubServer::default();
        let mut controller = RegisteredController::new(Broken);
        controller
            .set_path("/tenants")
            .set_suffix([Suffix::new(2, "{tenant}"), Suffix::new(0, "v2").with_description("Version")]);

        let _ = run(&config, &mut docs, &mut backend, &controller);

        assert_eq!(backend.bindings(), vec![(Method::Get, "/v2/tenants/:tenant/broken")]);
        let doc = docs.freeze();
        let operation = &doc.paths["/v2/tenants/{tenant}/broken"]["get"];
        let names: Vec<_> = operation.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["v2"]);
        assert!(operation.parameters[0].required);
        assert_eq!(operation.tags, vec!["v2/tenants/{tenant}".to_string()]);
        assert_eq!(operation.security_schemes().collect::<Vec<_>>(), vec!["Basic"]);
        assert!(doc.security_definitions.contains_key("Basic"));
    }

    #[test]
    fn test_finalized_handler_checks_auth_and_attaches_document() {
        let config = ServerConfig::builder()
            .authorization(
                Authorization::new()
                    .all_routes(AuthScheme::Basic)
                    .basic(BasicAuth::new(|user, pass| user == "u" && pass == "p")),
            )
            .permission(Permission::new(|user, _| user == "admin").all_routes())
            .build();
        let mut docs = DocumentBuilder::new();
        let mut backend = StubServer::default();
        let slot = DocumentSlot::default();
        let controller = RegisteredController::new(Broken);
        let resolved = controller.resolve(docs.base_path());
        let _ = Registrar {
            config: &config,
            docs: &mut docs,
            backend: &mut backend,
            slot: &slot,
        }
        .register(&resolved, controller.controller());
        slot.fill(docs.freeze());

        let (_, _, bound) = &backend.routes[0];

        let err = bound(&mut request("/broken")).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        let mut ctx = Context::new(
            Request::builder()
                .uri("/broken")
                .header(http::header::AUTHORIZATION, "Basic dTpw")
                .body(Bytes::new())
                .unwrap(),
        );
        let err = bound(&mut ctx).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert!(ctx.document().is_some());
        assert_eq!(ctx.identity().unwrap().username, "u");
    }
}
