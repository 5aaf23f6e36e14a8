//! Per-verb route descriptions.
//!
//! A fresh [`Route`] is handed to each verb capability of a controller. The
//! capability fills in the handler and whatever documentation it wants; a
//! route left without a handler is not registered.

use indexmap::IndexMap;
use restmount_docs::{Operation, Parameter, Response, SecurityRequirement};

use crate::handler::Handler;
use crate::scheme::AuthScheme;

/// Route description produced by a verb capability.
///
/// # Example
///
/// ```rust
/// use restmount_core::{handler, response, Route};
///
/// let mut route = Route::new();
/// route
///     .set_handler(handler(|_| response::text("hello")))
///     .path_param("id", "User id")
///     .set_summary("Fetch a user");
///
/// assert_eq!(route.variants(), vec!["{id}".to_string()]);
/// assert_eq!(route.operation().parameters.len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct Route {
    handler: Option<Handler>,
    params: Vec<String>,
    empty_param: bool,
    permission: bool,
    operation: Operation,
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("has_handler", &self.handler.is_some())
            .field("params", &self.params)
            .field("empty_param", &self.empty_param)
            .field("permission", &self.permission)
            .field("operation", &self.operation)
            .finish()
    }
}

impl Route {
    /// Creates a route with the single `default` response.
    #[must_use]
    pub fn new() -> Self {
        Self {
            operation: Operation::with_default_response(),
            ..Self::default()
        }
    }

    /// Sets the handler. Without one the verb is not registered.
    pub fn set_handler(&mut self, handler: Handler) -> &mut Self {
        self.handler = Some(handler);
        self
    }

    /// Replaces the path variants appended to the controller path.
    pub fn set_params<I, S>(&mut self, params: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a `{name}` variant and documents it as a required path parameter.
    pub fn path_param(&mut self, name: &str, description: impl Into<String>) -> &mut Self {
        self.params.push(format!("{{{name}}}"));
        self.operation
            .parameters
            .push(Parameter::path(name, true, description));
        self
    }

    /// Also binds the bare controller path when variants are declared.
    ///
    /// The bare binding is not documented.
    pub fn empty_param(&mut self) -> &mut Self {
        self.empty_param = true;
        self
    }

    /// Sets the operation description.
    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.operation.description = Some(description.into());
        self
    }

    /// Sets the operation summary.
    pub fn set_summary(&mut self, summary: impl Into<String>) -> &mut Self {
        self.operation.summary = Some(summary.into());
        self
    }

    /// Sets the operation id.
    pub fn set_operation_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.operation.operation_id = Some(id.into());
        self
    }

    /// Marks the operation deprecated.
    pub fn deprecated(&mut self) -> &mut Self {
        self.operation.deprecated = true;
        self
    }

    /// Adds a documented parameter.
    pub fn add_parameter(&mut self, parameter: Parameter) -> &mut Self {
        self.operation.parameters.push(parameter);
        self
    }

    /// Sets the response for a status code or `default`.
    pub fn set_response(&mut self, status: impl Into<String>, response: Response) -> &mut Self {
        self.operation.responses.insert(status.into(), response);
        self
    }

    /// Documents a JSON body referencing a model by name.
    pub fn set_body(&mut self, model: impl Into<String>, description: impl Into<String>) -> &mut Self {
        self.operation
            .parameters
            .push(Parameter::body(model).with_description(description));
        self
    }

    /// Adds consumed MIME types.
    pub fn consumes<I, S>(&mut self, types: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.operation.consumes.extend(types.into_iter().map(Into::into));
        self
    }

    /// Adds produced MIME types.
    pub fn produces<I, S>(&mut self, types: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.operation.produces.extend(types.into_iter().map(Into::into));
        self
    }

    /// Requires `scheme` for this route.
    pub fn set_security(&mut self, scheme: AuthScheme) -> &mut Self {
        self.set_security_scopes(scheme, std::iter::empty::<String>())
    }

    /// Requires `scheme` with the given scopes.
    pub fn set_security_scopes<I, S>(&mut self, scheme: AuthScheme, scopes: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let key = scheme.as_str();
        if self.operation.security.iter().any(|req| req.contains_key(key)) {
            return self;
        }
        let mut requirement = SecurityRequirement::new();
        requirement.insert(key.to_string(), scopes.into_iter().map(Into::into).collect());
        self.operation.security.push(requirement);
        self
    }

    /// Removes all security requirements, including inherited ones.
    pub fn clear_security(&mut self) -> &mut Self {
        self.operation.security.clear();
        self
    }

    /// Requires the permission check for this route.
    pub fn permission(&mut self) -> &mut Self {
        self.permission = true;
        self
    }

    /// Enables or disables the permission check.
    pub fn set_permission(&mut self, permission: bool) -> &mut Self {
        self.permission = permission;
        self
    }

    /// Returns the handler, if set.
    #[must_use]
    pub fn handler(&self) -> Option<&Handler> {
        self.handler.as_ref()
    }

    /// Declared path variants.
    #[must_use]
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// True when the bare path is accepted alongside declared variants.
    #[must_use]
    pub const fn accepts_empty(&self) -> bool {
        self.empty_param
    }

    /// True when the permission check applies.
    #[must_use]
    pub const fn requires_permission(&self) -> bool {
        self.permission
    }

    /// Path variants to bind, in order.
    ///
    /// Declared variants come first; the empty variant is appended when
    /// none are declared or when [`Route::empty_param`] was called.
    #[must_use]
    pub fn variants(&self) -> Vec<String> {
        let mut variants = self.params.clone();
        if variants.is_empty() || self.empty_param {
            variants.push(String::new());
        }
        variants
    }

    /// Security schemes this route requires, in declaration order.
    ///
    /// Requirement keys that do not name a known scheme are skipped.
    pub fn schemes(&self) -> impl Iterator<Item = AuthScheme> + '_ {
        self.operation
            .security_schemes()
            .filter_map(|name| name.parse().ok())
    }

    /// Returns the operation documentation.
    #[must_use]
    pub const fn operation(&self) -> &Operation {
        &self.operation
    }

    /// Returns the operation documentation for direct edits.
    pub fn operation_mut(&mut self) -> &mut Operation {
        &mut self.operation
    }

    /// Response map of the operation.
    #[must_use]
    pub fn responses(&self) -> &IndexMap<String, Response> {
        &self.operation.responses
    }
}
