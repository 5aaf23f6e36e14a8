//! Authorization schemes and the request-time credential check.
//!
//! Verification itself is delegated to callbacks supplied by the
//! application. This module only extracts credentials from the request,
//! turns the callback's answer into an [`Identity`] and produces the
//! security definitions that appear in the API document.

use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use http::{header, StatusCode};
use indexmap::IndexMap;
use restmount_core::{AuthScheme, Context, HandlerError, HandlerResult, Identity};
use restmount_docs::{ApiKeyLocation, OAuth2Flow, SecurityDefinition};

/// Checks a Basic user name and password.
pub type BasicVerifier = Arc<dyn Fn(&str, &str) -> bool + Send + Sync>;

/// Maps an API key or bearer token to a login.
///
/// Returning `None` rejects the credential.
pub type TokenVerifier = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Decides whether a user may call a path.
pub type PermissionChecker = Arc<dyn Fn(&str, &str) -> bool + Send + Sync>;

/// Builds the response sent instead of a 401 or 403 error.
pub type UnauthorizedHook = Arc<dyn Fn(&Context, StatusCode) -> HandlerResult + Send + Sync>;

const DEFAULT_REALM: &str = "Authorization Required";
const BASIC_PREFIX: &str = "basic ";
const BEARER_PREFIX: &str = "bearer ";

/// HTTP Basic authentication.
#[derive(Clone)]
pub struct BasicAuth {
    realm: String,
    verifier: BasicVerifier,
}

impl BasicAuth {
    /// Creates Basic authentication with the default realm.
    pub fn new<F>(verifier: F) -> Self
    where
        F: Fn(&str, &str) -> bool + Send + Sync + 'static,
    {
        Self {
            realm: DEFAULT_REALM.to_string(),
            verifier: Arc::new(verifier),
        }
    }

    /// Sets the realm sent in the challenge.
    #[must_use]
    pub fn with_realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = realm.into();
        self
    }

    fn challenge(&self) -> String {
        format!("Basic realm=\"{}\"", self.realm)
    }

    fn authenticate(&self, ctx: &Context) -> Result<Identity, HandlerError> {
        let unauthorized = |message: &str| HandlerError::challenge(message, self.challenge());

        let value = ctx
            .header(header::AUTHORIZATION.as_str())
            .ok_or_else(|| unauthorized("missing authorization header"))?;

        let encoded = value
            .get(..BASIC_PREFIX.len())
            .filter(|prefix| prefix.eq_ignore_ascii_case(BASIC_PREFIX))
            .map(|_| value[BASIC_PREFIX.len()..].trim())
            .ok_or_else(|| unauthorized("authorization header is not Basic"))?;

        let decoded = STANDARD
            .decode(encoded)
            .ok()
            .and_then(|raw| String::from_utf8(raw).ok())
            .ok_or_else(|| unauthorized("malformed Basic credentials"))?;

        let (login, password) = decoded
            .split_once(':')
            .ok_or_else(|| unauthorized("malformed Basic credentials"))?;

        if !(self.verifier)(login, password) {
            return Err(unauthorized("invalid credentials"));
        }
        Ok(Identity::from_login(login, AuthScheme::Basic.as_str()))
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("realm", &self.realm)
            .finish_non_exhaustive()
    }
}

/// API key carried in a header or query parameter.
#[derive(Clone)]
pub struct ApiKeyAuth {
    key_name: String,
    location: ApiKeyLocation,
    verifier: TokenVerifier,
}

impl ApiKeyAuth {
    /// Creates API key authentication reading `key_name` from `location`.
    pub fn new<F>(key_name: impl Into<String>, location: ApiKeyLocation, verifier: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            key_name: key_name.into(),
            location,
            verifier: Arc::new(verifier),
        }
    }

    /// Header or query parameter name.
    #[must_use]
    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    /// Where the key is read from.
    #[must_use]
    pub const fn location(&self) -> ApiKeyLocation {
        self.location
    }

    fn authenticate(&self, ctx: &Context) -> Result<Identity, HandlerError> {
        let (value, source) = match self.location {
            ApiKeyLocation::Header => (ctx.header(&self.key_name).map(str::to_string), "header"),
            ApiKeyLocation::Query => (ctx.query(&self.key_name), "query"),
        };

        let key = value
            .filter(|v| !v.is_empty())
            .ok_or_else(|| HandlerError::unauthorized(format!("API key not found in {source}")))?;

        let login = (self.verifier)(&key)
            .ok_or_else(|| HandlerError::unauthorized("invalid API key"))?;
        Ok(Identity::from_login(&login, AuthScheme::ApiKey.as_str()))
    }
}

impl fmt::Debug for ApiKeyAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyAuth")
            .field("key_name", &self.key_name)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

/// OAuth 2.0 bearer tokens.
///
/// The flow, URLs and scopes are only documented; token issuance happens
/// elsewhere.
#[derive(Clone)]
pub struct OAuth2Auth {
    flow: OAuth2Flow,
    authorization_url: Option<String>,
    token_url: Option<String>,
    scopes: IndexMap<String, String>,
    verifier: TokenVerifier,
}

impl OAuth2Auth {
    /// Creates bearer token authentication for `flow`.
    pub fn new<F>(flow: OAuth2Flow, verifier: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            flow,
            authorization_url: None,
            token_url: None,
            scopes: IndexMap::new(),
            verifier: Arc::new(verifier),
        }
    }

    /// Sets the authorization URL.
    #[must_use]
    pub fn authorization_url(mut self, url: impl Into<String>) -> Self {
        self.authorization_url = Some(url.into());
        self
    }

    /// Sets the token URL.
    #[must_use]
    pub fn token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = Some(url.into());
        self
    }

    /// Adds a documented scope.
    #[must_use]
    pub fn scope(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.scopes.insert(name.into(), description.into());
        self
    }

    fn definition(&self) -> SecurityDefinition {
        let mut definition = SecurityDefinition::oauth2(self.flow);
        if let Some(url) = &self.authorization_url {
            definition = definition.authorization_url(url);
        }
        if let Some(url) = &self.token_url {
            definition = definition.token_url(url);
        }
        for (name, description) in &self.scopes {
            definition = definition.scope(name, description);
        }
        definition
    }

    fn authenticate(&self, ctx: &Context) -> Result<Identity, HandlerError> {
        let value = ctx
            .header(header::AUTHORIZATION.as_str())
            .ok_or_else(|| HandlerError::challenge("missing bearer token", "Bearer"))?;

        let token = value
            .get(..BEARER_PREFIX.len())
            .filter(|prefix| prefix.eq_ignore_ascii_case(BEARER_PREFIX))
            .map(|_| value[BEARER_PREFIX.len()..].trim())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| HandlerError::challenge("missing bearer token", "Bearer"))?;

        let login = (self.verifier)(token).ok_or_else(|| {
            HandlerError::challenge("invalid bearer token", "Bearer error=\"invalid_token\"")
        })?;
        Ok(Identity::from_login(&login, AuthScheme::OAuth2.as_str()))
    }
}

impl fmt::Debug for OAuth2Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2Auth")
            .field("flow", &self.flow)
            .field("authorization_url", &self.authorization_url)
            .field("token_url", &self.token_url)
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}

/// Configured authorization schemes.
///
/// # Example
///
/// ```rust
/// use restmount_core::AuthScheme;
/// use restmount_server::{Authorization, BasicAuth};
///
/// let auth = Authorization::new()
///     .all_routes(AuthScheme::Basic)
///     .basic(BasicAuth::new(|user, pass| user == "admin" && pass == "secret"));
///
/// assert!(auth.is_configured(AuthScheme::Basic));
/// assert!(!auth.is_configured(AuthScheme::ApiKey));
/// ```
#[derive(Clone, Default)]
pub struct Authorization {
    all_routes: Option<AuthScheme>,
    basic: Option<BasicAuth>,
    api_key: Option<ApiKeyAuth>,
    oauth2: Option<OAuth2Auth>,
    unauthorized: Option<UnauthorizedHook>,
}

impl Authorization {
    /// No schemes and no global requirement.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires `scheme` on every route unless the route clears it.
    #[must_use]
    pub fn all_routes(mut self, scheme: AuthScheme) -> Self {
        self.all_routes = Some(scheme);
        self
    }

    /// Configures Basic authentication.
    #[must_use]
    pub fn basic(mut self, basic: BasicAuth) -> Self {
        self.basic = Some(basic);
        self
    }

    /// Configures API key authentication.
    #[must_use]
    pub fn api_key(mut self, api_key: ApiKeyAuth) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Configures OAuth 2.0 bearer tokens.
    #[must_use]
    pub fn oauth2(mut self, oauth2: OAuth2Auth) -> Self {
        self.oauth2 = Some(oauth2);
        self
    }

    /// Sets the hook that renders 401 and 403 responses.
    #[must_use]
    pub fn on_unauthorized<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Context, StatusCode) -> HandlerResult + Send + Sync + 'static,
    {
        self.unauthorized = Some(Arc::new(hook));
        self
    }

    /// Scheme required on every route, if any.
    #[must_use]
    pub const fn global_scheme(&self) -> Option<AuthScheme> {
        self.all_routes
    }

    /// Whether a verifier exists for `scheme`.
    #[must_use]
    pub const fn is_configured(&self, scheme: AuthScheme) -> bool {
        match scheme {
            AuthScheme::Basic => self.basic.is_some(),
            AuthScheme::ApiKey => self.api_key.is_some(),
            AuthScheme::OAuth2 => self.oauth2.is_some(),
        }
    }

    /// Security definition emitted into the document for `scheme`.
    ///
    /// Unconfigured API key and OAuth 2.0 schemes fall back to an
    /// `api_key` header and the implicit flow.
    #[must_use]
    pub fn definition(&self, scheme: AuthScheme) -> SecurityDefinition {
        match scheme {
            AuthScheme::Basic => SecurityDefinition::basic(),
            AuthScheme::ApiKey => match &self.api_key {
                Some(api_key) => SecurityDefinition::api_key(&api_key.key_name, api_key.location),
                None => SecurityDefinition::api_key("api_key", ApiKeyLocation::Header),
            },
            AuthScheme::OAuth2 => match &self.oauth2 {
                Some(oauth2) => oauth2.definition(),
                None => SecurityDefinition::oauth2(OAuth2Flow::Implicit),
            },
        }
    }

    /// Verifies the request's credentials for `scheme`.
    ///
    /// # Errors
    ///
    /// Returns `HandlerError::Unauthorized` when the credential is missing,
    /// malformed or rejected, or when `scheme` has no verifier.
    pub fn authenticate(&self, scheme: AuthScheme, ctx: &Context) -> Result<Identity, HandlerError> {
        match scheme {
            AuthScheme::Basic => match &self.basic {
                Some(basic) => basic.authenticate(ctx),
                None => Err(not_configured(scheme)),
            },
            AuthScheme::ApiKey => match &self.api_key {
                Some(api_key) => api_key.authenticate(ctx),
                None => Err(not_configured(scheme)),
            },
            AuthScheme::OAuth2 => match &self.oauth2 {
                Some(oauth2) => oauth2.authenticate(ctx),
                None => Err(not_configured(scheme)),
            },
        }
    }

    /// Renders a rejection through the hook, or as the error itself.
    pub(crate) fn reject(&self, ctx: &Context, err: HandlerError) -> HandlerResult {
        match &self.unauthorized {
            Some(hook) => hook(ctx, err.status_code()),
            None => Err(err),
        }
    }
}

impl fmt::Debug for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authorization")
            .field("all_routes", &self.all_routes)
            .field("basic", &self.basic)
            .field("api_key", &self.api_key)
            .field("oauth2", &self.oauth2)
            .field("unauthorized", &self.unauthorized.is_some())
            .finish()
    }
}

fn not_configured(scheme: AuthScheme) -> HandlerError {
    HandlerError::unauthorized(format!("{scheme} authorization is not configured"))
}

/// Per-route permission check.
#[derive(Clone)]
pub struct Permission {
    all_routes: bool,
    checker: PermissionChecker,
}

impl Permission {
    /// Creates a checker called with the user name and request path.
    pub fn new<F>(checker: F) -> Self
    where
        F: Fn(&str, &str) -> bool + Send + Sync + 'static,
    {
        Self {
            all_routes: false,
            checker: Arc::new(checker),
        }
    }

    /// Flags every route as permission-checked by default.
    #[must_use]
    pub fn all_routes(mut self) -> Self {
        self.all_routes = true;
        self
    }

    /// Whether new routes start permission-checked.
    #[must_use]
    pub const fn applies_to_all_routes(&self) -> bool {
        self.all_routes
    }

    /// Runs the checker.
    #[must_use]
    pub fn allows(&self, username: &str, path: &str) -> bool {
        (self.checker)(username, path)
    }
}

impl fmt::Debug for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Permission")
            .field("all_routes", &self.all_routes)
            .finish_non_exhaustive()
    }
}

/// Request-time check for one route.
#[derive(Debug, Clone)]
pub(crate) struct Guard {
    pub(crate) authorization: Authorization,
    pub(crate) schemes: Vec<AuthScheme>,
    pub(crate) permission: Option<Permission>,
}

impl Guard {
    /// Authenticates and authorizes the request.
    ///
    /// The first scheme that accepts the request sets the identity. When
    /// every scheme rejects, the last rejection is returned.
    pub(crate) fn check(&self, ctx: &mut Context) -> Result<(), HandlerError> {
        let mut rejection = None;
        for scheme in &self.schemes {
            match self.authorization.authenticate(*scheme, ctx) {
                Ok(identity) => {
                    tracing::debug!(identity = %identity.log_id(), "request authenticated");
                    ctx.set_identity(identity);
                    rejection = None;
                    break;
                }
                Err(err) => rejection = Some(err),
            }
        }
        if let Some(err) = rejection {
            return Err(err);
        }

        if let Some(permission) = &self.permission {
            let login = ctx.identity().map(Identity::login).unwrap_or_default();
            if !permission.allows(&login, ctx.path()) {
                tracing::debug!(login = %login, path = %ctx.path(), "permission denied");
                return Err(HandlerError::forbidden("permission denied"));
            }
        }
        Ok(())
    }
}
