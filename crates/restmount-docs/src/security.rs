//! Swagger 2.0 security scheme definitions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Security requirement: scheme name to required scopes.
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

/// Security scheme type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityType {
    /// HTTP Basic authentication.
    #[serde(rename = "basic")]
    Basic,
    /// API key in a header or query parameter.
    #[serde(rename = "apiKey")]
    ApiKey,
    /// OAuth 2.0.
    #[serde(rename = "oauth2")]
    OAuth2,
}

/// Where an API key is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    /// Query string parameter.
    Query,
    /// HTTP header.
    Header,
}

/// OAuth 2.0 flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OAuth2Flow {
    /// Implicit grant.
    Implicit,
    /// Resource owner password grant.
    Password,
    /// Client credentials grant.
    Application,
    /// Authorization code grant.
    AccessCode,
}

/// A security scheme as it appears under `securityDefinitions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityDefinition {
    /// Scheme type.
    #[serde(rename = "type")]
    pub scheme_type: SecurityType,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// API key name (apiKey only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// API key location (apiKey only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "in")]
    pub location: Option<ApiKeyLocation>,
    /// OAuth2 flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<OAuth2Flow>,
    /// OAuth2 authorization URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "authorizationUrl")]
    pub authorization_url: Option<String>,
    /// OAuth2 token URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "tokenUrl")]
    pub token_url: Option<String>,
    /// OAuth2 scopes and their descriptions.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub scopes: IndexMap<String, String>,
}

impl SecurityDefinition {
    fn new(scheme_type: SecurityType) -> Self {
        Self {
            scheme_type,
            description: None,
            name: None,
            location: None,
            flow: None,
            authorization_url: None,
            token_url: None,
            scopes: IndexMap::new(),
        }
    }

    /// HTTP Basic scheme.
    #[must_use]
    pub fn basic() -> Self {
        Self::new(SecurityType::Basic)
    }

    /// API key scheme.
    #[must_use]
    pub fn api_key(name: impl Into<String>, location: ApiKeyLocation) -> Self {
        Self {
            name: Some(name.into()),
            location: Some(location),
            ..Self::new(SecurityType::ApiKey)
        }
    }

    /// OAuth2 scheme.
    #[must_use]
    pub fn oauth2(flow: OAuth2Flow) -> Self {
        Self {
            flow: Some(flow),
            ..Self::new(SecurityType::OAuth2)
        }
    }

    /// Sets the OAuth2 authorization URL.
    #[must_use]
    pub fn authorization_url(mut self, url: impl Into<String>) -> Self {
        self.authorization_url = Some(url.into());
        self
    }

    /// Sets the OAuth2 token URL.
    #[must_use]
    pub fn token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = Some(url.into());
        self
    }

    /// Adds an OAuth2 scope.
    #[must_use]
    pub fn scope(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.scopes.insert(name.into(), description.into());
        self
    }

    /// Adds a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
