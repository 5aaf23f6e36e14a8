//! Names of the authorization schemes a route can require.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An authorization scheme.
///
/// The string form is the key used in an operation's security requirements
/// and under the document's `securityDefinitions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthScheme {
    /// HTTP Basic.
    Basic,
    /// API key in a header or query parameter.
    ApiKey,
    /// OAuth 2.0 bearer token.
    OAuth2,
}

impl AuthScheme {
    /// Security requirement key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::ApiKey => "ApiKey",
            Self::OAuth2 => "OAuth2",
        }
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown scheme name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown authorization scheme: {0}")]
pub struct UnknownScheme(pub String);

impl FromStr for AuthScheme {
    type Err = UnknownScheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Basic, Self::ApiKey, Self::OAuth2]
            .into_iter()
            .find(|scheme| scheme.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownScheme(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        for scheme in [AuthScheme::Basic, AuthScheme::ApiKey, AuthScheme::OAuth2] {
            assert_eq!(scheme.as_str().parse::<AuthScheme>().unwrap(), scheme);
        }
        assert_eq!("apikey".parse::<AuthScheme>().unwrap(), AuthScheme::ApiKey);
        assert!("Digest".parse::<AuthScheme>().is_err());
    }
}
