//! Authenticated caller identity.

use serde::{Deserialize, Serialize};

/// The caller established by an authorization scheme.
///
/// A Windows-style `DOMAIN\user` login is split into its domain and user
/// parts.
///
/// ```rust
/// use restmount_core::Identity;
///
/// let identity = Identity::from_login(r"CORP\alice", "Basic");
/// assert_eq!(identity.username, "alice");
/// assert_eq!(identity.domain.as_deref(), Some("CORP"));
/// assert_eq!(identity.log_id(), r"Basic:CORP\alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// User name without domain.
    pub username: String,
    /// Login domain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Name of the scheme that authenticated the caller.
    pub scheme: String,
}

impl Identity {
    /// Creates an identity without a domain.
    #[must_use]
    pub fn new(username: impl Into<String>, scheme: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            domain: None,
            scheme: scheme.into(),
        }
    }

    /// Creates an identity from a login that may carry a `DOMAIN\` prefix.
    #[must_use]
    pub fn from_login(login: &str, scheme: impl Into<String>) -> Self {
        match login.split_once('\\') {
            Some((domain, username)) => Self {
                username: username.to_string(),
                domain: Some(domain.to_string()),
                scheme: scheme.into(),
            },
            None => Self::new(login, scheme),
        }
    }

    /// The login as originally presented.
    #[must_use]
    pub fn login(&self) -> String {
        match &self.domain {
            Some(domain) => format!("{domain}\\{}", self.username),
            None => self.username.clone(),
        }
    }

    /// Identifier suitable for logging.
    #[must_use]
    pub fn log_id(&self) -> String {
        format!("{}:{}", self.scheme, self.login())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_login() {
        let identity = Identity::from_login("bob", "ApiKey");
        assert_eq!(identity.username, "bob");
        assert!(identity.domain.is_none());
        assert_eq!(identity.login(), "bob");
    }

    #[test]
    fn test_serialization_skips_missing_domain() {
        let json = serde_json::to_value(Identity::new("bob", "Basic")).unwrap();
        assert!(json.get("domain").is_none());
        assert_eq!(json["scheme"], "Basic");
    }
}
