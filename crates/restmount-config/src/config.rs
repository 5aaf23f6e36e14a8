//! Root settings type.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, DocsSettings, LogFormat, LoggingSettings, ServerSettings};

/// Complete Restmount settings.
///
/// Callbacks such as authenticators cannot be expressed in a file; they are
/// attached in code to the server configuration built from these settings.
///
/// # Example
///
/// ```
/// use restmount_config::Settings;
///
/// let settings = Settings::default();
/// assert_eq!(settings.server.addr(), "0.0.0.0:8080");
/// assert_eq!(settings.docs.base_path, "/");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Listener settings.
    #[serde(default)]
    pub server: ServerSettings,

    /// API document metadata.
    #[serde(default)]
    pub docs: DocsSettings,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Settings {
    /// Validate the settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The port is zero
    /// - The docs base path does not start with `/`
    /// - Only one of the TLS certificate and key is set
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::invalid("server.port", "must be non-zero"));
        }

        if !self.docs.base_path.starts_with('/') {
            return Err(ConfigError::invalid(
                "docs.base_path",
                format!("must start with '/', got `{}`", self.docs.base_path),
            ));
        }

        if let Some(tls) = &self.server.tls {
            if tls.cert.as_os_str().is_empty() || tls.key.as_os_str().is_empty() {
                return Err(ConfigError::invalid("server.tls", "needs both cert and key"));
            }
        }

        if let Some(static_files) = &self.server.static_files {
            if !static_files.prefix.starts_with('/') {
                return Err(ConfigError::invalid(
                    "server.static.prefix",
                    "must start with '/'",
                ));
            }
        }

        Ok(())
    }

    /// Local development preset: pretty colored debug logs on localhost.
    #[must_use]
    pub fn development() -> Self {
        let mut settings = Self::default();
        settings.server.host = "127.0.0.1".to_string();
        settings.logging = LoggingSettings {
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            ansi: true,
        };
        settings
    }

    /// Production preset: JSON info logs on all interfaces.
    #[must_use]
    pub fn production() -> Self {
        let mut settings = Self::default();
        settings.logging = LoggingSettings {
            level: "info".to_string(),
            format: LogFormat::Json,
            ansi: false,
        };
        settings
    }
}
