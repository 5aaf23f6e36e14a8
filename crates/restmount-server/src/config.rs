//! Server configuration types.
//!
//! [`ServerConfig`] combines what can be read from a settings file (listen
//! address, TLS files, static mount, document metadata) with the runtime
//! callbacks that can only be supplied in code.
//!
//! # Example
//!
//! ```rust
//! use restmount_core::AuthScheme;
//! use restmount_server::{Authorization, BasicAuth, ServerConfig};
//!
//! let config = ServerConfig::builder()
//!     .host("127.0.0.1")
//!     .port(3000)
//!     .authorization(
//!         Authorization::new()
//!             .all_routes(AuthScheme::Basic)
//!             .basic(BasicAuth::new(|_, pass| pass == "secret")),
//!     )
//!     .build();
//!
//! assert_eq!(config.addr(), "127.0.0.1:3000");
//! assert!(!config.is_tls());
//! ```

use std::path::{Path, PathBuf};

use restmount_config::{DocsSettings, Settings};
use restmount_docs::{Contact, Info, License};

use crate::auth::{Authorization, Permission};

/// Default bind host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default bind port.
pub const DEFAULT_PORT: u16 = 8080;

/// TLS certificate and key files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsFiles {
    /// Certificate file.
    pub cert: PathBuf,
    /// Private key file.
    pub key: PathBuf,
}

/// Static directory served under a URL prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticMount {
    /// URL prefix.
    pub prefix: String,
    /// Directory on disk.
    pub root: PathBuf,
}

/// Server configuration.
///
/// Use [`ServerConfig::builder()`] or [`ServerConfig::from_settings()`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    host: String,
    port: u16,
    tls: Option<TlsFiles>,
    static_files: Option<StaticMount>,
    docs: DocsSettings,
    authorization: Authorization,
    permission: Option<Permission>,
}

impl ServerConfig {
    /// Creates a new server configuration builder.
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Builds a configuration from loaded settings.
    ///
    /// Callbacks are attached afterwards through [`ServerConfigBuilder`].
    #[must_use]
    pub fn from_settings(settings: &Settings) -> ServerConfigBuilder {
        let mut builder = Self::builder()
            .host(&settings.server.host)
            .port(settings.server.port)
            .docs(settings.docs.clone());
        if let Some(tls) = &settings.server.tls {
            builder = builder.tls(tls.cert_path(), tls.key_path());
        }
        if let Some(mount) = &settings.server.static_files {
            builder = builder.static_files(&mount.prefix, &mount.root);
        }
        builder
    }

    /// Bind host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Bind port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Listen address as `host:port`.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// TLS files, if TLS is enabled.
    #[must_use]
    pub const fn tls(&self) -> Option<&TlsFiles> {
        self.tls.as_ref()
    }

    /// Whether the server listens with TLS.
    #[must_use]
    pub const fn is_tls(&self) -> bool {
        self.tls.is_some()
    }

    /// Static file mount.
    #[must_use]
    pub const fn static_files(&self) -> Option<&StaticMount> {
        self.static_files.as_ref()
    }

    /// Document metadata.
    #[must_use]
    pub const fn docs(&self) -> &DocsSettings {
        &self.docs
    }

    /// Authorization schemes.
    #[must_use]
    pub const fn authorization(&self) -> &Authorization {
        &self.authorization
    }

    /// Permission checker.
    #[must_use]
    pub const fn permission(&self) -> Option<&Permission> {
        self.permission.as_ref()
    }

    /// `info` object for the API document.
    #[must_use]
    pub fn info(&self) -> Info {
        let docs = &self.docs;
        let contact = (docs.contact_name.is_some()
            || docs.contact_url.is_some()
            || docs.contact_email.is_some())
        .then(|| Contact {
            name: docs.contact_name.clone(),
            url: docs.contact_url.clone(),
            email: docs.contact_email.clone(),
        });
        let license = docs.license_name.as_ref().map(|name| License {
            name: name.clone(),
            url: docs.license_url.clone(),
        });

        Info {
            title: docs.title.clone(),
            version: docs.version.clone(),
            description: docs.description.clone(),
            terms_of_service: docs.terms_of_service.clone(),
            contact,
            license,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug, Clone)]
pub struct ServerConfigBuilder {
    host: String,
    port: u16,
    tls: Option<TlsFiles>,
    static_files: Option<StaticMount>,
    docs: DocsSettings,
    authorization: Authorization,
    permission: Option<Permission>,
}

impl ServerConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            tls: None,
            static_files: None,
            docs: DocsSettings::default(),
            authorization: Authorization::default(),
            permission: None,
        }
    }

    /// Sets the bind host.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the bind port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enables TLS with the given certificate and key.
    #[must_use]
    pub fn tls(mut self, cert: impl AsRef<Path>, key: impl AsRef<Path>) -> Self {
        self.tls = Some(TlsFiles {
            cert: cert.as_ref().to_path_buf(),
            key: key.as_ref().to_path_buf(),
        });
        self
    }

    /// Serves `root` under `prefix`.
    #[must_use]
    pub fn static_files(mut self, prefix: impl Into<String>, root: impl AsRef<Path>) -> Self {
        self.static_files = Some(StaticMount {
            prefix: prefix.into(),
            root: root.as_ref().to_path_buf(),
        });
        self
    }

    /// Sets the document metadata.
    #[must_use]
    pub fn docs(mut self, docs: DocsSettings) -> Self {
        self.docs = docs;
        self
    }

    /// Sets the authorization schemes.
    #[must_use]
    pub fn authorization(mut self, authorization: Authorization) -> Self {
        self.authorization = authorization;
        self
    }

    /// Sets the permission checker.
    #[must_use]
    pub fn permission(mut self, permission: Permission) -> Self {
        self.permission = Some(permission);
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> ServerConfig {
        ServerConfig {
            host: self.host,
            port: self.port,
            tls: self.tls,
            static_files: self.static_files,
            docs: self.docs,
            authorization: self.authorization,
            permission: self.permission,
        }
    }
}

impl Default for ServerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
