//! Configuration sections.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerSettings {
    /// Interface to bind.
    #[serde(default = "default_bind_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// TLS certificate and key. Plain HTTP when absent.
    #[serde(default)]
    pub tls: Option<TlsSettings>,

    /// Static file mount.
    #[serde(default, rename = "static")]
    pub static_files: Option<StaticSettings>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_bind_host(),
            port: default_port(),
            tls: None,
            static_files: None,
        }
    }
}

impl ServerSettings {
    /// Listener address as `host:port`.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// TLS certificate and private key files.
///
/// Relative file names are resolved against `dir` when it is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TlsSettings {
    /// Directory holding the files.
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Certificate file.
    #[serde(default)]
    pub cert: PathBuf,

    /// Private key file.
    #[serde(default)]
    pub key: PathBuf,
}

impl TlsSettings {
    /// Resolved certificate path.
    #[must_use]
    pub fn cert_path(&self) -> PathBuf {
        self.resolve(&self.cert)
    }

    /// Resolved private key path.
    #[must_use]
    pub fn key_path(&self) -> PathBuf {
        self.resolve(&self.key)
    }

    fn resolve(&self, file: &std::path::Path) -> PathBuf {
        match &self.dir {
            Some(dir) if file.is_relative() => dir.join(file),
            _ => file.to_path_buf(),
        }
    }
}

/// Static file directory served under a URL prefix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StaticSettings {
    /// URL prefix.
    pub prefix: String,

    /// Directory on disk.
    pub root: PathBuf,
}

/// API document metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DocsSettings {
    /// Host shown in the document. The listener port is appended at start.
    #[serde(default = "default_docs_host")]
    pub host: String,

    /// Only routes under this prefix are documented.
    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// API title.
    #[serde(default = "default_title")]
    pub title: String,

    /// API version.
    #[serde(default = "default_version")]
    pub version: String,

    /// API description.
    #[serde(default)]
    pub description: Option<String>,

    /// Terms of service URL.
    #[serde(default)]
    pub terms_of_service: Option<String>,

    /// Contact name.
    #[serde(default)]
    pub contact_name: Option<String>,

    /// Contact URL.
    #[serde(default)]
    pub contact_url: Option<String>,

    /// Contact email.
    #[serde(default)]
    pub contact_email: Option<String>,

    /// License name.
    #[serde(default)]
    pub license_name: Option<String>,

    /// License URL.
    #[serde(default)]
    pub license_url: Option<String>,
}

impl Default for DocsSettings {
    fn default() -> Self {
        Self {
            host: default_docs_host(),
            base_path: default_base_path(),
            title: default_title(),
            version: default_version(),
            description: None,
            terms_of_service: None,
            contact_name: None,
            contact_url: None,
            contact_email: None,
            license_name: None,
            license_url: None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable multi-line output.
    Pretty,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `info` or `restmount=debug,info`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Colored output.
    #[serde(default)]
    pub ansi: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            ansi: false,
        }
    }
}

fn default_bind_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8080
}

fn default_docs_host() -> String {
    "localhost".to_string()
}

fn default_base_path() -> String {
    "/".to_string()
}

fn default_title() -> String {
    "API".to_string()
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
