//! Configuration loader with layered approach.
//!
//! This module provides the [`ConfigLoader`] for loading settings from
//! defaults, files, `.env` files and environment variables.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{ConfigError, LogFormat, Settings, StaticSettings};

/// Configuration loader with layered approach.
///
/// Layers apply in order, later ones overriding earlier ones:
/// 1. Default values (or a preset)
/// 2. Configuration file (TOML or JSON) or string
/// 3. Environment variables (`PREFIX__SECTION__KEY`)
///
/// # Example
///
/// ```no_run
/// use restmount_config::ConfigLoader;
///
/// # fn main() -> Result<(), restmount_config::ConfigError> {
/// let settings = ConfigLoader::new()
///     .with_file("restmount.toml")?
///     .with_dotenv()?
///     .with_env_prefix("RESTMOUNT")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    settings: Settings,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a loader starting from default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
            env_prefix: None,
        }
    }

    /// Start from the development preset.
    ///
    /// ```
    /// use restmount_config::{ConfigLoader, LogFormat};
    ///
    /// let settings = ConfigLoader::new().with_development().load().unwrap();
    /// assert_eq!(settings.logging.format, LogFormat::Pretty);
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.settings = Settings::development();
        self
    }

    /// Start from the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.settings = Settings::production();
        self
    }

    /// Load settings from a file.
    ///
    /// The format is chosen by extension (`.toml` or `.json`). Sections
    /// missing from the file take their default values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing, unreadable, malformed
    /// or contains unknown fields.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::missing(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read(path, e))?;
        self.settings = Self::parse_file(&content, path)?;
        Ok(self)
    }

    /// Load settings from a file if it exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be loaded.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load settings from a string in the given format (`toml` or `json`).
    ///
    /// ```
    /// use restmount_config::ConfigLoader;
    ///
    /// let settings = ConfigLoader::new()
    ///     .with_string("[server]\nport = 3000\n", "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    /// assert_eq!(settings.server.port, 3000);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails or the format is unknown.
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.settings = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            _ => return Err(ConfigError::unsupported_format(format)),
        };
        Ok(self)
    }

    /// Load variables from `.env` in the working directory, if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be parsed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(e.into()),
        }
    }

    /// Load variables from a specific env file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing or malformed.
    pub fn with_dotenv_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        dotenvy::from_path(path.as_ref())?;
        Ok(self)
    }

    /// Set the environment variable prefix for overrides.
    ///
    /// With prefix `RESTMOUNT`, `RESTMOUNT__SERVER__PORT=9000` overrides
    /// `server.port`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Apply environment overrides, validate and return the settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an override cannot be parsed or validation
    /// fails.
    pub fn load(mut self) -> Result<Settings, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }

        self.settings.validate()?;
        Ok(self.settings)
    }

    /// Return the settings without applying overrides or validating.
    #[must_use]
    pub fn load_unvalidated(self) -> Settings {
        self.settings
    }

    fn parse_file(content: &str, path: &Path) -> Result<Settings, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(toml::from_str(content)?),
            Some("json") => Ok(serde_json::from_str(content)?),
            _ => Err(ConfigError::unsupported_format(path.display().to_string())),
        }
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        let mut vars: Vec<(String, String)> = env::vars()
            .filter(|(k, _)| k.starts_with(prefix))
            .collect();
        vars.sort();

        for (key, value) in vars {
            self.apply_env_var(&key, &value, prefix)?;
        }

        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let Some(rest) = key.strip_prefix(prefix).and_then(|k| k.strip_prefix("__")) else {
            return Ok(());
        };
        let parts: Vec<&str> = rest.split("__").collect();
        let server = &mut self.settings.server;
        let docs = &mut self.settings.docs;
        let logging = &mut self.settings.logging;

        match parts.as_slice() {
            ["SERVER", "HOST"] => server.host = value.to_string(),
            ["SERVER", "PORT"] => {
                server.port = value
                    .parse()
                    .map_err(|_| ConfigError::env(key, "a port number"))?;
            }
            ["SERVER", "TLS", "DIR"] => {
                server.tls.get_or_insert_with(Default::default).dir = non_empty(value).map(PathBuf::from);
            }
            ["SERVER", "TLS", "CERT"] => {
                server.tls.get_or_insert_with(Default::default).cert = PathBuf::from(value);
            }
            ["SERVER", "TLS", "KEY"] => {
                server.tls.get_or_insert_with(Default::default).key = PathBuf::from(value);
            }
            ["SERVER", "STATIC", "PREFIX"] => {
                static_files(&mut server.static_files).prefix = value.to_string();
            }
            ["SERVER", "STATIC", "ROOT"] => {
                static_files(&mut server.static_files).root = PathBuf::from(value);
            }

            ["DOCS", "HOST"] => docs.host = value.to_string(),
            ["DOCS", "BASE_PATH"] => docs.base_path = value.to_string(),
            ["DOCS", "TITLE"] => docs.title = value.to_string(),
            ["DOCS", "VERSION"] => docs.version = value.to_string(),
            ["DOCS", "DESCRIPTION"] => docs.description = non_empty(value),
            ["DOCS", "TERMS_OF_SERVICE"] => docs.terms_of_service = non_empty(value),

            ["LOGGING", "LEVEL"] => logging.level = value.to_string(),
            ["LOGGING", "FORMAT"] => {
                logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(ConfigError::env(key, "'json' or 'pretty'"))
                    }
                };
            }
            ["LOGGING", "ANSI"] => {
                logging.ansi = parse_bool(value)
                    .ok_or_else(|| ConfigError::env(key, "a boolean"))?;
            }

            _ => {}
        }

        Ok(())
    }
}

fn static_files(slot: &mut Option<StaticSettings>) -> &mut StaticSettings {
    slot.get_or_insert_with(|| StaticSettings {
        prefix: "/".to_string(),
        root: PathBuf::from("."),
    })
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Parse a boolean from a string.
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_loader_defaults() {
        let settings = ConfigLoader::new().load().unwrap();
        assert_eq!(settings.server.addr(), "0.0.0.0:8080");
        assert_eq!(settings.docs.host, "localhost");
    }

    #[test]
    fn test_loader_with_string_json() {
        let json = r#"{"docs": {"base_path": "/api", "title": "Pets"}}"#;
        let settings = ConfigLoader::new()
            .with_string(json, "json")
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(settings.docs.base_path, "/api");
        assert_eq!(settings.docs.title, "Pets");
        assert_eq!(settings.server.port, 8080);
    }

    #[test]
    fn test_loader_rejects_unknown_format() {
        assert!(matches!(
            ConfigLoader::new().with_string("", "yaml"),
            Err(ConfigError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_loader_with_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8443

[server.tls]
dir = "/etc/certs"
cert = "server.crt"
key = "server.key"

[server.static]
prefix = "/assets"
root = "./public"

[logging]
format = "pretty"
"#
        )
        .unwrap();

        let settings = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();
        let tls = settings.server.tls.unwrap();
        assert_eq!(settings.server.port, 8443);
        assert_eq!(tls.cert_path(), PathBuf::from("/etc/certs/server.crt"));
        assert_eq!(settings.server.static_files.unwrap().prefix, "/assets");
        assert_eq!(settings.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_loader_with_file_not_found() {
        let result = ConfigLoader::new().with_file("/nonexistent/restmount.toml");
        assert!(matches!(result, Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn test_loader_with_optional_file_not_found() {
        let settings = ConfigLoader::new()
            .with_optional_file("/nonexistent/restmount.toml")
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(settings.server.port, 8080);
    }

    #[test]
    fn test_loader_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        assert!(ConfigLoader::new().with_file(file.path()).is_err());
    }

    #[test]
    fn test_dotenv_file_missing() {
        assert!(ConfigLoader::new()
            .with_dotenv_file("/nonexistent/.env")
            .is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("on"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    // Overrides are exercised through apply_env_var; mutating the process
    // environment from parallel tests would race.

    #[test]
    fn test_apply_env_var_server() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__SERVER__HOST", "127.0.0.1", "TEST").unwrap();
        loader.apply_env_var("TEST__SERVER__PORT", "9000", "TEST").unwrap();
        assert_eq!(loader.settings.server.addr(), "127.0.0.1:9000");
    }

    #[test]
    fn test_apply_env_var_tls_pair() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__SERVER__TLS__CERT", "a.crt", "TEST").unwrap();
        assert!(loader.settings.validate().is_err());
        loader.apply_env_var("TEST__SERVER__TLS__KEY", "a.key", "TEST").unwrap();
        assert!(loader.settings.validate().is_ok());
    }

    #[test]
    fn test_apply_env_var_docs_and_logging() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__DOCS__BASE_PATH", "/api", "TEST").unwrap();
        loader.apply_env_var("TEST__LOGGING__FORMAT", "pretty", "TEST").unwrap();
        loader.apply_env_var("TEST__LOGGING__ANSI", "yes", "TEST").unwrap();
        assert_eq!(loader.settings.docs.base_path, "/api");
        assert_eq!(loader.settings.logging.format, LogFormat::Pretty);
        assert!(loader.settings.logging.ansi);
    }

    #[test]
    fn test_apply_env_var_invalid_values() {
        let mut loader = ConfigLoader::new();
        assert!(matches!(
            loader.apply_env_var("TEST__SERVER__PORT", "http", "TEST"),
            Err(ConfigError::Env { expected: "a port number", .. })
        ));
        assert!(loader.apply_env_var("TEST__LOGGING__FORMAT", "xml", "TEST").is_err());
        assert!(loader.apply_env_var("TEST__UNKNOWN__KEY", "x", "TEST").is_ok());
    }
}
