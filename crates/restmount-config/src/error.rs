//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or checking [`Settings`](crate::Settings).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No settings file at the given path.
    #[error("no settings file at {path}")]
    Missing {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The settings file exists but could not be read.
    #[error("cannot read settings file {path}")]
    Read {
        /// Path to the file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Settings were given in a format other than TOML or JSON.
    #[error("unsupported settings format `{format}`, expected toml or json")]
    UnsupportedFormat {
        /// The format name or file the format was taken from.
        format: String,
    },

    /// Malformed TOML, or TOML naming an unknown key.
    #[error("malformed TOML settings: {0}")]
    Toml(#[from] toml::de::Error),

    /// Malformed JSON, or JSON naming an unknown key.
    #[error("malformed JSON settings: {0}")]
    Json(#[from] serde_json::Error),

    /// A setting parsed but breaks a rule checked by `Settings::validate`.
    #[error("setting `{key}` {rule}")]
    Invalid {
        /// Dotted settings key, e.g. `server.port`.
        key: &'static str,
        /// The rule the value breaks.
        rule: String,
    },

    /// An environment override could not be parsed.
    #[error("environment override {var} must be {expected}")]
    Env {
        /// The environment variable name.
        var: String,
        /// What the value should look like.
        expected: &'static str,
    },

    /// `.env` file could not be loaded.
    #[error("failed to load .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
}

impl ConfigError {
    pub(crate) fn missing(path: impl Into<PathBuf>) -> Self {
        Self::Missing { path: path.into() }
    }

    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub(crate) fn invalid(key: &'static str, rule: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            rule: rule.into(),
        }
    }

    pub(crate) fn env(var: impl Into<String>, expected: &'static str) -> Self {
        Self::Env {
            var: var.into(),
            expected,
        }
    }

    /// The dotted settings key a validation error refers to.
    #[must_use]
    pub const fn key(&self) -> Option<&'static str> {
        match self {
            Self::Invalid { key, .. } => Some(*key),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_names_path() {
        let err = ConfigError::missing("/path/to/restmount.toml");
        assert_eq!(err.to_string(), "no settings file at /path/to/restmount.toml");
    }

    #[test]
    fn test_invalid_reads_as_sentence() {
        let err = ConfigError::invalid("server.port", "must be non-zero");
        assert_eq!(err.to_string(), "setting `server.port` must be non-zero");
        assert_eq!(err.key(), Some("server.port"));
    }

    #[test]
    fn test_env_override() {
        let err = ConfigError::env("RESTMOUNT__SERVER__PORT", "a port number");
        assert_eq!(
            err.to_string(),
            "environment override RESTMOUNT__SERVER__PORT must be a port number"
        );
        assert_eq!(err.key(), None);
    }

    #[test]
    fn test_unsupported_format() {
        let err = ConfigError::unsupported_format("yaml");
        assert!(err.to_string().contains("`yaml`"));
    }
}
