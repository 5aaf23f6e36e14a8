//! Typed configuration for Restmount servers.
//!
//! This crate provides:
//! - TOML and JSON configuration files
//! - `.env` loading and environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Example
//!
//! ```no_run
//! use restmount_config::ConfigLoader;
//!
//! # fn main() -> Result<(), restmount_config::ConfigError> {
//! let settings = ConfigLoader::new()
//!     .with_optional_file("restmount.toml")?
//!     .with_env_prefix("RESTMOUNT")
//!     .load()?;
//!
//! println!("listening on {}", settings.server.addr());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [server.tls]
//! dir = "/etc/restmount"
//! cert = "server.crt"
//! key = "server.key"
//!
//! [server.static]
//! prefix = "/assets"
//! root = "./public"
//!
//! [docs]
//! host = "api.example.com"
//! base_path = "/"
//! title = "Pet Store"
//! version = "1.0.0"
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden with `PREFIX__SECTION__KEY`, for example
//! `RESTMOUNT__SERVER__PORT=9000` or `RESTMOUNT__DOCS__BASE_PATH=/api`.

#![doc(html_root_url = "https://docs.rs/restmount-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::Settings;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{
    DocsSettings, LogFormat, LoggingSettings, ServerSettings, StaticSettings, TlsSettings,
};
