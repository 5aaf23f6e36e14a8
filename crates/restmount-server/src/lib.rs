//! # Restmount Server
//!
//! Route registration, API document synthesis and lifecycle for Restmount.
//!
//! This crate provides:
//!
//! - [`Server`]: collects controllers and starts an external web server
//! - [`WebServer`]: the contract that web server fulfils
//! - Authorization wiring ([`Authorization`], [`Permission`])
//! - [`ApiDocsController`] serving the generated Swagger 2.0 document
//!
//! ## Example
//!
//! ```rust,ignore
//! use restmount_server::{ApiDocsController, Server, ServerConfig};
//!
//! let mut server = Server::new(backend, ServerConfig::from_settings(&settings).build());
//! server.register(UsersController).set_path("/api/v1");
//! server
//!     .register(ApiDocsController)
//!     .set_path("/")
//!     .set_name("swagger.json")
//!     .hide();
//! server.start()?;
//! ```

#![doc(html_root_url = "https://docs.rs/restmount-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod auth;
mod backend;
mod config;
mod docs;
mod error;
mod registrar;
mod server;

#[cfg(test)]
mod testing;

pub use auth::{
    ApiKeyAuth, Authorization, BasicAuth, BasicVerifier, OAuth2Auth, Permission,
    PermissionChecker, TokenVerifier, UnauthorizedHook,
};
pub use backend::WebServer;
pub use config::{ServerConfig, ServerConfigBuilder, StaticMount, TlsFiles, DEFAULT_HOST, DEFAULT_PORT};
pub use docs::ApiDocsController;
pub use error::{BackendError, RegistrationError, ServerError};
pub use server::Server;
