//! # Restmount
//!
//! **Controller-based route composition with generated Swagger 2.0 documents**
//!
//! Restmount sits between application controllers and an external HTTP
//! server:
//!
//! - Controllers declare which verbs they implement and describe each route
//! - Mount paths come from the controller's module path or an explicit path,
//!   with extra segments spliced in through suffixes
//! - Every exposed route is bound on the web server and documented in a
//!   Swagger 2.0 document that can be served as JSON
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use restmount::prelude::*;
//!
//! struct Users;
//!
//! impl Controller for Users {
//!     fn methods(&self) -> MethodSet {
//!         MethodSet::from([Method::Get])
//!     }
//!
//!     fn get(&self, route: &mut Route) -> CapabilityResult {
//!         route
//!             .set_handler(handler(|ctx| response::text(ctx.param("id").unwrap_or_default().to_string())))
//!             .path_param("id", "User id");
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = ConfigLoader::new().with_env_prefix("RESTMOUNT").load()?;
//!     init_logging(&LogConfig::from(&settings.logging))?;
//!
//!     let mut server = Server::new(my_web_server(), ServerConfig::from_settings(&settings).build());
//!     server.register(Users).set_path("/api");
//!     server.register(ApiDocsController).set_name("swagger.json").hide();
//!     server.start()?;
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/restmount/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use restmount_core as core;

// Re-export document types
pub use restmount_docs as docs;

// Re-export server types
pub use restmount_server as server;

// Re-export configuration types
pub use restmount_config as config;

// Re-export telemetry types
pub use restmount_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use restmount::prelude::*;
/// ```
pub mod prelude {
    pub use restmount_core::{
        handler, response, AuthScheme, CapabilityError, CapabilityResult, Context, Controller,
        Handler, HandlerError, HandlerResult, Identity, Method, MethodSet, RegisteredController,
        Route, Suffix,
    };

    // Document model
    pub use restmount_docs::{
        ApiDocument, ApiKeyLocation, ModelSchema, NamedModel, OAuth2Flow, Parameter, Response,
        Schema, SchemaType,
    };

    // Server and authorization
    pub use restmount_server::{
        ApiDocsController, ApiKeyAuth, Authorization, BasicAuth, OAuth2Auth, Permission, Server,
        ServerConfig, ServerError, WebServer,
    };

    // Configuration and logging
    pub use restmount_config::{ConfigLoader, Settings};
    pub use restmount_telemetry::{init_logging, LogConfig};
}
