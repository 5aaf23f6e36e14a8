//! Server error types.

use restmount_core::{CapabilityError, Method};
use thiserror::Error;

/// Error reported by the external web server.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The listener could not be started.
    #[error("failed to listen on {addr}: {message}")]
    Listen {
        /// Address that was requested.
        addr: String,
        /// Backend-specific reason.
        message: String,
    },

    /// A route was rejected.
    #[error("route rejected: {0}")]
    Route(String),

    /// TLS could not be configured.
    #[error("TLS setup failed: {0}")]
    Tls(String),

    /// I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A controller could not be registered.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// A verb capability failed while describing its route.
    #[error("controller '{controller}' failed to describe its {method} route")]
    Capability {
        /// Controller name.
        controller: String,
        /// Verb being described.
        method: Method,
        /// Error returned by the capability.
        #[source]
        source: CapabilityError,
    },

    /// The web server refused a binding.
    #[error("failed to bind {method} {path}")]
    Binding {
        /// Verb being bound.
        method: Method,
        /// Path in the web server's syntax.
        path: String,
        /// Error returned by the web server.
        #[source]
        source: BackendError,
    },
}

/// Errors returned by [`Server`](crate::Server) lifecycle calls.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Registration failed; earlier bindings remain on the web server.
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// The web server failed to start or stop.
    #[error("web server error: {0}")]
    Backend(#[from] BackendError),

    /// `start` was called twice.
    #[error("server already started")]
    AlreadyStarted,

    /// `stop` was called before `start`.
    #[error("server not started")]
    NotStarted,
}
