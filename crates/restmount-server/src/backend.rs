//! The contract an external web server fulfils.

use std::path::Path;

use restmount_core::{Handler, Method};

use crate::error::BackendError;

/// An HTTP server that Restmount registers routes with.
///
/// Restmount never handles connections itself. It pushes finished
/// `(method, path, handler)` bindings to an implementation of this trait
/// and then asks it to listen.
///
/// Paths handed to [`add`](WebServer::add) are already in the server's own
/// parameter syntax, produced segment by segment through
/// [`convert_param`](WebServer::convert_param).
pub trait WebServer {
    /// Application handle exposed to user code.
    type App;

    /// Starts listening on `addr` without TLS.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be started.
    fn start(&mut self, addr: &str) -> Result<(), BackendError>;

    /// Starts listening on `addr` with TLS.
    ///
    /// # Errors
    ///
    /// Returns an error if the certificate or key cannot be loaded or the
    /// listener cannot be started.
    fn start_tls(&mut self, addr: &str, cert: &Path, key: &Path) -> Result<(), BackendError>;

    /// Stops listening.
    ///
    /// # Errors
    ///
    /// Returns an error if shutdown fails.
    fn stop(&mut self) -> Result<(), BackendError>;

    /// Serves the files under `root` at `prefix`.
    fn mount_static(&mut self, prefix: &str, root: &Path);

    /// Binds `handler` to `method` and `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the binding.
    fn add(&mut self, method: Method, path: &str, handler: Handler) -> Result<(), BackendError>;

    /// Native token for the path parameter `name` (e.g. `id` becomes `:id`).
    fn convert_param(&self, name: &str) -> String;

    /// Application handle.
    fn app(&self) -> &Self::App;
}
