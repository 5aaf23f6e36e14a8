//! Server lifecycle.
//!
//! [`Server`] collects controllers, then on [`start`](Server::start)
//! resolves their paths, registers every exposed verb with the web server,
//! freezes the API document and starts listening.

use restmount_core::{Controller, RegisteredController};
use restmount_docs::{ApiDocument, DocumentBuilder, ModelSchema};
use tracing::info;

use crate::backend::WebServer;
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::registrar::{DocumentSlot, Registrar};

/// Restmount server over an external web server `W`.
///
/// # Example
///
/// ```rust,ignore
/// use restmount_server::{ApiDocsController, Server, ServerConfig};
///
/// let mut server = Server::new(backend, ServerConfig::default());
/// server.register(UsersController).set_path("/api");
/// server.register(ApiDocsController).set_name("swagger.json").hide();
/// server.start()?;
/// ```
pub struct Server<W: WebServer> {
    config: ServerConfig,
    backend: W,
    controllers: Vec<RegisteredController>,
    docs: Option<DocumentBuilder>,
    slot: DocumentSlot,
    started: bool,
}

impl<W: WebServer> Server<W> {
    /// Creates a server and mounts the configured static directory.
    pub fn new(mut backend: W, config: ServerConfig) -> Self {
        if let Some(mount) = config.static_files() {
            info!(prefix = %mount.prefix, root = %mount.root.display(), "serving static files");
            backend.mount_static(&mount.prefix, &mount.root);
        }

        let mut docs = DocumentBuilder::new();
        docs.set_info(config.info())
            .set_host(&config.docs().host)
            .set_base_path(&config.docs().base_path);

        Self {
            config,
            backend,
            controllers: Vec::new(),
            docs: Some(docs),
            slot: DocumentSlot::default(),
            started: false,
        }
    }

    /// Registers a controller and returns its handle for further settings.
    pub fn register<C: Controller>(&mut self, controller: C) -> &mut RegisteredController {
        self.push(RegisteredController::new(controller))
    }

    /// Registers an already built controller handle.
    pub fn register_controller(
        &mut self,
        controller: RegisteredController,
    ) -> &mut RegisteredController {
        self.push(controller)
    }

    fn push(&mut self, controller: RegisteredController) -> &mut RegisteredController {
        let index = self.controllers.len();
        self.controllers.push(controller);
        &mut self.controllers[index]
    }

    /// Adds model definitions to the document.
    ///
    /// Has no effect once the server has started.
    pub fn set_definitions(&mut self, models: &[&dyn ModelSchema]) -> &mut Self {
        match self.docs.as_mut() {
            Some(docs) => {
                docs.set_definitions(models);
            }
            None => tracing::warn!("definitions added after start are ignored"),
        }
        self
    }

    /// Document under construction, until `start` freezes it.
    pub fn docs_mut(&mut self) -> Option<&mut DocumentBuilder> {
        self.docs.as_mut()
    }

    /// The frozen API document, once started.
    #[must_use]
    pub fn document(&self) -> Option<&ApiDocument> {
        self.slot.get()
    }

    /// Server configuration.
    #[must_use]
    pub const fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Whether `start` got past registration.
    #[must_use]
    pub const fn is_started(&self) -> bool {
        self.started
    }

    /// The web server's application handle.
    pub fn web_server(&self) -> &W::App {
        self.backend.app()
    }

    /// The web server.
    pub const fn backend(&self) -> &W {
        &self.backend
    }

    /// The web server, mutably.
    pub fn backend_mut(&mut self) -> &mut W {
        &mut self.backend
    }

    /// Registers all controllers and starts listening.
    ///
    /// Controllers are processed in registration order and verbs in fixed
    /// order. The document is frozen before the web server starts.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::AlreadyStarted` on a second call, a
    /// registration error if a capability or binding fails, or the web
    /// server's error if it cannot listen. Bindings made before a
    /// registration failure are not removed, and the server stays
    /// unstarted.
    pub fn start(&mut self) -> Result<(), ServerError> {
        let Some(mut docs) = self.docs.take() else {
            return Err(ServerError::AlreadyStarted);
        };

        let resolved: Vec<_> = self
            .controllers
            .iter()
            .map(|controller| controller.resolve(docs.base_path()))
            .collect();

        for controller in resolved.iter().filter(|c| c.visible) {
            docs.add_tag(controller.tag.clone());
        }

        let mut registrar = Registrar {
            config: &self.config,
            docs: &mut docs,
            backend: &mut self.backend,
            slot: &self.slot,
        };
        for (controller, resolved) in self.controllers.iter().zip(&resolved) {
            registrar.register(resolved, controller.controller())?;
        }
        self.started = true;

        docs.set_port(self.config.port());
        docs.set_schemes([if self.config.is_tls() { "https" } else { "http" }]);
        self.slot.fill(docs.freeze());

        let addr = self.config.addr();
        match self.config.tls() {
            Some(tls) => {
                info!(addr = %addr, controllers = self.controllers.len(), "starting HTTPS server");
                self.backend.start_tls(&addr, &tls.cert, &tls.key)?;
            }
            None => {
                info!(addr = %addr, controllers = self.controllers.len(), "starting HTTP server");
                self.backend.start(&addr)?;
            }
        }
        Ok(())
    }

    /// Stops the web server.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::NotStarted` if `start` has not run, or the web
    /// server's error if shutdown fails.
    pub fn stop(&mut self) -> Result<(), ServerError> {
        if !self.started {
            return Err(ServerError::NotStarted);
        }
        info!("stopping server");
        self.backend.stop()?;
        self.started = false;
        Ok(())
    }
}

impl<W: WebServer + std::fmt::Debug> std::fmt::Debug for Server<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("config", &self.config)
            .field("backend", &self.backend)
            .field("controllers", &self.controllers.len())
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubServer;
    use restmount_core::{handler, response, CapabilityResult, Method, MethodSet, Route};
    use restmount_docs::{NamedModel, Schema};

    struct Pets;

    impl Controller for Pets {
        fn methods(&self) -> MethodSet {
            MethodSet::from([Method::Get])
        }

        fn get(&self, route: &mut Route) -> CapabilityResult {
            route.set_handler(handler(|_| response::text("pets")));
            Ok(())
        }
    }

    #[test]
    fn test_start_freezes_document_and_listens() {
        let config = ServerConfig::builder().host("127.0.0.1").port(9000).build();
        let mut server = Server::new(StubServer::default(), config);
        server.register(Pets).set_path("/v1").set_description("Pet operations");
        server.set_definitions(&[&NamedModel::new("Pet", Schema::object())]);

        assert!(server.document().is_none());
        server.start().unwrap();

        let doc = server.document().unwrap();
        assert_eq!(doc.host, "localhost:9000");
        assert_eq!(doc.schemes, vec!["http".to_string()]);
        assert!(doc.definitions.contains_key("Pet"));
        assert_eq!(doc.tags[0].name, "v1/pets");
        assert_eq!(doc.tags[0].description.as_deref(), Some("Pet operations"));
        assert_eq!(server.web_server().listening.as_deref(), Some("127.0.0.1:9000"));
        assert!(!server.backend().tls);
    }

    #[test]
    fn test_tls_start() {
        let config = ServerConfig::builder().tls("cert.pem", "key.pem").build();
        let mut server = Server::new(StubServer::default(), config);
        server.start().unwrap();
        assert!(server.backend().tls);
        assert_eq!(server.document().unwrap().schemes, vec!["https".to_string()]);
    }

    #[test]
    fn test_lifecycle_errors() {
        let mut server = Server::new(StubServer::default(), ServerConfig::default());
        assert!(matches!(server.stop(), Err(ServerError::NotStarted)));
        server.start().unwrap();
        assert!(matches!(server.start(), Err(ServerError::AlreadyStarted)));
        server.stop().unwrap();
        assert!(server.backend().listening.is_none());
    }

    #[test]
    fn test_static_mount_on_new() {
        let config = ServerConfig::builder().static_files("/assets", "./public").build();
        let server = Server::new(StubServer::default(), config);
        assert_eq!(server.backend().statics[0].0, "/assets");
    }
}
