//! Minimal web server double for unit tests.

use std::path::{Path, PathBuf};

use restmount_core::{Handler, Method};

use crate::backend::WebServer;
use crate::error::BackendError;

#[derive(Default)]
pub(crate) struct StubServer {
    pub(crate) routes: Vec<(Method, String, Handler)>,
    pub(crate) statics: Vec<(String, PathBuf)>,
    pub(crate) listening: Option<String>,
    pub(crate) tls: bool,
    pub(crate) reject: Option<String>,
}

impl StubServer {
    pub(crate) fn bindings(&self) -> Vec<(Method, &str)> {
        self.routes
            .iter()
            .map(|(method, path, _)| (*method, path.as_str()))
            .collect()
    }
}

impl WebServer for StubServer {
    type App = Self;

    fn start(&mut self, addr: &str) -> Result<(), BackendError> {
        self.listening = Some(addr.to_string());
        Ok(())
    }

    fn start_tls(&mut self, addr: &str, _cert: &Path, _key: &Path) -> Result<(), BackendError> {
        self.tls = true;
        self.start(addr)
    }

    fn stop(&mut self) -> Result<(), BackendError> {
        self.listening = None;
        Ok(())
    }

    fn mount_static(&mut self, prefix: &str, root: &Path) {
        self.statics.push((prefix.to_string(), root.to_path_buf()));
    }

    fn add(&mut self, method: Method, path: &str, handler: Handler) -> Result<(), BackendError> {
        if self.reject.as_deref() == Some(path) {
            return Err(BackendError::Route(format!("{method} {path}")));
        }
        self.routes.push((method, path.to_string(), handler));
        Ok(())
    }

    fn convert_param(&self, name: &str) -> String {
        format!(":{name}")
    }

    fn app(&self) -> &Self::App {
        self
    }
}
