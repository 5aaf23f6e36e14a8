//! Controllers and their mount path resolution.
//!
//! A controller is a user type implementing [`Controller`]. It declares the
//! verbs it serves through [`Controller::methods`] and describes each one by
//! filling in a [`Route`]. Registering it yields a [`RegisteredController`]
//! handle whose settings are resolved into a mount path and documentation
//! tag once, at server start.
//!
//! ## Path derivation
//!
//! Without an explicit path, the path is taken from the controller type's
//! module path after a `controllers` module: a type declared in
//! `app::controllers::web::section1` mounts under `/web/section1`. Without
//! an explicit name, the lower-cased type name is used. The final route
//! path is the (suffixed) path with the name appended.

use std::sync::Arc;

use restmount_docs::{ExternalDocs, Tag};

use crate::error::CapabilityError;
use crate::method::{Method, MethodSet};
use crate::path;
use crate::route::Route;
use crate::suffix::{self, Suffix};

/// Module name that roots namespace-derived controller paths.
pub const CONTROLLERS_MODULE: &str = "controllers";

/// Result of a verb capability.
pub type CapabilityResult = Result<(), CapabilityError>;

/// A resource handler exposing zero or more HTTP verbs.
///
/// Only verbs listed by [`methods`](Controller::methods) are visited. A
/// listed verb whose capability leaves the route without a handler is
/// skipped as well.
///
/// # Example
///
/// ```rust
/// use restmount_core::{handler, response, CapabilityResult, Controller, Method, MethodSet, Route};
///
/// struct Users;
///
/// impl Controller for Users {
///     fn methods(&self) -> MethodSet {
///         MethodSet::from([Method::Get])
///     }
///
///     fn get(&self, route: &mut Route) -> CapabilityResult {
///         route
///             .set_handler(handler(|_| response::text("all users")))
///             .set_summary("List users");
///         Ok(())
///     }
/// }
/// ```
pub trait Controller: Send + Sync + 'static {
    /// Verbs this controller implements.
    fn methods(&self) -> MethodSet;

    /// Describes the GET route.
    fn get(&self, _route: &mut Route) -> CapabilityResult {
        Ok(())
    }

    /// Describes the POST route.
    fn post(&self, _route: &mut Route) -> CapabilityResult {
        Ok(())
    }

    /// Describes the PUT route.
    fn put(&self, _route: &mut Route) -> CapabilityResult {
        Ok(())
    }

    /// Describes the DELETE route.
    fn delete(&self, _route: &mut Route) -> CapabilityResult {
        Ok(())
    }

    /// Describes the OPTIONS route.
    fn options(&self, _route: &mut Route) -> CapabilityResult {
        Ok(())
    }

    /// Describes the PATCH route.
    fn patch(&self, _route: &mut Route) -> CapabilityResult {
        Ok(())
    }

    /// Describes the HEAD route.
    fn head(&self, _route: &mut Route) -> CapabilityResult {
        Ok(())
    }

    /// Describes the CONNECT route.
    fn connect(&self, _route: &mut Route) -> CapabilityResult {
        Ok(())
    }

    /// Describes the TRACE route.
    fn trace(&self, _route: &mut Route) -> CapabilityResult {
        Ok(())
    }
}

/// Invokes the capability for `method` on `controller`.
pub fn describe(controller: &dyn Controller, method: Method, route: &mut Route) -> CapabilityResult {
    match method {
        Method::Get => controller.get(route),
        Method::Post => controller.post(route),
        Method::Put => controller.put(route),
        Method::Delete => controller.delete(route),
        Method::Options => controller.options(route),
        Method::Patch => controller.patch(route),
        Method::Head => controller.head(route),
        Method::Connect => controller.connect(route),
        Method::Trace => controller.trace(route),
    }
}

/// A registered controller and its declared settings.
pub struct RegisteredController {
    controller: Arc<dyn Controller>,
    type_name: &'static str,
    name: Option<String>,
    path: Option<String>,
    description: Option<String>,
    docs: Option<ExternalDocs>,
    suffixes: Vec<Suffix>,
    visible: bool,
}

impl std::fmt::Debug for RegisteredController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredController")
            .field("type_name", &self.type_name)
            .field("name", &self.name)
            .field("path", &self.path)
            .field("suffixes", &self.suffixes)
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

impl RegisteredController {
    /// Wraps a controller, remembering its type for path and name derivation.
    #[must_use]
    pub fn new<C: Controller>(controller: C) -> Self {
        Self::from_arc(Arc::new(controller), std::any::type_name::<C>())
    }

    /// Wraps a shared controller with an explicit type name.
    #[must_use]
    pub fn from_arc(controller: Arc<dyn Controller>, type_name: &'static str) -> Self {
        Self {
            controller,
            type_name,
            name: None,
            path: None,
            description: None,
            docs: None,
            suffixes: Vec::new(),
            visible: true,
        }
    }

    /// Overrides the derived name.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    /// Overrides the namespace-derived path.
    pub fn set_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the tag description.
    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    /// Links external documentation from the tag.
    pub fn set_docs(&mut self, description: impl Into<String>, url: impl Into<String>) -> &mut Self {
        let description = description.into();
        self.docs = Some(ExternalDocs {
            url: url.into(),
            description: (!description.is_empty()).then_some(description),
        });
        self
    }

    /// Appends suffixes, applied in declaration order.
    pub fn set_suffix<I>(&mut self, suffixes: I) -> &mut Self
    where
        I: IntoIterator<Item = Suffix>,
    {
        self.suffixes.extend(suffixes);
        self
    }

    /// Keeps the controller out of the API document. Its routes are still
    /// bound.
    pub fn hide(&mut self) -> &mut Self {
        self.visible = false;
        self
    }

    /// Returns the controller object.
    #[must_use]
    pub fn controller(&self) -> &dyn Controller {
        self.controller.as_ref()
    }

    /// Rust type name captured at registration.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether the controller appears in the API document.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Resolves the mount path and tag against the document base path.
    #[must_use]
    pub fn resolve(&self, base_path: &str) -> ResolvedController {
        let raw = match &self.path {
            Some(path) => path.clone(),
            None => namespace_path(self.type_name),
        };

        let natural: Vec<String> = raw.split('/').map(ToString::to_string).collect();
        let tree = suffix::splice(&natural, &self.suffixes);
        let mount = path::join([tree.join("/").as_str()]);

        let name = self
            .name
            .clone()
            .unwrap_or_else(|| short_type_name(self.type_name).to_string())
            .to_lowercase();

        let tag_name = tag_name(&mount, base_path, &name);
        let path = path::join([mount.as_str(), name.as_str()]);

        ResolvedController {
            name,
            path,
            tag: Tag {
                name: tag_name,
                description: self.description.clone(),
                external_docs: self.docs.clone(),
            },
            suffixes: self.suffixes.clone(),
            visible: self.visible,
        }
    }
}

/// A controller's settings after path and tag resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedController {
    /// Lower-cased controller name.
    pub name: String,
    /// Route path including the name as the last segment.
    pub path: String,
    /// Documentation tag.
    pub tag: Tag,
    /// Declared suffixes.
    pub suffixes: Vec<Suffix>,
    /// Whether the controller is documented.
    pub visible: bool,
}

fn tag_name(mount: &str, base_path: &str, name: &str) -> String {
    if mount.is_empty() || mount == "/" || !mount.starts_with(base_path) {
        return name.to_string();
    }
    let start = base_path.len();
    let (end, name) = match path::find_param(mount) {
        Some(token) => (token.end.max(start), ""),
        None => (mount.len(), name),
    };
    let prefix = mount[start..end].to_lowercase();
    path::join([prefix.as_str(), name])
        .trim_matches('/')
        .to_string()
}

fn strip_generics(type_name: &str) -> &str {
    type_name.split('<').next().unwrap_or(type_name)
}

fn short_type_name(type_name: &str) -> &str {
    let plain = strip_generics(type_name);
    plain.rsplit("::").next().unwrap_or(plain)
}

/// Path derived from the modules following `controllers` in a type path.
///
/// Returns an empty string when there is no such module.
#[must_use]
pub fn namespace_path(type_name: &str) -> String {
    let plain = strip_generics(type_name);
    let mut modules: Vec<&str> = plain.split("::").collect();
    modules.pop();
    match modules.iter().position(|m| *m == CONTROLLERS_MODULE) {
        Some(root) if root + 1 < modules.len() => format!("/{}", modules[root + 1..].join("/")),
        _ => String::new(),
    }
}
