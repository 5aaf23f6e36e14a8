//! # Restmount Core
//!
//! Core types for the Restmount framework.
//!
//! - [`Controller`] - a resource object exposing per-verb capabilities
//! - [`RegisteredController`] - registration handle, resolves mount path and tag
//! - [`Route`] - per-verb route description filled in by a capability
//! - [`Suffix`] and [`suffix::insert`] - path segment splicing
//! - [`path`] - the `{identifier}` path template tokenizer
//! - [`Context`], [`Handler`], [`HandlerError`] - request-time types

#![doc(html_root_url = "https://docs.rs/restmount-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
pub mod controller;
mod error;
mod handler;
mod identity;
mod method;
pub mod path;
mod route;
mod scheme;
pub mod suffix;

pub use context::{Context, PathParams, RequestId};
pub use controller::{
    describe, CapabilityResult, Controller, RegisteredController, ResolvedController,
};
pub use error::{CapabilityError, HandlerError, HandlerResult};
pub use handler::{handler, response, Handler};
pub use identity::Identity;
pub use method::{Method, MethodSet, UnknownMethod};
pub use route::Route;
pub use scheme::{AuthScheme, UnknownScheme};
pub use suffix::Suffix;
