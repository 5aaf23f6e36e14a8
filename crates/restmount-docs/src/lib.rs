//! # Restmount Docs
//!
//! Swagger 2.0 document synthesis for the Restmount framework.
//!
//! This crate provides:
//! - **Document model** mirroring the Swagger 2.0 object graph
//! - **[`DocumentBuilder`]** accumulating paths, definitions and security
//!   schemes while controllers are registered
//! - **[`ApiDocument`]** the frozen, shareable result served at runtime
//! - **[`ModelSchema`]** the seam through which models contribute
//!   definitions
//!
//! ## Quick Start
//!
//! ```rust
//! use restmount_docs::{DocumentBuilder, NamedModel, Operation, Response, Schema};
//!
//! let mut builder = DocumentBuilder::new();
//! builder.set_definitions(&[&NamedModel::new("User", Schema::object())]);
//!
//! let mut op = Operation::with_default_response();
//! op.responses.insert(
//!     "200".to_string(),
//!     Response::new("the user").with_schema(Schema::reference("User")),
//! );
//! builder.set_path("/users/{id}", "get", op);
//!
//! let doc = builder.freeze();
//! let json = doc.to_json_pretty().unwrap();
//! assert!(json.contains("#/definitions/User"));
//! ```

#![doc(html_root_url = "https://docs.rs/restmount-docs/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod document;
mod error;
mod schema;
mod security;

pub use document::{
    ApiDocument, Contact, Document, DocumentBuilder, ExternalDocs, Header, Info, License,
    Operation, Parameter, ParameterIn, PathItem, Paths, Response, Tag,
    DEFAULT_RESPONSE_DESCRIPTION, SWAGGER_VERSION,
};
pub use error::{DocsError, DocsResult};
pub use schema::{Definitions, ModelSchema, NamedModel, Schema, SchemaType, REF_DEFINITIONS};
pub use security::{
    ApiKeyLocation, OAuth2Flow, SecurityDefinition, SecurityRequirement, SecurityType,
};
