//! Swagger 2.0 document types and the incremental document builder.
//!
//! The document is assembled while controllers are registered and then
//! frozen. [`DocumentBuilder`] owns the mutable state during registration;
//! [`DocumentBuilder::freeze`] turns it into a shareable [`ApiDocument`].
//!
//! ## Swagger 2.0 Compliance
//!
//! The types in this module follow the Swagger 2.0 specification:
//! <https://swagger.io/specification/v2/>

use std::ops::Deref;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::DocsResult;
use crate::schema::{Definitions, ModelSchema, Schema, SchemaType, REF_DEFINITIONS};
use crate::security::{SecurityDefinition, SecurityRequirement};

/// Swagger specification version emitted by the builder.
pub const SWAGGER_VERSION: &str = "2.0";

/// Description given to the response every route starts with.
pub const DEFAULT_RESPONSE_DESCRIPTION: &str = "successful operation";

/// Operations of a single path keyed by lower-case method name.
pub type PathItem = IndexMap<String, Operation>;

/// All documented paths.
pub type Paths = IndexMap<String, PathItem>;

/// Swagger document root object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Swagger version (always "2.0").
    pub swagger: String,
    /// API metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Info>,
    /// Host (name or IP, optionally with port) serving the API.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub host: String,
    /// Path prefix all documented paths are relative to.
    #[serde(rename = "basePath")]
    pub base_path: String,
    /// Transfer protocols.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemes: Vec<String>,
    /// Global consumed MIME types.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<String>,
    /// Global produced MIME types.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,
    /// Documented paths.
    pub paths: Paths,
    /// Model definitions.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub definitions: Definitions,
    /// Security schemes referenced by operations.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    #[serde(rename = "securityDefinitions")]
    pub security_definitions: IndexMap<String, SecurityDefinition>,
    /// Global security requirements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<SecurityRequirement>,
    /// Controller tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    /// External documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "externalDocs")]
    pub external_docs: Option<ExternalDocs>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            swagger: SWAGGER_VERSION.to_string(),
            info: None,
            host: String::new(),
            base_path: "/".to_string(),
            schemes: Vec::new(),
            consumes: Vec::new(),
            produces: Vec::new(),
            paths: Paths::new(),
            definitions: Definitions::new(),
            security_definitions: IndexMap::new(),
            security: Vec::new(),
            tags: Vec::new(),
            external_docs: None,
        }
    }
}

/// API metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Info {
    /// API title.
    pub title: String,
    /// API version.
    pub version: String,
    /// API description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Terms of service URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "termsOfService")]
    pub terms_of_service: Option<String>,
    /// Contact information.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    /// License information.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

/// Contact information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Contact name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Contact URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// License information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    /// License name.
    pub name: String,
    /// License URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Tag grouping the operations of one controller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name.
    pub name: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// External documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "externalDocs")]
    pub external_docs: Option<ExternalDocs>,
}

/// External documentation link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalDocs {
    /// URL.
    pub url: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Parameter location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterIn {
    /// URL path segment.
    Path,
    /// Query string.
    Query,
    /// HTTP header.
    Header,
    /// Request body.
    Body,
    /// Form field.
    FormData,
}

/// An operation parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Parameter location.
    #[serde(rename = "in")]
    pub location: ParameterIn,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether required.
    #[serde(default)]
    pub required: bool,
    /// Value type (all locations except body).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "type")]
    pub param_type: Option<SchemaType>,
    /// Value format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Item type for array parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// Array serialization format (e.g., "multi").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "collectionFormat")]
    pub collection_format: Option<String>,
    /// Body schema (body location only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

impl Parameter {
    fn new(name: impl Into<String>, location: ParameterIn) -> Self {
        Self {
            name: name.into(),
            location,
            description: None,
            required: false,
            param_type: None,
            format: None,
            items: None,
            collection_format: None,
            schema: None,
        }
    }

    /// Path parameter of type string.
    #[must_use]
    pub fn path(name: impl Into<String>, required: bool, description: impl Into<String>) -> Self {
        let mut param = Self::new(name, ParameterIn::Path);
        param.required = required;
        param.param_type = Some(SchemaType::String);
        param.with_description(description)
    }

    /// Query parameter of the given type.
    #[must_use]
    pub fn query(name: impl Into<String>, param_type: SchemaType) -> Self {
        let mut param = Self::new(name, ParameterIn::Query);
        param.param_type = Some(param_type);
        param
    }

    /// Header parameter of type string.
    #[must_use]
    pub fn header(name: impl Into<String>) -> Self {
        let mut param = Self::new(name, ParameterIn::Header);
        param.param_type = Some(SchemaType::String);
        param
    }

    /// Form field of the given type.
    #[must_use]
    pub fn form_data(name: impl Into<String>, param_type: SchemaType) -> Self {
        let mut param = Self::new(name, ParameterIn::FormData);
        param.param_type = Some(param_type);
        param
    }

    /// Required body parameter referencing a model by name.
    #[must_use]
    pub fn body(model: impl Into<String>) -> Self {
        let mut param = Self::new("body", ParameterIn::Body);
        param.required = true;
        param.schema = Some(Schema::reference(model));
        param
    }

    /// Adds a description; empty descriptions are dropped.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.is_empty()).then_some(description);
        self
    }

    /// Marks the parameter required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Turns the parameter into an array of `items`.
    #[must_use]
    pub fn array_of(mut self, items: Schema, collection_format: impl Into<String>) -> Self {
        self.param_type = Some(SchemaType::Array);
        self.items = Some(Box::new(items));
        self.collection_format = Some(collection_format.into());
        self
    }
}

/// Response header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Header type.
    #[serde(rename = "type")]
    pub header_type: SchemaType,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Response definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Description (required).
    pub description: String,
    /// Response body schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    /// Response headers.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, Header>,
}

impl Response {
    /// A response with only a description.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            schema: None,
            headers: IndexMap::new(),
        }
    }

    /// Attaches a body schema.
    #[must_use]
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }
}

/// Documentation for one (path, method) pair.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Operation {
    /// Tags for grouping.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Short summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Full description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unique operation identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "operationId")]
    pub operation_id: Option<String>,
    /// Consumed MIME types.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<String>,
    /// Produced MIME types.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,
    /// Parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Responses keyed by status code or `default`.
    pub responses: IndexMap<String, Response>,
    /// Whether deprecated.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
    /// Security requirements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<SecurityRequirement>,
}

impl Operation {
    /// An operation with the single `default` response every route
    /// starts from.
    #[must_use]
    pub fn with_default_response() -> Self {
        let mut operation = Self::default();
        operation.responses.insert(
            "default".to_string(),
            Response::new(DEFAULT_RESPONSE_DESCRIPTION),
        );
        operation
    }

    /// Adds a tag reference unless it is empty or already present.
    pub fn add_tag(&mut self, tag: &str) {
        if !tag.is_empty() && !self.tags.iter().any(|t| t == tag) {
            self.tags.push(tag.to_string());
        }
    }

    /// Names of all schemes in the security requirements, in order.
    pub fn security_schemes(&self) -> impl Iterator<Item = &str> {
        self.security
            .iter()
            .flat_map(|requirement| requirement.keys().map(String::as_str))
    }
}

/// Mutable document state held during registration.
///
/// # Example
///
/// ```
/// use restmount_docs::{DocumentBuilder, Operation};
///
/// let mut builder = DocumentBuilder::new();
/// builder.set_base_path("/api");
/// builder.set_path("/users", "get", Operation::with_default_response());
///
/// assert_eq!(builder.compare_base_path("/api/users"), (true, 4));
/// let doc = builder.freeze();
/// assert!(doc.paths["/users"].contains_key("get"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    doc: Document,
}

impl DocumentBuilder {
    /// Creates a builder for an empty document with base path `/`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets API metadata.
    pub fn set_info(&mut self, info: Info) -> &mut Self {
        self.doc.info = Some(info);
        self
    }

    /// Sets the host the API is served from.
    pub fn set_host(&mut self, host: impl Into<String>) -> &mut Self {
        self.doc.host = host.into();
        self
    }

    /// Sets the base path used to filter and relativize documented paths.
    pub fn set_base_path(&mut self, base_path: impl Into<String>) -> &mut Self {
        self.doc.base_path = base_path.into();
        self
    }

    /// Sets document-level external docs.
    pub fn set_external_docs(&mut self, docs: ExternalDocs) -> &mut Self {
        self.doc.external_docs = Some(docs);
        self
    }

    /// Appends a tag.
    pub fn add_tag(&mut self, tag: Tag) -> &mut Self {
        self.doc.tags.push(tag);
        self
    }

    /// Returns the configured base path.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.doc.base_path
    }

    /// Returns the document being built.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Stores `operation` under `path` and `method`.
    ///
    /// Response and body-parameter model references are rewritten to
    /// `#/definitions/<name>` when the model is registered; unknown names
    /// are left bare. An existing path keeps its other methods.
    pub fn set_path(
        &mut self,
        path: impl Into<String>,
        method: impl Into<String>,
        mut operation: Operation,
    ) -> &mut Self {
        for response in operation.responses.values_mut() {
            let Some(schema) = response.schema.as_mut() else {
                continue;
            };
            if !self.resolve_reference(schema) {
                if let Some(items) = schema.items.as_deref_mut() {
                    self.resolve_reference(items);
                }
            }
        }

        for param in &mut operation.parameters {
            if param.location != ParameterIn::Body {
                continue;
            }
            if let Some(schema) = param.schema.as_mut() {
                self.resolve_reference(schema);
            }
        }

        let path = path.into();
        let method = method.into();
        tracing::debug!(path = %path, method = %method, "documenting operation");
        self.doc
            .paths
            .entry(path)
            .or_default()
            .insert(method, operation);
        self
    }

    /// Inserts or replaces a named security scheme.
    pub fn set_security_definition(
        &mut self,
        name: impl Into<String>,
        definition: SecurityDefinition,
    ) -> &mut Self {
        self.doc.security_definitions.insert(name.into(), definition);
        self
    }

    /// Converts each model and merges its definitions.
    ///
    /// Definitions with the same name are replaced by the later model.
    pub fn set_definitions(&mut self, models: &[&dyn ModelSchema]) -> &mut Self {
        for model in models {
            self.doc.definitions.extend(model.definitions());
        }
        self
    }

    /// Checks whether `path` lies under the base path.
    ///
    /// Returns `true` only when `path` is strictly longer than the base path
    /// and starts with it. The base path length is returned either way.
    #[must_use]
    pub fn compare_base_path(&self, path: &str) -> (bool, usize) {
        let base = self.doc.base_path.as_str();
        (path.len() > base.len() && path.starts_with(base), base.len())
    }

    /// Appends transfer schemes.
    pub fn set_schemes<I, S>(&mut self, schemes: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.doc.schemes.extend(schemes.into_iter().map(Into::into));
        self
    }

    /// Appends `:port` to the host unless it already carries one.
    pub fn set_port(&mut self, port: u16) -> &mut Self {
        if !self.doc.host.contains(':') {
            self.doc.host.push_str(&format!(":{port}"));
        }
        self
    }

    /// Finishes registration and returns the shareable document.
    #[must_use]
    pub fn freeze(self) -> ApiDocument {
        ApiDocument(Arc::new(self.doc))
    }

    // Rewrites a bare reference to a registered model; returns whether it did.
    fn resolve_reference(&self, schema: &mut Schema) -> bool {
        match schema.reference.as_deref() {
            Some(name) if self.doc.definitions.contains_key(name) => {
                schema.reference = Some(format!("{REF_DEFINITIONS}{name}"));
                true
            }
            _ => false,
        }
    }
}

/// A frozen, cheaply clonable API document.
#[derive(Debug, Clone)]
pub struct ApiDocument(Arc<Document>);

impl ApiDocument {
    /// Serializes the document to compact JSON.
    pub fn to_json(&self) -> DocsResult<Vec<u8>> {
        Ok(serde_json::to_vec(self.0.as_ref())?)
    }

    /// Serializes the document to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> DocsResult<String> {
        Ok(serde_json::to_string_pretty(self.0.as_ref())?)
    }
}

impl Deref for ApiDocument {
    type Target = Document;

    fn deref(&self) -> &Document {
        &self.0
    }
}
