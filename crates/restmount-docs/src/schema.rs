//! JSON Schema subset used by Swagger 2.0 and the model conversion seam.
//!
//! Restmount does not reflect over Rust types itself. Anything that can
//! describe its own definitions implements [`ModelSchema`]; the document
//! builder only merges what it is handed.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Prefix used for resolved model references.
pub const REF_DEFINITIONS: &str = "#/definitions/";

/// Model definitions keyed by definition name.
pub type Definitions = IndexMap<String, Schema>;

/// JSON Schema primitive type (plus the Swagger 2.0 `file` type).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// String type.
    String,
    /// Number type.
    Number,
    /// Integer type.
    Integer,
    /// Boolean type.
    Boolean,
    /// Array type.
    Array,
    /// Object type.
    Object,
    /// File upload (form parameters and responses only).
    File,
}

/// JSON Schema definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Schema type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "type")]
    pub schema_type: Option<SchemaType>,
    /// Schema format (e.g., "date-time", "int64").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Reference to a model, either bare (`User`) or resolved
    /// (`#/definitions/User`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    /// Object properties.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Schema>,
    /// Required properties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Array item schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// Enum values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[serde(rename = "enum")]
    pub enum_values: Vec<serde_json::Value>,
    /// allOf schemas.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[serde(rename = "allOf")]
    pub all_of: Vec<Schema>,
    /// Minimum value (for numbers).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Maximum value (for numbers).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Minimum length (for strings).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "minLength")]
    pub min_length: Option<u64>,
    /// Maximum length (for strings).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "maxLength")]
    pub max_length: Option<u64>,
    /// Pattern regex (for strings).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Default value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    /// Example value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,
}

impl Schema {
    /// Create a string schema.
    #[must_use]
    pub fn string() -> Self {
        Self::of_type(SchemaType::String)
    }

    /// Create an integer schema.
    #[must_use]
    pub fn integer() -> Self {
        Self::of_type(SchemaType::Integer)
    }

    /// Create a number schema.
    #[must_use]
    pub fn number() -> Self {
        Self::of_type(SchemaType::Number)
    }

    /// Create a boolean schema.
    #[must_use]
    pub fn boolean() -> Self {
        Self::of_type(SchemaType::Boolean)
    }

    /// Create an object schema.
    #[must_use]
    pub fn object() -> Self {
        Self::of_type(SchemaType::Object)
    }

    /// Create an array schema with the given item schema.
    #[must_use]
    pub fn array(items: Schema) -> Self {
        Self {
            schema_type: Some(SchemaType::Array),
            items: Some(Box::new(items)),
            ..Default::default()
        }
    }

    /// Create a model reference.
    ///
    /// Pass the bare model name; the document builder rewrites it to a
    /// `#/definitions/` pointer when the model is registered.
    #[must_use]
    pub fn reference(name: impl Into<String>) -> Self {
        Self {
            reference: Some(name.into()),
            ..Default::default()
        }
    }

    fn of_type(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Default::default()
        }
    }

    /// Add a format.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Add a description.
    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Add a property to an object schema.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Mark a property as required.
    #[must_use]
    pub fn required_property(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }
}

/// A model that can describe itself as schema definitions.
///
/// Implementations are the external model-to-schema converter: a derive,
/// a reflection crate, or hand-written schemas. A single model may
/// contribute several definitions (itself plus nested types).
pub trait ModelSchema {
    /// Returns the definitions contributed by this model.
    fn definitions(&self) -> Definitions;
}

/// A hand-built model definition.
///
/// ```
/// use restmount_docs::{ModelSchema, NamedModel, Schema};
///
/// let user = NamedModel::new(
///     "User",
///     Schema::object()
///         .property("id", Schema::integer())
///         .property("name", Schema::string()),
/// );
/// assert!(user.definitions().contains_key("User"));
/// ```
#[derive(Debug, Clone)]
pub struct NamedModel {
    name: String,
    schema: Schema,
}

impl NamedModel {
    /// Creates a model with a single definition.
    #[must_use]
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }

    /// Returns the definition name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl ModelSchema for NamedModel {
    fn definitions(&self) -> Definitions {
        let mut definitions = Definitions::new();
        definitions.insert(self.name.clone(), self.schema.clone());
        definitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_builders() {
        let array = Schema::array(Schema::string());
        assert_eq!(array.schema_type, Some(SchemaType::Array));
        assert!(array.items.is_some());

        let object = Schema::object()
            .property("name", Schema::string())
            .required_property("name");
        assert!(object.properties.contains_key("name"));
        assert_eq!(object.required, vec!["name".to_string()]);
    }

    #[test]
    fn test_reference_serializes_as_dollar_ref() {
        let json = serde_json::to_value(Schema::reference("User")).unwrap();
        assert_eq!(json, serde_json::json!({ "$ref": "User" }));
    }

    #[test]
    fn test_file_type_serialization() {
        let json = serde_json::to_string(&SchemaType::File).unwrap();
        assert_eq!(json, "\"file\"");
    }

    #[test]
    fn test_named_model_definitions() {
        let model = NamedModel::new("Pet", Schema::object());
        let definitions = model.definitions();
        assert_eq!(definitions.len(), 1);
        assert_eq!(model.name(), "Pet");
    }
}
