#![deny(missing_docs)]

//! # Swagger 2.0 Models
//!
//! Serializable output structures. Field order here is the key order of the
//! emitted JSON; maps are `IndexMap`s so insertion order is preserved.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Number;

/// Schema version emitted at the document root.
pub const SWAGGER_VERSION: &str = "2.0";
/// Name of the bearer security scheme.
pub const BEARER_SCHEME: &str = "Bearer";
/// Prefix of local definition references.
pub const DEFINITIONS_REF_PREFIX: &str = "#/definitions/";

/// Builds `#/definitions/<name>`.
pub fn definition_ref(name: &str) -> String {
    format!("{}{}", DEFINITIONS_REF_PREFIX, name)
}

/// Root Swagger object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwaggerDocument {
    /// Always `"2.0"`.
    pub swagger: String,
    /// API metadata.
    pub info: InfoObject,
    /// Optional host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Optional base path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    /// Transfer protocols.
    pub schemes: Vec<String>,
    /// Accepted request content types.
    pub consumes: Vec<String>,
    /// Produced response content types.
    pub produces: Vec<String>,
    /// Path table, keyed by rewritten path.
    pub paths: IndexMap<String, PathItem>,
    /// Named schema definitions.
    pub definitions: IndexMap<String, SchemaObject>,
    /// Available security schemes.
    pub security_definitions: IndexMap<String, SecurityScheme>,
}

impl SwaggerDocument {
    /// Converts the document into a generic JSON value.
    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

/// `info` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InfoObject {
    /// API title.
    pub title: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// API version.
    pub version: String,
    /// Optional contact details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactObject>,
}

/// `contact` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContactObject {
    /// Contact name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Contact email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A security scheme entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityScheme {
    /// Scheme type, e.g. `apiKey`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Human readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Header or query parameter name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Location of the key.
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Operations attached to one path. Only the five supported methods exist.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PathItem {
    /// GET operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    /// DELETE operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    /// POST operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    /// PUT operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    /// PATCH operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
}

impl PathItem {
    /// Mutable slot for an HTTP method, `None` when the method is unsupported.
    pub fn slot_mut(&mut self, method: &str) -> Option<&mut Option<Operation>> {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Some(&mut self.get),
            "DELETE" => Some(&mut self.delete),
            "POST" => Some(&mut self.post),
            "PUT" => Some(&mut self.put),
            "PATCH" => Some(&mut self.patch),
            _ => None,
        }
    }

    /// Operation registered for an HTTP method.
    pub fn operation(&self, method: &str) -> Option<&Operation> {
        match method.to_ascii_uppercase().as_str() {
            "GET" => self.get.as_ref(),
            "DELETE" => self.delete.as_ref(),
            "POST" => self.post.as_ref(),
            "PUT" => self.put.as_ref(),
            "PATCH" => self.patch.as_ref(),
            _ => None,
        }
    }
}

/// Security requirement: scheme name -> scopes.
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

/// One operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Short summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Longer description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The handler name.
    pub operation_id: String,
    /// Responses keyed by status code.
    pub responses: IndexMap<String, ResponseObject>,
    /// Parameters in emission order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Grouping tags.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Per-operation security requirements.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,
}

/// A response entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResponseObject {
    /// Response description.
    pub description: String,
    /// Response schema; empty when the response type is absent or anonymous.
    pub schema: SchemaObject,
}

/// Where a parameter travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// URL path segment.
    Path,
    /// Query string.
    Query,
    /// HTTP header.
    Header,
    /// Request body.
    Body,
}

/// A parameter entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Location.
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// Whether the parameter is mandatory.
    pub required: bool,
    /// Primitive type (non-body parameters).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Primitive format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Element schema for array parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaObject>>,
    /// Allowed values.
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    /// Default value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Example value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    /// Body schema (body parameters only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaObject>,
}

impl Parameter {
    /// A required string parameter at the given location.
    pub fn string(name: impl Into<String>, location: ParameterLocation) -> Self {
        Self {
            name: name.into(),
            description: None,
            location,
            required: true,
            kind: Some("string".to_string()),
            format: None,
            items: None,
            enum_values: Vec::new(),
            default: None,
            example: None,
            schema: None,
        }
    }

    /// The single body parameter referencing a definition.
    pub fn body(definition: &str) -> Self {
        Self {
            name: "body".to_string(),
            kind: None,
            schema: Some(SchemaObject::reference(definition)),
            ..Self::string("", ParameterLocation::Body)
        }
    }
}

/// A schema fragment or named definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaObject {
    /// Primitive or structural type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Type format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Reference to a named definition.
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Example value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    /// Array element schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaObject>>,
    /// Allowed values.
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    /// Default value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Object properties, in declaration order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, SchemaObject>>,
    /// Free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Title (the struct name for definitions).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Inclusive lower bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,
    /// Whether `minimum` is exclusive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<bool>,
    /// Inclusive upper bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,
    /// Whether `maximum` is exclusive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<bool>,
    /// Minimum string length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    /// Maximum string length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    /// Minimum array length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    /// Maximum array length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    /// Required property keys.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl SchemaObject {
    /// `{ "type": kind }` with an optional format.
    pub fn primitive(kind: &str, format: Option<&str>) -> Self {
        Self {
            kind: Some(kind.to_string()),
            format: format.map(String::from),
            ..Self::default()
        }
    }

    /// `{ "$ref": "#/definitions/<name>" }`.
    pub fn reference(name: &str) -> Self {
        Self {
            reference: Some(definition_ref(name)),
            ..Self::default()
        }
    }

    /// `{ "type": "array", "items": inner }`.
    pub fn array(items: SchemaObject) -> Self {
        Self {
            kind: Some("array".to_string()),
            items: Some(Box::new(items)),
            ..Self::default()
        }
    }

    /// `{ "type": "object" }`.
    pub fn object() -> Self {
        Self::primitive("object", None)
    }
}
