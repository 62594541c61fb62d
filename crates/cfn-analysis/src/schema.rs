//! The subset of JSON Schema used to validate templates.

use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// An error that occurred while loading a schema.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// An error occurring in [`serde_json`].
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// An error occurring in [`serde_yaml_ng`].
    #[error(transparent)]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// The value of a schema's `type` keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    /// A single type name.
    Single(String),
    /// A set of type names.
    Multiple(Vec<String>),
}

impl SchemaType {
    /// Gets an iterator over the type names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        let names: &[String] = match self {
            Self::Single(name) => std::slice::from_ref(name),
            Self::Multiple(names) => names,
        };

        names.iter().map(String::as_str)
    }

    /// Determines if the given type name is permitted.
    pub fn contains(&self, name: &str) -> bool {
        self.names().any(|n| n == name)
    }
}

/// The value of an `exclusiveMinimum` or `exclusiveMaximum` keyword.
///
/// Draft-04 schemas use a boolean that modifies `minimum`/`maximum`; later
/// drafts use a number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExclusiveBound {
    /// A draft-04 boolean flag.
    Flag(bool),
    /// A numeric limit.
    Limit(f64),
}

impl ExclusiveBound {
    /// Determines if the bound makes the corresponding `minimum` or
    /// `maximum` exclusive.
    ///
    /// A numeric limit counts as set unless it is zero.
    pub fn is_set(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Limit(limit) => *limit != 0.0 && !limit.is_nan(),
        }
    }
}

/// A JSON schema.
///
/// Only the keywords used during validation and mutation are modeled; every
/// other keyword is preserved in [`JsonSchema::extra`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSchema {
    /// The `type` keyword.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<SchemaType>,

    /// The `definitions` keyword, mapping definition names to schemas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definitions: Option<IndexMap<String, JsonSchema>>,

    /// The `properties` keyword.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, JsonSchema>>,

    /// The `required` keyword.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    /// The `items` keyword, when it is a single schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<JsonSchema>>,

    /// The `enum` keyword.
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    /// The `const` keyword.
    #[serde(rename = "const", default, skip_serializing_if = "Option::is_none")]
    pub const_value: Option<Value>,

    /// The `multipleOf` keyword.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,

    /// The `minimum` keyword.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    /// The `maximum` keyword.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    /// The `exclusiveMinimum` keyword.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<ExclusiveBound>,

    /// The `exclusiveMaximum` keyword.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<ExclusiveBound>,

    /// Every other keyword of the schema.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl JsonSchema {
    /// Determines if the schema's `type` keyword permits integers.
    pub fn type_is_integer(&self) -> bool {
        self.ty.as_ref().is_some_and(|ty| ty.contains("integer"))
    }

    /// Gets the schema of the named definition.
    pub fn definition(&self, name: &str) -> Option<&JsonSchema> {
        self.definitions.as_ref()?.get(name)
    }

    /// Gets the schema of the named property.
    pub fn property(&self, name: &str) -> Option<&JsonSchema> {
        self.properties.as_ref()?.get(name)
    }
}

/// A schema whose references have been resolved, along with any errors
/// encountered while resolving them.
///
/// A resolved schema is immutable; adjusting it produces a new value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedSchema {
    /// The resolved schema.
    schema: JsonSchema,
    /// The errors encountered while resolving the schema.
    errors: Vec<String>,
}

impl ResolvedSchema {
    /// Creates a new resolved schema with no resolution errors.
    pub fn new(schema: JsonSchema) -> Self {
        Self {
            schema,
            errors: Vec::new(),
        }
    }

    /// Creates a new resolved schema with the given resolution errors.
    pub fn with_errors(schema: JsonSchema, errors: Vec<String>) -> Self {
        Self { schema, errors }
    }

    /// Parses a resolved schema from JSON text.
    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        Ok(Self::new(serde_json::from_str(text)?))
    }

    /// Parses a resolved schema from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, SchemaError> {
        Ok(Self::new(serde_yaml_ng::from_str(text)?))
    }

    /// Gets the resolved schema.
    pub fn schema(&self) -> &JsonSchema {
        &self.schema
    }

    /// Gets the errors encountered while resolving the schema.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}
