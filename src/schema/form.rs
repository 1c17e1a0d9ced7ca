use serde_json::Value;
use std::collections::BTreeMap;

/// A JSON Typedef schema node.
///
/// `form` is a genuine sum type, so a node carries exactly one of the eight
/// RFC 8927 shapes by construction. `definitions` holds the node's local
/// named sub-schemas and `metadata` carries opaque generation hints.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    pub form: Form,
    pub definitions: BTreeMap<String, Schema>,
    pub metadata: BTreeMap<String, Value>,
    pub nullable: bool,
}

impl Schema {
    /// An empty-form schema with no definitions or metadata.
    pub fn empty() -> Self {
        Schema::default()
    }
}

/// The eight mutually exclusive schema forms of RFC 8927.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Form {
    /// Matches any value.
    #[default]
    Empty,
    /// Reference to a named definition.
    Ref(String),
    /// A primitive type tag.
    Type(PrimitiveType),
    /// A closed set of allowed string values.
    Enum(Vec<String>),
    /// Homogeneous sequence of one sub-schema.
    Elements(Box<Schema>),
    /// A struct-like mapping of named sub-schemas.
    Properties(PropertiesForm),
    /// Homogeneous mapping with one value sub-schema.
    Values(Box<Schema>),
    /// Tagged union keyed by a discriminator field.
    Discriminator(DiscriminatorForm),
}

impl Form {
    /// Keyword-style name of the form, used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Form::Empty => "empty",
            Form::Ref(_) => "ref",
            Form::Type(_) => "type",
            Form::Enum(_) => "enum",
            Form::Elements(_) => "elements",
            Form::Properties(_) => "properties",
            Form::Values(_) => "values",
            Form::Discriminator(_) => "discriminator",
        }
    }
}

/// Payload of a properties-form node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertiesForm {
    /// Required property name → sub-schema.
    pub required: BTreeMap<String, Schema>,
    /// Optional property name → sub-schema.
    pub optional: BTreeMap<String, Schema>,
    /// Whether unknown properties are tolerated.
    pub additional: bool,
}

/// Payload of a discriminator-form node.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscriminatorForm {
    /// Name of the tag field.
    pub tag: String,
    /// Tag value → variant sub-schema.
    pub mapping: BTreeMap<String, Schema>,
}

/// The primitive type tags of RFC 8927.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    Boolean,
    String,
    Timestamp,
    Float32,
    Float64,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
}

impl PrimitiveType {
    /// The wire spelling of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::String => "string",
            PrimitiveType::Timestamp => "timestamp",
            PrimitiveType::Float32 => "float32",
            PrimitiveType::Float64 => "float64",
            PrimitiveType::Int8 => "int8",
            PrimitiveType::Uint8 => "uint8",
            PrimitiveType::Int16 => "int16",
            PrimitiveType::Uint16 => "uint16",
            PrimitiveType::Int32 => "int32",
            PrimitiveType::Uint32 => "uint32",
        }
    }

    /// Parse a wire spelling; `None` for unknown tags.
    pub fn parse(tag: &str) -> Option<Self> {
        Some(match tag {
            "boolean" => PrimitiveType::Boolean,
            "string" => PrimitiveType::String,
            "timestamp" => PrimitiveType::Timestamp,
            "float32" => PrimitiveType::Float32,
            "float64" => PrimitiveType::Float64,
            "int8" => PrimitiveType::Int8,
            "uint8" => PrimitiveType::Uint8,
            "int16" => PrimitiveType::Int16,
            "uint16" => PrimitiveType::Uint16,
            "int32" => PrimitiveType::Int32,
            "uint32" => PrimitiveType::Uint32,
            _ => return None,
        })
    }
}

impl std::fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
