use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::form::{DiscriminatorForm, Form, PrimitiveType, PropertiesForm, Schema};
use crate::error::{Error, Result};

/// The wide, optional-field document shape of a schema node.
///
/// This is the exact keyword surface of RFC 8927, used in both directions:
/// deserialized from JSON5 documents during discovery, and serialized to
/// JSON for the external generator and the schema-constant artifacts.
/// Empty and false fields are omitted on output; `jtd-codegen` rejects
/// explicit nulls for absent keywords.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definitions: Option<BTreeMap<String, RawSchema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, Value>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub ref_: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<Box<RawSchema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, RawSchema>>,
    #[serde(
        rename = "optionalProperties",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub optional_properties: Option<BTreeMap<String, RawSchema>>,
    #[serde(
        rename = "additionalProperties",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Box<RawSchema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<BTreeMap<String, RawSchema>>,
}

impl RawSchema {
    /// Classify this document into the sum-type model.
    ///
    /// Fails when zero-or-one-form cannot be established (multiple keyword
    /// groups populated) or when an RFC 8927 structural rule is violated.
    /// The error names the offending node by breadcrumb path.
    pub fn into_schema(self) -> Result<Schema> {
        convert(self, "#")
    }
}

fn invalid(at: &str, reason: impl Into<String>) -> Error {
    Error::InvalidSchema {
        at: at.to_string(),
        reason: reason.into(),
    }
}

fn convert(raw: RawSchema, at: &str) -> Result<Schema> {
    let mut groups = Vec::new();
    if raw.ref_.is_some() {
        groups.push("ref");
    }
    if raw.type_.is_some() {
        groups.push("type");
    }
    if raw.enum_.is_some() {
        groups.push("enum");
    }
    if raw.elements.is_some() {
        groups.push("elements");
    }
    if raw.properties.is_some() || raw.optional_properties.is_some() {
        groups.push("properties");
    }
    if raw.values.is_some() {
        groups.push("values");
    }
    if raw.discriminator.is_some() || raw.mapping.is_some() {
        groups.push("discriminator");
    }
    if groups.len() > 1 {
        return Err(invalid(
            at,
            format!("multiple forms populated: {}", groups.join(", ")),
        ));
    }
    let group = groups.first().copied();
    if raw.additional_properties.is_some() && group != Some("properties") {
        return Err(invalid(
            at,
            "additionalProperties outside the properties form",
        ));
    }

    let mut definitions = BTreeMap::new();
    for (name, sub) in raw.definitions.unwrap_or_default() {
        let schema = convert(sub, &format!("{at}/definitions/{name}"))?;
        definitions.insert(name, schema);
    }

    let form = match group {
        None => Form::Empty,
        Some("ref") => Form::Ref(raw.ref_.unwrap_or_default()),
        Some("type") => {
            let tag = raw.type_.unwrap_or_default();
            let primitive = PrimitiveType::parse(&tag)
                .ok_or_else(|| invalid(at, format!("unknown type tag {tag:?}")))?;
            Form::Type(primitive)
        }
        Some("enum") => {
            let values = raw.enum_.unwrap_or_default();
            if values.is_empty() {
                return Err(invalid(at, "enum must not be empty"));
            }
            let mut seen = std::collections::BTreeSet::new();
            for value in &values {
                if !seen.insert(value) {
                    return Err(invalid(at, format!("duplicate enum value {value:?}")));
                }
            }
            Form::Enum(values)
        }
        Some("elements") => {
            let sub = raw.elements.unwrap_or_default();
            Form::Elements(Box::new(convert(*sub, &format!("{at}/elements"))?))
        }
        Some("properties") => {
            let mut required = BTreeMap::new();
            for (name, sub) in raw.properties.unwrap_or_default() {
                let schema = convert(sub, &format!("{at}/properties/{name}"))?;
                required.insert(name, schema);
            }
            let mut optional = BTreeMap::new();
            for (name, sub) in raw.optional_properties.unwrap_or_default() {
                if required.contains_key(&name) {
                    return Err(invalid(
                        at,
                        format!("property {name:?} is both required and optional"),
                    ));
                }
                let schema = convert(sub, &format!("{at}/optionalProperties/{name}"))?;
                optional.insert(name, schema);
            }
            Form::Properties(PropertiesForm {
                required,
                optional,
                additional: raw.additional_properties.unwrap_or(false),
            })
        }
        Some("values") => {
            let sub = raw.values.unwrap_or_default();
            Form::Values(Box::new(convert(*sub, &format!("{at}/values"))?))
        }
        Some("discriminator") => {
            let tag = raw
                .discriminator
                .ok_or_else(|| invalid(at, "mapping without discriminator"))?;
            let raw_mapping = raw
                .mapping
                .ok_or_else(|| invalid(at, "discriminator without mapping"))?;
            let mut mapping = BTreeMap::new();
            for (name, sub) in raw_mapping {
                let child_at = format!("{at}/mapping/{name}");
                let schema = convert(sub, &child_at)?;
                // RFC 8927: mapping values are non-nullable properties-form schemas.
                if !matches!(schema.form, Form::Properties(_)) {
                    return Err(invalid(
                        &child_at,
                        format!(
                            "mapping value must be a properties form, got {}",
                            schema.form.name()
                        ),
                    ));
                }
                if schema.nullable {
                    return Err(invalid(&child_at, "mapping value must not be nullable"));
                }
                mapping.insert(name, schema);
            }
            Form::Discriminator(DiscriminatorForm { tag, mapping })
        }
        Some(other) => return Err(invalid(at, format!("unknown form {other:?}"))),
    };

    Ok(Schema {
        form,
        definitions,
        metadata: raw.metadata.unwrap_or_default(),
        nullable: raw.nullable,
    })
}

impl From<&Schema> for RawSchema {
    fn from(schema: &Schema) -> Self {
        let mut raw = RawSchema {
            nullable: schema.nullable,
            ..RawSchema::default()
        };
        if !schema.definitions.is_empty() {
            raw.definitions = Some(map_to_raw(&schema.definitions));
        }
        if !schema.metadata.is_empty() {
            raw.metadata = Some(schema.metadata.clone());
        }
        match &schema.form {
            Form::Empty => {}
            Form::Ref(name) => raw.ref_ = Some(name.clone()),
            Form::Type(primitive) => raw.type_ = Some(primitive.as_str().to_string()),
            Form::Enum(values) => raw.enum_ = Some(values.clone()),
            Form::Elements(sub) => raw.elements = Some(Box::new(RawSchema::from(sub.as_ref()))),
            Form::Properties(props) => {
                if !props.required.is_empty() {
                    raw.properties = Some(map_to_raw(&props.required));
                }
                if !props.optional.is_empty() {
                    raw.optional_properties = Some(map_to_raw(&props.optional));
                }
                if props.additional {
                    raw.additional_properties = Some(true);
                }
            }
            Form::Values(sub) => raw.values = Some(Box::new(RawSchema::from(sub.as_ref()))),
            Form::Discriminator(disc) => {
                raw.discriminator = Some(disc.tag.clone());
                raw.mapping = Some(map_to_raw(&disc.mapping));
            }
        }
        raw
    }
}

fn map_to_raw(map: &BTreeMap<String, Schema>) -> BTreeMap<String, RawSchema> {
    map.iter()
        .map(|(name, schema)| (name.clone(), RawSchema::from(schema)))
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use serde_json::json;

    fn parse(doc: &str) -> Result<Schema> {
        let raw: RawSchema = json5::from_str(doc).expect("document parses");
        raw.into_schema()
    }

    #[test]
    fn test_empty_form() {
        let schema = parse("{}").unwrap();
        assert_eq!(schema.form, Form::Empty);
        assert!(!schema.nullable);
    }

    #[test]
    fn test_type_form() {
        let schema = parse(r#"{ "type": "string" }"#).unwrap();
        assert_eq!(schema.form, Form::Type(PrimitiveType::String));
    }

    #[test]
    fn test_unknown_type_tag_rejected() {
        let err = parse(r#"{ "type": "number" }"#).unwrap_err();
        assert!(err.to_string().contains("unknown type tag"));
    }

    #[test]
    fn test_multiple_forms_rejected() {
        let err = parse(r#"{ "type": "string", "enum": ["a"] }"#).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("multiple forms populated"), "{msg}");
        assert!(msg.contains("type") && msg.contains("enum"), "{msg}");
    }

    #[test]
    fn test_properties_form() {
        let schema = parse(
            r#"{
                // required and optional split
                "properties": { "id": { "type": "string" } },
                "optionalProperties": { "age": { "type": "uint8" } },
            }"#,
        )
        .unwrap();
        match schema.form {
            Form::Properties(props) => {
                assert!(props.required.contains_key("id"));
                assert!(props.optional.contains_key("age"));
                assert!(!props.additional);
            }
            other => panic!("expected properties form, got {}", other.name()),
        }
    }

    #[test]
    fn test_property_required_and_optional_rejected() {
        let err = parse(
            r#"{
                "properties": { "id": {} },
                "optionalProperties": { "id": {} }
            }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("both required and optional"));
    }

    #[test]
    fn test_additional_properties_outside_properties_rejected() {
        let err = parse(r#"{ "type": "string", "additionalProperties": true }"#).unwrap_err();
        assert!(err
            .to_string()
            .contains("additionalProperties outside the properties form"));
    }

    #[test]
    fn test_enum_rules() {
        assert!(parse(r#"{ "enum": [] }"#).is_err());
        assert!(parse(r#"{ "enum": ["a", "a"] }"#).is_err());
        let schema = parse(r#"{ "enum": ["a", "b"] }"#).unwrap();
        assert_eq!(schema.form, Form::Enum(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn test_discriminator_requires_mapping_of_properties() {
        let err = parse(r#"{ "discriminator": "kind" }"#).unwrap_err();
        assert!(err.to_string().contains("discriminator without mapping"));

        let err =
            parse(r#"{ "discriminator": "kind", "mapping": { "a": { "type": "string" } } }"#)
                .unwrap_err();
        assert!(err.to_string().contains("must be a properties form"));

        let schema = parse(
            r#"{
                "discriminator": "kind",
                "mapping": { "a": { "properties": { "x": {} } } }
            }"#,
        )
        .unwrap();
        assert!(matches!(schema.form, Form::Discriminator(_)));
    }

    #[test]
    fn test_breadcrumb_names_nested_node() {
        let err = parse(r#"{ "elements": { "type": "bogus" } }"#).unwrap_err();
        assert!(err.to_string().contains("#/elements"), "{err}");
    }

    #[test]
    fn test_unknown_keyword_rejected() {
        let raw: std::result::Result<RawSchema, _> = json5::from_str(r#"{ "additional": true }"#);
        assert!(raw.is_err());
    }

    #[test]
    fn test_serialization_omits_empty_fields() {
        let schema = parse(r#"{ "properties": { "id": { "type": "string" } } }"#).unwrap();
        let value = serde_json::to_value(RawSchema::from(&schema)).unwrap();
        assert_eq!(
            value,
            json!({ "properties": { "id": { "type": "string" } } })
        );
    }

    #[test]
    fn test_serialization_keeps_additional_and_nullable() {
        let schema = parse(
            r#"{ "properties": { "id": {} }, "additionalProperties": true, "nullable": true }"#,
        )
        .unwrap();
        let value = serde_json::to_value(RawSchema::from(&schema)).unwrap();
        assert_eq!(value["additionalProperties"], json!(true));
        assert_eq!(value["nullable"], json!(true));
    }

    #[test]
    fn test_roundtrip_preserves_structure() {
        let doc = r#"{
            "definitions": { "id": { "type": "string" } },
            "discriminator": "kind",
            "mapping": {
                "user": { "properties": { "id": { "ref": "id" } } }
            }
        }"#;
        let schema = parse(doc).unwrap();
        let raw = RawSchema::from(&schema);
        let reparsed = raw.clone().into_schema().unwrap();
        assert_eq!(schema, reparsed);
    }
}
