use std::collections::BTreeMap;

use super::form::{DiscriminatorForm, Form, PropertiesForm, Schema};

/// Normalize a schema for wire compatibility.
///
/// Every properties-form node is forced to tolerate unknown fields
/// (`additional = true`) so that adding fields to a contract never breaks
/// old readers. The transform recurses through local definitions and then
/// structurally by form; all other payload data is left untouched.
///
/// Idempotent: normalizing twice yields the same schema as normalizing once.
pub fn normalize(schema: Schema) -> Schema {
    let Schema {
        form,
        definitions,
        metadata,
        nullable,
    } = schema;

    let definitions = normalize_map(definitions);
    let form = match form {
        Form::Empty | Form::Ref(_) | Form::Type(_) | Form::Enum(_) => form,
        Form::Elements(sub) => Form::Elements(Box::new(normalize(*sub))),
        Form::Properties(props) => Form::Properties(PropertiesForm {
            required: normalize_map(props.required),
            optional: normalize_map(props.optional),
            additional: true,
        }),
        Form::Values(sub) => Form::Values(Box::new(normalize(*sub))),
        Form::Discriminator(disc) => Form::Discriminator(DiscriminatorForm {
            tag: disc.tag,
            mapping: normalize_map(disc.mapping),
        }),
    };

    Schema {
        form,
        definitions,
        metadata,
        nullable,
    }
}

fn normalize_map(map: BTreeMap<String, Schema>) -> BTreeMap<String, Schema> {
    map.into_iter()
        .map(|(name, schema)| (name, normalize(schema)))
        .collect()
}
