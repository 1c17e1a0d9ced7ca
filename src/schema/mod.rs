//! The JSON Typedef schema model.
//!
//! [`Schema`] is the validated, sum-typed in-memory representation;
//! [`RawSchema`] is the wide document shape it is parsed from and serialized
//! back into. [`normalize`] enforces the wire-compatibility policy before
//! generation.

mod form;
mod normalize;
mod raw;

pub use form::{DiscriminatorForm, Form, PrimitiveType, PropertiesForm, Schema};
pub use normalize::normalize;
pub use raw::RawSchema;
