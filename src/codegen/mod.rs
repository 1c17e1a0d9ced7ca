//! # Codegen Module
//!
//! Turns a normalized [`Api`](crate::api::Api) into generated source
//! artifacts by orchestrating the external `jtd-codegen` tool:
//!
//! ```text
//! API model → definitions artifact → per-endpoint request/response
//!           → schema constants → route table + handler trait
//! ```
//!
//! The definitions set is generated exactly once and its identifier mapping
//! is reused by every endpoint call. Because the external generator always
//! re-emits supplied definitions, endpoint calls receive empty-form
//! placeholders and the re-emitted one-line aliases are stripped from the
//! output afterwards; the route table binds each endpoint's verb and path
//! to a handler named after its request type.
//!
//! Every emitted file passes through `rustfmt` before it reaches disk.

mod generator;
mod project;
mod templates;

pub use generator::{strip_external_declarations, GeneratedType, JtdCodegen, TypeGenerator};
pub use project::{generate_project, generate_with, RouteRecord};
pub use templates::{rust_string_literal, sanitize_module_name, to_snake_case};
