//! API model and schema directory discovery.

mod discover;
mod types;

pub use discover::{discover, SCHEMA_EXTENSION};
pub use types::{Api, Definition, Endpoint};
