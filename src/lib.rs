//! # rpcgen
//!
//! **rpcgen** is a schema-driven RPC contract compiler. It discovers
//! endpoint and type definitions from a conventionally-structured directory
//! of [JSON Typedef](https://jsontypedef.com) documents written in JSON5,
//! normalizes them, and drives the external `jtd-codegen` tool to produce
//! typed Rust request/response artifacts plus a routing table for a
//! generated server.
//!
//! ## Architecture
//!
//! - **[`api`]** - API model and schema directory discovery
//! - **[`schema`]** - JSON Typedef schema model, validation, normalization
//! - **[`codegen`]** - generation orchestration, external generator seam,
//!   artifact templating
//! - **[`cli`]** - command-line interface (`rpcgen` binary)
//! - **[`error`]** - error taxonomy shared by the whole pipeline
//!
//! ## Pipeline
//!
//! ```text
//! api directory → discover → normalize → generate → artifacts
//! ```
//!
//! Discovery walks the schema directory and returns a deterministic,
//! validated API model. Normalization forces every properties-form schema
//! to tolerate unknown fields. Generation calls `jtd-codegen` once for the
//! shared definitions and twice per endpoint, dedupes cross-artifact type
//! declarations, and renders the route table and schema constants.
//!
//! ## Input convention
//!
//! ```text
//! api/
//! ├── users/
//! │   ├── definitions.json5     # named schemas, e.g. { "id": { "type": "string" } }
//! │   ├── get.GET.json5         # one endpoint: { "request": …, "response": … }
//! │   └── update.POST.json5
//! └── definitions.json5
//! ```
//!
//! ## Usage
//!
//! ```bash
//! rpcgen generate --api api/ --output src/generated
//! ```

pub mod api;
pub mod cli;
pub mod codegen;
pub mod error;
pub mod schema;

pub use api::{discover, Api, Definition, Endpoint};
pub use error::{Error, Result};
pub use schema::{normalize, Form, Schema};
