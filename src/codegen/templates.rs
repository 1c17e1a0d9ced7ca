use askama::Template;
use std::fs;
use std::path::Path;

use super::generator::format_source;
use super::project::RouteRecord;
use crate::api::Endpoint;
use crate::error::{Error, Result};
use crate::schema::{RawSchema, Schema};

/// One row of the routes template.
#[derive(Debug, Clone)]
pub struct RouteView {
    pub verb: String,
    pub path: String,
    pub handler_name: String,
    /// Snake-cased handler, used as the trait method name.
    pub handler_fn: String,
    pub request_type: String,
    pub response_type: String,
    pub module: String,
}

/// Template data for the generated module index.
#[derive(Template)]
#[template(path = "mod.rs.txt")]
pub struct ModRsTemplateData {
    /// Module names to declare, in deterministic order.
    pub modules: Vec<String>,
}

/// Template data for the route table and handler trait.
#[derive(Template)]
#[template(path = "routes.rs.txt", escape = "none")]
pub struct RoutesTemplateData {
    /// Route records in discovery order.
    pub routes: Vec<RouteView>,
}

/// Template data for one endpoint's schema-constant artifact.
#[derive(Template)]
#[template(path = "schemas.rs.txt", escape = "none")]
pub struct SchemasTemplateData {
    pub handler_name: String,
    /// Upper-cased artifact stem, prefixing the constant names.
    pub const_prefix: String,
    /// Request schema JSON as a ready-made Rust string literal.
    pub request_schema: String,
    /// Response schema JSON as a ready-made Rust string literal.
    pub response_schema: String,
}

/// Format and write one generated artifact.
///
/// Formatting failure is fatal and leaves no file behind; emitted code must
/// always be syntactically valid.
pub(crate) fn write_artifact(out_dir: &Path, file_name: &str, source: &str) -> Result<()> {
    let formatted = format_source(source).map_err(|reason| Error::Format {
        artifact: file_name.to_string(),
        reason,
    })?;
    let path = out_dir.join(file_name);
    fs::write(&path, formatted).map_err(|err| Error::io(&path, err))?;
    println!("✅ Generated {}", path.display());
    Ok(())
}

fn render_failed(artifact: &str, err: askama::Error) -> Error {
    Error::Generation {
        artifact: artifact.to_string(),
        reason: format!("rendering template: {err}"),
    }
}

/// Write the generated module index.
pub(crate) fn write_mod_rs(out_dir: &Path, modules: &[String]) -> Result<()> {
    let rendered = ModRsTemplateData {
        modules: modules.to_vec(),
    }
    .render()
    .map_err(|err| render_failed("mod.rs", err))?;
    write_artifact(out_dir, "mod.rs", &rendered)
}

/// Write the route table and handler trait scaffold.
pub(crate) fn write_routes_rs(out_dir: &Path, routes: &[RouteRecord]) -> Result<()> {
    let views = routes
        .iter()
        .map(|record| RouteView {
            verb: record.verb.clone(),
            path: record.path.clone(),
            handler_name: record.handler_name.clone(),
            handler_fn: to_snake_case(&record.handler_name),
            request_type: record.request_type.clone(),
            response_type: record.response_type.clone(),
            module: record.module.clone(),
        })
        .collect();
    let rendered = RoutesTemplateData { routes: views }
        .render()
        .map_err(|err| render_failed("routes.rs", err))?;
    write_artifact(out_dir, "routes.rs", &rendered)
}

/// Write one endpoint's schema-constant artifact.
///
/// Embeds the normalized request/response documents so a generated server
/// can introspect or validate against them at runtime.
pub(crate) fn write_schemas_rs(
    out_dir: &Path,
    module: &str,
    handler_name: &str,
    endpoint: &Endpoint,
) -> Result<()> {
    let file_name = format!("{module}_schemas.rs");
    let to_literal = |schema: &Schema| -> Result<String> {
        let json =
            serde_json::to_string(&RawSchema::from(schema)).map_err(|err| Error::Generation {
                artifact: file_name.clone(),
                reason: format!("serializing schema: {err}"),
            })?;
        Ok(rust_string_literal(&json))
    };
    let rendered = SchemasTemplateData {
        handler_name: handler_name.to_string(),
        const_prefix: module.to_ascii_uppercase(),
        request_schema: to_literal(&endpoint.request)?,
        response_schema: to_literal(&endpoint.response)?,
    }
    .render()
    .map_err(|err| render_failed(&file_name, err))?;
    write_artifact(out_dir, &file_name, &rendered)
}

/// Convert a PascalCase identifier to snake_case.
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let prev_joins =
                i > 0 && (chars[i - 1].is_ascii_lowercase() || chars[i - 1].is_ascii_digit());
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            if i > 0 && (prev_joins || next_lower) && !out.ends_with('_') {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Make an artifact stem usable as a Rust module name.
pub fn sanitize_module_name(name: &str) -> String {
    let mut s: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if s.is_empty() {
        s = "_".to_string();
    }
    if s.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        s.insert(0, '_');
    }
    s
}

/// Quote arbitrary text as a Rust string literal.
///
/// Schema JSON may contain quotes or control characters, so raw string
/// literals are not safe to emit.
pub fn rust_string_literal(text: &str) -> String {
    let mut lit = String::with_capacity(text.len() + 2);
    lit.push('"');
    for c in text.chars() {
        match c {
            '"' => lit.push_str("\\\""),
            '\\' => lit.push_str("\\\\"),
            '\n' => lit.push_str("\\n"),
            '\r' => lit.push_str("\\r"),
            '\t' => lit.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                lit.push_str(&format!("\\u{{{:x}}}", c as u32));
            }
            c => lit.push(c),
        }
    }
    lit.push('"');
    lit
}
