use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use super::generator::{strip_external_declarations, JtdCodegen, TypeGenerator};
use super::templates::{
    sanitize_module_name, write_artifact, write_mod_rs, write_routes_rs, write_schemas_rs,
};
use crate::api::{Api, Endpoint};
use crate::error::{Error, Result};
use crate::schema::Schema;

/// One verb + path binding, in discovery order.
///
/// `handler_name` is the request type identifier with the generator's fixed
/// `Request` suffix removed; generated routing code relies on that coupling.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRecord {
    pub verb: String,
    pub path: String,
    pub handler_name: String,
    pub request_type: String,
    pub response_type: String,
    /// Sanitized artifact stem shared by this endpoint's generated modules.
    pub module: String,
}

/// Generate all artifacts for a normalized API using `jtd-codegen`.
pub fn generate_project(api: &Api, out_dir: &Path) -> Result<Vec<RouteRecord>> {
    generate_with(&JtdCodegen::new(), api, out_dir)
}

/// Generate all artifacts for a normalized API with an explicit generator.
///
/// Strictly sequential: the shared definitions artifact is produced first so
/// its identifier mapping is fully known before any endpoint call runs. One
/// file is written per generation call; a failure aborts the run and leaves
/// earlier artifacts on disk.
pub fn generate_with(
    generator: &dyn TypeGenerator,
    api: &Api,
    out_dir: &Path,
) -> Result<Vec<RouteRecord>> {
    fs::create_dir_all(out_dir).map_err(|err| Error::io(out_dir, err))?;

    // One generated type per definition, keyed by dotted path. The wrapping
    // schema itself is empty; only its definitions matter.
    let mut shared = BTreeMap::new();
    for definition in &api.definitions {
        shared.insert(definition.key(), definition.schema.clone());
    }
    let definitions_schema = Schema {
        definitions: shared.clone(),
        metadata: BTreeMap::from([(
            "description".to_string(),
            Value::String(
                "Shared definitions container; the root type is never used as a value."
                    .to_string(),
            ),
        )]),
        ..Schema::default()
    };
    let generated = generator.generate(&definitions_schema, "definitions")?;
    write_artifact(out_dir, "definitions.rs", &generated.source)?;

    // Every subsequent call gets empty placeholders for the shared
    // definitions (keeping ref resolution structurally valid) plus the
    // captured identifiers as an already-defined-elsewhere allow-list.
    let placeholders: BTreeMap<String, Schema> = shared
        .keys()
        .map(|key| (key.clone(), Schema::empty()))
        .collect();
    let mut external: Vec<String> = generated.definition_names.values().cloned().collect();
    external.sort();
    external.dedup();
    debug!(definitions = shared.len(), ?external, "captured shared definition names");

    let mut modules = vec!["definitions".to_string()];
    let mut routes = Vec::new();
    for endpoint in &api.endpoints {
        let record = generate_endpoint(generator, endpoint, &placeholders, &external, out_dir)?;
        modules.push(format!("{}_request", record.module));
        modules.push(format!("{}_response", record.module));
        modules.push(format!("{}_schemas", record.module));
        routes.push(record);
    }
    modules.dedup();

    write_routes_rs(out_dir, &routes)?;
    modules.push("routes".to_string());
    write_mod_rs(out_dir, &modules)?;

    Ok(routes)
}

fn generate_endpoint(
    generator: &dyn TypeGenerator,
    endpoint: &Endpoint,
    placeholders: &BTreeMap<String, Schema>,
    external: &[String],
    out_dir: &Path,
) -> Result<RouteRecord> {
    let key = endpoint.key();
    let module = sanitize_module_name(&key.replace('.', "_"));

    let mut request = endpoint.request.clone();
    request.definitions = placeholders.clone();
    let generated_request = generator.generate(&request, &format!("{key}.request."))?;
    write_endpoint_artifact(
        out_dir,
        &format!("{module}_request.rs"),
        &generated_request.source,
        external,
    )?;

    let mut response = endpoint.response.clone();
    response.definitions = placeholders.clone();
    let generated_response = generator.generate(&response, &format!("{key}.response."))?;
    write_endpoint_artifact(
        out_dir,
        &format!("{module}_response.rs"),
        &generated_response.source,
        external,
    )?;

    let handler_name = generated_request
        .root_name
        .strip_suffix("Request")
        .unwrap_or(&generated_request.root_name)
        .to_string();

    write_schemas_rs(out_dir, &module, &handler_name, endpoint)?;

    Ok(RouteRecord {
        verb: endpoint.verb.clone(),
        path: endpoint.http_path(),
        handler_name,
        request_type: generated_request.root_name,
        response_type: generated_response.root_name,
        module,
    })
}

fn write_endpoint_artifact(
    out_dir: &Path,
    file_name: &str,
    source: &str,
    external: &[String],
) -> Result<()> {
    let mut source = strip_external_declarations(source, external);
    if !external.is_empty() {
        // The stripped declarations live in the sibling definitions module.
        source = format!("#[allow(unused_imports)]\nuse super::definitions::*;\n\n{source}");
    }
    write_artifact(out_dir, file_name, &source)
}
