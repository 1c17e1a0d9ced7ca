use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;
use walkdir::WalkDir;

use super::types::{Api, Definition, Endpoint};
use crate::error::{Error, Result};
use crate::schema::{RawSchema, Schema};

/// File extension every schema document must carry.
pub const SCHEMA_EXTENSION: &str = "json5";

/// File name contributing shared definitions for its directory.
const DEFINITIONS_FILE: &str = "definitions.json5";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct EndpointDoc {
    #[serde(default)]
    request: Option<RawSchema>,
    #[serde(default)]
    response: Option<RawSchema>,
}

/// Discover every endpoint and definition under `root`.
///
/// Conventions: `definitions.json5` contributes one definition per top-level
/// key; any other file must be named `<name>.<verb>.json5` and contributes
/// one endpoint. Directory segments become path namespaces.
///
/// The returned model is sorted (definitions by path, endpoints by path then
/// verb) so generation output does not depend on filesystem enumeration
/// order. Any I/O, parse, naming, or duplicate failure aborts discovery;
/// no partial model is returned.
pub fn discover(root: &Path) -> Result<Api> {
    let mut api = Api::default();

    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(root).to_path_buf();
            match err.into_io_error() {
                Some(source) => Error::io(path, source),
                None => Error::io(path, std::io::Error::other("filesystem loop")),
            }
        })?;
        if entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path();
        let dirs = namespace_dirs(root, path);
        let file_name = entry.file_name().to_string_lossy().into_owned();

        if file_name == DEFINITIONS_FILE {
            parse_definition_file(path, dirs, &mut api.definitions)?;
        } else {
            api.endpoints
                .push(parse_endpoint_file(path, dirs, &file_name)?);
        }
    }

    api.definitions.sort_by(|a, b| a.path.cmp(&b.path));
    api.endpoints
        .sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.verb.cmp(&b.verb)));

    for pair in api.definitions.windows(2) {
        if pair[0].path == pair[1].path {
            return Err(Error::DuplicateDefinition { path: pair[0].key() });
        }
    }
    for pair in api.endpoints.windows(2) {
        if pair[0].path == pair[1].path && pair[0].verb == pair[1].verb {
            return Err(Error::DuplicateEndpoint {
                verb: pair[0].verb.clone(),
                path: pair[0].http_path(),
            });
        }
    }

    Ok(api)
}

/// Directory segments of `path` relative to `root`, excluding the file name.
fn namespace_dirs(root: &Path, path: &Path) -> Vec<String> {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.parent()
        .map(|parent| {
            parent
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default()
}

fn parse_definition_file(
    path: &Path,
    dirs: Vec<String>,
    definitions: &mut Vec<Definition>,
) -> Result<()> {
    let contents = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
    let file: BTreeMap<String, RawSchema> =
        json5::from_str(&contents).map_err(|err| Error::Parse {
            path: path.to_path_buf(),
            source: err,
        })?;

    for (name, raw) in file {
        let schema = schema_in_file(raw, path)?;
        let mut def_path = dirs.clone();
        def_path.push(name);
        debug!(path = %path.display(), definition = %def_path.join("."), "discovered definition");
        definitions.push(Definition {
            path: def_path,
            schema,
        });
    }

    Ok(())
}

fn parse_endpoint_file(path: &Path, dirs: Vec<String>, file_name: &str) -> Result<Endpoint> {
    let components: Vec<&str> = file_name.splitn(3, '.').collect();
    if components.len() != 3 {
        return Err(Error::BadEndpointFileName {
            path: path.to_path_buf(),
        });
    }
    if components[2] != SCHEMA_EXTENSION {
        return Err(Error::UnsupportedFormat {
            path: path.to_path_buf(),
            ext: components[2].to_string(),
        });
    }

    let verb = components[1].to_uppercase();
    let mut endpoint_path = dirs;
    endpoint_path.push(components[0].to_string());

    let contents = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
    let doc: EndpointDoc = json5::from_str(&contents).map_err(|err| Error::Parse {
        path: path.to_path_buf(),
        source: err,
    })?;

    // Missing request/response fields default to the empty form.
    let request = match doc.request {
        Some(raw) => schema_in_file(raw, path)?,
        None => Schema::empty(),
    };
    let response = match doc.response {
        Some(raw) => schema_in_file(raw, path)?,
        None => Schema::empty(),
    };

    debug!(path = %path.display(), %verb, endpoint = %endpoint_path.join("."), "discovered endpoint");
    Ok(Endpoint {
        path: endpoint_path,
        verb,
        request,
        response,
    })
}

/// Validate a parsed document, prefixing schema breadcrumbs with the file.
fn schema_in_file(raw: RawSchema, path: &Path) -> Result<Schema> {
    raw.into_schema().map_err(|err| match err {
        Error::InvalidSchema { at, reason } => Error::InvalidSchema {
            at: format!("{}:{at}", path.display()),
            reason,
        },
        other => other,
    })
}
