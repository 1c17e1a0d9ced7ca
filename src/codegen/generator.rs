use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::schema::{RawSchema, Schema};

/// Result of one external generation call.
#[derive(Debug, Clone)]
pub struct GeneratedType {
    /// Identifier of the generated root type.
    pub root_name: String,
    /// Supplied definition key → generated type identifier.
    pub definition_names: BTreeMap<String, String>,
    /// The emitted, self-contained source.
    pub source: String,
}

/// The external type-generation collaborator.
///
/// One invocation per artifact: the implementation turns a schema document
/// and a desired root type name into emitted source plus the identifiers it
/// chose. Implementations must be deterministic for identical input.
pub trait TypeGenerator {
    fn generate(&self, schema: &Schema, root_name: &str) -> Result<GeneratedType>;
}

/// [`TypeGenerator`] backed by the `jtd-codegen` CLI.
///
/// The schema document is piped to the child's stdin; the structured JSON
/// log on stdout supplies the generated identifiers, and the emitted module
/// is read back from a scoped temporary directory that is removed on every
/// exit path.
#[derive(Debug, Clone)]
pub struct JtdCodegen {
    program: PathBuf,
}

impl JtdCodegen {
    /// Use `jtd-codegen` from `PATH`.
    pub fn new() -> Self {
        JtdCodegen {
            program: PathBuf::from("jtd-codegen"),
        }
    }

    /// Use an explicit generator executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        JtdCodegen {
            program: program.into(),
        }
    }
}

impl Default for JtdCodegen {
    fn default() -> Self {
        JtdCodegen::new()
    }
}

#[derive(Debug, Deserialize)]
struct CodegenLog {
    rust: TargetLog,
}

#[derive(Debug, Deserialize)]
struct TargetLog {
    root_name: String,
    #[serde(default)]
    definition_names: BTreeMap<String, String>,
}

impl TypeGenerator for JtdCodegen {
    fn generate(&self, schema: &Schema, root_name: &str) -> Result<GeneratedType> {
        let generation = |reason: String| Error::Generation {
            artifact: root_name.to_string(),
            reason,
        };

        let content = serde_json::to_string_pretty(&RawSchema::from(schema))
            .map_err(|err| generation(format!("serializing schema: {err}")))?;
        debug!(root_name, schema = %content, "invoking type generator");

        let tmp = tempfile::Builder::new()
            .prefix("rpcgen-")
            .tempdir()
            .map_err(|err| generation(format!("creating temporary directory: {err}")))?;

        let mut child = Command::new(&self.program)
            .arg("-")
            .arg("--rust-out")
            .arg(tmp.path())
            .arg("--root-name")
            .arg(root_name)
            .arg("--log-format")
            .arg("json")
            // Backtraces aid debugging generator crashes.
            .env("RUST_BACKTRACE", "1")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| generation(format!("running {}: {err}", self.program.display())))?;

        child
            .stdin
            .take()
            .ok_or_else(|| generation("child stdin unavailable".to_string()))?
            .write_all(content.as_bytes())
            .map_err(|err| generation(format!("writing schema to generator: {err}")))?;

        let output = child
            .wait_with_output()
            .map_err(|err| generation(format!("waiting for generator: {err}")))?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(generation(format!(
                "generator exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let log: CodegenLog = serde_json::from_slice(&output.stdout).map_err(|err| {
            generation(format!(
                "parsing generator output: {err}: {}",
                String::from_utf8_lossy(&output.stdout).trim()
            ))
        })?;

        let emitted = tmp.path().join("mod.rs");
        let source = std::fs::read_to_string(&emitted)
            .map_err(|err| generation(format!("reading generated code: {err}")))?;

        Ok(GeneratedType {
            root_name: log.rust.root_name,
            definition_names: log.rust.definition_names,
            source,
        })
    }
}

/// Drop re-emitted declarations for types that already live in the shared
/// definitions artifact.
///
/// The external generator cannot suppress emission of supplied definitions,
/// so each endpoint artifact re-declares every placeholder as a one-line
/// `pub type <Name> = …;` alias. This removes those lines by
/// declaration-start prefix with an identifier-boundary check. Textual and
/// best-effort by design: it relies on placeholder declarations always being
/// single-line aliases, and would not survive a generator that wraps them.
pub fn strip_external_declarations(source: &str, external: &[String]) -> String {
    let mut lines = Vec::new();
    'line: for line in source.lines() {
        for name in external {
            if is_type_alias_of(line, name) {
                continue 'line;
            }
        }
        lines.push(line);
    }
    let mut out = lines.join("\n");
    if source.ends_with('\n') && !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn is_type_alias_of(line: &str, name: &str) -> bool {
    let Some(rest) = line.strip_prefix("pub type ") else {
        return false;
    };
    let Some(tail) = rest.strip_prefix(name) else {
        return false;
    };
    // `pub type Foo =` must not match `pub type FooBar =`.
    tail.chars()
        .next()
        .map_or(true, |c| !c.is_ascii_alphanumeric() && c != '_')
}

/// Pipe source through `rustfmt`; emitted artifacts must always be valid.
///
/// Returns the formatted source, or the formatter's complaint.
pub(crate) fn format_source(source: &str) -> std::result::Result<String, String> {
    let mut child = Command::new("rustfmt")
        .args(["--edition", "2021"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| format!("running rustfmt: {err}"))?;

    child
        .stdin
        .take()
        .ok_or_else(|| "rustfmt stdin unavailable".to_string())?
        .write_all(source.as_bytes())
        .map_err(|err| format!("writing to rustfmt: {err}"))?;

    let output = child
        .wait_with_output()
        .map_err(|err| format!("waiting for rustfmt: {err}"))?;
    if !output.status.success() {
        return Err(format!(
            "rustfmt exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }
    String::from_utf8(output.stdout).map_err(|err| format!("rustfmt produced invalid UTF-8: {err}"))
}
