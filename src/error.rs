//! Error taxonomy for the contract compiler.
//!
//! Every failure aborts the whole pipeline; there is no best-effort
//! continuation and no retry. Each variant carries enough context (file
//! path, schema breadcrumb, or artifact identity) to localize the fault.

use std::path::PathBuf;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// All fatal pipeline errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing a file failed.
    #[error("i/o on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A schema document failed to parse as JSON5.
    #[error("parsing {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: json5::Error,
    },

    /// An endpoint file name does not follow `<name>.<verb>.json5`.
    #[error("invalid endpoint file: expected <name>.<verb>.json5, got {}", path.display())]
    BadEndpointFileName { path: PathBuf },

    /// An endpoint file uses an extension other than the supported one.
    #[error("unsupported schema format {ext:?} ({})", path.display())]
    UnsupportedFormat { path: PathBuf, ext: String },

    /// Two definitions resolve to the same dotted path.
    #[error("duplicate definition {path:?}")]
    DuplicateDefinition { path: String },

    /// Two endpoints resolve to the same (path, verb) pair.
    #[error("duplicate endpoint {verb} {path}")]
    DuplicateEndpoint { verb: String, path: String },

    /// A schema node violates the one-form invariant or an RFC 8927 rule.
    #[error("invalid schema at {at}: {reason}")]
    InvalidSchema { at: String, reason: String },

    /// The external type generator failed for one artifact.
    #[error("generating {artifact}: {reason}")]
    Generation { artifact: String, reason: String },

    /// Emitted source failed to format as valid Rust.
    #[error("formatting {artifact}: {reason}")]
    Format { artifact: String, reason: String },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
