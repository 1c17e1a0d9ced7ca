use crate::schema::{normalize, Schema};

/// A discovered API: every endpoint and shared definition under one root
/// directory, in deterministic order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Api {
    /// Endpoints sorted by (path, verb).
    pub endpoints: Vec<Endpoint>,
    /// Definitions sorted by path.
    pub definitions: Vec<Definition>,
}

impl Api {
    /// Apply the wire-compatibility normalization to every schema.
    ///
    /// Must run before generation; the result is read-only from then on.
    pub fn normalized(self) -> Api {
        Api {
            endpoints: self
                .endpoints
                .into_iter()
                .map(|endpoint| Endpoint {
                    request: normalize(endpoint.request),
                    response: normalize(endpoint.response),
                    ..endpoint
                })
                .collect(),
            definitions: self
                .definitions
                .into_iter()
                .map(|definition| Definition {
                    schema: normalize(definition.schema),
                    ..definition
                })
                .collect(),
        }
    }
}

/// A named, reusable schema addressable by dotted path.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    /// Namespace directories plus the leaf name.
    pub path: Vec<String>,
    pub schema: Schema,
}

impl Definition {
    /// Dotted key, e.g. `users.id`.
    pub fn key(&self) -> String {
        self.path.join(".")
    }
}

/// A verb-qualified request/response schema pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    /// Namespace directories plus the leaf name.
    pub path: Vec<String>,
    /// Upper-cased HTTP method.
    pub verb: String,
    pub request: Schema,
    pub response: Schema,
}

impl Endpoint {
    /// Dotted key, e.g. `users.get`.
    pub fn key(&self) -> String {
        self.path.join(".")
    }

    /// Slash-joined HTTP path, e.g. `/users/get`.
    pub fn http_path(&self) -> String {
        format!("/{}", self.path.join("/"))
    }
}
