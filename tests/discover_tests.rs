use rpcgen::error::Error;
use rpcgen::schema::Form;
use rpcgen::{discover, Api};
use std::fs;
use std::path::Path;

fn write_file(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn sample_tree(root: &Path) {
    write_file(
        root,
        "definitions.json5",
        r#"{ "page": { "type": "uint32" } }"#,
    );
    write_file(
        root,
        "users/definitions.json5",
        r#"{
            // shared identifiers
            "id": { "type": "string" },
            "name": { "type": "string" },
        }"#,
    );
    write_file(
        root,
        "users/get.GET.json5",
        r#"{
            "request": { "properties": { "id": { "type": "string" } } },
            "response": { "properties": { "name": { "type": "string" } } },
        }"#,
    );
    write_file(root, "users/list.get.json5", r#"{}"#);
    write_file(root, "posts/create.POST.json5", r#"{}"#);
}

#[test]
fn test_discovery_counts_and_order() {
    let dir = tempfile::tempdir().unwrap();
    sample_tree(dir.path());

    let api = discover(dir.path()).unwrap();

    // One endpoint per <name>.<verb>.json5, one definition per document key.
    assert_eq!(api.endpoints.len(), 3);
    assert_eq!(api.definitions.len(), 3);

    let definition_keys: Vec<String> = api.definitions.iter().map(|d| d.key()).collect();
    assert_eq!(definition_keys, vec!["page", "users.id", "users.name"]);

    let endpoint_keys: Vec<(String, String)> = api
        .endpoints
        .iter()
        .map(|e| (e.key(), e.verb.clone()))
        .collect();
    assert_eq!(
        endpoint_keys,
        vec![
            ("posts.create".to_string(), "POST".to_string()),
            ("users.get".to_string(), "GET".to_string()),
            ("users.list".to_string(), "GET".to_string()),
        ]
    );
}

#[test]
fn test_discovery_is_deterministic() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    sample_tree(first.path());
    sample_tree(second.path());
    assert_eq!(discover(first.path()).unwrap(), discover(second.path()).unwrap());
}

#[test]
fn test_verb_is_uppercased() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "users/list.get.json5", "{}");
    let api = discover(dir.path()).unwrap();
    assert_eq!(api.endpoints[0].verb, "GET");
}

#[test]
fn test_missing_request_and_response_default_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "ping.GET.json5", r#"{ /* nothing */ }"#);
    let api = discover(dir.path()).unwrap();
    assert_eq!(api.endpoints[0].request.form, Form::Empty);
    assert_eq!(api.endpoints[0].response.form, Form::Empty);
}

#[test]
fn test_normalized_forces_additional_properties() {
    let dir = tempfile::tempdir().unwrap();
    sample_tree(dir.path());
    let api = discover(dir.path()).unwrap().normalized();
    let get = api
        .endpoints
        .iter()
        .find(|e| e.key() == "users.get")
        .unwrap();
    for schema in [&get.request, &get.response] {
        match &schema.form {
            Form::Properties(props) => assert!(props.additional),
            other => panic!("expected properties form, got {}", other.name()),
        }
    }
}

#[test]
fn test_two_component_filename_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "foo.json5", "{}");
    let err = discover(dir.path()).unwrap_err();
    match &err {
        Error::BadEndpointFileName { path } => {
            assert!(path.to_string_lossy().ends_with("foo.json5"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unsupported_extension_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "foo.GET.yaml", "request: {}");
    let err = discover(dir.path()).unwrap_err();
    match &err {
        Error::UnsupportedFormat { ext, .. } => assert_eq!(ext, "yaml"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_duplicate_endpoint_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "users/get.GET.json5", "{}");
    write_file(dir.path(), "users/get.get.json5", "{}");
    let err = discover(dir.path()).unwrap_err();
    match &err {
        Error::DuplicateEndpoint { verb, path } => {
            assert_eq!(verb, "GET");
            assert_eq!(path, "/users/get");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_malformed_document_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "users/get.GET.json5", "{ not valid");
    assert!(matches!(
        discover(dir.path()).unwrap_err(),
        Error::Parse { .. }
    ));
}

#[test]
fn test_unknown_document_field_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "users/get.GET.json5", r#"{ "requests": {} }"#);
    assert!(matches!(
        discover(dir.path()).unwrap_err(),
        Error::Parse { .. }
    ));
}

#[test]
fn test_invalid_schema_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "users/definitions.json5",
        r#"{ "id": { "type": "string", "enum": ["a"] } }"#,
    );
    let err = discover(dir.path()).unwrap_err();
    match &err {
        Error::InvalidSchema { at, reason } => {
            assert!(at.contains("definitions.json5"), "{at}");
            assert!(reason.contains("multiple forms populated"), "{reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_root_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    assert!(matches!(discover(&missing).unwrap_err(), Error::Io { .. }));
}

#[test]
fn test_empty_tree_yields_empty_api() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(discover(dir.path()).unwrap(), Api::default());
}
