//! Config loader integration tests

use concord_domain::ConcordError;
use concord_infra::config::load_from_file;

#[test]
fn loads_toml_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[backend]
url = "https://backend.example.com/v1/graphql"
admin_secret = "shhh"

[http]
timeout_seconds = 10
max_attempts = 2
"#,
    )
    .unwrap();

    let config = load_from_file(Some(&path)).unwrap();
    assert_eq!(config.backend.url, "https://backend.example.com/v1/graphql");
    assert_eq!(config.backend.admin_secret, "shhh");
    assert_eq!(config.http.timeout_seconds, 10);
    assert_eq!(config.http.max_attempts, 2);
    // Unspecified sections keep their defaults.
    assert_eq!(config.google.api_base, "https://www.googleapis.com/calendar/v3");
}

#[test]
fn loads_json_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{
  "backend": { "url": "https://backend.example.com/v1/graphql", "admin_secret": "shhh" },
  "zoom": { "api_base": "https://zoom.example.com", "access_token": "zt" }
}"#,
    )
    .unwrap();

    let config = load_from_file(Some(&path)).unwrap();
    assert_eq!(config.zoom.api_base, "https://zoom.example.com");
    assert_eq!(config.zoom.access_token.as_deref(), Some("zt"));
}

#[test]
fn rejects_unknown_extensions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "backend:\n  url: x\n").unwrap();

    let err = load_from_file(Some(&path)).unwrap_err();
    assert!(matches!(err, ConcordError::Config(_)));
}

#[test]
fn rejects_config_without_backend_url() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[backend]\nurl = \"\"\nadmin_secret = \"s\"\n").unwrap();

    let err = load_from_file(Some(&path)).unwrap_err();
    assert!(matches!(err, ConcordError::Config(_)));
}

#[test]
fn missing_file_is_a_config_error() {
    let err = load_from_file(Some(std::path::Path::new("/nonexistent/config.toml"))).unwrap_err();
    assert!(matches!(err, ConcordError::Config(_)));
}

#[test]
fn invalid_toml_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not toml = [").unwrap();

    let err = load_from_file(Some(&path)).unwrap_err();
    assert!(matches!(err, ConcordError::Config(_)));
}
