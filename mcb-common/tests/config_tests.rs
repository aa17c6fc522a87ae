//! Configuration resolution and loading tests
//!
//! Note: Uses serial_test to prevent ENV variable race conditions.
//! Tests that manipulate MCB_TEST_CONFIG are marked with #[serial].

use mcb_common::config::{ConfigOutcome, ConfigPath, ConfigResolver, TomlConfig};
use mcb_common::Error;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const TEST_ENV_VAR: &str = "MCB_TEST_CONFIG";

#[test]
#[serial]
fn test_cli_argument_has_highest_priority() {
    env::set_var(TEST_ENV_VAR, "/tmp/from-env.toml");
    let resolver = ConfigResolver::with_sources(TEST_ENV_VAR, None);

    let cli = PathBuf::from("/tmp/from-cli.toml");
    let resolved = resolver.resolve(Some(&cli));
    assert_eq!(resolved, Some(ConfigPath::Explicit(cli)));

    env::remove_var(TEST_ENV_VAR);
}

#[test]
#[serial]
fn test_env_var_used_without_cli_argument() {
    env::set_var(TEST_ENV_VAR, "/tmp/from-env.toml");
    let resolver = ConfigResolver::with_sources(TEST_ENV_VAR, None);

    assert_eq!(
        resolver.resolve(None),
        Some(ConfigPath::Explicit(PathBuf::from("/tmp/from-env.toml")))
    );

    env::remove_var(TEST_ENV_VAR);
}

#[test]
#[serial]
fn test_default_path_only_when_it_exists() {
    env::remove_var(TEST_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let default_path = dir.path().join("config.toml");

    let resolver = ConfigResolver::with_sources(TEST_ENV_VAR, Some(default_path.clone()));
    assert_eq!(resolver.resolve(None), None);

    fs::write(&default_path, "request_pause_ms = 250\n").unwrap();
    assert_eq!(
        resolver.resolve(None),
        Some(ConfigPath::PlatformDefault(default_path))
    );
}

#[test]
fn test_load_full_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
request_pause_ms = 500

[logging]
level = "debug"
stderr = true

[worldcat]
client_id = "wc-id"
client_secret = "wc-secret"

[discogs]
user_token = "dc-token"

[local_fields]
collection_name = "Test Collection"
"#,
    )
    .unwrap();

    let config = TomlConfig::load(&path).unwrap();
    assert_eq!(config.request_pause_ms, Some(500));
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.stderr);
    assert_eq!(config.worldcat.client_id.as_deref(), Some("wc-id"));
    assert_eq!(config.worldcat.client_secret.as_deref(), Some("wc-secret"));
    assert_eq!(config.discogs.user_token.as_deref(), Some("dc-token"));
    assert_eq!(config.local_fields.collection_name, "Test Collection");
    assert_eq!(config.local_fields.collection_code, "MEHER");
}

#[test]
#[serial]
fn test_missing_explicit_file_is_error() {
    env::remove_var(TEST_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");

    let resolver = ConfigResolver::with_sources(TEST_ENV_VAR, None);
    let err = resolver.load(Some(&missing)).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().contains("nope.toml"));
}

#[test]
#[serial]
fn test_unparsable_explicit_file_is_error() {
    env::remove_var(TEST_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    // A typo in a section name must not silently fall back to defaults
    fs::write(&path, "[worldcat\nclient_id = \"wc-id\"\n").unwrap();

    let resolver = ConfigResolver::with_sources(TEST_ENV_VAR, None);
    let err = resolver.load(Some(&path)).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().contains("bad.toml"));
}

#[test]
#[serial]
fn test_unparsable_file_from_env_is_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("env.toml");
    fs::write(&path, "[[[not toml").unwrap();
    env::set_var(TEST_ENV_VAR, &path);

    let resolver = ConfigResolver::with_sources(TEST_ENV_VAR, None);
    assert!(resolver.load(None).is_err());

    env::remove_var(TEST_ENV_VAR);
}

#[test]
#[serial]
fn test_unparsable_platform_file_is_ignored() {
    env::remove_var(TEST_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let default_path = dir.path().join("config.toml");
    fs::write(&default_path, "[[[not toml").unwrap();

    let resolver = ConfigResolver::with_sources(TEST_ENV_VAR, Some(default_path.clone()));
    let loaded = resolver.load(None).unwrap();
    assert!(loaded.config.request_pause_ms.is_none());
    assert!(matches!(
        loaded.outcome,
        ConfigOutcome::Ignored { ref path, .. } if *path == default_path
    ));
}

#[test]
#[serial]
fn test_no_file_uses_defaults() {
    env::remove_var(TEST_ENV_VAR);
    let resolver = ConfigResolver::with_sources(TEST_ENV_VAR, None);
    let loaded = resolver.load(None).unwrap();
    assert_eq!(loaded.outcome, ConfigOutcome::NoFile);
    assert_eq!(loaded.config.logging.level, "info");
}

#[test]
#[serial]
fn test_explicit_file_loaded() {
    env::remove_var(TEST_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("good.toml");
    fs::write(&path, "request_pause_ms = 250\n").unwrap();

    let resolver = ConfigResolver::with_sources(TEST_ENV_VAR, None);
    let loaded = resolver.load(Some(&path)).unwrap();
    assert_eq!(loaded.config.request_pause_ms, Some(250));
    assert_eq!(loaded.outcome, ConfigOutcome::Loaded(path));
}
