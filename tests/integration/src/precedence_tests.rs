//! Layer precedence scenarios
//!
//! Each test resolves a full configuration from real directories and checks
//! which layer a value came from.

use std::path::PathBuf;

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use strata_core::{Config, Error, Layer, Settings, Value};
use strata_sources::{ConfigOptions, EnvSource, FilesSource};
use strata_test_utils::scenario;

fn fixture_root(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../test-fixtures/config")
        .join(name)
}

fn resolve(root: PathBuf, env: &str, load_local: bool, vars: &[(&str, &str)]) -> Config {
    ConfigOptions {
        env: Some(env.to_string()),
        dir: Some(root),
        load_local_config: load_local,
        env_vars: Some(
            vars.iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        ),
        ..Default::default()
    }
    .resolve()
    .unwrap()
}

// ============================================================================
// Database scenario
// ============================================================================

#[test]
fn default_environment_and_local_layers_merge() {
    let fixture = scenario::database();
    let config = resolve(fixture.root().to_path_buf(), "development", true, &[]);

    assert_eq!(
        config.get_all(),
        Value::from(json!({
            "database": {"host": "dev.db", "port": 3306, "user": "otheruser", "debug": true}
        }))
    );
}

#[test]
fn environment_variable_overrides_last() {
    let fixture = scenario::database();
    let config = resolve(
        fixture.root().to_path_buf(),
        "development",
        true,
        &[("CONFIG__database__host", "env_host")],
    );

    assert_eq!(config.get_string("database.host").unwrap(), "env_host");
    assert_eq!(config.get_number("database.port").unwrap(), 3306.0);
    assert_eq!(config.get_string("database.user").unwrap(), "otheruser");
    assert!(config.get_bool("database.debug").unwrap());
}

#[test]
fn type_mismatch_names_path_and_type() {
    let fixture = scenario::database();
    let config = resolve(fixture.root().to_path_buf(), "development", true, &[]);

    let err = config.get_string("database.port").unwrap_err();
    let message = err.to_string();
    assert!(matches!(err, Error::TypeMismatch { .. }));
    assert!(message.contains("database.port"), "{message}");
    assert!(message.contains("string"), "{message}");
}

#[test]
fn reserved_env_fails_before_any_source_loads() {
    let fixture = scenario::database().with_file("default", "broken.json", "{ not json");

    let err = ConfigOptions {
        env: Some("default".to_string()),
        dir: Some(fixture.root().to_path_buf()),
        env_vars: Some(Vec::new()),
        ..Default::default()
    }
    .resolve()
    .unwrap_err();

    assert!(matches!(err, Error::Configuration { .. }), "{err}");
}

// ============================================================================
// Shared fixture tree
// ============================================================================

#[rstest]
#[case("development", true, "dev.db", "otheruser", 10.0)]
#[case("development", false, "dev.db", "dbuser", 10.0)]
#[case("production", true, "prod.db", "otheruser", 50.0)]
#[case("staging", false, "default.db", "dbuser", 10.0)]
fn fixture_tree_resolves_per_environment(
    #[case] env: &str,
    #[case] load_local: bool,
    #[case] host: &str,
    #[case] user: &str,
    #[case] pool_max: f64,
) {
    let config = resolve(fixture_root("app"), env, load_local, &[]);

    assert_eq!(config.get_string("database.host").unwrap(), host);
    assert_eq!(config.get_string("database.user").unwrap(), user);
    assert_eq!(config.get_number("database.pool.max").unwrap(), pool_max);
    assert_eq!(config.get_number("database.pool.min").unwrap(), 1.0);
}

#[test]
fn sibling_files_merge_independently() {
    let config = resolve(fixture_root("app"), "production", true, &[]);

    assert!(config.get_bool("features.search").unwrap());
    assert!(!config.get_bool("features.beta").unwrap());
    assert_eq!(config.get_number("features.limits.requests_per_minute").unwrap(), 600.0);
    assert_eq!(config.get_string("logging.level").unwrap(), "info");
    assert_eq!(
        config.keys().unwrap(),
        vec!["database", "features", "logging"]
    );
}

#[test]
fn environment_variables_are_strings_and_replace_scalars() {
    let config = resolve(
        fixture_root("app"),
        "development",
        true,
        &[
            ("CONFIG__database__port", "5432"),
            ("CONFIG__logging__targets", "stderr"),
        ],
    );

    assert_eq!(config.get_string("database.port").unwrap(), "5432");
    assert_eq!(config.get_string("logging.targets").unwrap(), "stderr");
    assert!(config.get_number("database.port").is_err());
}

#[test]
fn explicit_json_layer_sits_between_files_and_variables() {
    let config = ConfigOptions {
        env: Some("development".to_string()),
        dir: Some(fixture_root("app")),
        json: Some(Value::from(json!({"database": {"host": "explicit.db", "port": 1}}))),
        env_vars: Some(vec![("CONFIG__database__port".into(), "2".into())]),
        ..Default::default()
    }
    .resolve()
    .unwrap();

    assert_eq!(config.get_string("database.host").unwrap(), "explicit.db");
    assert_eq!(config.get_string("database.port").unwrap(), "2");
}

// ============================================================================
// Hand-assembled builders
// ============================================================================

#[test]
fn builder_sorts_layers_regardless_of_insertion_order() {
    let files = FilesSource::new(fixture_root("app"));
    let vars = EnvSource::from_vars("CONFIG__", [("CONFIG__database__host", "env_host")]);

    let mut builder = Config::builder("production", true).unwrap();
    builder.push(Layer::EnvironmentVariables, vars.tree());
    for (layer, tree) in files.layers("production").unwrap() {
        builder.push(layer, tree);
    }
    let config = builder.build();

    assert_eq!(config.get_string("database.host").unwrap(), "env_host");
    assert_eq!(config.get_number("database.pool.max").unwrap(), 50.0);
}

#[test]
fn returned_trees_are_independent_copies() {
    let config = resolve(fixture_root("app"), "development", true, &[]);

    let mut tree = config.get_all();
    tree.set_path(&["database", "host"], Value::from("mutated"));
    let mut database = config.get("database").unwrap();
    database.set_path(&["user"], Value::from("mutated"));

    assert_eq!(config.get_string("database.host").unwrap(), "dev.db");
    assert_eq!(config.get_string("database.user").unwrap(), "otheruser");
}
