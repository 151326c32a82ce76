//! Providers feeding the core: typed values, incremental loading and the
//! object store.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::DateTime;
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::json;
use strata_core::{ConfigLoader, Error, LoadState, Settings, Value};
use strata_sources::{
    DirectorySource, EnvSource, FilesSource, LiteralSource, MemoryStore, ObjectStoreSource,
};
use strata_test_utils::{ConfigFixture, scenario};

fn typed_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../test-fixtures/config/typed/default")
}

#[derive(Debug, Deserialize, PartialEq)]
struct Service {
    name: String,
    port: u16,
    enabled: bool,
    ratio: f64,
    replicas: Vec<String>,
}

// ============================================================================
// Typed values
// ============================================================================

#[test]
fn yaml_fixture_yields_every_value_kind() {
    let mut loader = ConfigLoader::new("development", true).unwrap();
    loader.load(&DirectorySource::new(typed_dir())).unwrap();
    let config = loader.finish();

    assert_eq!(config.get_string("service.name").unwrap(), "billing");
    assert_eq!(config.get_number("service.port").unwrap(), 8080.0);
    assert!(config.get_bool("service.enabled").unwrap());
    assert_eq!(config.get_array("service.replicas").unwrap().len(), 3);
    assert_eq!(config.get_bytes("service.token").unwrap(), b"hello world".to_vec());
    assert_eq!(
        config.get_timestamp("service.deployed_at").unwrap(),
        DateTime::parse_from_rfc3339("2001-12-15T02:59:43.1Z").unwrap()
    );
    assert_eq!(config.get("service.nothing"), Some(Value::Null));
    assert!(config.contains("service.nothing"));
    assert!(!config.contains("service.missing"));
}

#[test]
fn sub_tree_deserializes_into_struct() {
    let mut loader = ConfigLoader::new("development", true).unwrap();
    loader.load(&DirectorySource::new(typed_dir())).unwrap();
    let config = loader.finish();

    let service: Service = config.get_as("service").unwrap();
    assert_eq!(
        service,
        Service {
            name: "billing".to_string(),
            port: 8080,
            enabled: true,
            ratio: 0.25,
            replicas: vec!["a".into(), "b".into(), "c".into()],
        }
    );

    let err = config.get_as::<Service>("service.name").unwrap_err();
    assert!(matches!(err, Error::Deserialize { .. }), "{err}");
}

// ============================================================================
// Incremental loading
// ============================================================================

#[test]
fn loader_applies_sources_in_call_order_then_locks() {
    let fixture = scenario::database();
    let mut loader = ConfigLoader::new("development", true).unwrap();

    loader.load(&FilesSource::new(fixture.root())).unwrap();
    loader
        .load(&LiteralSource::from(json!({"database": {"port": 6000}})))
        .unwrap();
    loader
        .load(&EnvSource::from_vars("CONFIG__", [("CONFIG__database__host", "env_host")]))
        .unwrap();
    assert_eq!(loader.state(), LoadState::Open);

    assert_eq!(loader.get_string("database.host").unwrap(), "env_host");
    assert_eq!(loader.state(), LoadState::Locked);

    let err = loader
        .load(&LiteralSource::from(json!({"late": true})))
        .unwrap_err();
    assert!(matches!(err, Error::Locked));
    assert_eq!(loader.get_number("database.port").unwrap(), 6000.0);
    assert!(!loader.contains("late"));
}

#[test]
fn loader_propagates_provider_failures() {
    let fixture = ConfigFixture::new().with_file("default", "bad.yaml", "key: [unclosed");
    let mut loader = ConfigLoader::new("development", true).unwrap();

    let err = loader.load(&FilesSource::new(fixture.root())).unwrap_err();
    match err {
        Error::Source { resource, message } => {
            assert!(resource.ends_with("bad.yaml"), "{resource}");
            assert!(message.contains("YAML"), "{message}");
        }
        other => panic!("expected a source error, got {other:?}"),
    }
}

// ============================================================================
// Object store
// ============================================================================

fn bucket() -> MemoryStore {
    MemoryStore::new()
        .with_object("configs/default/database.yaml", "host: default.db\nport: 3306\n")
        .with_object("configs/default/logging.json", r#"{"level": "info"}"#)
        .with_object("configs/production/database.toml", "host = \"prod.db\"\n")
        .with_object("configs/production/logging.json", r#"{"level": "warn"}"#)
}

#[tokio::test]
async fn object_store_fetch_matches_precedence() {
    let source = ObjectStoreSource::new(Arc::new(bucket()), "configs");
    let tree = source.fetch("production").await.unwrap();

    assert_eq!(
        tree,
        Value::from(json!({
            "database": {"host": "prod.db", "port": 3306},
            "logging": {"level": "warn"}
        }))
    );
}

#[test]
fn object_store_feeds_the_loader() {
    let source = ObjectStoreSource::new(Arc::new(bucket()), "configs");
    let mut loader = ConfigLoader::new("production", true).unwrap();
    loader.load(&source).unwrap();
    loader
        .load(&EnvSource::from_vars("CONFIG__", [("CONFIG__logging__level", "debug")]))
        .unwrap();

    let config = loader.finish();
    assert_eq!(config.get_string("database.host").unwrap(), "prod.db");
    assert_eq!(config.get_string("logging.level").unwrap(), "debug");
}
