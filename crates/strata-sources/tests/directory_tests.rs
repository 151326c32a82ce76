//! Directory providers against on-disk fixtures

use pretty_assertions::assert_eq;
use serde_json::json;
use strata_core::{Source, Value};
use strata_sources::{DirectorySource, FilesSource, ScriptOptions};
use strata_test_utils::{ConfigFixture, scenario};

#[test]
fn every_data_format_is_decoded() {
    let fixture = scenario::all_formats();
    let tree = DirectorySource::new(fixture.layer_dir("default")).read().unwrap();

    for format in ["json", "json5", "jsonc", "toml", "yaml", "yml"] {
        assert_eq!(
            tree.get_path(&format!("{format}.format")),
            Some(&Value::from(format)),
            "{format}"
        );
    }
}

#[test]
fn highest_priority_duplicate_wins_whole() {
    let fixture = ConfigFixture::new()
        .with_file("default", "db.json", r#"{"host": "json.db", "port": 1}"#)
        .with_file("default", "db.jsonc", r#"{"host": "jsonc.db"}"#);

    let tree = DirectorySource::new(fixture.layer_dir("default")).read().unwrap();

    // No merge between duplicates: `port` from the losing file is gone.
    assert_eq!(tree, Value::from(json!({"db": {"host": "jsonc.db"}})));
}

#[test]
fn file_order_does_not_change_the_result() {
    let forward = ConfigFixture::new()
        .with_file("default", "a.yaml", "v: 1\n")
        .with_file("default", "b.toml", "v = 2\n");
    let backward = ConfigFixture::new()
        .with_file("default", "b.toml", "v = 2\n")
        .with_file("default", "a.yaml", "v: 1\n");

    let read = |fixture: &ConfigFixture| {
        DirectorySource::new(fixture.layer_dir("default"))
            .read()
            .unwrap()
            .keys()
            .unwrap()
    };
    assert_eq!(read(&forward), read(&backward));
    assert_eq!(read(&forward), vec!["a", "b"]);
}

#[test]
fn source_errors_carry_the_file_path() {
    let fixture = ConfigFixture::new().with_file("production", "db.toml", "host = ");
    let err = FilesSource::new(fixture.root()).load("production").unwrap_err();

    match err {
        strata_core::Error::Source { resource, .. } => {
            assert!(resource.ends_with("db.toml"), "{resource}");
        }
        other => panic!("expected a source error, got {other:?}"),
    }
}

#[cfg(unix)]
#[test]
fn scripts_run_only_when_enabled() {
    let fixture = ConfigFixture::new()
        .with_file("default", "db.json", r#"{"host": "json.db"}"#)
        .with_file("default", "db.js", r#"{"host": "script.db"}"#);
    let dir = fixture.layer_dir("default");

    let plain = DirectorySource::new(&dir).read().unwrap();
    assert_eq!(plain.get_path("db.host"), Some(&Value::from("json.db")));

    // `cat` echoes the file, standing in for a real interpreter.
    let scripts = ScriptOptions::new("js", "cat", Vec::<String>::new());
    let scripted = DirectorySource::new(&dir).with_scripts(scripts).read().unwrap();
    assert_eq!(scripted.get_path("db.host"), Some(&Value::from("script.db")));
}
